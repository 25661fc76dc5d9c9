//! Access policy for client operations.
//!
//! Anonymous users may read all catalog data; anything that writes or
//! touches the signed-in user's own records requires authentication. The
//! guard keeps no state of its own - every check re-reads the live session,
//! so a token torn down mid-session is reflected by the very next check.

use thiserror::Error;

use crate::auth::Session;
use crate::models::User;

/// Everything a client can ask to do, for policy purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // Catalog reads, open to everyone
    BrowseExercises,
    ViewExercise,
    ListPillars,
    BrowseMobility,
    BrowseProducts,
    BrowseCommunities,
    ReadCommunityMessages,
    ViewLeaderboard,
    BrowseChallenges,

    // Private reads
    ViewOwnProfile,
    ListProgress,
    ListWorkouts,
    ViewAnalytics,

    // Writes
    LogProgress,
    CreateWorkout,
    JoinCommunity,
    JoinChallenge,
    PostChatMessage,
}

impl Operation {
    /// Whether this operation needs a signed-in user.
    pub fn requires_auth(&self) -> bool {
        match self {
            Operation::BrowseExercises
            | Operation::ViewExercise
            | Operation::ListPillars
            | Operation::BrowseMobility
            | Operation::BrowseProducts
            | Operation::BrowseCommunities
            | Operation::ReadCommunityMessages
            | Operation::ViewLeaderboard
            | Operation::BrowseChallenges => false,

            Operation::ViewOwnProfile
            | Operation::ListProgress
            | Operation::ListWorkouts
            | Operation::ViewAnalytics
            | Operation::LogProgress
            | Operation::CreateWorkout
            | Operation::JoinCommunity
            | Operation::JoinChallenge
            | Operation::PostChatMessage => true,
        }
    }
}

/// Why an operation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeniedReason {
    Unauthenticated,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied { reason: DeniedReason },
}

/// Error form of a denial, for call sites that gate with `?`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Not signed in - this action requires an account")]
pub struct AccessDenied {
    pub reason: DeniedReason,
}

/// Stateless gate in front of protected operations.
pub struct AccessGuard {
    session: Session,
}

impl AccessGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Decide whether an operation may proceed right now.
    ///
    /// Recomputed from the session on every call - the session may have been
    /// invalidated by a concurrently completing request since the last check.
    pub fn check(&self, operation: Operation) -> Access {
        if !operation.requires_auth() || self.session.is_authenticated() {
            Access::Allowed
        } else {
            Access::Denied {
                reason: DeniedReason::Unauthenticated,
            }
        }
    }

    /// The signed-in user, or a denial to surface as a login redirect.
    pub fn require_authenticated(&self) -> Result<User, AccessDenied> {
        self.session.current_user().ok_or(AccessDenied {
            reason: DeniedReason::Unauthenticated,
        })
    }
}
