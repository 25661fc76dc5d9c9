//! Session lifecycle: the client-side record of "am I logged in, and as whom".
//!
//! The state machine:
//!
//! ```text
//!   Anonymous ──(login/register)──→ Authenticating ──(success)──→ Authenticated
//!       ↑                                │                            │
//!       ├────────────(failure)───────────┘                            │
//!       └──(logout, or 401 via Invalid)───────────────────────────────┘
//! ```
//!
//! `Authenticating` and `Invalid` are transient; at rest the state is only
//! ever `Anonymous` or `Authenticated`. `Invalid` exists inside a single
//! write-lock critical section: a rejected token is cleared from memory and
//! disk before any other request can observe the session again.

use std::sync::{Arc, RwLock};

use anyhow::Result;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::credentials::CredentialStore;
use crate::auth::store::{PersistedSession, SessionStore};
use crate::models::{RegisterProfile, User};

/// Current lifecycle state of the client session.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No account signed in. Catalog reads still work.
    Anonymous,

    /// A login or registration request is in flight.
    Authenticating,

    /// Signed in. The token authorizes protected calls until the server
    /// rejects it or a new login supersedes it.
    Authenticated { user: User, token: String },

    /// A held token was rejected. Never observable at rest: the session
    /// collapses back to `Anonymous` in the same critical section that
    /// clears stored state.
    Invalid,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

/// Shared handle to the session state.
///
/// Clone is cheap - all clones point at the same cell. The same handle is
/// installed in the [`ApiClient`], so the token read at request dispatch and
/// the token held here are always the same value: there is no window where a
/// request goes out with a token a concurrent logout has already cleared.
///
/// The lock is a std `RwLock` held only long enough to copy or swap the
/// state, never across an `.await`.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    store: Option<Arc<SessionStore>>,
}

impl Session {
    /// In-memory session with no persistence.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::Anonymous)),
            store: None,
        }
    }

    /// Session persisted through the given store. Starts `Anonymous`;
    /// call [`SessionManager::restore`] to pick up a saved token.
    pub fn with_store(store: SessionStore) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::Anonymous)),
            store: Some(Arc::new(store)),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.read().clone()
    }

    /// The bearer token, read at request dispatch time.
    pub fn token(&self) -> Option<String> {
        match &*self.read() {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    /// The signed-in account, if any.
    pub fn current_user(&self) -> Option<User> {
        match &*self.read() {
            SessionState::Authenticated { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Mark a login/registration request as in flight.
    pub(crate) fn begin_authentication(&self) {
        *self.write() = SessionState::Authenticating;
    }

    /// Install a fresh token and account, persisting them for the next start.
    ///
    /// The state swap and the disk write happen under the same write lock so
    /// a concurrent dispatch never sees the new state with the old file.
    pub(crate) fn complete_authentication(&self, user: User, token: String) {
        let mut state = self.write();
        if let Some(ref store) = self.store {
            let persisted = PersistedSession::new(&user, &token);
            if let Err(e) = store.save(&persisted) {
                warn!(error = %e, "Failed to persist session");
            }
        }
        *state = SessionState::Authenticated { user, token };
    }

    /// A login/registration attempt failed; fall back to `Anonymous`.
    pub(crate) fn abort_authentication(&self) {
        *self.write() = SessionState::Anonymous;
    }

    /// Explicit logout: drop the token and the persisted session.
    pub(crate) fn clear(&self) {
        let mut state = self.write();
        if let Some(ref store) = self.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, "Failed to remove session file");
            }
        }
        *state = SessionState::Anonymous;
    }

    /// React to an authentication rejection from the server.
    ///
    /// Called by the API client's response interceptor on any 401.
    /// `Authenticated → Invalid → Anonymous` in one critical section, with
    /// the persisted token cleared in between. Idempotent: from `Anonymous`
    /// this is a no-op, so concurrent in-flight requests that all come back
    /// 401 cause exactly one teardown.
    pub fn invalidate(&self) {
        let mut state = self.write();
        if matches!(*state, SessionState::Anonymous) {
            return;
        }
        *state = SessionState::Invalid;
        if let Some(ref store) = self.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, "Failed to remove session file after rejection");
            }
        }
        *state = SessionState::Anonymous;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrates login, registration, logout, and startup restore against the
/// API, driving the [`Session`] state machine.
#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
    session: Session,
}

impl SessionManager {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sign in with email and password.
    ///
    /// On success the token is installed and persisted and the password is
    /// stored in the OS keychain for the next prompt. On failure the state
    /// returns to `Anonymous` and the error is surfaced to the caller as a
    /// recoverable error, never a panic.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        self.session.begin_authentication();
        match self.api.login(email, password).await {
            Ok(auth) => {
                if let Err(e) = CredentialStore::store(email, password) {
                    warn!(error = %e, "Failed to store password in keychain");
                }
                self.session
                    .complete_authentication(auth.user.clone(), auth.token);
                info!(username = %auth.user.username, "Login successful");
                Ok(auth.user)
            }
            Err(e) => {
                self.session.abort_authentication();
                Err(e)
            }
        }
    }

    /// Create an account and sign in as it.
    ///
    /// Same transition shape as [`login`](Self::login). Optional numeric
    /// profile fields left blank arrive here already as `None` - see
    /// [`crate::models::parse_optional_field`].
    pub async fn register(&self, profile: &RegisterProfile) -> Result<User, ApiError> {
        self.session.begin_authentication();
        match self.api.register(profile).await {
            Ok(auth) => {
                if let Err(e) = CredentialStore::store(&profile.email, &profile.password) {
                    warn!(error = %e, "Failed to store password in keychain");
                }
                self.session
                    .complete_authentication(auth.user.clone(), auth.token);
                info!(username = %auth.user.username, "Registration successful");
                Ok(auth.user)
            }
            Err(e) => {
                self.session.abort_authentication();
                Err(e)
            }
        }
    }

    /// Sign out: clear the in-memory token, the persisted session file, and
    /// with them the default request decoration. The stored keychain password
    /// is kept for prefilling the next login.
    pub fn logout(&self) {
        self.session.clear();
        info!("Logged out");
    }

    /// Restore a persisted session at startup.
    ///
    /// Loads the saved token, installs it, and re-validates it with
    /// `GET /api/auth/me`. Absence, rejection, or any failure leaves the
    /// client `Anonymous` with no user-visible error - stale sessions fall
    /// back silently.
    pub async fn restore(&self) -> bool {
        let Some(ref store) = self.session.store else {
            return false;
        };
        let persisted = match store.load() {
            Ok(Some(p)) => p,
            Ok(None) => return false,
            Err(e) => {
                warn!(error = %e, "Failed to load session file");
                return false;
            }
        };

        // Install the saved token so the validation call is decorated with
        // it; a 401 runs through the normal interceptor teardown.
        self.session
            .complete_authentication(persisted.user, persisted.token);

        match self.api.me().await {
            Ok(user) => {
                let token = match self.session.token() {
                    Some(t) => t,
                    // A concurrent teardown beat us; stay anonymous.
                    None => return false,
                };
                self.session.complete_authentication(user, token);
                true
            }
            Err(e) => {
                // A rejected token was already torn down by the interceptor.
                // On transport failure keep the file so a later start can
                // retry, but don't run with an unvalidated token.
                if !matches!(e, ApiError::Unauthenticated) {
                    self.session.abort_authentication();
                }
                warn!(error = %e, "Saved session not restored");
                false
            }
        }
    }
}
