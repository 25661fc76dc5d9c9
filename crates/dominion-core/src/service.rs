//! The `Dominion` service: one object owning the whole client core.
//!
//! Constructed at startup and passed to whatever drives it (the CLI binary,
//! a UI layer) - session state is never ambient global state. Protected
//! operations consult the [`AccessGuard`] before building a request, so a
//! denied operation provably performs no network I/O.

use anyhow::Result;

use crate::api::ApiClient;
use crate::auth::{Session, SessionManager, SessionStore};
use crate::config::Config;
use crate::guard::{Access, AccessGuard, Operation};
use crate::models::{
    Challenge, Community, Exercise, ExerciseFilter, LeaderboardEntry, Message, MobilityExercise,
    Product, ProgressAnalytics, ProgressDraft, ProgressEntry, RegisterProfile, User, Workout,
    WorkoutDraft,
};

pub struct Dominion {
    config: Config,
    api: ApiClient,
    manager: SessionManager,
    guard: AccessGuard,
}

impl Dominion {
    /// Build the service from config, with the session persisted under the
    /// config's cache directory.
    pub fn new(config: Config) -> Result<Self> {
        let store = SessionStore::new(config.cache_dir()?);
        Self::with_store(config, store)
    }

    /// Build the service with an explicit session store.
    pub fn with_store(config: Config, store: SessionStore) -> Result<Self> {
        let session = Session::with_store(store);
        let api = ApiClient::new(&config.api_base_url, session.clone())?;
        let manager = SessionManager::new(api.clone(), session.clone());
        let guard = AccessGuard::new(session);
        Ok(Self {
            config,
            api,
            manager,
            guard,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        self.manager.session()
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    /// Policy check for an operation, without performing it. UI layers use
    /// this to decide what to render for the current session state.
    pub fn check(&self, operation: Operation) -> Access {
        self.guard.check(operation)
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Sign in. Updates `last_email` in the in-memory config; the caller
    /// decides when to persist it.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.manager.login(email, password).await?;
        self.config.last_email = Some(email.to_string());
        Ok(user)
    }

    /// Create an account and sign in as it.
    pub async fn register(&mut self, profile: &RegisterProfile) -> Result<User> {
        let user = self.manager.register(profile).await?;
        self.config.last_email = Some(profile.email.clone());
        Ok(user)
    }

    pub fn logout(&self) {
        self.manager.logout();
    }

    /// Restore a persisted session, re-validating the saved token. Returns
    /// whether the client is signed in afterwards; never errors - a stale
    /// session silently falls back to anonymous.
    pub async fn restore(&self) -> bool {
        self.manager.restore().await
    }

    // ========================================================================
    // Catalog (public reads)
    // ========================================================================

    pub async fn exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        Ok(self.api.exercises(filter).await?)
    }

    pub async fn pillars(&self) -> Result<Vec<String>> {
        Ok(self.api.pillars().await?)
    }

    pub async fn exercise(&self, exercise_id: &str) -> Result<Exercise> {
        Ok(self.api.exercise(exercise_id).await?)
    }

    pub async fn mobility_exercises(&self) -> Result<Vec<MobilityExercise>> {
        Ok(self.api.mobility_exercises().await?)
    }

    pub async fn mobility_exercise(&self, exercise_id: &str) -> Result<MobilityExercise> {
        Ok(self.api.mobility_exercise(exercise_id).await?)
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        Ok(self.api.products().await?)
    }

    pub async fn product(&self, product_id: &str) -> Result<Product> {
        Ok(self.api.product(product_id).await?)
    }

    pub async fn communities(&self) -> Result<Vec<Community>> {
        Ok(self.api.communities().await?)
    }

    pub async fn community_messages(&self, community_id: &str) -> Result<Vec<Message>> {
        Ok(self.api.community_messages(community_id).await?)
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.api.leaderboard().await?)
    }

    pub async fn challenges(&self) -> Result<Vec<Challenge>> {
        Ok(self.api.challenges().await?)
    }

    // ========================================================================
    // Protected operations - guard first, then the wire
    // ========================================================================

    /// The signed-in user's profile, freshly fetched.
    pub async fn profile(&self) -> Result<User> {
        self.guard.require_authenticated()?;
        Ok(self.api.me().await?)
    }

    pub async fn progress(&self) -> Result<Vec<ProgressEntry>> {
        self.guard.require_authenticated()?;
        Ok(self.api.progress().await?)
    }

    pub async fn exercise_progress(&self, exercise_id: &str) -> Result<Vec<ProgressEntry>> {
        self.guard.require_authenticated()?;
        Ok(self.api.exercise_progress(exercise_id).await?)
    }

    pub async fn workouts(&self) -> Result<Vec<Workout>> {
        self.guard.require_authenticated()?;
        Ok(self.api.workouts().await?)
    }

    pub async fn progress_analytics(&self) -> Result<ProgressAnalytics> {
        self.guard.require_authenticated()?;
        Ok(self.api.progress_analytics().await?)
    }

    pub async fn log_progress(&self, draft: &ProgressDraft) -> Result<ProgressEntry> {
        self.guard.require_authenticated()?;
        Ok(self.api.log_progress(draft).await?)
    }

    pub async fn create_workout(&self, draft: &WorkoutDraft) -> Result<Workout> {
        self.guard.require_authenticated()?;
        Ok(self.api.create_workout(draft).await?)
    }

    pub async fn join_community(&self, community_id: &str) -> Result<()> {
        self.guard.require_authenticated()?;
        Ok(self.api.join_community(community_id).await?)
    }

    pub async fn join_challenge(&self, challenge_id: &str) -> Result<()> {
        self.guard.require_authenticated()?;
        Ok(self.api.join_challenge(challenge_id).await?)
    }
}
