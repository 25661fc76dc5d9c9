//! API client for communicating with the Dominion REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests to the fitness backend: auth, the exercise and mobility
//! catalogs, progress and workouts, communities, the leaderboard, and the
//! shop.
//!
//! Every request reads the bearer token from the shared [`Session`] at
//! dispatch time, and every non-auth response runs through a single 401
//! interceptor that tears the session down, so token handling lives in one
//! place rather than at each call site.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::models::{
    Challenge, Community, Exercise, ExerciseFilter, LeaderboardEntry, Message, MobilityExercise,
    Product, ProgressAnalytics, ProgressDraft, ProgressEntry, RegisterProfile, User, Workout,
    WorkoutDraft,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout for login/register/me calls in seconds.
/// Auth gates everything else, so it fails faster than ordinary requests.
const AUTH_TIMEOUT_SECS: u64 = 10;

/// Successful response from the register and login endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSuccess {
    #[serde(rename = "access_token")]
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct PillarsResponse {
    pillars: Vec<String>,
}

/// API client for the Dominion backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session handle is a shared cell.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a new API client against the given base URL, attaching
    /// credentials from the given session.
    pub fn new(base_url: &str, session: Session) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Auth endpoints
    //
    // These bypass the 401 interceptor: a 401 from login means the submitted
    // credentials were wrong, not that a held token was rejected.
    // ========================================================================

    /// `POST /api/auth/register` - create an account and get a token for it.
    pub async fn register(&self, profile: &RegisterProfile) -> Result<AuthSuccess, ApiError> {
        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .timeout(Duration::from_secs(AUTH_TIMEOUT_SECS))
            .json(profile)
            .send()
            .await?;

        // The backend answers 400 for an email collision.
        if response.status() == StatusCode::BAD_REQUEST {
            return Err(ApiError::DuplicateIdentity);
        }
        let response = Self::check_auth_response(response).await?;
        Self::parse_json(response).await
    }

    /// `POST /api/auth/login` - exchange credentials for a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, ApiError> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .timeout(Duration::from_secs(AUTH_TIMEOUT_SECS))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::InvalidCredentials);
        }
        let response = Self::check_auth_response(response).await?;
        Self::parse_json(response).await
    }

    /// `GET /api/auth/me` - the account the current token belongs to.
    pub async fn me(&self) -> Result<User, ApiError> {
        let mut request = self
            .client
            .get(self.url("/api/auth/me"))
            .timeout(Duration::from_secs(AUTH_TIMEOUT_SECS));
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let response = self.check_response(response).await?;
        Self::parse_json(response).await
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    /// Check a non-auth response.
    ///
    /// This is the single point every catalog and protected call routes
    /// through: a 401 forces the session to `Anonymous` (clearing the stored
    /// token) before the error is surfaced, so the next render already
    /// reflects the logged-out state.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Request rejected with 401, invalidating session");
            self.session.invalidate();
            return Err(ApiError::Unauthenticated);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    /// Check an auth-endpoint response, with no session teardown on 401.
    async fn check_auth_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response.json().await.map_err(|e| {
            if e.is_decode() {
                ApiError::InvalidResponse(e.to_string())
            } else {
                ApiError::NetworkFailure(e)
            }
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let response = self.check_response(response).await?;
        Self::parse_json(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let response = self.check_response(response).await?;
        Self::parse_json(response).await
    }

    // ========================================================================
    // Catalog reads (public - work without a token)
    // ========================================================================

    /// Fetch the exercise catalog, optionally filtered by pillar and skill
    /// level. The server returns exercises in progression order.
    pub async fn exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, ApiError> {
        self.get_with_query("/api/exercises", &filter.query()).await
    }

    /// Fetch the list of movement pillars.
    pub async fn pillars(&self) -> Result<Vec<String>, ApiError> {
        let response: PillarsResponse = self.get("/api/exercises/pillars").await?;
        Ok(response.pillars)
    }

    /// Fetch a single exercise by id.
    pub async fn exercise(&self, exercise_id: &str) -> Result<Exercise, ApiError> {
        self.get(&format!("/api/exercises/{}", exercise_id)).await
    }

    /// Fetch the mobility catalog.
    pub async fn mobility_exercises(&self) -> Result<Vec<MobilityExercise>, ApiError> {
        self.get("/api/mobility").await
    }

    /// Fetch a single mobility exercise by id.
    pub async fn mobility_exercise(&self, exercise_id: &str) -> Result<MobilityExercise, ApiError> {
        self.get(&format!("/api/mobility/{}", exercise_id)).await
    }

    /// Fetch the shop catalog.
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/api/products").await
    }

    /// Fetch a single product by id.
    pub async fn product(&self, product_id: &str) -> Result<Product, ApiError> {
        self.get(&format!("/api/products/{}", product_id)).await
    }

    /// Fetch all communities.
    pub async fn communities(&self) -> Result<Vec<Community>, ApiError> {
        self.get("/api/communities").await
    }

    /// Fetch the stored message history for a community, newest first.
    pub async fn community_messages(&self, community_id: &str) -> Result<Vec<Message>, ApiError> {
        self.get(&format!("/api/communities/{}/messages", community_id))
            .await
    }

    /// Fetch the points leaderboard. Ranks and points are computed
    /// server-side and rendered verbatim.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.get("/api/leaderboard").await
    }

    /// Fetch currently active challenges.
    pub async fn challenges(&self) -> Result<Vec<Challenge>, ApiError> {
        self.get("/api/challenges").await
    }

    // ========================================================================
    // Protected reads
    // ========================================================================

    /// Fetch the signed-in user's progress log, newest first.
    pub async fn progress(&self) -> Result<Vec<ProgressEntry>, ApiError> {
        self.get("/api/progress").await
    }

    /// Fetch the signed-in user's progress for one exercise, oldest first.
    pub async fn exercise_progress(&self, exercise_id: &str) -> Result<Vec<ProgressEntry>, ApiError> {
        self.get(&format!("/api/progress/{}", exercise_id)).await
    }

    /// Fetch the signed-in user's workouts.
    pub async fn workouts(&self) -> Result<Vec<Workout>, ApiError> {
        self.get("/api/workouts").await
    }

    /// Fetch the signed-in user's thirty-day training summary.
    pub async fn progress_analytics(&self) -> Result<ProgressAnalytics, ApiError> {
        self.get("/api/analytics/progress").await
    }

    // ========================================================================
    // Protected writes
    // ========================================================================

    /// `POST /api/progress` - log a training entry.
    ///
    /// The wire format requires a `user_id`; the server overwrites it with
    /// the token's account, so the client sends whatever it currently holds.
    pub async fn log_progress(&self, draft: &ProgressDraft) -> Result<ProgressEntry, ApiError> {
        let user_id = self
            .session
            .current_user()
            .map(|u| u.id)
            .unwrap_or_default();
        let body = json!({
            "user_id": user_id,
            "exercise_id": draft.exercise_id,
            "reps": draft.reps,
            "sets": draft.sets,
            "hold_time": draft.hold_time,
            "weight": draft.weight,
            "notes": draft.notes,
        });
        self.post("/api/progress", &body).await
    }

    /// `POST /api/workouts` - create a workout.
    pub async fn create_workout(&self, draft: &WorkoutDraft) -> Result<Workout, ApiError> {
        let user_id = self
            .session
            .current_user()
            .map(|u| u.id)
            .unwrap_or_default();
        let body = json!({
            "user_id": user_id,
            "name": draft.name,
            "exercises": draft.exercises,
            "scheduled_date": draft.scheduled_date,
            "duration": draft.duration,
        });
        self.post("/api/workouts", &body).await
    }

    /// `POST /api/communities/{id}/join` - join a community.
    pub async fn join_community(&self, community_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post(&format!("/api/communities/{}/join", community_id), &json!({}))
            .await?;
        Ok(())
    }

    /// `POST /api/challenges/{id}/join` - join a challenge.
    pub async fn join_challenge(&self, challenge_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post(&format!("/api/challenges/{}/join", challenge_id), &json!({}))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_success_parses_wire_format() {
        let json = r#"{
            "access_token": "eyJhbGciOiJIUzI1NiJ9.payload.sig",
            "token_type": "bearer",
            "user": {
                "id": "u1",
                "username": "asha",
                "email": "asha@example.com",
                "full_name": "Asha Rao",
                "age": 24,
                "height": null,
                "weight": null,
                "university": "IIT Delhi",
                "city": "New Delhi"
            }
        }"#;

        let auth: AuthSuccess = serde_json::from_str(json).expect("should parse");
        assert!(auth.token.starts_with("eyJ"));
        assert_eq!(auth.user.username, "asha");
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:8000/", Session::new())
            .expect("client should build");
        assert_eq!(client.url("/api/exercises"), "http://localhost:8000/api/exercises");
    }

    #[test]
    fn test_pillars_response_parses() {
        let json = r#"{"pillars": ["Horizontal Pull", "Vertical Push", "Core"]}"#;
        let response: PillarsResponse = serde_json::from_str(json).expect("should parse");
        assert_eq!(response.pillars.len(), 3);
    }
}
