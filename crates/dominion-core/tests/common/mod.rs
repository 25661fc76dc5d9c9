//! In-process fake Dominion API for integration tests.
//!
//! Implements the slice of the backend contract the client exercises:
//! register/login/me with bearer tokens, the public catalog reads, and the
//! protected progress/workout/join endpoints. State is shared with the test
//! so it can seed users, revoke tokens, and count the requests that actually
//! reached the wire.

// Allow dead code: each test binary uses a different slice of the harness
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

type Shared = Arc<BackendState>;

pub struct StoredUser {
    pub password: String,
    pub user: Value,
}

#[derive(Default)]
pub struct BackendState {
    users: Mutex<HashMap<String, StoredUser>>,
    tokens: Mutex<HashMap<String, String>>,
    progress: Mutex<Vec<Value>>,
    workouts: Mutex<Vec<Value>>,
    token_counter: AtomicUsize,
    total_requests: AtomicUsize,
    write_requests: AtomicUsize,
    last_register_body: Mutex<Option<Value>>,
}

impl BackendState {
    /// Number of requests of any kind that reached the server.
    pub fn total_requests(&self) -> usize {
        self.total_requests.load(Ordering::SeqCst)
    }

    /// Number of mutating (POST) requests that reached the server.
    pub fn write_requests(&self) -> usize {
        self.write_requests.load(Ordering::SeqCst)
    }

    /// The raw JSON body of the most recent register call.
    pub fn last_register_body(&self) -> Option<Value> {
        self.last_register_body.lock().unwrap().clone()
    }

    /// Server-side token revocation: the next request carrying this token
    /// is rejected with 401.
    pub fn revoke_token(&self, token: &str) {
        self.tokens.lock().unwrap().remove(token);
    }

    /// True if the token would still authorize a request.
    pub fn token_is_valid(&self, token: &str) -> bool {
        self.tokens.lock().unwrap().contains_key(token)
    }

    fn issue_token(&self, email: &str) -> String {
        let token = format!("tok-{}", self.token_counter.fetch_add(1, Ordering::SeqCst) + 1);
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), email.to_string());
        token
    }

    fn authenticate(&self, headers: &HeaderMap) -> Option<Value> {
        let auth = headers.get("authorization")?.to_str().ok()?;
        let token = auth.strip_prefix("Bearer ")?;
        let email = self.tokens.lock().unwrap().get(token)?.clone();
        let users = self.users.lock().unwrap();
        Some(users.get(&email)?.user.clone())
    }
}

/// A running fake backend bound to an ephemeral local port.
pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(BackendState::default());

        let app = Router::new()
            .route("/api/auth/register", post(register))
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/exercises", get(exercises))
            .route("/api/exercises/pillars", get(pillars))
            .route("/api/exercises/{id}", get(exercise))
            .route("/api/mobility", get(mobility))
            .route("/api/products", get(products))
            .route("/api/communities", get(communities))
            .route("/api/communities/{id}/join", post(join_community))
            .route("/api/communities/{id}/messages", get(community_messages))
            .route("/api/leaderboard", get(leaderboard))
            .route("/api/challenges", get(challenges))
            .route("/api/challenges/{id}/join", post(join_challenge))
            .route("/api/progress", post(log_progress).get(list_progress))
            .route("/api/progress/{exercise_id}", get(exercise_progress))
            .route("/api/workouts", post(create_workout).get(list_workouts))
            .route("/api/analytics/progress", get(analytics))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                track_requests,
            ))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr: SocketAddr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend serve");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

async fn track_requests(State(state): State<Shared>, request: Request, next: Next) -> Response {
    state.total_requests.fetch_add(1, Ordering::SeqCst);
    if request.method() == axum::http::Method::POST {
        state.write_requests.fetch_add(1, Ordering::SeqCst);
    }
    next.run(request).await
}

// The real backend writes naive UTC datetimes with no offset.
fn naive_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

fn full_user(id: &str, body: &Value) -> Value {
    json!({
        "id": id,
        "username": body["username"],
        "email": body["email"],
        "full_name": body["full_name"],
        "age": body.get("age").cloned().unwrap_or(Value::Null),
        "height": body.get("height").cloned().unwrap_or(Value::Null),
        "weight": body.get("weight").cloned().unwrap_or(Value::Null),
        "university": body.get("university").cloned().unwrap_or(Value::Null),
        "city": body.get("city").cloned().unwrap_or(Value::Null),
        "fitness_level": "Beginner",
        "points": 0,
        "badges": [],
        "streak_count": 0,
        "following": [],
        "followers": [],
        "created_at": naive_now()
    })
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state
        .last_register_body
        .lock()
        .unwrap()
        .replace(body.clone());

    let email = match body["email"].as_str() {
        Some(e) if !e.is_empty() => e.to_string(),
        _ => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": "email required"})),
            )
                .into_response()
        }
    };

    let mut users = state.users.lock().unwrap();
    if users.contains_key(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Email already registered"})),
        )
            .into_response();
    }

    let id = format!("u{}", users.len() + 1);
    let user = full_user(&id, &body);
    users.insert(
        email.clone(),
        StoredUser {
            password: body["password"].as_str().unwrap_or_default().to_string(),
            user: user.clone(),
        },
    );
    drop(users);

    let token = state.issue_token(&email);
    Json(json!({"access_token": token, "token_type": "bearer", "user": user})).into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    let users = state.users.lock().unwrap();
    let stored = match users.get(&email) {
        Some(stored) if stored.password == password => stored.user.clone(),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Incorrect email or password"})),
            )
                .into_response()
        }
    };
    drop(users);

    let token = state.issue_token(&email);
    Json(json!({"access_token": token, "token_type": "bearer", "user": stored})).into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    match state.authenticate(&headers) {
        Some(user) => Json(user).into_response(),
        None => unauthorized(),
    }
}

fn seed_exercises() -> Vec<Value> {
    vec![
        json!({
            "id": "e1",
            "name": "Incline Rows",
            "pillar": "Horizontal Pull",
            "skill_level": "Beginner",
            "description": "Rowing at an incline to build pulling strength.",
            "instructions": ["Set bar at waist height", "Pull chest to bar"],
            "common_mistakes": ["Sagging hips"],
            "video_url": null,
            "prerequisites": [],
            "progression_order": 1
        }),
        json!({
            "id": "e2",
            "name": "Tuck Front Lever",
            "pillar": "Horizontal Pull",
            "skill_level": "Intermediate",
            "description": "Static hold building towards the front lever.",
            "instructions": ["Dead hang", "Lift knees to chest", "Lean back"],
            "common_mistakes": ["Bent arms"],
            "video_url": null,
            "prerequisites": ["e1"],
            "progression_order": 2
        }),
        json!({
            "id": "e3",
            "name": "Pseudo Planche Push-ups",
            "pillar": "Horizontal Push",
            "skill_level": "Intermediate",
            "description": "Push-ups with hands by the hips.",
            "instructions": ["Lean forward over the hands"],
            "common_mistakes": ["Flared elbows"],
            "video_url": null,
            "prerequisites": [],
            "progression_order": 3
        }),
    ]
}

async fn exercises(
    State(_state): State<Shared>,
    axum::extract::Query(params): axum::extract::Query<HashMap<String, String>>,
) -> Response {
    let mut list = seed_exercises();
    if let Some(pillar) = params.get("pillar") {
        list.retain(|e| e["pillar"].as_str() == Some(pillar));
    }
    if let Some(level) = params.get("skill_level") {
        list.retain(|e| e["skill_level"].as_str() == Some(level));
    }
    Json(list).into_response()
}

async fn pillars(State(_state): State<Shared>) -> Response {
    Json(json!({"pillars": ["Horizontal Pull", "Horizontal Push"]})).into_response()
}

async fn exercise(State(_state): State<Shared>, Path(id): Path<String>) -> Response {
    match seed_exercises().into_iter().find(|e| e["id"] == json!(id)) {
        Some(found) => Json(found).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Exercise not found"})),
        )
            .into_response(),
    }
}

async fn mobility(State(_state): State<Shared>) -> Response {
    Json(json!([{
        "id": "m1",
        "name": "90/90 Hip Stretch",
        "area": "Hips",
        "type": "exercise",
        "description": "Hip rotation work.",
        "instructions": [],
        "benefits": [],
        "video_url": null,
        "hold_time": "60 seconds"
    }]))
    .into_response()
}

async fn products(State(_state): State<Shared>) -> Response {
    Json(json!([{
        "id": "pr1",
        "name": "Gymnastics Rings",
        "description": "Wooden rings with straps.",
        "price": 59.99,
        "category": "Equipment",
        "image_url": null,
        "in_stock": true
    }]))
    .into_response()
}

async fn communities(State(_state): State<Shared>) -> Response {
    Json(json!([{
        "id": "c1",
        "name": "Delhi Calisthenics",
        "type": "city",
        "description": "Street workout in Delhi.",
        "members": ["u9"]
    }]))
    .into_response()
}

async fn community_messages(State(_state): State<Shared>, Path(_id): Path<String>) -> Response {
    Json(json!([{
        "id": "msg1",
        "user_id": "u9",
        "community_id": "c1",
        "username": "arjun_warrior",
        "content": "Anyone training at Lodhi Garden tomorrow?",
        "timestamp": "2026-07-30T18:04:00Z"
    }]))
    .into_response()
}

async fn leaderboard(State(_state): State<Shared>) -> Response {
    Json(json!([
        {"rank": 1, "username": "arjun_warrior", "points": 2850, "university": "IIT Delhi", "city": "New Delhi"},
        {"rank": 2, "username": "priya_fitness", "points": 2720, "university": "IIT Bombay", "city": "Mumbai"}
    ]))
    .into_response()
}

async fn challenges(State(_state): State<Shared>) -> Response {
    Json(json!([{
        "id": "ch1",
        "name": "July Pull-up Challenge",
        "description": "500 pull-ups over the month.",
        "type": "monthly",
        "goal_type": "reps",
        "goal_value": 500,
        "start_date": "2026-07-01T00:00:00Z",
        "end_date": "2026-07-31T23:59:59Z",
        "participants": [],
        "rewards": ["badge"],
        "status": "active"
    }]))
    .into_response()
}

async fn join_community(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({"message": "Joined community successfully"})).into_response()
}

async fn join_challenge(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({"message": "Successfully joined challenge"})).into_response()
}

async fn log_progress(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(user) = state.authenticate(&headers) else {
        return unauthorized();
    };
    let mut progress = state.progress.lock().unwrap();
    let entry = json!({
        "id": format!("p{}", progress.len() + 1),
        "user_id": user["id"],
        "exercise_id": body["exercise_id"],
        "date": naive_now(),
        "reps": body.get("reps").cloned().unwrap_or(Value::Null),
        "sets": body.get("sets").cloned().unwrap_or(Value::Null),
        "hold_time": body.get("hold_time").cloned().unwrap_or(Value::Null),
        "weight": body.get("weight").cloned().unwrap_or(Value::Null),
        "notes": body.get("notes").cloned().unwrap_or(Value::Null),
    });
    progress.push(entry.clone());
    Json(entry).into_response()
}

async fn list_progress(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let Some(user) = state.authenticate(&headers) else {
        return unauthorized();
    };
    let progress = state.progress.lock().unwrap();
    let mine: Vec<Value> = progress
        .iter()
        .filter(|p| p["user_id"] == user["id"])
        .cloned()
        .collect();
    Json(mine).into_response()
}

async fn exercise_progress(
    State(state): State<Shared>,
    Path(exercise_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(user) = state.authenticate(&headers) else {
        return unauthorized();
    };
    let progress = state.progress.lock().unwrap();
    let mine: Vec<Value> = progress
        .iter()
        .filter(|p| p["user_id"] == user["id"] && p["exercise_id"] == json!(exercise_id))
        .cloned()
        .collect();
    Json(mine).into_response()
}

async fn create_workout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(user) = state.authenticate(&headers) else {
        return unauthorized();
    };
    let mut workouts = state.workouts.lock().unwrap();
    let workout = json!({
        "id": format!("w{}", workouts.len() + 1),
        "user_id": user["id"],
        "name": body["name"],
        "exercises": body.get("exercises").cloned().unwrap_or(json!([])),
        "scheduled_date": body.get("scheduled_date").cloned().unwrap_or(Value::Null),
        "completed_date": Value::Null,
        "duration": body.get("duration").cloned().unwrap_or(Value::Null),
        "created_at": naive_now(),
    });
    workouts.push(workout.clone());
    Json(workout).into_response()
}

async fn list_workouts(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let Some(user) = state.authenticate(&headers) else {
        return unauthorized();
    };
    let workouts = state.workouts.lock().unwrap();
    let mine: Vec<Value> = workouts
        .iter()
        .filter(|w| w["user_id"] == user["id"])
        .cloned()
        .collect();
    Json(mine).into_response()
}

async fn analytics(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let Some(user) = state.authenticate(&headers) else {
        return unauthorized();
    };
    let progress = state.progress.lock().unwrap();
    let total = progress.iter().filter(|p| p["user_id"] == user["id"]).count();
    Json(json!({
        "total_workouts": total,
        "unique_workout_days": if total > 0 { 1 } else { 0 },
        "most_practiced_exercises": [],
        "current_streak": 0,
        "weekly_progress": total
    }))
    .into_response()
}
