#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use docent_api::auth::jwt::{generate_access_token, JwtConfig};
use docent_api::auth::password::hash_password;
use docent_api::config::ServerConfig;
use docent_api::router::build_app_router;
use docent_api::state::AppState;
use docent_core::calendar::FixedHolidays;
use docent_core::clock::FixedClock;
use docent_core::recommendation::{CompletionError, CompletionModel, CompletionRequest};
use docent_core::status::AccountStatus;
use docent_db::models::admin::{Admin, CreateAdmin};
use docent_db::models::slot::{CreateSlot, Slot};
use docent_db::models::volunteer::{CreateVolunteer, Volunteer};
use docent_db::repositories::{AdminRepo, SlotRepo, VolunteerRepo};

/// Wednesday. The first qualifying days after it are Sat 8 and Sun 9 March.
pub const TODAY: (i32, u32, u32) = (2025, 3, 5);

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Build a test `ServerConfig` with safe defaults and a daily
/// recommendation cap of 2.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        max_recommendation_requests_per_day: 2,
        max_admin_recommendation_requests_per_day: 2,
        organization_name: "Test Museum".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Scripted completion model
// ---------------------------------------------------------------------------

/// A completion model that replays queued replies and records every call.
/// An empty queue behaves like an unconfigured model.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn push_error(&self, error: CompletionError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|r| r.prompt.clone())
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::NotConfigured))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with a fixed clock, a single holiday
/// (Good Friday 2025), no mailer and a model with no scripted replies.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_model(pool, ScriptedModel::new())
}

/// Same as [`build_test_app`] but with a caller-controlled model.
pub fn build_test_app_with_model(pool: PgPool, model: Arc<ScriptedModel>) -> Router {
    let config = test_config();
    let state = AppState::new(
        pool,
        config.clone(),
        Arc::new(FixedClock::at_date(today())),
        Arc::new(FixedHolidays::new([date(2025, 4, 18)])),
        model,
        None,
    );
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn token_for(id: i64, email: &str, admin: bool) -> String {
    generate_access_token(id, email, admin, &test_config().jwt).unwrap()
}

pub async fn create_admin(pool: &PgPool, email: &str) -> (Admin, String) {
    let admin = AdminRepo::create(
        pool,
        &CreateAdmin {
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap();
    let token = token_for(admin.id, &admin.email, true);
    (admin, token)
}

pub async fn create_volunteer(
    pool: &PgPool,
    email: &str,
    status: AccountStatus,
) -> (Volunteer, String) {
    let volunteer = VolunteerRepo::create(
        pool,
        &CreateVolunteer {
            email: email.to_string(),
            first_name: "Vera".to_string(),
            last_name: "Volunteer".to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap();
    let volunteer = if status == AccountStatus::Pending {
        volunteer
    } else {
        VolunteerRepo::update_status(pool, volunteer.id, status)
            .await
            .unwrap()
            .unwrap()
    };
    let token = token_for(volunteer.id, &volunteer.email, false);
    (volunteer, token)
}

/// Morning 11:00-14:00 and Afternoon 14:00-17:00, both main.
pub async fn create_main_slots(pool: &PgPool) -> (Slot, Slot) {
    let morning = SlotRepo::create(
        pool,
        &CreateSlot {
            name: "Morning Shift".to_string(),
            start_time: "11:00".to_string(),
            end_time: "14:00".to_string(),
            is_main: Some(true),
        },
    )
    .await
    .unwrap();
    let afternoon = SlotRepo::create(
        pool,
        &CreateSlot {
            name: "Afternoon Shift".to_string(),
            start_time: "14:00".to_string(),
            end_time: "17:00".to_string(),
            is_main: Some(true),
        },
    )
    .await
    .unwrap();
    (morning, afternoon)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: &str,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("POST", uri, body, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("PUT", uri, body, Some(token))).await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("DELETE", uri, body, Some(token))).await
}
