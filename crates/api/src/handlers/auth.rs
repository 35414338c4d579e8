//! Handlers for the `/auth` resource (login, registration, account deletion).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use docent_core::error::CoreError;
use docent_core::types::DbId;
use docent_db::models::admin::{AccountCredentials, CreateAdmin};
use docent_db::models::volunteer::{CreateVolunteer, RegisterAccount};
use docent_db::repositories::{AdminRepo, VolunteerRepo};
use docent_notify::{MessageData, MessageKey};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{ensure_owner_or_admin, ensure_self_or_admin, RequireAdmin};
use crate::notifications::{notify_admins, notify_one};
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `DELETE /auth/delete-user`.
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub email: String,
}

/// Successful authentication payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: DbId,
    pub email: String,
    pub admin: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Admin accounts are checked first.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim();

    let (credentials, admin) =
        match AdminRepo::find_credentials_by_email(&state.pool, email).await? {
            Some(credentials) => (Some(credentials), true),
            None => (
                VolunteerRepo::find_credentials_by_email(&state.pool, email).await?,
                false,
            ),
        };

    let credentials = credentials.ok_or_else(invalid_credentials)?;
    check_password(&credentials, &input.password)?;

    let access_token =
        generate_access_token(credentials.id, &credentials.email, admin, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(account_id = credentials.id, admin, "Login succeeded");

    Ok(Json(ApiResponse::data(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: SessionUser {
            id: credentials.id,
            email: credentials.email,
            admin,
        },
    })))
}

/// POST /api/auth/volunteer-register
///
/// Create a `Pending` volunteer and tell the admins.
pub async fn volunteer_register(
    State(state): State<AppState>,
    Json(input): Json<RegisterAccount>,
) -> AppResult<impl IntoResponse> {
    let input = validate_registration(input)?;
    if AdminRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::conflict("An account with this email already exists"));
    }

    let volunteer = VolunteerRepo::create(
        &state.pool,
        &CreateVolunteer {
            password_hash: hash(&input.password)?,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
        },
    )
    .await?;

    tracing::info!(volunteer_id = volunteer.id, "Volunteer registered");

    notify_admins(
        &state,
        MessageKey::NewVolunteer,
        MessageData::default().with_name(volunteer.full_name()),
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(volunteer).with_message("User registered successfully")),
    ))
}

/// POST /api/auth/admin-register
///
/// Create another admin account and send them a welcome message.
pub async fn admin_register(
    RequireAdmin(creator): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<RegisterAccount>,
) -> AppResult<impl IntoResponse> {
    let input = validate_registration(input)?;
    if VolunteerRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::conflict("An account with this email already exists"));
    }

    let admin = AdminRepo::create(
        &state.pool,
        &CreateAdmin {
            password_hash: hash(&input.password)?,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
        },
    )
    .await?;

    tracing::info!(admin_id = admin.id, created_by = creator.account_id, "Admin registered");

    notify_one(
        &state,
        &admin.email,
        MessageKey::NewAdmin,
        MessageData::default().with_name(admin.full_name()),
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(admin).with_message("User registered successfully")),
    ))
}

/// DELETE /api/auth/delete-user
///
/// Anonymize the admin and/or volunteer record with this email and drop its
/// credentials. Applications are kept for coverage history.
pub async fn delete_user(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<DeleteUserRequest>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".into()));
    }
    ensure_self_or_admin(&user, email)?;

    let mut deleted = false;
    if let Some(admin) = AdminRepo::find_by_email(&state.pool, email).await? {
        if !user.is_admin {
            return Err(AppError::forbidden("You can only access your own data"));
        }
        deleted |= AdminRepo::anonymize(&state.pool, admin.id).await?;
    }
    if let Some(volunteer) = VolunteerRepo::find_by_email(&state.pool, email).await? {
        ensure_owner_or_admin(&user, volunteer.id)?;
        deleted |= VolunteerRepo::anonymize(&state.pool, volunteer.id).await?;
    }

    if !deleted {
        return Err(AppError::Core(CoreError::NotFoundByEmail {
            entity: "User",
            email: email.to_string(),
        }));
    }

    tracing::info!(requested_by = user.account_id, admin = user.is_admin, "User deleted");

    Ok(Json(ApiResponse::message("User deleted successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Accounts deleted via `delete-user` have no hash and can never log in.
fn check_password(credentials: &AccountCredentials, password: &str) -> AppResult<()> {
    let hash = credentials
        .password_hash
        .as_deref()
        .ok_or_else(invalid_credentials)?;
    let valid = verify_password(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(invalid_credentials());
    }
    Ok(())
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Trim fields, lowercase the email and reject obviously unusable
/// registrations.
fn validate_registration(input: RegisterAccount) -> AppResult<RegisterAccount> {
    let email = input.email.trim().to_lowercase();
    let first_name = input.first_name.trim().to_string();
    let last_name = input.last_name.trim().to_string();

    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::BadRequest(
            "First name and last name are required".into(),
        ));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    Ok(RegisterAccount {
        email,
        password: input.password,
        first_name,
        last_name,
    })
}
