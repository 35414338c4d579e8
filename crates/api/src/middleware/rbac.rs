//! Admin gate and ownership checks.
//!
//! [`RequireAdmin`] wraps [`AuthUser`] and rejects non-admin tokens at the
//! type level. Volunteer-scoped endpoints call [`ensure_self_or_admin`] with
//! the email they were asked about, then [`ensure_owner_or_admin`] once the
//! volunteer row has been loaded.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use docent_core::error::CoreError;
use docent_core::types::DbId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` claim. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Allow the request when the caller owns `email` or is an admin.
///
/// Emails compare case-insensitively.
pub fn ensure_self_or_admin(user: &AuthUser, email: &str) -> Result<(), AppError> {
    if user.is_admin || user.email.eq_ignore_ascii_case(email.trim()) {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You can only access your own data".into(),
    )))
}

/// Allow the request when the caller is the volunteer with `volunteer_id`
/// or is an admin.
pub fn ensure_owner_or_admin(user: &AuthUser, volunteer_id: DbId) -> Result<(), AppError> {
    if user.is_admin || user.is_volunteer(volunteer_id) {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You can only access your own data".into(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn volunteer(email: &str) -> AuthUser {
        AuthUser {
            account_id: 7,
            email: email.to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn owner_passes() {
        assert!(ensure_self_or_admin(&volunteer("grete@example.org"), "Grete@Example.org").is_ok());
    }

    #[test]
    fn admin_passes_for_anyone() {
        let admin = AuthUser {
            account_id: 1,
            email: "admin@example.org".to_string(),
            is_admin: true,
        };
        assert!(ensure_self_or_admin(&admin, "someone@example.org").is_ok());
    }

    #[test]
    fn other_volunteer_is_forbidden() {
        let err = ensure_self_or_admin(&volunteer("grete@example.org"), "fritz@example.org")
            .unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));
    }

    #[test]
    fn owner_check_uses_account_id() {
        assert!(ensure_owner_or_admin(&volunteer("grete@example.org"), 7).is_ok());
        let err = ensure_owner_or_admin(&volunteer("grete@example.org"), 8).unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));
    }

    #[test]
    fn admin_token_never_counts_as_volunteer_owner() {
        let admin = AuthUser {
            account_id: 7,
            email: "admin@example.org".to_string(),
            is_admin: true,
        };
        assert!(!admin.is_volunteer(7));
        assert!(ensure_owner_or_admin(&admin, 7).is_ok());
    }
}
