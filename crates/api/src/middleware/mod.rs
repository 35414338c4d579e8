//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated account from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` claim.
//! - [`rbac::ensure_self_or_admin`] -- Ownership check for volunteer-scoped data.

pub mod auth;
pub mod rbac;
