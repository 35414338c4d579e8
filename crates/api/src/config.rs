use docent_core::rate_limit::DEFAULT_DAILY_LIMIT;

use crate::auth::jwt::JwtConfig;

/// Default organization name used in prompts and email sign-offs.
pub const DEFAULT_ORGANIZATION_NAME: &str = "Overbeck Museum";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Daily LLM-backed recommendation requests per volunteer.
    pub max_recommendation_requests_per_day: u32,
    /// Daily LLM-backed admin recommendation requests, shared by all admins.
    pub max_admin_recommendation_requests_per_day: u32,
    /// Name used in recommendation prompts.
    pub organization_name: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                                     | Default                 |
    /// |---------------------------------------------|-------------------------|
    /// | `HOST`                                      | `0.0.0.0`               |
    /// | `PORT`                                      | `3000`                  |
    /// | `CORS_ORIGINS`                              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`                      | `30`                    |
    /// | `MAX_RECOMMENDATION_REQUESTS_PER_DAY`       | `3`                     |
    /// | `MAX_ADMIN_RECOMMENDATION_REQUESTS_PER_DAY` | `3`                     |
    /// | `ORGANIZATION_NAME`                         | `Overbeck Museum`       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let organization_name = std::env::var("ORGANIZATION_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ORGANIZATION_NAME.to_string());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            max_recommendation_requests_per_day: daily_limit_from_env(
                "MAX_RECOMMENDATION_REQUESTS_PER_DAY",
            ),
            max_admin_recommendation_requests_per_day: daily_limit_from_env(
                "MAX_ADMIN_RECOMMENDATION_REQUESTS_PER_DAY",
            ),
            organization_name,
        }
    }
}

/// Positive integer from `var`, falling back to the default limit when the
/// value is unset, unparsable or zero.
fn daily_limit_from_env(var: &str) -> u32 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_DAILY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_limit_falls_back_on_garbage() {
        std::env::set_var("DOCENT_TEST_LIMIT_GARBAGE", "lots");
        assert_eq!(daily_limit_from_env("DOCENT_TEST_LIMIT_GARBAGE"), DEFAULT_DAILY_LIMIT);

        std::env::set_var("DOCENT_TEST_LIMIT_ZERO", "0");
        assert_eq!(daily_limit_from_env("DOCENT_TEST_LIMIT_ZERO"), DEFAULT_DAILY_LIMIT);

        std::env::set_var("DOCENT_TEST_LIMIT_SET", "5");
        assert_eq!(daily_limit_from_env("DOCENT_TEST_LIMIT_SET"), 5);

        assert_eq!(daily_limit_from_env("DOCENT_TEST_LIMIT_UNSET"), DEFAULT_DAILY_LIMIT);
    }
}
