use std::sync::Arc;

use docent_core::cache::TtlCache;
use docent_core::calendar::HolidayCalendar;
use docent_core::clock::Clock;
use docent_core::rate_limit::DailyLimiter;
use docent_core::recommendation::CompletionModel;
use docent_notify::EmailDelivery;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: docent_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Time source for "today" and cache expiry.
    pub clock: Arc<dyn Clock>,
    /// Process-local TTL cache for recommendation results and daily counters.
    pub cache: Arc<TtlCache>,
    /// Public holiday source for qualifying-day checks.
    pub holidays: Arc<dyn HolidayCalendar>,
    /// Text-generation model behind recommendations.
    pub model: Arc<dyn CompletionModel>,
    /// SMTP mailer; `None` when SMTP is not configured.
    pub mailer: Option<Arc<EmailDelivery>>,
    /// Per-volunteer daily recommendation cap.
    pub volunteer_limiter: Arc<DailyLimiter>,
    /// Shared daily admin recommendation cap.
    pub admin_limiter: Arc<DailyLimiter>,
}

impl AppState {
    /// Assemble the state, creating the cache and both limiters on `clock`.
    pub fn new(
        pool: docent_db::DbPool,
        config: ServerConfig,
        clock: Arc<dyn Clock>,
        holidays: Arc<dyn HolidayCalendar>,
        model: Arc<dyn CompletionModel>,
        mailer: Option<EmailDelivery>,
    ) -> Self {
        let cache = Arc::new(TtlCache::new(Arc::clone(&clock)));
        let volunteer_limiter = Arc::new(DailyLimiter::new(
            Arc::clone(&cache),
            Arc::clone(&clock),
            config.max_recommendation_requests_per_day,
        ));
        let admin_limiter = Arc::new(DailyLimiter::new(
            Arc::clone(&cache),
            Arc::clone(&clock),
            config.max_admin_recommendation_requests_per_day,
        ));

        Self {
            pool,
            config: Arc::new(config),
            clock,
            cache,
            holidays,
            model,
            mailer: mailer.map(Arc::new),
            volunteer_limiter,
            admin_limiter,
        }
    }
}
