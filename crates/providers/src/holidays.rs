//! Public holiday calendar backed by the Nager.Date REST API.
//!
//! Holidays are fetched once per year and cached for
//! [`HOLIDAY_CACHE_TTL_HOURS`]. Only nationwide holidays and those observed
//! in the configured region are kept. Any upstream failure is logged and
//! treated as "no holidays", which is cached like a normal result.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use docent_core::calendar::HolidayCalendar;
use docent_core::clock::Clock;
use serde::Deserialize;
use tokio::sync::RwLock;

pub const HOLIDAY_CACHE_TTL_HOURS: i64 = 24;

/// HTTP request timeout for a single holiday lookup.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Holiday source configuration loaded from environment variables.
///
/// | Env Var           | Default                        |
/// |-------------------|--------------------------------|
/// | `HOLIDAY_API_URL` | `https://date.nager.at/api/v3` |
/// | `HOLIDAY_COUNTRY` | `DE`                           |
/// | `HOLIDAY_REGION`  | `DE-HB`                        |
#[derive(Debug, Clone)]
pub struct HolidayConfig {
    pub api_url: String,
    pub country: String,
    pub region: String,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            api_url: "https://date.nager.at/api/v3".to_string(),
            country: "DE".to_string(),
            region: "DE-HB".to_string(),
        }
    }
}

impl HolidayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("HOLIDAY_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            country: std::env::var("HOLIDAY_COUNTRY").unwrap_or(defaults.country),
            region: std::env::var("HOLIDAY_REGION").unwrap_or(defaults.region),
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum HolidayError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Holiday API returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// One entry of `GET /PublicHolidays/{year}/{country}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicHoliday {
    pub date: NaiveDate,
    #[serde(default)]
    pub name: String,
    /// Subdivision codes; `None` means the holiday is nationwide.
    #[serde(default)]
    pub counties: Option<Vec<String>>,
}

/// Keep nationwide holidays and those observed in `region`.
pub fn regional_dates(holidays: &[PublicHoliday], region: &str) -> BTreeSet<NaiveDate> {
    holidays
        .iter()
        .filter(|h| match &h.counties {
            None => true,
            Some(counties) => counties.iter().any(|c| c == region),
        })
        .map(|h| h.date)
        .collect()
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

struct CachedYear {
    dates: BTreeSet<NaiveDate>,
    fetched_at: DateTime<FixedOffset>,
}

pub struct NagerHolidayCalendar {
    client: reqwest::Client,
    config: HolidayConfig,
    clock: Arc<dyn Clock>,
    cache: RwLock<HashMap<i32, CachedYear>>,
}

impl NagerHolidayCalendar {
    pub fn new(config: HolidayConfig, clock: Arc<dyn Clock>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            config,
            clock,
            cache: RwLock::new(HashMap::new()),
        }
    }

    async fn fetch(&self, year: i32) -> Result<BTreeSet<NaiveDate>, HolidayError> {
        let url = format!(
            "{}/PublicHolidays/{year}/{}",
            self.config.api_url, self.config.country
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HolidayError::HttpStatus(status.as_u16()));
        }
        let holidays: Vec<PublicHoliday> = response.json().await?;
        Ok(regional_dates(&holidays, &self.config.region))
    }

    fn is_fresh(&self, entry: &CachedYear) -> bool {
        self.clock.now() - entry.fetched_at < chrono::Duration::hours(HOLIDAY_CACHE_TTL_HOURS)
    }

    /// Drop every cached year.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }
}

#[async_trait]
impl HolidayCalendar for NagerHolidayCalendar {
    async fn holidays(&self, year: i32) -> BTreeSet<NaiveDate> {
        if let Some(entry) = self.cache.read().await.get(&year) {
            if self.is_fresh(entry) {
                return entry.dates.clone();
            }
        }

        let dates = match self.fetch(year).await {
            Ok(dates) => {
                tracing::debug!(year, count = dates.len(), "Fetched public holidays");
                dates
            }
            Err(e) => {
                tracing::error!(year, error = %e, "Failed to fetch public holidays");
                BTreeSet::new()
            }
        };

        self.cache.write().await.insert(
            year,
            CachedYear {
                dates: dates.clone(),
                fetched_at: self.clock.now(),
            },
        );
        dates
    }
}
