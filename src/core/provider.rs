//! Rate source abstraction

use super::error::RateError;
use super::rate::DailySnapshot;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Fetches the snapshot published for a single date.
///
/// Every call goes to the source; implementations must not cache, and must
/// return transport and payload failures as-is.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_snapshot(&self, date: NaiveDate) -> Result<DailySnapshot, RateError>;
}
