use crate::domain::model::Slot;
use crate::utils::error::{AvailabilityError, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Read access to the persisted availability slots.
///
/// Implementations must return only slots of `activity_id` that are open for
/// booking and dated within `[from, to]` (calendar dates, inclusive), ordered
/// by `(date, start_time)` ascending.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn query(&self, activity_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Slot>>;
}

/// Source of the current venue-local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub trait ConfigProvider: Send + Sync {
    fn store_url(&self) -> Option<&str>;
    fn api_key(&self) -> Option<&str>;
    fn table(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn days_ahead(&self) -> u32;
    fn min_lead_minutes(&self) -> i64;
    fn venue_utc_offset_minutes(&self) -> Option<i32>;

    fn min_lead_time(&self) -> Result<Duration> {
        let minutes = self.min_lead_minutes();
        Duration::try_minutes(minutes).ok_or_else(|| AvailabilityError::InvalidConfigValueError {
            field: "min_lead_minutes".to_string(),
            value: minutes.to_string(),
            reason: "lead time is out of range".to_string(),
        })
    }
}

#[async_trait]
impl SlotStore for Box<dyn SlotStore> {
    async fn query(&self, activity_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Slot>> {
        (**self).query(activity_id, from, to).await
    }
}

impl Clock for Box<dyn Clock> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
