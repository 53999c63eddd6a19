use crate::domain::ports::Clock;
use crate::utils::error::{AvailabilityError, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

/// Host-local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Wall clock of a venue at a fixed UTC offset, independent of the host.
#[derive(Debug, Clone, Copy)]
pub struct VenueClock {
    offset: FixedOffset,
}

impl VenueClock {
    pub fn from_offset_minutes(minutes: i32) -> Result<Self> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| AvailabilityError::InvalidConfigValueError {
                field: "resolution.venue_utc_offset_minutes".to_string(),
                value: minutes.to_string(),
                reason: "UTC offset must be within +/- 24 hours".to_string(),
            })?;
        Ok(Self { offset })
    }

    pub fn local_time_at(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }
}

impl Clock for VenueClock {
    fn now(&self) -> NaiveDateTime {
        self.local_time_at(Utc::now())
    }
}

/// Always reports the same instant. Used for reproducible runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_venue_clock_applies_offset() {
        let instant = Utc.with_ymd_and_hms(2026, 2, 18, 23, 30, 0).unwrap();

        let lisbon = VenueClock::from_offset_minutes(0).unwrap();
        let tokyo = VenueClock::from_offset_minutes(9 * 60).unwrap();
        let honolulu = VenueClock::from_offset_minutes(-10 * 60).unwrap();

        assert_eq!(lisbon.local_time_at(instant).to_string(), "2026-02-18 23:30:00");
        assert_eq!(tokyo.local_time_at(instant).to_string(), "2026-02-19 08:30:00");
        assert_eq!(honolulu.local_time_at(instant).to_string(), "2026-02-18 13:30:00");
    }

    #[test]
    fn test_venue_clock_rejects_out_of_range_offset() {
        assert!(VenueClock::from_offset_minutes(25 * 60).is_err());
        assert!(VenueClock::from_offset_minutes(i32::MAX).is_err());
    }
}
