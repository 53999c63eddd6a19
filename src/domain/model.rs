use crate::utils::error::{AvailabilityError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde renames map the fields onto `availability_slots` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(rename = "experience_id")]
    pub activity_id: String,
    #[serde(
        serialize_with = "serialize_slot_date",
        deserialize_with = "deserialize_slot_date"
    )]
    pub date: NaiveDate,
    #[serde(
        serialize_with = "serialize_slot_time",
        deserialize_with = "deserialize_slot_time"
    )]
    pub start_time: NaiveTime,
    #[serde(
        serialize_with = "serialize_slot_time",
        deserialize_with = "deserialize_slot_time"
    )]
    pub end_time: NaiveTime,
    #[serde(rename = "max_participants")]
    pub capacity: i64,
    #[serde(rename = "booked_participants")]
    pub booked: i64,
    #[serde(rename = "is_available")]
    pub is_open_for_booking: bool,
}

impl Slot {
    /// Seats still free. Negative when the row is overbooked upstream.
    pub fn spots_left(&self) -> i64 {
        self.capacity - self.booked
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() <= 0
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn time_range(&self) -> String {
        format!(
            "{} – {}",
            crate::core::labels::format_slot_time(self.start_time),
            crate::core::labels::format_slot_time(self.end_time)
        )
    }
}

/// `date` is the identity of the group; `label` is cosmetic only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotGroup {
    #[serde(serialize_with = "serialize_slot_date")]
    pub date: NaiveDate,
    pub label: String,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPreview {
    pub date_label: String,
    pub slot: Slot,
}

/// Inclusive date range `[today, today + days_ahead]` searched for slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionWindow {
    pub today: NaiveDate,
    pub end: NaiveDate,
}

impl ResolutionWindow {
    pub fn new(today: NaiveDate, days_ahead: u32) -> Self {
        let end = today
            .checked_add_days(chrono::Days::new(u64::from(days_ahead)))
            .unwrap_or(NaiveDate::MAX);
        Self { today, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.today && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub activity_id: String,
    pub days_ahead: u32,
    /// Minimum gap between now and a slot's start. Zero means "not yet started".
    pub min_lead_time: Duration,
}

impl AvailabilityRequest {
    pub fn new(activity_id: impl Into<String>, days_ahead: u32) -> Self {
        Self {
            activity_id: activity_id.into(),
            days_ahead,
            min_lead_time: Duration::zero(),
        }
    }

    pub fn with_min_lead_time(mut self, min_lead_time: Duration) -> Self {
        self.min_lead_time = min_lead_time;
        self
    }

    pub fn has_activity(&self) -> bool {
        !self.activity_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityState {
    pub groups: Vec<SlotGroup>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Parse a `YYYY-MM-DD` calendar date from its explicit components.
///
/// No instant is ever constructed, so the host's UTC offset cannot shift the
/// resulting day.
pub fn parse_slot_date(value: &str) -> Result<NaiveDate> {
    let invalid = |reason: &str| AvailabilityError::InvalidDateError {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let mut parts = value.trim().splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("expected YYYY-MM-DD"));
    };

    let year: i32 = y.parse().map_err(|_| invalid("year is not a number"))?;
    let month: u32 = m.parse().map_err(|_| invalid("month is not a number"))?;
    let day: u32 = d.parse().map_err(|_| invalid("day is not a number"))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("no such calendar date"))
}

pub fn parse_slot_time(value: &str) -> Result<NaiveTime> {
    let invalid = |reason: &str| AvailabilityError::InvalidTimeError {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = value.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(invalid("expected HH:MM or HH:MM:SS"));
    }

    let hour: u32 = parts[0].parse().map_err(|_| invalid("hour is not a number"))?;
    let minute: u32 = parts[1].parse().map_err(|_| invalid("minute is not a number"))?;
    let second: u32 = match parts.get(2) {
        // Postgres `time` columns may carry fractional seconds
        Some(s) => s
            .split('.')
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|_| invalid("second is not a number"))?,
        None => 0,
    };

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| invalid("time out of range"))
}

fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn deserialize_slot_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_slot_date(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_slot_time<'de, D>(deserializer: D) -> std::result::Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_slot_time(&raw).map_err(serde::de::Error::custom)
}

fn serialize_slot_date<S>(date: &NaiveDate, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

fn serialize_slot_time<S>(time: &NaiveTime, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format("%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_slot_date_components() {
        let date = parse_slot_date("2026-02-19").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2026, 2, 19));
    }

    #[test]
    fn test_parse_slot_date_rejects_garbage() {
        assert!(parse_slot_date("2026-02").is_err());
        assert!(parse_slot_date("2026-02-30").is_err());
        assert!(parse_slot_date("19/02/2026").is_err());
        assert!(parse_slot_date("").is_err());
    }

    #[test]
    fn test_parse_slot_time_variants() {
        assert_eq!(
            parse_slot_time("18:00:00").unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap()
        );
        assert_eq!(
            parse_slot_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_slot_time("07:15:42.123").unwrap(),
            NaiveTime::from_hms_opt(7, 15, 42).unwrap()
        );
        assert!(parse_slot_time("25:00").is_err());
        assert!(parse_slot_time("noon").is_err());
    }

    #[test]
    fn test_slot_deserializes_from_store_row() {
        let row = serde_json::json!({
            "id": 17,
            "experience_id": "exp-42",
            "date": "2026-02-19",
            "start_time": "18:00:00",
            "end_time": "20:00:00",
            "max_participants": 5,
            "booked_participants": 2,
            "is_available": true,
            "created_at": "2026-01-01T00:00:00Z"
        });

        let slot: Slot = serde_json::from_value(row).unwrap();

        assert_eq!(slot.id, "17");
        assert_eq!(slot.activity_id, "exp-42");
        assert_eq!(slot.date, NaiveDate::from_ymd_opt(2026, 2, 19).unwrap());
        assert_eq!(slot.spots_left(), 3);
        assert!(!slot.is_full());
        assert_eq!(slot.time_range(), "6:00 PM – 8:00 PM");
    }

    #[test]
    fn test_overbooked_slot_counts_as_full() {
        let slot = Slot {
            id: "a".to_string(),
            activity_id: "exp".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 19).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            capacity: 4,
            booked: 6,
            is_open_for_booking: true,
        };
        assert_eq!(slot.spots_left(), -2);
        assert!(slot.is_full());
    }

    #[test]
    fn test_resolution_window_is_inclusive() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let window = ResolutionWindow::new(today, 14);

        assert_eq!(window.end, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert!(window.contains(today));
        assert!(window.contains(window.end));
        assert!(!window.contains(window.end.succ_opt().unwrap()));
        assert!(!window.contains(today.pred_opt().unwrap()));
    }

    #[test]
    fn test_resolution_window_saturates() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let window = ResolutionWindow::new(today, u32::MAX);
        assert_eq!(window.end, NaiveDate::MAX);
    }
}
