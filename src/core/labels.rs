use crate::domain::model::{SlotGroup, SlotPreview};
use chrono::{NaiveDate, NaiveTime};

/// Label for a slot group relative to `today`.
///
/// Tomorrow reads "Tomorrow, February 19"; every other date, today
/// included, reads "Thursday, February 19".
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if today.succ_opt() == Some(date) {
        return format!("Tomorrow, {}", date.format("%B %-d"));
    }
    date.format("%A, %B %-d").to_string()
}

/// 12-hour clock with AM/PM, e.g. "6:00 PM", "12:30 AM".
pub fn format_slot_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub fn preview_slots(groups: &[SlotGroup], limit: usize) -> Vec<SlotPreview> {
    groups
        .iter()
        .flat_map(|group| {
            group.slots.iter().map(move |slot| SlotPreview {
                date_label: group.label.clone(),
                slot: slot.clone(),
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Slot;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_date_label_today_tomorrow_and_later() {
        let today = d(2026, 2, 18);
        assert_eq!(date_label(d(2026, 2, 18), today), "Wednesday, February 18");
        assert_eq!(date_label(d(2026, 2, 19), today), "Tomorrow, February 19");
        assert_eq!(date_label(d(2026, 2, 25), today), "Wednesday, February 25");
    }

    #[test]
    fn test_date_label_tomorrow_across_month_end() {
        assert_eq!(date_label(d(2026, 3, 1), d(2026, 2, 28)), "Tomorrow, March 1");
    }

    #[test]
    fn test_format_slot_time() {
        assert_eq!(format_slot_time(t(0, 0)), "12:00 AM");
        assert_eq!(format_slot_time(t(9, 5)), "9:05 AM");
        assert_eq!(format_slot_time(t(12, 0)), "12:00 PM");
        assert_eq!(format_slot_time(t(18, 30)), "6:30 PM");
    }

    #[test]
    fn test_preview_slots_flattens_in_order() {
        let slot = |id: &str, date: NaiveDate, h: u32| Slot {
            id: id.to_string(),
            activity_id: "exp-1".to_string(),
            date,
            start_time: t(h, 0),
            end_time: t(h + 1, 0),
            capacity: 4,
            booked: 0,
            is_open_for_booking: true,
        };
        let groups = vec![
            SlotGroup {
                date: d(2026, 2, 18),
                label: "Wednesday, February 18".to_string(),
                slots: vec![slot("a", d(2026, 2, 18), 9), slot("b", d(2026, 2, 18), 14)],
            },
            SlotGroup {
                date: d(2026, 2, 19),
                label: "Tomorrow, February 19".to_string(),
                slots: vec![slot("c", d(2026, 2, 19), 10), slot("d", d(2026, 2, 19), 16)],
            },
        ];

        let preview = preview_slots(&groups, 3);

        let ids: Vec<&str> = preview.iter().map(|p| p.slot.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(preview[2].date_label, "Tomorrow, February 19");
        assert!(preview_slots(&groups, 0).is_empty());
    }
}
