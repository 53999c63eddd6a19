use crate::core::labels::date_label;
use crate::domain::model::{AvailabilityRequest, ResolutionWindow, Slot, SlotGroup};
use crate::domain::ports::{Clock, SlotStore};
use crate::utils::error::ResolutionError;
use chrono::NaiveDateTime;

/// Turns the raw slots of one activity into date-grouped, bookable windows.
///
/// Stateless apart from its collaborators: every call re-reads the store and
/// the clock.
pub struct AvailabilityResolver<S: SlotStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: SlotStore, C: Clock> AvailabilityResolver<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub async fn resolve_availability(
        &self,
        activity_id: &str,
        days_ahead: u32,
    ) -> Result<Vec<SlotGroup>, ResolutionError> {
        self.resolve(&AvailabilityRequest::new(activity_id, days_ahead))
            .await
    }

    pub async fn resolve(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<SlotGroup>, ResolutionError> {
        if !request.has_activity() {
            tracing::debug!("No activity selected, skipping availability fetch");
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let window = ResolutionWindow::new(now.date(), request.days_ahead);
        let earliest_start = now
            .checked_add_signed(request.min_lead_time)
            .unwrap_or(NaiveDateTime::MAX);

        tracing::debug!(
            "Fetching slots for {} between {} and {}",
            request.activity_id,
            window.today,
            window.end
        );

        let fetched = self
            .store
            .query(&request.activity_id, window.today, window.end)
            .await
            .map_err(|source| {
                tracing::warn!("Slot fetch for {} failed: {}", request.activity_id, source);
                ResolutionError::FetchFailed { source }
            })?;
        let fetched_count = fetched.len();

        let bookable = fetched.into_iter().filter(|slot| {
            slot.is_open_for_booking
                && window.contains(slot.date)
                && !slot.is_full()
                && slot.starts_at() > earliest_start
        });

        let groups = group_by_date(bookable, &window);

        tracing::debug!(
            "Resolved {} of {} slots into {} date group(s) for {}",
            groups.iter().map(|g| g.slots.len()).sum::<usize>(),
            fetched_count,
            groups.len(),
            request.activity_id
        );

        Ok(groups)
    }
}

/// Bucket slots by date, keeping the order in which dates first appear.
///
/// The store already delivers `(date, start_time)` order, so no sort happens
/// here. A date that shows up again later joins its earlier group.
fn group_by_date(slots: impl IntoIterator<Item = Slot>, window: &ResolutionWindow) -> Vec<SlotGroup> {
    let mut groups: Vec<SlotGroup> = Vec::new();

    for slot in slots {
        // Searching from the back hits the current date first on ordered input
        match groups.iter().rposition(|g| g.date == slot.date) {
            Some(idx) => groups[idx].slots.push(slot),
            None => groups.push(SlotGroup {
                date: slot.date,
                label: date_label(slot.date, window.today),
                slots: vec![slot],
            }),
        }
    }

    groups
}
