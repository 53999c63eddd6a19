use crate::domain::model::Slot;
use crate::domain::ports::SlotStore;
use crate::utils::error::{AvailabilityError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Slot store backed by a vector, honouring the same query contract as the
/// hosted table. Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct InMemorySlotStore {
    slots: Arc<RwLock<Vec<Slot>>>,
}

impl InMemorySlotStore {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self {
            slots: Arc::new(RwLock::new(slots)),
        }
    }

    /// Parse a JSON array of `availability_slots` rows.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let slots: Vec<Slot> = serde_json::from_str(content)?;
        Ok(Self::new(slots))
    }

    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(AvailabilityError::IoError)?;
        Self::from_json_str(&content)
    }

    /// Overwrite the booked count of one slot. Returns false when the id is unknown.
    pub async fn set_booked(&self, slot_id: &str, booked: i64) -> bool {
        let mut slots = self.slots.write().await;
        match slots.iter_mut().find(|s| s.id == slot_id) {
            Some(slot) => {
                slot.booked = booked;
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[async_trait]
impl SlotStore for InMemorySlotStore {
    async fn query(&self, activity_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Slot>> {
        let slots = self.slots.read().await;
        let mut matching: Vec<Slot> = slots
            .iter()
            .filter(|s| {
                s.activity_id == activity_id
                    && s.is_open_for_booking
                    && s.date >= from
                    && s.date <= to
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        Ok(matching)
    }
}
