use crate::domain::model::Slot;
use crate::domain::ports::{ConfigProvider, SlotStore};
use crate::utils::error::{AvailabilityError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "availability_slots";

/// Slot store over the Supabase REST (PostgREST) endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseSlotStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseSlotStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, api_key, DEFAULT_TABLE, Duration::from_secs(10))
    }

    pub fn with_options(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: table.into(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let base_url = config.store_url().ok_or_else(|| AvailabilityError::ConfigError {
            message: "a store URL is required to query Supabase".to_string(),
        })?;
        let api_key = config.api_key().ok_or_else(|| AvailabilityError::ConfigError {
            message: "an API key is required to query Supabase".to_string(),
        })?;

        Self::with_options(
            base_url,
            api_key,
            config.table(),
            Duration::from_secs(config.request_timeout_seconds()),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl SlotStore for SupabaseSlotStore {
    async fn query(&self, activity_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Slot>> {
        let endpoint = self.endpoint();
        tracing::debug!("Querying {} for {} ({} to {})", endpoint, activity_id, from, to);

        let response = self
            .client
            .get(&endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "*".to_string()),
                ("experience_id", format!("eq.{}", activity_id)),
                ("date", format!("gte.{}", from.format("%Y-%m-%d"))),
                ("date", format!("lte.{}", to.format("%Y-%m-%d"))),
                ("is_available", "eq.true".to_string()),
                ("order", "date.asc,start_time.asc".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Slot store response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AvailabilityError::StoreStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let slots: Vec<Slot> = serde_json::from_slice(&bytes)?;
        tracing::debug!("Slot store returned {} row(s)", slots.len());
        Ok(slots)
    }
}
