use crate::core::resolver::AvailabilityResolver;
use crate::domain::model::{AvailabilityRequest, AvailabilityState};
use crate::domain::ports::{Clock, SlotStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(AvailabilityState),
    /// A newer load started while this one was fetching; its result was dropped.
    Superseded,
}

/// Long-lived availability handle for one booking view.
///
/// Every `load` takes a fresh generation token. Only the result whose token is
/// still the latest when the fetch returns reaches the state, so switching
/// activities never lets a slow earlier response overwrite a newer one.
pub struct AvailabilitySession<S: SlotStore, C: Clock> {
    resolver: Arc<AvailabilityResolver<S, C>>,
    generation: AtomicU64,
    state: RwLock<AvailabilityState>,
    last_request: RwLock<Option<AvailabilityRequest>>,
}

impl<S: SlotStore, C: Clock> AvailabilitySession<S, C> {
    pub fn new(resolver: Arc<AvailabilityResolver<S, C>>) -> Self {
        Self {
            resolver,
            generation: AtomicU64::new(0),
            state: RwLock::new(AvailabilityState::default()),
            last_request: RwLock::new(None),
        }
    }

    pub async fn state(&self) -> AvailabilityState {
        self.state.read().await.clone()
    }

    pub async fn last_request(&self) -> Option<AvailabilityRequest> {
        self.last_request.read().await.clone()
    }

    pub async fn load(&self, request: AvailabilityRequest) -> LoadOutcome {
        // Token and last request change together so refresh always replays the newest load
        let token = {
            let mut last_request = self.last_request.write().await;
            let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *last_request = Some(request.clone());
            token
        };

        if !request.has_activity() {
            let idle = AvailabilityState::default();
            let mut state = self.state.write().await;
            if !self.is_current(token) {
                return LoadOutcome::Superseded;
            }
            *state = idle.clone();
            return LoadOutcome::Applied(idle);
        }

        {
            let mut state = self.state.write().await;
            if !self.is_current(token) {
                return LoadOutcome::Superseded;
            }
            state.loading = true;
            state.error = None;
        }

        let result = self.resolver.resolve(&request).await;

        if !self.is_current(token) {
            tracing::debug!(
                "Dropping availability for {} (request {} superseded)",
                request.activity_id,
                token
            );
            return LoadOutcome::Superseded;
        }

        let next = match result {
            Ok(groups) => AvailabilityState {
                groups,
                loading: false,
                error: None,
            },
            Err(e) => AvailabilityState {
                groups: Vec::new(),
                loading: false,
                error: Some(e.display_message()),
            },
        };

        let mut state = self.state.write().await;
        // Re-check under the lock: a newer load may have finished in between
        if !self.is_current(token) {
            return LoadOutcome::Superseded;
        }
        *state = next.clone();
        LoadOutcome::Applied(next)
    }

    pub async fn refresh(&self) -> Option<LoadOutcome> {
        let request = self.last_request().await?;
        Some(self.load(request).await)
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }
}
