// ── Controller ──
//
// Facade over the backend client. Owns no page state: pages keep their
// own view structs and call in here for the reads and the analysis
// submission.

use std::sync::Arc;

use tracing::{debug, info};

use lorascope_api::BackendClient;
use lorascope_api::types::{AnalysisRequest, EventQuery};

use crate::config::BackendConfig;
use crate::error::CoreError;
use crate::model::{AggregateStats, AnalysisOutcome, AnalysisParams, DeviceSummary, Event};
use crate::view::EventsSnapshot;

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc`; clones share one HTTP connection pool,
/// so spawned fetch tasks can each hold their own handle.
#[derive(Debug, Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

#[derive(Debug)]
struct ControllerInner {
    config: BackendConfig,
    client: BackendClient,
}

impl Controller {
    /// Build the HTTP client for `config`. Does not contact the backend.
    pub fn new(config: BackendConfig) -> Result<Self, CoreError> {
        let client = BackendClient::new(config.url.as_str(), &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Wrap an existing client (tests, custom transports).
    pub fn with_client(config: BackendConfig, client: BackendClient) -> Self {
        Self {
            inner: Arc::new(ControllerInner { config, client }),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, CoreError> {
        let raw = self.inner.client.list_events(query).await?;
        Ok(raw.into_iter().map(Event::from).collect())
    }

    pub async fn event_stats(&self) -> Result<AggregateStats, CoreError> {
        Ok(self.inner.client.get_event_stats().await?.into())
    }

    pub async fn list_devices(&self) -> Result<Vec<DeviceSummary>, CoreError> {
        let raw = self.inner.client.list_devices().await?;
        Ok(raw.into_iter().map(DeviceSummary::from).collect())
    }

    /// Everything the events page shows: the filtered event list plus
    /// unfiltered stats and devices, fetched concurrently.
    ///
    /// Fails as a whole if any of the three reads fails. The three
    /// responses are not a consistent snapshot; stats may already count
    /// events that arrived after the list was read.
    pub async fn load_events_page(&self, query: &EventQuery) -> Result<EventsSnapshot, CoreError> {
        debug!(?query, "loading events page");

        let (events, stats, devices) = tokio::try_join!(
            self.list_events(query),
            self.event_stats(),
            self.list_devices(),
        )?;

        debug!(
            events = events.len(),
            devices = devices.len(),
            total = stats.total_events,
            "events page loaded"
        );
        Ok(EventsSnapshot {
            events,
            stats,
            devices,
        })
    }

    // ── Analysis ─────────────────────────────────────────────────────

    /// Submit an analysis and wait for the backend to finish it.
    pub async fn analyze(&self, params: AnalysisParams) -> Result<AnalysisOutcome, CoreError> {
        info!(
            kind = %params.kind,
            target = %params.target,
            range = %params.range,
            "submitting analysis"
        );
        let request = AnalysisRequest::from(params);
        let raw = self.inner.client.analyze(&request).await?;
        Ok(raw.into())
    }
}
