// ── Events page state ──
//
// Filter state, the last fetched snapshot, and the transient flags the
// page shows (loading, error, filter panel). Every change that needs a
// refetch hands back a `FetchTicket`; the caller runs the fetch and
// feeds the result to `apply` with the ticket's generation.

use std::fmt;

use serde::Serialize;

use lorascope_api::types::EventQuery;

use crate::model::{AggregateStats, DeviceSummary, Event, EventType};

// ── Filters ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum DeviceFilter {
    #[default]
    All,
    Device(String),
}

impl DeviceFilter {
    pub fn dev_eui(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Device(eui) => Some(eui),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum EventTypeFilter {
    #[default]
    All,
    Only(EventType),
}

impl EventTypeFilter {
    /// `All`, then each known type, in picker order.
    pub fn choices() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(EventType::KNOWN.into_iter().map(Self::Only))
            .collect()
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All types",
            Self::Only(ty) => ty.description(),
        }
    }
}

/// Page-size choices offered by the filter panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ResultLimit {
    L50,
    #[default]
    L100,
    L200,
    L500,
    L1000,
}

impl ResultLimit {
    pub const ALL: [ResultLimit; 5] = [Self::L50, Self::L100, Self::L200, Self::L500, Self::L1000];

    pub fn value(self) -> u32 {
        match self {
            Self::L50 => 50,
            Self::L100 => 100,
            Self::L200 => 200,
            Self::L500 => 500,
            Self::L1000 => 1000,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL.get(idx + 1).copied().unwrap_or(Self::L50)
    }
}

impl TryFrom<u32> for ResultLimit {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|l| l.value() == value)
            .ok_or_else(|| format!("limit must be one of 50, 100, 200, 500, 1000 (got {value})"))
    }
}

impl fmt::Display for ResultLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// What the events list is filtered by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub device: DeviceFilter,
    pub event_type: EventTypeFilter,
    pub limit: ResultLimit,
}

impl FilterState {
    pub fn to_query(&self) -> EventQuery {
        EventQuery {
            limit: self.limit.value(),
            dev_eui: self.device.dev_eui().map(ToOwned::to_owned),
            event_type: match &self.event_type {
                EventTypeFilter::All => None,
                EventTypeFilter::Only(ty) => Some(ty.as_wire().to_owned()),
            },
        }
    }
}

// ── Fetch plumbing ───────────────────────────────────────────────────

/// A fetch the caller should run. Results are applied only if
/// `generation` is still the latest one issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: EventQuery,
}

/// The three reads behind the events page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventsSnapshot {
    pub events: Vec<Event>,
    pub stats: AggregateStats,
    pub devices: Vec<DeviceSummary>,
}

/// How the page should show a fetch in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPresentation {
    /// Nothing loaded yet: full-screen spinner.
    FullScreen,
    /// Data on screen: keep it, show a light "updating" hint.
    Updating,
    Idle,
}

// ── View ─────────────────────────────────────────────────────────────

/// State of one events page.
#[derive(Debug, Clone, Default)]
pub struct EventsView {
    filters: FilterState,
    /// Device page: the device filter is fixed to this EUI.
    pinned_device: Option<String>,

    events: Vec<Event>,
    stats: Option<AggregateStats>,
    devices: Vec<DeviceSummary>,

    loading: bool,
    error: Option<String>,
    show_filters: bool,
    selected: usize,

    /// Bumped on every issued fetch; older results are dropped.
    generation: u64,
}

impl EventsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view locked to one device.
    pub fn for_device(dev_eui: impl Into<String>) -> Self {
        let dev_eui = dev_eui.into();
        Self {
            filters: FilterState {
                device: DeviceFilter::Device(dev_eui.clone()),
                ..FilterState::default()
            },
            pinned_device: Some(dev_eui),
            ..Self::default()
        }
    }

    // ── Fetch lifecycle ──────────────────────────────────────────────

    fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            generation: self.generation,
            query: self.filters.to_query(),
        }
    }

    /// Initial load on page entry, or a manual refresh.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Apply a finished fetch. Returns `false` if it was superseded by a
    /// newer ticket and ignored.
    ///
    /// On success all three collections are replaced together. On failure
    /// the previous data stays on screen next to the error message.
    pub fn apply<E: fmt::Display>(
        &mut self,
        generation: u64,
        result: Result<EventsSnapshot, E>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }

        self.loading = false;
        match result {
            Ok(snapshot) => {
                self.events = snapshot.events;
                self.stats = Some(snapshot.stats);
                self.devices = snapshot.devices;
                self.error = None;
                self.clamp_selection();
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        true
    }

    // ── Filter mutations ─────────────────────────────────────────────

    /// Change the device filter. `None` if nothing changed or the view
    /// is pinned to a device.
    pub fn select_device(&mut self, device: DeviceFilter) -> Option<FetchTicket> {
        if self.pinned_device.is_some() || self.filters.device == device {
            return None;
        }
        self.filters.device = device;
        Some(self.issue())
    }

    pub fn select_event_type(&mut self, event_type: EventTypeFilter) -> Option<FetchTicket> {
        if self.filters.event_type == event_type {
            return None;
        }
        self.filters.event_type = event_type;
        Some(self.issue())
    }

    pub fn select_limit(&mut self, limit: ResultLimit) -> Option<FetchTicket> {
        if self.filters.limit == limit {
            return None;
        }
        self.filters.limit = limit;
        Some(self.issue())
    }

    /// Reset device and type to "all" (or the pinned device) and the
    /// limit to 100. Always issues exactly one fetch.
    pub fn clear_filters(&mut self) -> FetchTicket {
        self.filters = FilterState {
            device: self
                .pinned_device
                .clone()
                .map_or(DeviceFilter::All, DeviceFilter::Device),
            ..FilterState::default()
        };
        self.issue()
    }

    pub fn toggle_filters(&mut self) {
        self.show_filters = !self.show_filters;
    }

    // ── Selection / details ──────────────────────────────────────────

    pub fn select_next(&mut self) {
        if !self.events.is_empty() {
            self.selected = (self.selected + 1).min(self.events.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.events.len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.events.len().saturating_sub(1));
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.events.get(self.selected)
    }

    /// Hand the selected event to `handler`. How details are shown is up
    /// to the caller. Returns `false` if nothing is selected.
    pub fn view_details(&self, handler: impl FnOnce(&Event)) -> bool {
        match self.selected_event() {
            Some(event) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn loading_presentation(&self) -> LoadingPresentation {
        match (self.loading, self.events.is_empty()) {
            (true, true) => LoadingPresentation::FullScreen,
            (true, false) => LoadingPresentation::Updating,
            (false, _) => LoadingPresentation::Idle,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn pinned_device(&self) -> Option<&str> {
        self.pinned_device.as_deref()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn stats(&self) -> Option<&AggregateStats> {
        self.stats.as_ref()
    }

    pub fn devices(&self) -> &[DeviceSummary] {
        &self.devices
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters_visible(&self) -> bool {
        self.show_filters
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
