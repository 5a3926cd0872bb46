//! All possible UI actions. Actions are the sole mechanism for state mutation.

use lorascope_core::{AnalysisOutcome, AnalysisParams, EventsSnapshot, FetchTicket, Route};

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    /// Open the view for a route (device pages included).
    Navigate(Route),
    GoBack,
    ToggleHelp,

    // ── Page entry / manual refresh ───────────────────────────────
    /// Sent to a screen when it becomes active or the user presses `r`.
    Refresh,

    // ── Fetch pipeline ────────────────────────────────────────────
    /// Run the three-way events page fetch for the screen at `route`.
    FetchEvents { route: Route, ticket: FetchTicket },
    /// Result of a `FetchEvents`, tagged so the owning view can drop it
    /// if a newer ticket was issued meanwhile.
    EventsLoaded {
        route: Route,
        generation: u64,
        result: Result<EventsSnapshot, String>,
    },

    // ── Analysis ──────────────────────────────────────────────────
    RunAnalysis(AnalysisParams),
    AnalysisFinished(Result<AnalysisOutcome, String>),
}
