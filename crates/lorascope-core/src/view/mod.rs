// ── Page view state ──
//
// Explicit state structs for the pages. Each is constructed when a page
// is entered and dropped when it's left; only the owning controller
// mutates it, renderers read it.

pub mod analysis;
pub mod events;

pub use analysis::AnalysisView;
pub use events::{
    DeviceFilter, EventTypeFilter, EventsSnapshot, EventsView, FetchTicket, FilterState,
    LoadingPresentation, ResultLimit,
};
