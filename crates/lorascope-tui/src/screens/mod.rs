//! Screen implementations. Each screen is a top-level Component.

pub mod analysis;
pub mod dashboard;
pub mod events;

use crate::component::Component;
use crate::screen::ScreenId;

/// Screens reachable from the tab bar. The device page is created on
/// navigation since it needs an EUI.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (ScreenId::Events, Box::new(events::EventsScreen::new())),
        (
            ScreenId::Analysis,
            Box::new(analysis::AnalysisScreen::new()),
        ),
    ]
}
