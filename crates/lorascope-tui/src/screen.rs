//! Screen identifiers and their mapping to routes.

use std::fmt;

use lorascope_core::Route;

/// Identifies each TUI screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard, // 1
    Events,   // 2
    Analysis, // 3
    /// Per-device events page. Not in the tab bar; opened from the
    /// dashboard device list or an event row.
    Device,
}

impl ScreenId {
    /// Screens in tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Dashboard, Self::Events, Self::Analysis];

    /// Numeric key for this screen, 0 when it has none.
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Events => 2,
            Self::Analysis => 3,
            Self::Device => 0,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Next screen in tab order (wraps around). The device screen
    /// continues from Events.
    pub fn next(self) -> Self {
        let idx = self.tab_index();
        Self::ALL
            .get((idx + 1) % Self::ALL.len())
            .copied()
            .unwrap_or_default()
    }

    pub fn prev(self) -> Self {
        let idx = self.tab_index();
        Self::ALL
            .get((idx + Self::ALL.len() - 1) % Self::ALL.len())
            .copied()
            .unwrap_or_default()
    }

    /// Position highlighted in the tab bar.
    pub fn tab_index(self) -> usize {
        let effective = if self == Self::Device {
            Self::Events
        } else {
            self
        };
        Self::ALL
            .iter()
            .position(|&s| s == effective)
            .unwrap_or(0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Events => "Events",
            Self::Analysis => "ML Analysis",
            Self::Device => "Device",
        }
    }

    /// Screen that renders `route`.
    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::Dashboard => Self::Dashboard,
            Route::Device(_) => Self::Device,
            Route::ChirpStackEvents => Self::Events,
            Route::MlAnalysis => Self::Analysis,
        }
    }

    /// Route for a tab-bar screen. `None` for the device screen, whose
    /// route needs the EUI.
    pub fn route(self) -> Option<Route> {
        match self {
            Self::Dashboard => Some(Route::Dashboard),
            Self::Events => Some(Route::ChirpStackEvents),
            Self::Analysis => Some(Route::MlAnalysis),
            Self::Device => None,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn number_keys_round_trip() {
        for screen in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(screen.number()), Some(screen));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(4), None);
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(ScreenId::Analysis.next(), ScreenId::Dashboard);
        assert_eq!(ScreenId::Dashboard.prev(), ScreenId::Analysis);
        assert_eq!(ScreenId::Device.next(), ScreenId::Analysis);
        assert_eq!(ScreenId::Device.tab_index(), 1);
    }

    #[test]
    fn every_route_has_a_screen() {
        for screen in ScreenId::ALL {
            let route = screen.route().unwrap_or_default();
            assert_eq!(ScreenId::for_route(&route), screen);
        }
        assert_eq!(
            ScreenId::for_route(&Route::Device("0004a30b001c0530".into())),
            ScreenId::Device
        );
    }
}
