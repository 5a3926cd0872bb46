// ── Addressable views ──

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A bookmarkable dashboard view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    #[default]
    Dashboard,
    /// `/device/{id}`
    Device(String),
    /// `/chirpstack/events`
    ChirpStackEvents,
    /// `/ml/analysis`
    MlAnalysis,
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, CoreError> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Self::Dashboard),
            ["device", id] => Ok(Self::Device((*id).to_owned())),
            ["chirpstack", "events"] => Ok(Self::ChirpStackEvents),
            ["ml", "analysis"] => Ok(Self::MlAnalysis),
            _ => Err(CoreError::UnknownRoute {
                path: path.to_owned(),
            }),
        }
    }
}

impl FromStr for Route {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => f.write_str("/"),
            Self::Device(id) => write!(f, "/device/{id}"),
            Self::ChirpStackEvents => f.write_str("/chirpstack/events"),
            Self::MlAnalysis => f.write_str("/ml/analysis"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn routes_round_trip() {
        for route in [
            Route::Dashboard,
            Route::Device("a84041000181c4b1".into()),
            Route::ChirpStackEvents,
            Route::MlAnalysis,
        ] {
            assert_eq!(Route::parse(&route.to_string()).unwrap(), route);
        }
    }

    #[test]
    fn tolerates_trailing_slash_and_empty_path() {
        assert_eq!(Route::parse("").unwrap(), Route::Dashboard);
        assert_eq!(
            Route::parse("/chirpstack/events/").unwrap(),
            Route::ChirpStackEvents
        );
    }

    #[test]
    fn rejects_unknown_paths() {
        assert!(matches!(
            Route::parse("/device"),
            Err(CoreError::UnknownRoute { .. })
        ));
        assert!("/settings".parse::<Route>().is_err());
    }
}
