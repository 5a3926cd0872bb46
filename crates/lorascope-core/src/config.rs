// ── Runtime backend configuration ──
//
// Describes *how* to reach the sensor backend. Carries the optional
// token and transport tuning but never touches disk. The CLI/TUI builds
// a `BackendConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use lorascope_api::transport::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed lab backends).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
///
/// Built by CLI/TUI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend base URL (e.g., `http://localhost:8000`).
    pub url: Url,
    /// Optional bearer token.
    pub api_token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,
}

impl BackendConfig {
    /// Config for `url` with no token, strict TLS and a 30s timeout.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            api_token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            api_token: self.api_token.clone(),
        }
    }
}
