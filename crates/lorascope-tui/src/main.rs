//! `lorascope-tui` — terminal dashboard for ChirpStack sensor events.
//!
//! Built on [ratatui](https://ratatui.rs) over `lorascope-core`'s view
//! state. Screens are navigable via number keys (1-3): Dashboard,
//! Events and ML Analysis; the per-device view opens from the dashboard
//! or from `--route /device/<eui>`.
//!
//! Logs are written to a file (default `/tmp/lorascope-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lorascope_core::{BackendConfig, Controller, Route, TlsVerification};

use crate::app::App;

/// Terminal dashboard for ChirpStack sensor events and ML analyses.
#[derive(Parser, Debug)]
#[command(name = "lorascope-tui", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:8000). Overrides the profile.
    #[arg(short = 'b', long, env = "LORASCOPE_BACKEND")]
    backend: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "LORASCOPE_PROFILE")]
    profile: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "LORASCOPE_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// View to open at startup (/, /device/<eui>, /chirpstack/events, /ml/analysis)
    #[arg(short = 'r', long, default_value = "/", value_parser = parse_route)]
    route: Route,

    /// Log file path (defaults to /tmp/lorascope-tui.log)
    #[arg(long, default_value = "/tmp/lorascope-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_route(raw: &str) -> Result<Route, String> {
    raw.parse().map_err(|e: lorascope_core::CoreError| e.to_string())
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal is in raw mode. The returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lorascope_tui={log_level},lorascope_core={log_level},lorascope_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("lorascope-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the backend: `--backend` wins, otherwise the active profile
/// from the shared config file.
fn build_backend_config(cli: &Cli) -> Result<BackendConfig> {
    let cfg = lorascope_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());

    let mut config = if let Some(ref raw) = cli.backend {
        let url = lorascope_config::parse_backend_url(raw)?;
        let mut config = BackendConfig::new(url);
        config.timeout = std::time::Duration::from_secs(cfg.defaults.timeout);
        if cfg.defaults.insecure {
            config.tls = TlsVerification::DangerAcceptInvalid;
        }
        config
    } else {
        let profile = cfg.profile(&profile_name).map_err(|_| {
            eyre!(
                "No backend configured. Pass --backend <url> or run `lorascope config init` \
                 (looked for profile '{profile_name}')"
            )
        })?;
        lorascope_config::profile_to_backend_config(profile, &profile_name, &cfg.defaults)?
    };

    if let Some(ref token) = cli.api_token {
        config.api_token = Some(SecretString::from(token.clone()));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_backend_config(&cli)?;
    info!(backend = %config.url, route = %cli.route, "starting lorascope-tui");

    let controller = Controller::new(config)?;
    let mut app = App::new(controller, cli.route);
    app.run().await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn route_flag_accepts_device_paths() {
        let cli = Cli::try_parse_from([
            "lorascope-tui",
            "--backend",
            "http://localhost:8000",
            "--route",
            "/device/a84041000181c4b1",
        ])
        .unwrap();
        assert_eq!(cli.route, Route::Device("a84041000181c4b1".into()));
    }

    #[test]
    fn route_flag_rejects_unknown_paths() {
        assert!(Cli::try_parse_from(["lorascope-tui", "--route", "/settings"]).is_err());
    }

    #[test]
    fn backend_flag_builds_config_without_profile() {
        let cli = Cli::try_parse_from([
            "lorascope-tui",
            "--backend",
            "http://sensors:8000",
            "--api-token",
            "t0k",
        ])
        .unwrap();
        let config = build_backend_config(&cli).unwrap();
        assert_eq!(config.url.as_str(), "http://sensors:8000/");
        assert!(config.api_token.is_some());
    }
}
