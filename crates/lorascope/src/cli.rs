//! Clap derive structures for the `lorascope` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use lorascope_core::view::ResultLimit;
use lorascope_core::{AnalysisKind, TargetField, TimeRange};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lorascope -- inspect LoRaWAN sensor traffic and run ML analyses
#[derive(Debug, Parser)]
#[command(
    name = "lorascope",
    version,
    about = "Inspect LoRaWAN sensor events from the command line",
    long_about = "Query a ChirpStack sensor dashboard backend.\n\n\
        Lists stored network events, summarizes uplink radio metrics,\n\
        and submits clustering, prediction and classification analyses.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "LORASCOPE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "LORASCOPE_BACKEND", global = true)]
    pub backend: Option<String>,

    /// API bearer token
    #[arg(long, env = "LORASCOPE_API_TOKEN", global = true, hide_env = true)]
    pub api_token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LORASCOPE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LORASCOPE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LORASCOPE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse stored ChirpStack events
    #[command(alias = "ev", alias = "e")]
    Events(EventsArgs),

    /// List devices seen in the event log
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Run an ML analysis on sensor data
    #[command(alias = "ml")]
    Analyze(AnalyzeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

/// Filters shared by the event listing commands.
#[derive(Debug, Args)]
pub struct EventFilterArgs {
    /// Only events from this device (DevEUI)
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Only events of this type (up, join, log, ack)
    #[arg(long = "type", short = 't')]
    pub event_type: Option<String>,

    /// Max events to fetch (50, 100, 200, 500, 1000)
    #[arg(long, short = 'l', default_value = "100", value_parser = parse_limit)]
    pub limit: ResultLimit,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events, newest first
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: EventFilterArgs,

        /// Show the DevEUI and F-Port columns
        #[arg(long, short = 'w')]
        wide: bool,
    },

    /// Show backend-wide event counters
    Stats,

    /// Summarize uplink radio metrics (RSSI, SNR, frequency, DR)
    Rf {
        #[command(flatten)]
        filter: EventFilterArgs,
    },
}

fn parse_limit(raw: &str) -> Result<ResultLimit, String> {
    let value: u32 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    ResultLimit::try_from(value)
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices with their event counts
    #[command(alias = "ls")]
    List,
}

// ── Analyze ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Analysis type (clustering, prediction, classification)
    #[arg(long, short = 'a', default_value = "clustering")]
    pub kind: AnalysisKind,

    /// Sensor field to analyze (temperature, humidity, rssi, vazao)
    #[arg(long, short = 'f', default_value = "temperature")]
    pub target: TargetField,

    /// Time window (last_24h, last_7_days, last_30_days, last_90_days)
    #[arg(long, short = 'r', default_value = "last_30_days")]
    pub range: TimeRange,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Display the resolved configuration (tokens masked)
    Show,

    /// Print the config file location
    Path,

    /// Set a profile value
    Set {
        /// Config key (backend, api_token_env, ca_cert, insecure, timeout)
        key: String,
        /// Value to set
        value: String,
    },

    /// List profile names
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the profile's API token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
