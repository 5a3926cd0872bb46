//! Integration tests for the `lorascope` CLI binary.
//!
//! Argument parsing, help output and completions run without a backend;
//! the data commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `lorascope` binary with env isolation.
///
/// Clears all `LORASCOPE_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn lorascope_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lorascope");
    cmd.env("HOME", "/tmp/lorascope-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/lorascope-cli-test-nonexistent")
        .env(
            "LORASCOPE_CONFIG",
            "/tmp/lorascope-cli-test-nonexistent/config.toml",
        )
        .env_remove("LORASCOPE_PROFILE")
        .env_remove("LORASCOPE_BACKEND")
        .env_remove("LORASCOPE_API_TOKEN")
        .env_remove("LORASCOPE_OUTPUT")
        .env_remove("LORASCOPE_INSECURE")
        .env_remove("LORASCOPE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run a blocking CLI invocation off the async runtime's worker.
async fn run(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || lorascope_cmd().args(args).output().unwrap())
        .await
        .unwrap()
}

fn args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut v = vec!["--backend".to_owned(), server.uri()];
    v.extend(rest.iter().map(|s| (*s).to_owned()));
    v
}

fn uplink(id: i64, time: &str, rssi: i64, snr: f64) -> serde_json::Value {
    json!({
        "id": id,
        "event_type": "up",
        "dev_eui": "a84041000181c4b1",
        "device_name": "estufa-01",
        "event_time": time,
        "received_at": time,
        "f_port": 2,
        "rssi": rssi,
        "snr": snr,
        "frequency": 916_800_000,
        "dr": 3
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = lorascope_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    lorascope_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("LoRaWAN")
            .and(predicate::str::contains("events"))
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("analyze")),
    );
}

#[test]
fn test_completions_zsh() {
    lorascope_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_events_list_no_backend() {
    lorascope_cmd()
        .args(["events", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backend configured"));
}

#[test]
fn test_rejects_unsupported_limit() {
    let output = lorascope_cmd()
        .args(["events", "list", "--limit", "42"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("50, 100, 200, 500, 1000"));
}

#[test]
fn test_rejects_unknown_analysis_kind() {
    let output = lorascope_cmd()
        .args(["analyze", "--kind", "regression"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_show_no_config() {
    lorascope_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_subcommands_exist() {
    lorascope_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("set-token")),
        );
}

// ── Against a mock backend ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_events_list_json_passes_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chirpstack/events"))
        .and(query_param("limit", "50"))
        .and(query_param("event_type", "up"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([uplink(
            7,
            "2025-03-01T10:00:00",
            -97,
            7.5
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &["-o", "json-compact", "events", "list", "-t", "up", "-l", "50"],
    ))
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["id"], 7);
    assert_eq!(parsed[0]["rssi"], -97);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_plain_prints_euis() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chirpstack/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"dev_eui": "a84041000181c4b1", "device_name": "estufa-01", "event_count": 12},
            {"dev_eui": "0004a30b001c0530", "device_name": null, "event_count": 3}
        ])))
        .mount(&server)
        .await;

    let output = run(args(&server, &["-o", "plain", "devices", "list"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "a84041000181c4b1\n0004a30b001c0530"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_rf_reports_sample_ids_in_time_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chirpstack/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            uplink(2, "2025-03-01T11:00:00", -101, 5.0),
            uplink(1, "2025-03-01T10:00:00", -97, 7.5)
        ])))
        .mount(&server)
        .await;

    let output = run(args(&server, &["-o", "plain", "events", "rf"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1\n2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_surfaces_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ml/analyze"))
        .and(body_json(json!({
            "dataset": "sensor_data",
            "analysis_type": "prediction",
            "target_field": "humidity",
            "time_range": "last_7_days"
        })))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Dados insuficientes para previsão"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &[
            "analyze",
            "--kind",
            "prediction",
            "--target",
            "humidity",
            "--range",
            "last_7_days",
        ],
    ))
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Dados insuficientes para previsão"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_renders_clustering_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ml/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analysis_type": "clustering",
            "target_field": "temperature",
            "time_range": "last_30_days",
            "results": {
                "n_clusters": 2,
                "total_points": 10,
                "cluster_centers": [18.0, 27.5],
                "cluster_stats": [
                    {"cluster_id": 0, "count": 6, "mean": 18.0, "std": 0.5, "min": 17.2, "max": 18.9},
                    {"cluster_id": 1, "count": 4, "mean": 27.5, "std": 1.25, "min": 26.0, "max": 29.1}
                ],
                "inertia": 12.3456
            },
            "metadata": {"dataset": "sensor_data", "timestamp": "2025-03-01T12:00:00"}
        })))
        .mount(&server)
        .await;

    let output = run(args(&server, &["analyze"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Inertia:       12.35"), "{stdout}");
    assert!(stdout.contains("Cluster 1 (4 points)"), "{stdout}");
    assert!(stdout.contains("Cluster 0: 18.00"), "{stdout}");
}

// ── Config file round trip ──────────────────────────────────────────

#[test]
fn test_config_set_then_use_profile() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    let cfg = cfg_path.to_str().unwrap();

    lorascope_cmd()
        .env("LORASCOPE_CONFIG", cfg)
        .args(["--profile", "lab", "config", "set", "backend", "http://lab:8000"])
        .assert()
        .success();

    lorascope_cmd()
        .env("LORASCOPE_CONFIG", cfg)
        .args(["config", "use", "lab"])
        .assert()
        .success();

    lorascope_cmd()
        .env("LORASCOPE_CONFIG", cfg)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("default_profile = \"lab\"")
                .and(predicate::str::contains("backend = \"http://lab:8000\"")),
        );

    lorascope_cmd()
        .env("LORASCOPE_CONFIG", cfg)
        .args(["config", "use", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'prod' not found"));
}
