//! End-to-end tests of the `varback` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

/// Writes `count` business-day closes with a deterministic wiggle.
fn write_prices(dir: &Path, count: usize) -> PathBuf {
    let start = chrono::NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let mut lines = vec!["date,close".to_string()];
    let mut price = 50.0;
    for i in 0..count {
        let x = i as f64;
        price *= 1.0 + 0.01 * ((x * 0.83).sin() + 0.6 * (x * 1.91).cos());
        let date = start + chrono::Days::new(i as u64);
        lines.push(format!("{date},{price:.4}"));
    }
    let path = dir.join("prices.csv");
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

fn sample_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/sample_prices.csv")
}

fn varback() -> Command {
    let mut cmd = Command::cargo_bin("varback").unwrap();
    cmd.env_remove("VARBACK_CONFIG")
        .env_remove("VARBACK_DATA")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// RUN
// =============================================================================

#[test]
fn test_run_writes_all_reports() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 200);
    let out = dir.path().join("docs");

    varback()
        .args(["run", "--window", "60", "--quiet"])
        .arg("--data")
        .arg(&data)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("parametric_normal"));

    for name in [
        "point_estimates.csv",
        "backtest_summary.csv",
        "backtest_historical.csv",
        "backtest_parametric.csv",
        "backtest_ewma.csv",
        "backtest_historical.svg",
        "backtest_parametric.svg",
        "backtest_ewma.svg",
        "stress_summary.csv",
        "loss_hist.csv",
        "loss_hist.svg",
        "worst_window.txt",
        "run_summary.txt",
        "report.md",
    ] {
        assert!(out.join(name).exists(), "missing {name}");
    }

    // 199 returns, 60 of them used before the first forecast
    let daily = fs::read_to_string(out.join("backtest_ewma.csv")).unwrap();
    assert_eq!(daily.lines().count(), 1 + 139);

    let summary = fs::read_to_string(out.join("backtest_summary.csv")).unwrap();
    let models: Vec<&str> = summary
        .lines()
        .skip(1)
        .filter_map(|l| l.split(',').next())
        .collect();
    assert_eq!(models, vec!["ewma", "historical", "parametric"]);

    let stress = fs::read_to_string(out.join("stress_summary.csv")).unwrap();
    assert!(stress.contains("\nBase,"));
    assert!(stress.contains("\nSevere,"));

    let worst = fs::read_to_string(out.join("worst_window.txt")).unwrap();
    assert!(worst.starts_with("Ends at **2022-"));

    let hist = fs::read_to_string(out.join("loss_hist.csv")).unwrap();
    assert_eq!(hist.lines().count(), 1 + 60);

    let report = fs::read_to_string(out.join("report.md")).unwrap();
    assert!(report.contains("![Loss distribution](loss_hist.svg)"));
    assert!(report.contains("(backtest_ewma.svg)"));
}

#[test]
fn test_run_json_output() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 150);

    let output = varback()
        .args(["--format", "json", "run", "--window", "50"])
        .arg("--data")
        .arg(&data)
        .arg("--out")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["alpha"], 0.99);
    assert_eq!(report["point_estimates"].as_array().unwrap().len(), 3);
    assert_eq!(report["backtests"][0]["n"], 99);
    assert_eq!(report["worst_window"]["window"], 20);
}

#[test]
fn test_run_on_sample_data() {
    let dir = TempDir::new().unwrap();
    varback()
        .args(["run", "--quiet"])
        .arg("--data")
        .arg(sample_data())
        .arg("--out")
        .arg(dir.path())
        .assert()
        .success();

    let report = fs::read_to_string(dir.path().join("report.md")).unwrap();
    assert!(report.contains("alpha = 0.99"));
    assert!(report.contains("Rolling window: **500 observations**"));
}

// =============================================================================
// COMMANDS
// =============================================================================

#[test]
fn test_estimate_csv() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 120);

    varback()
        .args(["estimate", "--format", "csv", "--alpha", "0.95"])
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("model,VaR,ES\nhistorical,"))
        .stdout(predicate::str::contains("ewma_conditional_normal,"));
}

#[test]
fn test_estimate_single_model_json() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 120);

    let output = varback()
        .args(["estimate", "--model", "parametric", "--format", "json"])
        .arg("--data")
        .arg(&data)
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["method"], "parametric");
    assert!(results[0]["es"].as_f64().unwrap() >= results[0]["var"].as_f64().unwrap());
}

#[test]
fn test_backtest_table() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 160);

    varback()
        .args(["backtest", "--window", "100", "--exceptions"])
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("kupiec_LR"))
        .stdout(predicate::str::contains("historical exceptions"));
}

#[test]
fn test_stress_with_config_file() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 120);
    let config = dir.path().join("varback.toml");
    fs::write(
        &config,
        "alpha = 0.975\nworst_window = 5\n\n[[scenarios]]\nname = \"Crash\"\nshock_return = -0.05\nvol_mult = 3.0\n",
    )
    .unwrap();

    let output = varback()
        .arg("--config")
        .arg(&config)
        .args(["stress", "--format", "json"])
        .arg("--data")
        .arg(&data)
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let scenarios = outcome["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0]["scenario"], "Crash");
    assert_eq!(scenarios[0]["results"][0]["alpha"], 0.975);
    assert_eq!(outcome["worst_window"]["window"], 5);
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_rejects_alpha_out_of_range() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 120);

    varback()
        .args(["estimate", "--alpha", "0.8"])
        .arg("--data")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha must be in [0.90, 1.0)"));
}

#[test]
fn test_rejects_short_window() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 120);

    varback()
        .args(["backtest", "--window", "20"])
        .arg("--data")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("window must be >= 50"));
}

#[test]
fn test_rejects_missing_close_column() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("bad.csv");
    fs::write(&data, "date,price\n2024-01-02,100\n2024-01-03,101\n").unwrap();

    varback()
        .arg("estimate")
        .arg("--data")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CSV must contain columns: date, close"));
}

#[test]
fn test_rejects_unknown_model() {
    varback()
        .args(["estimate", "--model", "garch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown").or(predicate::str::contains("invalid")));
}

#[test]
fn test_backtest_with_no_forecasts_fails() {
    let dir = TempDir::new().unwrap();
    let data = write_prices(dir.path(), 40);

    varback()
        .args(["backtest", "--window", "50"])
        .arg("--data")
        .arg(&data)
        .assert()
        .failure();
}
