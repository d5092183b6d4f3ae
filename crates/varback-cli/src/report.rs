//! Report tables and files.
//!
//! The same row types feed terminal output and the files written by
//! `varback run`:
//!
//! | File | Content |
//! |---|---|
//! | `point_estimates.csv` | Full-sample VaR/ES per model |
//! | `backtest_summary.csv` | Exceptions and Kupiec test per model |
//! | `backtest_<model>.csv` | Daily loss, forecast VaR and exception flag |
//! | `backtest_<model>.svg` | Loss vs VaR chart |
//! | `stress_summary.csv` | VaR/ES per model under each scenario |
//! | `loss_hist.csv` | Daily loss histogram bins |
//! | `loss_hist.svg` | Daily loss histogram chart |
//! | `worst_window.txt` | Worst trailing window |
//! | `run_summary.txt` | Plain-text overview |
//! | `report.md` | All tables as markdown |

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tabled::Tabled;
use tracing::debug;
use varback_math::statistics::HistogramBin;
use varback_risk::prelude::{
    BacktestResult, StressSummary, VaRMethod, VaRResult, WorstWindow,
};

use crate::charts;
use crate::error::CliResult;
use crate::output::{format_percent, render_markdown};

/// Point estimate row.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct PointRow {
    pub model: &'static str,
    #[serde(rename = "VaR")]
    #[tabled(rename = "VaR")]
    pub var: String,
    #[serde(rename = "ES")]
    #[tabled(rename = "ES")]
    pub es: String,
}

impl From<&VaRResult> for PointRow {
    fn from(result: &VaRResult) -> Self {
        Self {
            model: result.method.label(),
            var: format_percent(result.var),
            es: format_percent(result.es),
        }
    }
}

/// Backtest summary row.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct BacktestRow {
    pub model: &'static str,
    pub n: usize,
    pub exceptions: usize,
    pub exception_rate: String,
    #[serde(rename = "kupiec_LR")]
    #[tabled(rename = "kupiec_LR")]
    pub kupiec_lr: f64,
    pub kupiec_p_value: f64,
}

impl From<&BacktestResult> for BacktestRow {
    fn from(result: &BacktestResult) -> Self {
        Self {
            model: result.method.as_str(),
            n: result.n,
            exceptions: result.exceptions,
            exception_rate: format_percent(result.exception_rate),
            kupiec_lr: round3(result.kupiec_lr),
            kupiec_p_value: round3(result.kupiec_p_value),
        }
    }
}

/// Stress summary row, one column pair per model.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct StressRow {
    pub scenario: String,
    #[serde(rename = "hist_VaR")]
    #[tabled(rename = "hist_VaR")]
    pub hist_var: String,
    #[serde(rename = "hist_ES")]
    #[tabled(rename = "hist_ES")]
    pub hist_es: String,
    #[serde(rename = "param_VaR")]
    #[tabled(rename = "param_VaR")]
    pub param_var: String,
    #[serde(rename = "param_ES")]
    #[tabled(rename = "param_ES")]
    pub param_es: String,
    #[serde(rename = "ewma_VaR")]
    #[tabled(rename = "ewma_VaR")]
    pub ewma_var: String,
    #[serde(rename = "ewma_ES")]
    #[tabled(rename = "ewma_ES")]
    pub ewma_es: String,
}

impl From<&StressSummary> for StressRow {
    fn from(summary: &StressSummary) -> Self {
        let cell = |method: VaRMethod, es: bool| {
            summary.result(method).map_or_else(
                || "-".to_string(),
                |r| format_percent(if es { r.es } else { r.var }),
            )
        };
        Self {
            scenario: summary.scenario.clone(),
            hist_var: cell(VaRMethod::Historical, false),
            hist_es: cell(VaRMethod::Historical, true),
            param_var: cell(VaRMethod::Parametric, false),
            param_es: cell(VaRMethod::Parametric, true),
            ewma_var: cell(VaRMethod::Ewma, false),
            ewma_es: cell(VaRMethod::Ewma, true),
        }
    }
}

/// Number of bins in the loss histogram.
pub const LOSS_HIST_BINS: usize = 60;

/// Loss histogram row.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramRow {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl From<&HistogramBin> for HistogramRow {
    fn from(bin: &HistogramBin) -> Self {
        Self {
            lower: bin.lower,
            upper: bin.upper,
            count: bin.count,
        }
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Point estimate rows in model order.
pub fn point_rows(results: &[VaRResult]) -> Vec<PointRow> {
    results.iter().map(PointRow::from).collect()
}

/// Backtest rows sorted by model name.
pub fn backtest_rows(results: &[BacktestResult]) -> Vec<BacktestRow> {
    let mut rows: Vec<BacktestRow> = results.iter().map(BacktestRow::from).collect();
    rows.sort_by_key(|row| row.model);
    rows
}

/// Stress rows in scenario order.
pub fn stress_rows(summaries: &[StressSummary]) -> Vec<StressRow> {
    summaries.iter().map(StressRow::from).collect()
}

/// One-line description of the worst window, markdown emphasis included.
pub fn worst_window_line(worst: &WorstWindow) -> String {
    format!(
        "Ends at **{}**, cumulative return (simple sum) ≈ **{:.4}**",
        worst.end_date, worst.cumulative_return
    )
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub alpha: f64,
    pub window: usize,
    pub point_estimates: Vec<VaRResult>,
    pub backtests: Vec<BacktestResult>,
    pub stress: Vec<StressSummary>,
    pub worst_window: WorstWindow,
    /// Histogram of full-sample daily losses.
    #[serde(skip)]
    pub loss_histogram: Vec<HistogramBin>,
}

impl RunReport {
    /// Writes every report file into `out_dir`, creating it if needed.
    ///
    /// Returns the paths written, in order.
    pub fn write_all(&self, out_dir: &Path) -> CliResult<Vec<PathBuf>> {
        fs::create_dir_all(out_dir)?;
        let mut written = Vec::new();

        let path = out_dir.join("point_estimates.csv");
        write_csv(&path, &point_rows(&self.point_estimates))?;
        written.push(path);

        for backtest in &self.backtests {
            let path = out_dir.join(format!("backtest_{}.csv", backtest.method));
            write_csv(&path, &backtest.points)?;
            written.push(path);

            let path = out_dir.join(format!("backtest_{}.svg", backtest.method));
            fs::write(
                &path,
                charts::loss_vs_var(backtest.method, backtest.alpha, &backtest.points),
            )?;
            written.push(path);
        }

        let path = out_dir.join("backtest_summary.csv");
        write_csv(&path, &backtest_rows(&self.backtests))?;
        written.push(path);

        let path = out_dir.join("stress_summary.csv");
        write_csv(&path, &stress_rows(&self.stress))?;
        written.push(path);

        let path = out_dir.join("loss_hist.csv");
        let rows: Vec<HistogramRow> = self.loss_histogram.iter().map(HistogramRow::from).collect();
        write_csv(&path, &rows)?;
        written.push(path);

        let path = out_dir.join("loss_hist.svg");
        fs::write(&path, charts::loss_histogram(&self.loss_histogram))?;
        written.push(path);

        let path = out_dir.join("worst_window.txt");
        fs::write(&path, format!("{}\n", worst_window_line(&self.worst_window)))?;
        written.push(path);

        let path = out_dir.join("run_summary.txt");
        fs::write(&path, self.summary_text())?;
        written.push(path);

        let path = out_dir.join("report.md");
        fs::write(&path, self.markdown())?;
        written.push(path);

        debug!("wrote {} report files to {}", written.len(), out_dir.display());
        Ok(written)
    }

    /// Plain-text overview of the point estimates and the table files.
    pub fn summary_text(&self) -> String {
        let mut lines = vec![
            "Point estimates (full sample)".to_string(),
            format!("alpha={}", self.alpha),
        ];
        for result in &self.point_estimates {
            lines.push(format!(
                "{}: VaR={}, ES={}",
                result.method,
                format_percent(result.var),
                format_percent(result.es)
            ));
        }
        lines.extend(
            [
                "",
                "Tables:",
                "- point_estimates.csv",
                "- backtest_summary.csv",
                "- stress_summary.csv",
                "",
                "Charts:",
                "- loss_hist.svg",
                "- backtest_<model>.svg",
                "",
                "See report.md for a single-page markdown summary.",
            ]
            .map(String::from),
        );
        lines.join("\n") + "\n"
    }

    /// Single-page markdown report.
    pub fn markdown(&self) -> String {
        let mut lines = vec![
            "# Market VaR/ES: Backtest and Stress Report".to_string(),
            String::new(),
            format!("- VaR/ES confidence level: **alpha = {:.2}**", self.alpha),
            format!("- Rolling window: **{} observations**", self.window),
            String::new(),
            "## Point estimates (full sample)".to_string(),
            render_markdown(&point_rows(&self.point_estimates)),
            String::new(),
            "## Backtest summary (rolling 1-day VaR forecasts)".to_string(),
            render_markdown(&backtest_rows(&self.backtests)),
            String::new(),
            "## Stress summary".to_string(),
            render_markdown(&stress_rows(&self.stress)),
            String::new(),
            format!(
                "## Worst historical window ({} trading days)",
                self.worst_window.window
            ),
            worst_window_line(&self.worst_window),
            String::new(),
            "## Charts".to_string(),
            String::new(),
            "![Loss distribution](loss_hist.svg)".to_string(),
            String::new(),
        ];
        for backtest in &self.backtests {
            lines.push(format!(
                "![{method}: loss vs VaR](backtest_{method}.svg)",
                method = backtest.method
            ));
            lines.push(String::new());
        }
        lines.push("## Loss vs VaR data".to_string());
        for backtest in &self.backtests {
            lines.push(format!(
                "- `backtest_{}.csv`: {} days, {} exceptions",
                backtest.method, backtest.n, backtest.exceptions
            ));
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> CliResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use varback_math::statistics::histogram;
    use varback_risk::prelude::BacktestPoint;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
    }

    fn sample_report() -> RunReport {
        let point = |method| VaRResult {
            method,
            alpha: 0.99,
            var: 0.0312,
            es: 0.0405,
        };
        let backtest = |method| BacktestResult {
            method,
            alpha: 0.99,
            n: 2,
            exceptions: 1,
            exception_rate: 0.5,
            kupiec_lr: 4.56789,
            kupiec_p_value: 0.03261,
            points: vec![
                BacktestPoint {
                    date: d(1),
                    loss: 0.01,
                    var: 0.02,
                    exception: false,
                },
                BacktestPoint {
                    date: d(2),
                    loss: 0.03,
                    var: 0.02,
                    exception: true,
                },
            ],
        };
        RunReport {
            alpha: 0.99,
            window: 500,
            point_estimates: VaRMethod::ALL.map(point).to_vec(),
            backtests: VaRMethod::ALL.map(backtest).to_vec(),
            stress: vec![StressSummary {
                scenario: "Base".to_string(),
                results: VaRMethod::ALL.map(point).to_vec(),
            }],
            worst_window: WorstWindow {
                end_date: d(2),
                window: 20,
                cumulative_return: -0.123_47,
            },
            loss_histogram: histogram(&[-0.01, 0.01, 0.03], LOSS_HIST_BINS).unwrap(),
        }
    }

    #[test]
    fn test_rows() {
        let report = sample_report();

        let points = point_rows(&report.point_estimates);
        assert_eq!(points[1].model, "parametric_normal");
        assert_eq!(points[1].var, "3.12%");
        assert_eq!(points[1].es, "4.05%");

        let backtests = backtest_rows(&report.backtests);
        let models: Vec<_> = backtests.iter().map(|r| r.model).collect();
        assert_eq!(models, vec!["ewma", "historical", "parametric"]);
        assert_eq!(backtests[0].exception_rate, "50.00%");
        assert_eq!(backtests[0].kupiec_lr, 4.568);
        assert_eq!(backtests[0].kupiec_p_value, 0.033);

        let stress = stress_rows(&report.stress);
        assert_eq!(stress[0].scenario, "Base");
        assert_eq!(stress[0].ewma_es, "4.05%");
    }

    #[test]
    fn test_missing_model_cell() {
        let summary = StressSummary {
            scenario: "Only historical".to_string(),
            results: vec![VaRResult {
                method: VaRMethod::Historical,
                alpha: 0.99,
                var: 0.01,
                es: 0.02,
            }],
        };
        let row = StressRow::from(&summary);
        assert_eq!(row.hist_var, "1.00%");
        assert_eq!(row.param_var, "-");
    }

    #[test]
    fn test_worst_window_line() {
        let report = sample_report();
        assert_eq!(
            worst_window_line(&report.worst_window),
            "Ends at **2024-07-02**, cumulative return (simple sum) ≈ **-0.1235**"
        );
    }

    #[test]
    fn test_write_all() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let written = sample_report().write_all(&out).unwrap();
        assert_eq!(written.len(), 14);
        for path in &written {
            assert!(path.exists(), "{}", path.display());
        }

        let summary = fs::read_to_string(out.join("backtest_summary.csv")).unwrap();
        assert!(summary.starts_with(
            "model,n,exceptions,exception_rate,kupiec_LR,kupiec_p_value\newma,"
        ));

        let daily = fs::read_to_string(out.join("backtest_historical.csv")).unwrap();
        let lines: Vec<&str> = daily.lines().collect();
        assert_eq!(lines[0], "date,loss,var,exception");
        assert_eq!(lines[2], "2024-07-02,0.03,0.02,true");

        let stress = fs::read_to_string(out.join("stress_summary.csv")).unwrap();
        assert!(stress.starts_with("scenario,hist_VaR,hist_ES,param_VaR,param_ES,ewma_VaR,ewma_ES\n"));

        let text = fs::read_to_string(out.join("run_summary.txt")).unwrap();
        assert!(text.contains("alpha=0.99"));
        assert!(text.contains("historical: VaR=3.12%, ES=4.05%"));

        let md = fs::read_to_string(out.join("report.md")).unwrap();
        assert!(md.contains("## Backtest summary"));
        assert!(md.contains("| model"));
        assert!(md.contains("Worst historical window (20 trading days)"));
        assert!(md.contains("`backtest_ewma.csv`: 2 days, 1 exceptions"));
        assert!(md.contains("![Loss distribution](loss_hist.svg)"));
        assert!(md.contains("](backtest_parametric.svg)"));
    }

    #[test]
    fn test_write_all_charts() {
        let dir = tempfile::tempdir().unwrap();
        sample_report().write_all(dir.path()).unwrap();

        let hist = fs::read_to_string(dir.path().join("loss_hist.csv")).unwrap();
        let lines: Vec<&str> = hist.lines().collect();
        assert_eq!(lines[0], "lower,upper,count");
        assert_eq!(lines.len(), 1 + LOSS_HIST_BINS);
        let total: usize = lines[1..]
            .iter()
            .filter_map(|l| l.rsplit(',').next()?.parse::<usize>().ok())
            .sum();
        assert_eq!(total, 3);

        let svg = fs::read_to_string(dir.path().join("loss_hist.svg")).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), LOSS_HIST_BINS);

        for method in VaRMethod::ALL {
            let chart = fs::read_to_string(dir.path().join(format!("backtest_{method}.svg"))).unwrap();
            assert_eq!(chart.matches("<circle").count(), 1);
            assert_eq!(chart.matches("<polyline").count(), 2);
        }
    }
}
