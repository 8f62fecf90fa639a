//! Batch Report
//! Runs the fixed chart sequence and writes one PNG per analysis.

use crate::analysis::{self, AnalysisOutcome, DatasetOverview};
use crate::charts::{ChartText, RenderError, StaticChartRenderer};
use crate::config::AppConfig;
use crate::data::PlayerTable;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to each chart of a run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub rendered: Vec<PathBuf>,
    /// (chart file, reason)
    pub skipped: Vec<(String, String)>,
}

impl BatchReport {
    fn record<T>(
        &mut self,
        output_dir: &Path,
        file_name: &str,
        outcome: AnalysisOutcome<T>,
        render: impl FnOnce(&Path, &T) -> Result<(), RenderError>,
    ) {
        match outcome {
            AnalysisOutcome::Ready(data) => {
                let path = output_dir.join(file_name);
                match render(&path, &data) {
                    Ok(()) => {
                        log::info!("Wrote {}", path.display());
                        self.rendered.push(path);
                    }
                    Err(e) => {
                        log::error!("Failed to render {}: {}", file_name, e);
                        self.skipped.push((file_name.to_string(), e.to_string()));
                    }
                }
            }
            AnalysisOutcome::Empty => {
                log::info!("{} skipped: no data after filtering", file_name);
                self.skipped
                    .push((file_name.to_string(), "no data".to_string()));
            }
            AnalysisOutcome::Skipped(reason) => {
                self.skipped.push((file_name.to_string(), reason.to_string()));
            }
        }
    }
}

/// Render every chart for `table` into `config.output_dir`.
///
/// Each chart is independent: a failure is recorded and the run continues.
pub fn render_charts(
    table: &PlayerTable,
    config: &AppConfig,
    today: NaiveDate,
    age_bins: usize,
    with_kde: bool,
) -> std::io::Result<BatchReport> {
    let output_dir = config.output_dir.as_path();
    fs::create_dir_all(output_dir)?;
    let style = &config.style;
    let mut report = BatchReport::default();

    report.record(
        output_dir,
        "value_distribution.png",
        analysis::value_distribution(table, config.value_bins),
        |path, histogram| {
            StaticChartRenderer::render_histogram(
                path,
                ChartText {
                    title: "Distribution of Player Market Values",
                    x_label: "Market Value",
                    y_label: "Count",
                },
                histogram,
                &[],
                style,
            )
        },
    );

    let positions = analysis::position_breakdown(table);
    report.record(
        output_dir,
        "position_counts.png",
        positions.clone(),
        |path, counts| {
            let bars: Vec<(String, f64)> = counts
                .iter()
                .map(|(name, count)| (name.clone(), *count as f64))
                .collect();
            StaticChartRenderer::render_bar_chart(
                path,
                ChartText {
                    title: "Player Distribution by Position",
                    x_label: "Position",
                    y_label: "Number of Players",
                },
                &bars,
                style,
            )
        },
    );

    report.record(
        output_dir,
        "age_distribution.png",
        analysis::age_distribution(table, today, age_bins, with_kde),
        |path, ages| {
            StaticChartRenderer::render_histogram(
                path,
                ChartText {
                    title: "Age Distribution of Players",
                    x_label: "Age",
                    y_label: "Count",
                },
                &ages.histogram,
                &ages.kde,
                style,
            )
        },
    );

    let breakdown = analysis::market_value_breakdown(table);
    report.record(
        output_dir,
        "highest_value_by_country_position.png",
        breakdown.clone().map(|b| b.highest),
        |path, chart| StaticChartRenderer::render_value_chart(path, chart, style),
    );
    report.record(
        output_dir,
        "average_value_by_country_position.png",
        breakdown.map(|b| b.average),
        |path, chart| StaticChartRenderer::render_value_chart(path, chart, style),
    );

    report.record(output_dir, "position_share.png", positions, |path, counts| {
        StaticChartRenderer::render_pie_chart(
            path,
            "Distribution of Players by Position",
            counts,
            style,
        )
    });

    Ok(report)
}

/// Open each rendered chart with the system viewer.
pub fn open_rendered(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = open::that(path) {
            log::warn!("Could not open {}: {}", path.display(), e);
        }
    }
}

/// Print schema, head and numeric summary.
pub fn print_overview(overview: &DatasetOverview) {
    println!("\nData Overview:");
    println!("{} rows, {} columns", overview.rows, overview.columns.len());
    for (name, dtype) in &overview.columns {
        println!("  {:<28} {}", name, dtype);
    }

    println!("\nFirst few rows:");
    println!("{}", overview.head);

    println!("\nBasic statistics:");
    if overview.numeric.is_empty() {
        println!("  (no numeric columns)");
        return;
    }
    println!(
        "  {:<24} {:>8} {:>16} {:>16} {:>14} {:>14} {:>14} {:>14} {:>16}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for (name, d) in &overview.numeric {
        println!(
            "  {:<24} {:>8} {:>16.2} {:>16.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
            name, d.count, d.mean, d.std, d.min, d.p25, d.median, d.p75, d.max
        );
    }
}
