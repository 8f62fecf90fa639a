//! Statistics Calculator Module
//! Descriptive summaries, histograms and density estimates for player data.

use crate::data::PlayerTable;
use crate::stats::aggregate::{rank_rows, AggregateMatrix, Ranked};
use statrs::distribution::{Continuous, Normal};
use std::collections::HashMap;

/// Total, average and highest market value of a set of players.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueSummary {
    pub count: usize,
    pub total: f64,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

/// describe()-style summary of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptive {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for Descriptive {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Equal-width bins. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// (left edge, right edge, count) per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

/// Per-position mean and max inside one country.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionStats {
    pub position: String,
    pub mean: f64,
    pub max: f64,
}

/// Detail block for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryDetail {
    pub country: String,
    pub highest: Option<f64>,
    pub average: Option<f64>,
    pub positions: Vec<PositionStats>,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Total, mean and max of the present market values.
    pub fn value_summary(table: &PlayerTable) -> ValueSummary {
        let values = table.market_values();
        ValueSummary {
            count: table.len(),
            total: values.iter().sum(),
            mean: Self::mean(&values),
            max: values.iter().copied().reduce(f64::max),
        }
    }

    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// Compute descriptive statistics for an array of values.
    pub fn describe(values: &[f64]) -> Descriptive {
        let n = values.len();
        if n == 0 {
            return Descriptive::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Descriptive {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Bin values into `bins` equal-width buckets spanning min..=max.
    ///
    /// The last bin is closed on the right. A single distinct value gets one
    /// bin of width 1 centred on it.
    pub fn histogram(values: &[f64], bins: usize) -> Histogram {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (Some(min), Some(max)) = (
            finite.iter().copied().reduce(f64::min),
            finite.iter().copied().reduce(f64::max),
        ) else {
            return Histogram::default();
        };
        if bins == 0 {
            return Histogram::default();
        }

        if max == min {
            return Histogram {
                edges: vec![min - 0.5, min + 0.5],
                counts: vec![finite.len()],
            };
        }

        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    /// Scott's rule bandwidth: std * n^(-1/5).
    pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
        let stats = Self::describe(values);
        let bw = stats.std * (stats.count as f64).powf(-0.2);
        (bw.is_finite() && bw > 0.0).then_some(bw)
    }

    /// Gaussian kernel density evaluated at `grid`, in density units.
    pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
        let bandwidth = Self::scott_bandwidth(values)?;
        let kernels: Vec<Normal> = values
            .iter()
            .filter_map(|&v| Normal::new(v, bandwidth).ok())
            .collect();
        if kernels.is_empty() {
            return None;
        }

        let n = kernels.len() as f64;
        Some(
            grid.iter()
                .map(|&x| kernels.iter().map(|k| k.pdf(x)).sum::<f64>() / n)
                .collect(),
        )
    }

    /// KDE curve scaled to histogram counts, sampled at `points` positions.
    pub fn kde_curve(values: &[f64], histogram: &Histogram, points: usize) -> Vec<(f64, f64)> {
        let (Some(&lo), Some(&hi)) = (histogram.edges.first(), histogram.edges.last()) else {
            return Vec::new();
        };
        if points < 2 {
            return Vec::new();
        }

        let step = (hi - lo) / (points - 1) as f64;
        let grid: Vec<f64> = (0..points).map(|i| lo + step * i as f64).collect();
        let scale = values.len() as f64 * histogram.bin_width();

        Self::gaussian_kde(values, &grid)
            .map(|density| {
                grid.into_iter()
                    .zip(density)
                    .map(|(x, d)| (x, d * scale))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Occurrence counts, descending; ties keep first-encounter order.
    pub fn value_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for key in keys {
            let count = counts.entry(key).or_insert_with(|| {
                order.push(key);
                0
            });
            *count += 1;
        }

        let mut result: Vec<(String, usize)> = order
            .into_iter()
            .map(|key| (key.to_string(), counts[key]))
            .collect();
        result.sort_by(|a, b| b.1.cmp(&a.1));
        result
    }

    /// Player counts per position.
    pub fn position_counts(table: &PlayerTable) -> Vec<(String, usize)> {
        Self::value_counts(table.iter().filter_map(|r| r.position.as_deref()))
    }

    /// Countries ranked by their single most valuable player, top `n`.
    pub fn top_countries_by_max(table: &PlayerTable, n: usize) -> Vec<String> {
        let mut order: Vec<&str> = Vec::new();
        let mut best: HashMap<&str, Option<f64>> = HashMap::new();
        for record in table.iter() {
            let Some(country) = record.country_of_birth.as_deref() else {
                continue;
            };
            let entry = best.entry(country).or_insert_with(|| {
                order.push(country);
                None
            });
            if let Some(v) = record.value() {
                *entry = Some(entry.map_or(v, |cur| cur.max(v)));
            }
        }

        let matrix = AggregateMatrix::from_cells(
            order.iter().map(|c| c.to_string()).collect(),
            vec![String::new()],
            order.iter().map(|c| vec![best[c]]).collect(),
        );
        rank_rows(&matrix)
            .into_iter()
            .filter(|r| r.best.is_some())
            .take(n)
            .map(|r| r.name)
            .collect()
    }

    /// Detail blocks for each country in `order`.
    ///
    /// Per-position figures are rounded to two decimals and sorted by max,
    /// highest first.
    pub fn country_details(table: &PlayerTable, order: &[Ranked]) -> Vec<CountryDetail> {
        order
            .iter()
            .map(|ranked| {
                let rows: Vec<_> = table
                    .iter()
                    .filter(|r| r.country_of_birth.as_deref() == Some(ranked.name.as_str()))
                    .collect();
                let values: Vec<f64> = rows.iter().filter_map(|r| r.value()).collect();

                let mut position_order: Vec<&str> = Vec::new();
                let mut by_position: HashMap<&str, Vec<f64>> = HashMap::new();
                for row in &rows {
                    let (Some(position), Some(value)) = (row.position.as_deref(), row.value())
                    else {
                        continue;
                    };
                    by_position
                        .entry(position)
                        .or_insert_with(|| {
                            position_order.push(position);
                            Vec::new()
                        })
                        .push(value);
                }

                let mut positions: Vec<PositionStats> = position_order
                    .iter()
                    .map(|position| {
                        let vals = &by_position[position];
                        PositionStats {
                            position: position.to_string(),
                            mean: round2(Self::mean(vals).unwrap_or(f64::NAN)),
                            max: round2(vals.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
                        }
                    })
                    .collect();
                positions.sort_by(|a, b| {
                    b.max.partial_cmp(&a.max).unwrap_or(std::cmp::Ordering::Equal)
                });

                CountryDetail {
                    country: ranked.name.clone(),
                    highest: values.iter().copied().reduce(f64::max),
                    average: Self::mean(&values),
                    positions,
                }
            })
            .collect()
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Format a euro amount as `€1,234,567.89`.
pub fn format_eur(value: f64) -> String {
    if !value.is_finite() {
        return "€-".to_string();
    }
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}€{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

/// Format a count with thousands separators.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
