//! Analysis Units
//! Each analysis runs independently over a (filtered) table and reports a
//! tagged outcome instead of failing, so one unit never blocks the others.

use crate::data::age::derive_ages;
use crate::data::{loader, Analysis, PlayerFilter, PlayerTable, Selection};
use crate::stats::{
    aggregate, rank_columns, rank_rows, AggregateMatrix, CountryDetail, Descriptive, Histogram,
    Ranked, Statistic, StatsCalculator, ValueSummary,
};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::fmt;

/// Why an analysis did not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingColumn(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingColumn(col) => write!(f, "column '{}' not available", col),
        }
    }
}

/// Result of one analysis unit.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome<T> {
    Ready(T),
    /// Ran, but the filtered data left nothing to show.
    Empty,
    Skipped(SkipReason),
}

impl<T> AnalysisOutcome<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            AnalysisOutcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AnalysisOutcome::Ready(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AnalysisOutcome<U> {
        match self {
            AnalysisOutcome::Ready(value) => AnalysisOutcome::Ready(f(value)),
            AnalysisOutcome::Empty => AnalysisOutcome::Empty,
            AnalysisOutcome::Skipped(reason) => AnalysisOutcome::Skipped(reason),
        }
    }
}

/// Counts shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overview {
    pub total_players: usize,
    pub countries_selected: usize,
    pub positions_selected: usize,
}

/// One statistic's matrix with its display orderings.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChart {
    pub statistic: Statistic,
    pub matrix: AggregateMatrix,
    pub country_order: Vec<Ranked>,
    pub position_order: Vec<Ranked>,
}

impl ValueChart {
    pub fn title(&self) -> String {
        match self.statistic {
            Statistic::Max => "Highest Player Market Value by Country and Position".to_string(),
            Statistic::Mean => "Average Player Market Value by Country and Position".to_string(),
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self.statistic {
            Statistic::Max => "Market Value (EUR)",
            Statistic::Mean => "Average Market Value (EUR)",
        }
    }
}

/// Highest/average charts plus the per-country detail table.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketValueBreakdown {
    pub highest: ValueChart,
    pub average: ValueChart,
    pub details: Vec<CountryDetail>,
}

/// Derived ages with their histogram and optional density curve.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeDistribution {
    pub ages: Vec<f64>,
    pub histogram: Histogram,
    pub kde: Vec<(f64, f64)>,
    /// Records dropped for unparseable or future birth dates
    pub excluded: usize,
}

/// Schema, head and numeric summary of the raw frame.
#[derive(Debug, Clone)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: Vec<(String, String)>,
    pub head: DataFrame,
    pub numeric: Vec<(String, Descriptive)>,
}

fn require(table: &PlayerTable, analysis: Analysis) -> Result<(), SkipReason> {
    match table.available().missing_column(analysis) {
        Some(col) => {
            log::warn!("{} skipped: column '{}' not available", analysis, col);
            Err(SkipReason::MissingColumn(col))
        }
        None => Ok(()),
    }
}

/// Player and selection counts.
pub fn overview(full: &PlayerTable, filtered: &PlayerTable, filter: &PlayerFilter) -> Overview {
    let selected = |selection: &Selection, all: Vec<String>| match selection {
        Selection::All => all.len(),
        Selection::Only(values) => values.len(),
    };
    Overview {
        total_players: filtered.len(),
        countries_selected: selected(&filter.countries, full.countries()),
        positions_selected: selected(&filter.positions, full.positions()),
    }
}

pub fn value_summary(table: &PlayerTable) -> AnalysisOutcome<ValueSummary> {
    if let Err(reason) = require(table, Analysis::ValueSummary) {
        return AnalysisOutcome::Skipped(reason);
    }
    if table.is_empty() {
        return AnalysisOutcome::Empty;
    }
    AnalysisOutcome::Ready(StatsCalculator::value_summary(table))
}

pub fn value_distribution(table: &PlayerTable, bins: usize) -> AnalysisOutcome<Histogram> {
    if let Err(reason) = require(table, Analysis::ValueDistribution) {
        return AnalysisOutcome::Skipped(reason);
    }
    let histogram = StatsCalculator::histogram(&table.market_values(), bins);
    if histogram.is_empty() {
        AnalysisOutcome::Empty
    } else {
        AnalysisOutcome::Ready(histogram)
    }
}

pub fn position_breakdown(table: &PlayerTable) -> AnalysisOutcome<Vec<(String, usize)>> {
    if let Err(reason) = require(table, Analysis::PositionBreakdown) {
        return AnalysisOutcome::Skipped(reason);
    }
    let counts = StatsCalculator::position_counts(table);
    if counts.is_empty() {
        AnalysisOutcome::Empty
    } else {
        AnalysisOutcome::Ready(counts)
    }
}

/// Ages from birth dates relative to `today`. Unusable dates are excluded.
pub fn age_distribution(
    table: &PlayerTable,
    today: NaiveDate,
    bins: usize,
    with_kde: bool,
) -> AnalysisOutcome<AgeDistribution> {
    if let Err(reason) = require(table, Analysis::AgeDistribution) {
        return AnalysisOutcome::Skipped(reason);
    }

    let (ages, excluded) = derive_ages(
        table.iter().filter_map(|r| r.date_of_birth.as_deref()),
        today,
    );
    if excluded > 0 {
        log::warn!(
            "Excluded {} records with invalid or future dates of birth",
            excluded
        );
    }
    if ages.is_empty() {
        return AnalysisOutcome::Empty;
    }

    let histogram = StatsCalculator::histogram(&ages, bins);
    let kde = if with_kde {
        StatsCalculator::kde_curve(&ages, &histogram, 200)
    } else {
        Vec::new()
    };

    AnalysisOutcome::Ready(AgeDistribution {
        ages,
        histogram,
        kde,
        excluded,
    })
}

/// Highest and average value matrices with their orderings.
///
/// Both charts order positions by the highest-value ranking, and the detail
/// table follows the highest-value country ranking.
pub fn market_value_breakdown(table: &PlayerTable) -> AnalysisOutcome<MarketValueBreakdown> {
    if let Err(reason) = require(table, Analysis::CountryPositionValues) {
        return AnalysisOutcome::Skipped(reason);
    }

    let max_matrix = aggregate(table, Statistic::Max);
    if max_matrix.is_empty() {
        return AnalysisOutcome::Empty;
    }
    let mean_matrix = aggregate(table, Statistic::Mean);
    log::debug!(
        "{} countries x {} positions, {} pairs with values",
        max_matrix.rows().len(),
        max_matrix.columns().len(),
        max_matrix.present_count()
    );

    let country_order = rank_rows(&max_matrix);
    let position_order = rank_columns(&max_matrix);
    let details = StatsCalculator::country_details(table, &country_order);

    let average = ValueChart {
        statistic: Statistic::Mean,
        country_order: rank_rows(&mean_matrix),
        position_order: position_order.clone(),
        matrix: mean_matrix,
    };
    let highest = ValueChart {
        statistic: Statistic::Max,
        matrix: max_matrix,
        country_order,
        position_order,
    };

    AnalysisOutcome::Ready(MarketValueBreakdown {
        highest,
        average,
        details,
    })
}

/// Schema, first rows and describe() of every numeric column.
pub fn dataset_overview(frame: &DataFrame) -> DatasetOverview {
    let numeric = loader::numeric_columns(frame)
        .into_iter()
        .map(|name| {
            let stats = StatsCalculator::describe(&loader::numeric_values(frame, &name));
            (name, stats)
        })
        .collect();

    DatasetOverview {
        rows: frame.height(),
        columns: loader::column_types(frame),
        head: frame.head(Some(5)),
        numeric,
    }
}

/// Everything the dashboard shows for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub overview: Overview,
    pub summary: AnalysisOutcome<ValueSummary>,
    pub market: AnalysisOutcome<MarketValueBreakdown>,
    pub ages: AnalysisOutcome<AgeDistribution>,
    pub positions: AnalysisOutcome<Vec<(String, usize)>>,
}

impl DashboardView {
    /// Filter the table and run every dashboard analysis on the result.
    pub fn compute(
        full: &PlayerTable,
        filter: &PlayerFilter,
        age_bins: usize,
        today: NaiveDate,
    ) -> Self {
        let filtered = filter.apply(full);
        log::debug!(
            "Recomputing dashboard: {} of {} players selected",
            filtered.len(),
            full.len()
        );

        Self {
            overview: overview(full, &filtered, filter),
            summary: value_summary(&filtered),
            market: market_value_breakdown(&filtered),
            ages: age_distribution(&filtered, today, age_bins, true),
            positions: position_breakdown(&filtered),
        }
    }
}

/// Default dashboard filter: top countries by best player, all positions.
pub fn default_filter(table: &PlayerTable, country_count: usize) -> PlayerFilter {
    PlayerFilter::new(
        Selection::only(StatsCalculator::top_countries_by_max(table, country_count)),
        Selection::only(table.positions()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AvailableAnalyses, PlayerRecord, COUNTRY_COL, POSITION_COL, VALUE_COL};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn table() -> PlayerTable {
        PlayerTable::from_records(vec![
            PlayerRecord::new("Brazil", "Forward", 100.0).with_birth_date("2000-07-01"),
            PlayerRecord::new("Brazil", "Forward", 50.0).with_birth_date("1995-07-01 00:00:00"),
            PlayerRecord::new("France", "Defender", 80.0).with_birth_date("not-a-date"),
        ])
    }

    #[test]
    fn missing_birth_dates_skip_only_age() {
        let table = PlayerTable::new(
            table().records().to_vec(),
            AvailableAnalyses::from_columns([COUNTRY_COL, POSITION_COL, VALUE_COL]),
        );
        assert_eq!(
            age_distribution(&table, today(), 20, false),
            AnalysisOutcome::Skipped(SkipReason::MissingColumn("date_of_birth"))
        );
        assert!(market_value_breakdown(&table).is_ready());
        assert!(position_breakdown(&table).is_ready());
    }

    #[test]
    fn invalid_dates_are_excluded_from_ages() {
        let outcome = age_distribution(&table(), today(), 20, false);
        let ages = outcome.ready().unwrap();
        assert_eq!(ages.ages.len(), 2);
        assert_eq!(ages.excluded, 1);
        assert!(ages.kde.is_empty());
        assert_eq!(ages.histogram.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn breakdown_orders_average_positions_by_highest() {
        let breakdown = market_value_breakdown(&table());
        let breakdown = breakdown.ready().unwrap();

        assert_eq!(
            crate::stats::aggregate::names(&breakdown.highest.country_order),
            vec!["Brazil", "France"]
        );
        assert_eq!(
            crate::stats::aggregate::names(&breakdown.average.country_order),
            vec!["France", "Brazil"]
        );
        assert_eq!(
            breakdown.average.position_order,
            breakdown.highest.position_order
        );
        assert_eq!(breakdown.details[0].country, "Brazil");
    }

    #[test]
    fn empty_filter_result_is_not_an_error() {
        let filter = PlayerFilter::new(Selection::none(), Selection::All);
        let view = DashboardView::compute(&table(), &filter, 30, today());

        assert_eq!(view.overview.total_players, 0);
        assert_eq!(view.overview.countries_selected, 0);
        assert_eq!(view.overview.positions_selected, 2);
        assert_eq!(view.summary, AnalysisOutcome::Empty);
        assert_eq!(view.market, AnalysisOutcome::Empty);
        assert_eq!(view.ages, AnalysisOutcome::Empty);
        assert_eq!(view.positions, AnalysisOutcome::Empty);
    }

    #[test]
    fn default_filter_picks_top_countries() {
        let filter = default_filter(&table(), 1);
        assert_eq!(filter.countries, Selection::only(["Brazil"]));
        assert_eq!(filter.positions, Selection::only(["Forward", "Defender"]));

        let view = DashboardView::compute(&table(), &filter, 30, today());
        assert_eq!(view.overview.total_players, 2);
        let summary = view.summary.ready().unwrap();
        assert_eq!(summary.total, 150.0);
        assert_eq!(summary.max, Some(100.0));
    }

    #[test]
    fn outcome_map_keeps_tags() {
        let empty: AnalysisOutcome<u8> = AnalysisOutcome::Empty;
        assert_eq!(empty.map(|v| v + 1), AnalysisOutcome::Empty);
        assert_eq!(AnalysisOutcome::Ready(1).map(|v| v + 1), AnalysisOutcome::Ready(2));
    }
}
