//! Stats module - aggregation engine and descriptive statistics

pub mod aggregate;
mod calculator;

pub use aggregate::{aggregate, rank_columns, rank_rows, AggregateMatrix, Ranked, Statistic};
pub use calculator::{
    format_count, format_eur, CountryDetail, Descriptive, Histogram, PositionStats,
    StatsCalculator, ValueSummary,
};
