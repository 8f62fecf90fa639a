//! Player Table Module
//! Typed rows extracted from the loaded DataFrame.

use crate::data::schema::{
    AvailableAnalyses, BIRTH_DATE_COL, COUNTRY_COL, POSITION_COL, VALUE_COL,
};
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Non-numeric market value '{value}' in row {row}")]
    NonNumericValue { row: usize, value: String },
    #[error("Column '{column}' has unsupported type {dtype}")]
    UnsupportedType { column: String, dtype: String },
}

/// A single player row. Absent cells stay `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerRecord {
    pub country_of_birth: Option<String>,
    pub position: Option<String>,
    pub market_value_in_eur: Option<f64>,
    pub date_of_birth: Option<String>,
}

impl PlayerRecord {
    pub fn new(country: &str, position: &str, market_value: f64) -> Self {
        Self {
            country_of_birth: Some(country.to_string()),
            position: Some(position.to_string()),
            market_value_in_eur: Some(market_value),
            date_of_birth: None,
        }
    }

    pub fn with_birth_date(mut self, date_of_birth: &str) -> Self {
        self.date_of_birth = Some(date_of_birth.to_string());
        self
    }

    /// Market value if it is usable for statistics.
    pub fn value(&self) -> Option<f64> {
        self.market_value_in_eur.filter(|v| !v.is_nan())
    }
}

/// Ordered player rows plus the schema capabilities of their source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerTable {
    records: Vec<PlayerRecord>,
    available: AvailableAnalyses,
}

impl PlayerTable {
    pub fn new(records: Vec<PlayerRecord>, available: AvailableAnalyses) -> Self {
        Self { records, available }
    }

    /// Build a table that claims the full player schema.
    pub fn from_records(records: Vec<PlayerRecord>) -> Self {
        let available = AvailableAnalyses::from_columns([
            COUNTRY_COL,
            POSITION_COL,
            VALUE_COL,
            BIRTH_DATE_COL,
        ]);
        Self { records, available }
    }

    /// Convert a loaded DataFrame into typed records.
    ///
    /// Absent columns yield `None` cells. A market value cell that holds text
    /// which does not parse as a number is reported, not dropped.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, TableError> {
        let available = AvailableAnalyses::from_columns(
            df.get_column_names().iter().map(|s| s.to_string()),
        );

        let countries = Self::text_column(df, COUNTRY_COL)?;
        let positions = Self::text_column(df, POSITION_COL)?;
        let birth_dates = Self::text_column(df, BIRTH_DATE_COL)?;
        let values = Self::value_column(df)?;

        let records = countries
            .into_iter()
            .zip(positions)
            .zip(values)
            .zip(birth_dates)
            .map(
                |(((country_of_birth, position), market_value_in_eur), date_of_birth)| {
                    PlayerRecord {
                        country_of_birth,
                        position,
                        market_value_in_eur,
                        date_of_birth,
                    }
                },
            )
            .collect();

        Ok(Self { records, available })
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, TableError> {
        let Ok(column) = df.column(name) else {
            return Ok(vec![None; df.height()]);
        };

        let as_text = column.cast(&DataType::String)?;
        let ca = as_text.str()?;
        Ok(ca
            .into_iter()
            .map(|v| {
                v.map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect())
    }

    fn value_column(df: &DataFrame) -> Result<Vec<Option<f64>>, TableError> {
        let Ok(column) = df.column(VALUE_COL) else {
            return Ok(vec![None; df.height()]);
        };

        match column.dtype() {
            DataType::String => {
                let ca = column.str()?;
                ca.into_iter()
                    .enumerate()
                    .map(|(row, cell)| match cell.map(str::trim) {
                        None | Some("") => Ok(None),
                        Some(text) => text
                            .parse::<f64>()
                            .map(|v| Some(v).filter(|v| !v.is_nan()))
                            .map_err(|_| TableError::NonNumericValue {
                                row,
                                value: text.to_string(),
                            }),
                    })
                    .collect()
            }
            DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => {
                let value_f64 = column.cast(&DataType::Float64)?;
                let value_ca = value_f64.f64()?;
                Ok(value_ca
                    .into_iter()
                    .map(|v| v.filter(|v| !v.is_nan()))
                    .collect())
            }
            DataType::Null => Ok(vec![None; df.height()]),
            other => Err(TableError::UnsupportedType {
                column: VALUE_COL.to_string(),
                dtype: other.to_string(),
            }),
        }
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn available(&self) -> &AvailableAnalyses {
        &self.available
    }

    /// Present market values, in row order.
    pub fn market_values(&self) -> Vec<f64> {
        self.records.iter().filter_map(PlayerRecord::value).collect()
    }

    /// Distinct countries in first-encounter order.
    pub fn countries(&self) -> Vec<String> {
        Self::distinct(self.records.iter().filter_map(|r| r.country_of_birth.as_deref()))
    }

    /// Distinct positions in first-encounter order.
    pub fn positions(&self) -> Vec<String> {
        Self::distinct(self.records.iter().filter_map(|r| r.position.as_deref()))
    }

    fn distinct<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        keys.filter(|key| seen.insert(*key))
            .map(str::to_string)
            .collect()
    }
}

impl FromIterator<PlayerRecord> for PlayerTable {
    fn from_iter<T: IntoIterator<Item = PlayerRecord>>(iter: T) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}
