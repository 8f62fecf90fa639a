//! CSV Data Loader Module
//! Loads the players file with Polars and memoizes the result per file version.

use crate::data::table::{PlayerTable, TableError};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    DataNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read player rows: {0}")]
    TableError(#[from] TableError),
    #[error("Failed to inspect data file: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded players file.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub frame: DataFrame,
    pub table: PlayerTable,
    pub path: PathBuf,
}

/// Version stamp used to decide whether a cached load is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceStamp {
    path: PathBuf,
    modified: Option<SystemTime>,
}

/// Loads the players CSV and keeps the last result until the file changes.
pub struct DataLoader {
    cached: Option<(SourceStamp, LoadedData)>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Read a CSV file into a DataFrame using Polars.
    ///
    /// Types are inferred over the whole file, so a text cell anywhere in a
    /// numeric-looking column turns it into a text column instead of a null.
    /// Cells that do not fit the inferred type are an error.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::DataNotFound(path.to_path_buf()));
        }

        let path_str = path.to_string_lossy().to_string();
        let df = LazyCsvReader::new(&path_str)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Load without touching the cache. Logs the outcome either way.
    pub fn load_uncached(path: &Path) -> Result<LoadedData, LoaderError> {
        let result = Self::read_csv(path).and_then(|frame| {
            let table = PlayerTable::from_dataframe(&frame)?;
            Ok(LoadedData {
                frame,
                table,
                path: path.to_path_buf(),
            })
        });

        match &result {
            Ok(data) => log::info!(
                "Successfully loaded data with {} rows from {}",
                data.table.len(),
                path.display()
            ),
            Err(LoaderError::DataNotFound(missing)) => log::error!(
                "Data file not found at {}. Please ensure the data file exists.",
                missing.display()
            ),
            Err(e) => log::error!("Failed to load {}: {}", path.display(), e),
        }

        result
    }

    /// Load the file, reusing the previous result when path and
    /// modification time are unchanged.
    pub fn load(&mut self, path: &Path) -> Result<&LoadedData, LoaderError> {
        let stamp = match Self::stamp(path) {
            Ok(stamp) => stamp,
            Err(e) => {
                self.cached = None;
                return Err(e);
            }
        };

        let is_current = matches!(&self.cached, Some((cached, _)) if *cached == stamp);
        if is_current {
            log::debug!("Reusing cached data for {}", path.display());
        } else {
            self.cached = None;
            let data = Self::load_uncached(path)?;
            self.cached = Some((stamp, data));
        }

        self.cached
            .as_ref()
            .map(|(_, data)| data)
            .ok_or_else(|| LoaderError::DataNotFound(path.to_path_buf()))
    }

    fn stamp(path: &Path) -> Result<SourceStamp, LoaderError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(LoaderError::DataNotFound(path.to_path_buf())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::error!(
                    "Data file not found at {}. Please ensure the data file exists.",
                    path.display()
                );
                return Err(LoaderError::DataNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(SourceStamp {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
        })
    }

    /// Drop the cached result so the next `load` reads the file again.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Most recent successful load, if any.
    pub fn get_data(&self) -> Option<&LoadedData> {
        self.cached.as_ref().map(|(_, data)| data)
    }

    pub fn get_file_path(&self) -> Option<&Path> {
        self.cached.as_ref().map(|(stamp, _)| stamp.path.as_path())
    }

    pub fn get_row_count(&self) -> usize {
        self.get_data().map(|data| data.table.len()).unwrap_or(0)
    }
}

/// Column names with their Polars types, in frame order.
pub fn column_types(df: &DataFrame) -> Vec<(String, String)> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.dtype().to_string()))
        .collect()
}

/// Names of the numeric columns in the frame.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
            )
        })
        .map(|col| col.name().to_string())
        .collect()
}

/// Present values of a numeric column as `f64`.
pub fn numeric_values(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .ok()
        .and_then(|col| col.cast(&DataType::Float64).ok())
        .map(|col| {
            col.f64()
                .ok()
                .map(|ca| ca.into_iter().flatten().filter(|v| !v.is_nan()).collect())
                .unwrap_or_default()
        })
        .unwrap_or_default()
}
