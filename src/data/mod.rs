//! Data module - CSV loading, typed rows, schema capabilities and filtering

pub mod age;
mod filter;
pub mod loader;
mod schema;
mod table;

pub use filter::{PlayerFilter, Selection};
pub use loader::{DataLoader, LoadedData, LoaderError};
pub use schema::{
    Analysis, AvailableAnalyses, BIRTH_DATE_COL, COUNTRY_COL, POSITION_COL, VALUE_COL,
};
pub use table::{PlayerRecord, PlayerTable, TableError};
