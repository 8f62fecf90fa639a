//! Player Market Explorer - Football Player Market Value Analysis
//!
//! Loads a players CSV, filters it by country and position, aggregates market
//! values per (country, position) pair and renders the results either as PNG
//! charts (batch) or in an interactive dashboard.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
pub mod report;
pub mod stats;
