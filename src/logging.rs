//! Terminal logger setup shared by both binaries.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Install the terminal logger, showing only this crate's records.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let config = ConfigBuilder::new()
        .add_filter_allow_str("player_market_explorer")
        .add_filter_allow_str("player_analysis")
        .build();

    TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}
