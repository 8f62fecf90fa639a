//! Batch analysis: load the players file, print an overview and write charts.

use anyhow::{Context, Result};
use chrono::Local;
use player_market_explorer::analysis;
use player_market_explorer::config::AppConfig;
use player_market_explorer::data::{DataLoader, LoaderError};
use player_market_explorer::{logging, report};

fn main() -> Result<()> {
    let config = AppConfig::load_default_location().context("Failed to load configuration")?;
    logging::init(config.level_filter()?).context("Failed to initialise logging")?;
    log::trace!("Config {:#?}", config);

    let data = match DataLoader::load_uncached(&config.data_path) {
        Ok(data) => data,
        Err(LoaderError::DataNotFound(path)) => {
            println!(
                "Data file not found at {}. Please ensure the data file exists in the Data directory.",
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to load player data"),
    };

    report::print_overview(&analysis::dataset_overview(&data.frame));

    let today = Local::now().date_naive();
    let batch = report::render_charts(&data.table, &config, today, config.batch_age_bins, false)
        .with_context(|| format!("Failed to prepare {}", config.output_dir.display()))?;

    for (chart, reason) in &batch.skipped {
        println!("{} not rendered: {}", chart, reason);
    }
    println!(
        "\nRendered {} charts into {} ({} skipped)",
        batch.rendered.len(),
        config.output_dir.display(),
        batch.skipped.len()
    );

    if config.open_after_render {
        report::open_rendered(&batch.rendered);
    }

    Ok(())
}
