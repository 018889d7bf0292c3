//! Run one weather collection batch over the configured city list.
//! Invoked manually or from cron; takes no arguments.

use anyhow::{Context, Result};
use weatherlog_core::Config;
use weatherlog_services::{Collector, OpenWeatherClient, WeatherStore};

#[tokio::main]
async fn main() -> Result<()> {
    weatherlog_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let api_key = config
        .api_key()
        .context("cannot start collection without an API key")?;

    let client = OpenWeatherClient::new(api_key, config.country.as_str())?;
    let store = WeatherStore::new(&config.database_path);
    let collector = Collector::new(client, store);

    tracing::info!(
        "starting weather collection for {} cities",
        config.cities.len()
    );

    let report = collector.run_batch(&config.cities).await?;

    println!(
        "Done! Collected data for {}/{} cities",
        report.succeeded, report.attempted
    );

    Ok(())
}
