//! Diagnostic entry point: prints the record count and the most
//! recent observations. Read-only apart from schema creation.

use anyhow::Result;
use weatherlog_core::Config;
use weatherlog_services::{WeatherStore, TIMESTAMP_FORMAT};

fn main() -> Result<()> {
    weatherlog_core::init()?;

    let config = Config::load()?;
    let store = WeatherStore::new(&config.database_path);
    store.ensure_schema()?;

    let total = store.count()?;
    println!("Total records in database: {total}");

    if total > 0 {
        println!("\nMost recent records:");
        for record in store.fetch_recent(5)? {
            println!(
                "{}: {:.1}°C - {} ({})",
                record.city,
                record.temperature,
                record.description,
                record.collected_at.format(TIMESTAMP_FORMAT)
            );
        }
    }

    Ok(())
}
