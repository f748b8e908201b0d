//! Seeds the static category reference data into the configured data
//! directory. Safe to re-run; the category document is replaced wholesale.

use configs::AppConfig;
use domains::CollectionStore;
use serde_json::Value;
use storage_adapters::JsonFileStore;
use tracing::info;

const DEFAULT_CATEGORIES: [&str; 5] = ["UI", "UX", "Enhancement", "Bug", "Feature"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    let config = AppConfig::load()?;
    let store = JsonFileStore::new(&config.data_dir);

    let seeded = store
        .apply(
            services::CATEGORIES,
            Box::new(|_| {
                Ok(DEFAULT_CATEGORIES
                    .iter()
                    .map(|category| Value::String((*category).to_string()))
                    .collect())
            }),
        )
        .await?;

    info!("seeded {} categories into {}", seeded.len(), config.data_dir);
    Ok(())
}
