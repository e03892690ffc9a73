// Engine main entry point
// Usage: engine [history.csv] [asset-id] [settings.json]
use engine::config::EngineSettings;
use engine::data::cache::InMemoryCache;
use engine::data::market_data::MarketDataStore;
use engine::services::PredictionService;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ASSET_ID: &str = "sample";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("engine=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut args = std::env::args().skip(1);
    let csv_path = args.next();
    let asset_id = args.next().unwrap_or_else(|| DEFAULT_ASSET_ID.to_string());
    let settings_path = args.next();

    info!("Starting forecast engine...");
    let settings = EngineSettings::load(settings_path.as_deref())?;

    let market_data_store = Arc::new(RwLock::new(MarketDataStore::new()));
    let service = PredictionService::new(market_data_store, Arc::new(InMemoryCache::new()), settings);

    if let Some(path) = csv_path {
        service.load_csv_data(&path, &asset_id).await?;
    } else {
        info!("No history file given, the fallback series will be used");
    }

    let bundle = service.get_prediction(&asset_id, true).await?;
    println!("{}", serde_json::to_string_pretty(&bundle)?);

    Ok(())
}
