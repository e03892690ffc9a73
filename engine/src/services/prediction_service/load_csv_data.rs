// Loads a CSV history file into the market data store
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::csv_parser::HistoryCsvParser;
use crate::data::market_data::MarketDataStore;
use crate::error::EngineError;

/// Returns the number of rows read from the file.
pub async fn handle_load_csv_data(
    file_path: &str,
    asset_id: &str,
    market_data_store: Arc<RwLock<MarketDataStore>>,
) -> Result<usize, EngineError> {
    let path = file_path.to_string();
    let series = tokio::task::spawn_blocking(move || HistoryCsvParser::load_series(path))
        .await
        .map_err(|e| EngineError::ProcessingError(format!("CSV loading task failed: {}", e)))?
        .map_err(EngineError::from_loader)?;

    let loaded = series.len();
    let mut store = market_data_store.write().await;
    let stored = store.add_points(asset_id, series.points);

    tracing::info!(asset_id = %asset_id, path = %file_path, loaded, stored, "Loaded CSV history");
    Ok(loaded)
}
