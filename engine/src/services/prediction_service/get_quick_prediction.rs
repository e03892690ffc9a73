// Short-horizon estimates without simulation or caching
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use shared::models::QuickSummary;

use super::helpers::resolve_coin;
use crate::config::EngineSettings;
use crate::data::market_data::MarketDataStore;
use crate::data::HistoryProvider;
use crate::prediction::quick::{fallback_summary, quick_summary};

pub async fn handle_get_quick_prediction(
    asset_id: &str,
    now: DateTime<Utc>,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    settings: &EngineSettings,
) -> QuickSummary {
    let started = Instant::now();

    let (history, (coin_name, _)) = {
        let store = market_data_store.read().await;
        (store.fetch_history(asset_id), resolve_coin(&*store, asset_id, settings))
    };

    let series = match history {
        Ok(series) => series.sanitized(),
        Err(e) => {
            tracing::warn!(asset_id = %asset_id, error = %e, "Quick prediction falling back");
            return fallback_summary(now);
        }
    };
    if series.len() < settings.min_observations {
        tracing::warn!(
            asset_id = %asset_id,
            usable = series.len(),
            required = settings.min_observations,
            "Insufficient history for quick prediction"
        );
        return fallback_summary(now);
    }

    match quick_summary(&series.prices(), &coin_name, settings.quick_window, now, started) {
        Some(summary) => {
            tracing::info!(
                asset_id = %asset_id,
                elapsed_ms = summary.metadata.processing_time_ms,
                "Quick prediction computed"
            );
            summary
        }
        None => fallback_summary(now),
    }
}
