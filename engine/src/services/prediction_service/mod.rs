// engine/src/services/prediction_service/mod.rs
// PredictionService owns the shared store, the result cache and the settings;
// each operation lives in its own handler module.
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use shared::models::{CoinInfo, PredictionBundle, QuickSummary};

use crate::config::EngineSettings;
use crate::data::cache::PredictionCache;
use crate::data::market_data::MarketDataStore;
use crate::error::EngineError;

pub mod get_prediction;
pub mod get_quick_prediction;
pub mod helpers;
pub mod load_csv_data;

pub struct PredictionService {
    market_data_store: Arc<RwLock<MarketDataStore>>,
    cache: Arc<dyn PredictionCache>,
    settings: EngineSettings,
}

impl PredictionService {
    pub fn new(
        market_data_store: Arc<RwLock<MarketDataStore>>,
        cache: Arc<dyn PredictionCache>,
        settings: EngineSettings,
    ) -> Self {
        PredictionService { market_data_store, cache, settings }
    }

    // Millisecond precision, matching the wire format, so cached bundles compare equal.
    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }

    pub async fn load_csv_data(&self, file_path: &str, asset_id: &str) -> Result<usize, EngineError> {
        tracing::info!(asset_id = %asset_id, path = %file_path, "Received CSV load request");
        load_csv_data::handle_load_csv_data(file_path, asset_id, self.market_data_store.clone()).await
    }

    pub async fn register_coin(&self, asset_id: &str, info: CoinInfo) {
        self.market_data_store.write().await.set_coin_info(asset_id, info);
    }

    /// Cached bundle unless `refresh` is set; otherwise recomputes and caches it.
    pub async fn get_prediction(&self, asset_id: &str, refresh: bool) -> Result<PredictionBundle, EngineError> {
        tracing::info!(asset_id = %asset_id, refresh, "Received prediction request");
        get_prediction::handle_get_prediction(
            asset_id,
            refresh,
            Self::now(),
            self.market_data_store.clone(),
            self.cache.as_ref(),
            &self.settings,
        )
        .await
    }

    pub async fn get_quick_prediction(&self, asset_id: &str) -> QuickSummary {
        tracing::info!(asset_id = %asset_id, "Received quick prediction request");
        get_quick_prediction::handle_get_quick_prediction(
            asset_id,
            Self::now(),
            self.market_data_store.clone(),
            &self.settings,
        )
        .await
    }
}
