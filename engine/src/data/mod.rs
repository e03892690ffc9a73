// Data access: CSV history loading, the in-memory store and the result cache
pub mod cache;
pub mod csv_parser;
pub mod market_data;

use shared::models::{CoinInfo, PriceSeries};

use crate::error::EngineError;

/// Source of historical observations for an asset.
pub trait HistoryProvider: Send + Sync {
    fn fetch_history(&self, asset_id: &str) -> Result<PriceSeries, EngineError>;
}

/// Source of asset metadata. `None` means unknown; callers apply defaults.
pub trait MetadataProvider: Send + Sync {
    fn fetch_info(&self, asset_id: &str) -> Option<CoinInfo>;
}
