// Request-level orchestration around the forecasting core
pub mod prediction_service;

pub use prediction_service::PredictionService;
