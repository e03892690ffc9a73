// Maps a calendar month onto the simulated long-horizon path
use shared::models::{MonthlyPrediction, PredictionResult, YearlyPredictions};

/// Used when the target year was never simulated.
pub fn unresolved_result(current_price: f64) -> PredictionResult {
    PredictionResult {
        price: current_price * 1.1,
        min_price: current_price * 0.9,
        max_price: current_price * 1.3,
        roi: 10.0,
        confidence: 70.0,
        sentiment: "Neutral".to_string(),
    }
}

/// Month of `year` closest to `month` (1-based). Ties keep the earlier entry.
pub fn nearest_month(yearly: &YearlyPredictions, year: i32, month: u32) -> Option<&MonthlyPrediction> {
    yearly
        .get(&year)?
        .iter()
        .min_by_key(|m| (m.month as i64 - month as i64).abs())
}

pub fn resolve_month(yearly: &YearlyPredictions, year: i32, month: u32, current_price: f64) -> PredictionResult {
    match nearest_month(yearly, year, month) {
        Some(prediction) => PredictionResult::from(prediction),
        None => {
            tracing::debug!(year, month, "no simulated month for target, using fallback");
            unresolved_result(current_price)
        }
    }
}
