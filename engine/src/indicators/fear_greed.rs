// Composite fear/greed index
use shared::utils::clamp_or;

use super::{annualized_volatility, AnnualizationBasis};

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounded mean of three 0-100 sub-scores: 30-day volatility (calmer is greedier),
/// latest volume against its 7-day average, latest price against its 7-day average.
/// A sub-score that cannot be computed counts as neutral (50).
pub fn fear_greed_index(prices: &[f64], volumes: &[f64]) -> u32 {
    let volatility = annualized_volatility(tail(prices, 30), AnnualizationBasis::CalendarDays);

    let avg_volume = mean(tail(volumes, 7));
    let volume_change = volumes.last().map_or(f64::NAN, |v| v / avg_volume - 1.0);

    let avg_price = mean(tail(prices, 7));
    let price_change = prices.last().map_or(f64::NAN, |p| p / avg_price - 1.0);

    let volatility_score = clamp_or(50.0 - volatility * 100.0, 0.0, 100.0, 50.0);
    let volume_score = clamp_or(50.0 + volume_change * 100.0, 0.0, 100.0, 50.0);
    let price_score = clamp_or(50.0 + price_change * 100.0, 0.0, 100.0, 50.0);

    ((volatility_score + volume_score + price_score) / 3.0).round() as u32
}
