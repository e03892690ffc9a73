// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    // Plain trailing averages of gains and losses (no Wilder smoothing).
    // A window with no movement at all has no defined RSI and yields NaN;
    // a window with gains but no losses yields 100.
    fn calculate(&self, prices: &[f64]) -> Vec<f64> {
        if self.period == 0 || prices.len() <= self.period {
            return vec![f64::NAN; prices.len()];
        }

        let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
        let gains: Vec<f64> = changes.iter().map(|c| c.max(0.0)).collect();
        let losses: Vec<f64> = changes.iter().map(|c| (-c).max(0.0)).collect();

        let mut results = vec![f64::NAN; self.period]; // RSI needs 'period' initial changes
        for i in self.period..prices.len() {
            let avg_gain = gains[i - self.period..i].iter().sum::<f64>() / self.period as f64;
            let avg_loss = losses[i - self.period..i].iter().sum::<f64>() / self.period as f64;

            let value = if avg_loss == 0.0 && avg_gain == 0.0 {
                f64::NAN
            } else if avg_loss == 0.0 {
                100.0 // if no losses, RSI is 100
            } else {
                let rs = avg_gain / avg_loss;
                100.0 - (100.0 / (1.0 + rs))
            };
            results.push(value);
        }
        results
    }
}
