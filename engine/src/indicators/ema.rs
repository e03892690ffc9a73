// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    // Seeded with the first value rather than an SMA, so every position is defined.
    fn calculate(&self, prices: &[f64]) -> Vec<f64> {
        let Some(&first) = prices.first() else {
            return Vec::new();
        };

        let k = 2.0 / (self.period as f64 + 1.0);
        let mut results = Vec::with_capacity(prices.len());
        let mut previous_ema = first;
        results.push(first);

        for price in prices.iter().skip(1) {
            previous_ema = price * k + previous_ema * (1.0 - k);
            results.push(previous_ema);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_calculation() {
        let ema = Ema::new(3); // k = 0.5
        let results = ema.calculate(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        // 10, 10.5, 11.25, 12.125, 13.0625
        assert_eq!(results, vec![10.0, 10.5, 11.25, 12.125, 13.0625]);
    }

    #[test]
    fn test_ema_empty() {
        assert!(Ema::new(9).calculate(&[]).is_empty());
    }

    #[test]
    fn test_ema_constant_series() {
        let results = Ema::new(26).calculate(&[3.0; 40]);
        assert!(results.iter().all(|v| (*v - 3.0).abs() < 1e-12));
    }
}
