// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, prices: &[f64]) -> Vec<f64> {
        if self.period == 0 || prices.len() < self.period {
            return vec![f64::NAN; prices.len()];
        }

        let mut results = vec![f64::NAN; self.period - 1]; // No SMA for initial period
        results.extend(
            prices
                .windows(self.period)
                .map(|window| window.iter().sum::<f64>() / self.period as f64),
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_f64_vec_eq(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "Vectors differ in length");
        for (i, (val_a, val_b)) in a.iter().zip(b.iter()).enumerate() {
            if val_a.is_nan() && val_b.is_nan() {
                // Both are NaN, consider them equal for this test
            } else {
                assert!((val_a - val_b).abs() < 1e-9, "Mismatch at index {}: {} != {}", i, val_a, val_b);
            }
        }
    }

    #[test]
    fn test_sma_calculation() {
        let sma = Sma::new(3);
        let results = sma.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        // expected: NaN, NaN, (1+2+3)/3=2.0, (2+3+4)/3=3.0, (3+4+5)/3=4.0
        assert_f64_vec_eq(&results, &[f64::NAN, f64::NAN, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let results = Sma::new(3).calculate(&[1.0, 2.0]);
        assert_f64_vec_eq(&results, &[f64::NAN, f64::NAN]);
    }

    #[test]
    fn test_sma_period_one() {
        // SMA(1) is just the price
        let results = Sma::new(1).calculate(&[1.0, 2.0, 3.0]);
        assert_f64_vec_eq(&results, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_sma_empty_data() {
        let results = Sma::new(3).calculate(&[]);
        assert_f64_vec_eq(&results, &[]);
    }

    #[test]
    fn test_sma_period_zero_is_undefined() {
        let results = Sma::new(0).calculate(&[1.0, 2.0]);
        assert!(results.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_sma_constant_series() {
        let prices = vec![7.25; 300];
        let results = Sma::new(50).calculate(&prices);
        assert!(results[..49].iter().all(|v| v.is_nan()));
        assert!(results[49..].iter().all(|v| (v - 7.25).abs() < 1e-9));
        assert_eq!(Sma::new(50).name(), "SMA(50)");
        assert_eq!(Sma::new(50).parameters()["period"], 50);
    }
}
