// Display path: recent history, the current price, then a noisy projection that
// follows the simulated monthly path. Nothing here feeds back into the forecasts.
use chrono::{DateTime, Datelike, Duration, Utc};
use rand::Rng;

use shared::models::{ChartPoint, PriceSeries, YearlyPredictions};

use super::resolver::nearest_month;

pub const DEFAULT_INTERVALS: usize = 40;
pub const DEFAULT_HISTORY_DAYS: i64 = 30;

const INTERPOLATION_DAYS: i64 = 10;
const TREND_CHANGE_PROBABILITY: f64 = 0.25;
const STRONG_MOVE_PROBABILITY: f64 = 0.15;
const FLOOR_RATIO: f64 = 0.5;

pub struct ChartPathBuilder<'a> {
    yearly: &'a YearlyPredictions,
    current_price: f64,
    now: DateTime<Utc>,
    intervals: usize,
    history_days: i64,
}

impl<'a> ChartPathBuilder<'a> {
    pub fn new(yearly: &'a YearlyPredictions, current_price: f64, now: DateTime<Utc>) -> Self {
        Self {
            yearly,
            current_price,
            now,
            intervals: DEFAULT_INTERVALS,
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }

    pub fn with_intervals(mut self, intervals: usize) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_history_days(mut self, days: i64) -> Self {
        self.history_days = days.max(0);
        self
    }

    /// Baseline for a projected date. The first days interpolate toward the first
    /// simulated month; later dates take the nearest simulated month of their year,
    /// or December of the last simulated year past the horizon.
    pub fn price_estimate(&self, date: DateTime<Utc>) -> f64 {
        let days_ahead = (date - self.now).num_days();

        if days_ahead <= INTERPOLATION_DAYS {
            let Some(earliest) = self
                .yearly
                .get(&self.now.year())
                .and_then(|months| months.iter().min_by_key(|m| m.month))
            else {
                return self.current_price;
            };

            let days_to_first = (earliest.month as i64 - self.now.month() as i64) * 30;
            if days_to_first <= 0 {
                return earliest.price;
            }
            let progress = days_ahead as f64 / days_to_first.max(30) as f64;
            return self.current_price + progress * (earliest.price - self.current_price);
        }

        if let Some(prediction) = nearest_month(self.yearly, date.year(), date.month()) {
            return prediction.price;
        }

        self.yearly
            .iter()
            .next_back()
            .and_then(|(_, months)| months.iter().find(|m| m.month == 12))
            .map_or(self.current_price, |december| december.price)
    }

    fn with_noise<R: Rng + ?Sized>(base: f64, days_ahead: i64, rng: &mut R) -> f64 {
        let volatility_factor = (0.02 + days_ahead as f64 / 365.0 * 0.18).min(0.2);
        // slight upward skew
        let variation = (rng.gen::<f64>() * 2.0 - 0.9) * volatility_factor;
        let strength = if rng.gen_bool(STRONG_MOVE_PROBABILITY) {
            rng.gen::<f64>() * 2.0 + 1.5
        } else {
            1.0
        };
        base * (1.0 + variation * strength)
    }

    /// `history` points inside the look-back window, the current price at `now`,
    /// then `intervals` projected points spread evenly over `horizon_days`.
    /// An empty history yields only the current point.
    pub fn build<R: Rng + ?Sized>(&self, history: &PriceSeries, horizon_days: i64, rng: &mut R) -> Vec<ChartPoint> {
        let now_point = ChartPoint { time: self.now, price: self.current_price };
        if history.is_empty() {
            return vec![now_point];
        }

        let window_start = self.now - Duration::days(self.history_days);
        let mut path: Vec<ChartPoint> = history
            .since(window_start)
            .filter(|p| p.timestamp < self.now)
            .map(|p| ChartPoint { time: p.timestamp, price: p.price })
            .collect();
        path.push(now_point);

        let max_days = horizon_days.max(1);
        let floor = self.current_price * FLOOR_RATIO;
        let mut last_price = self.current_price;
        let mut trend: f64 = 0.0;

        for i in 1..=self.intervals {
            let days_ahead = (i as f64 / self.intervals as f64 * max_days as f64).floor() as i64;
            let time = self.now + Duration::days(days_ahead);
            let baseline = self.price_estimate(time);

            if rng.gen_bool(TREND_CHANGE_PROBABILITY) {
                trend = rng.gen::<f64>() - 0.5;
            }
            let influence = (0.12 - days_ahead as f64 / max_days as f64 * 0.09).max(0.03);
            let price = Self::with_noise(baseline + last_price * trend * influence, days_ahead, rng).max(floor);

            path.push(ChartPoint { time, price });
            last_price = price;
        }
        path
    }
}
