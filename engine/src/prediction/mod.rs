// Forecasting pipeline: indicators -> short-horizon predictor or regime path -> bundle
pub mod chart;
pub mod quick;
pub mod regime;
pub mod resolver;
pub mod sentiment;
pub mod short_horizon;

pub use chart::ChartPathBuilder;
pub use regime::RegimeSimulator;
pub use resolver::resolve_month;
pub use short_horizon::{predict_short_horizon, ShortHorizonPredictor};

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use rand::Rng;

use shared::models::{HorizonPredictions, PredictionBundle, PredictionResult, PriceSeries, TechnicalSummary, YearlyPredictions};
use shared::utils::finite_or;

use crate::indicators::{annualized_volatility, compute_indicator_set, AnnualizationBasis};
use crate::models::IndicatorSet;

const MS_PER_DAY: i64 = 86_400_000;
const VOLATILITY_LOOKBACK: usize = 30;
const GREEN_DAYS_WINDOW: usize = 30;

/// Whole days from `now` to `target`, rounded toward negative infinity.
pub fn days_until(now: DateTime<Utc>, target: DateTime<Utc>) -> i64 {
    (target - now).num_milliseconds().div_euclid(MS_PER_DAY)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOptions {
    pub horizon_years: i32,
    pub short_horizon_days: i64,
    pub chart_intervals: usize,
    pub chart_history_days: i64,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            horizon_years: regime::DEFAULT_HORIZON_YEARS,
            short_horizon_days: short_horizon::SHORT_HORIZON_DAYS,
            chart_intervals: chart::DEFAULT_INTERVALS,
            chart_history_days: chart::DEFAULT_HISTORY_DAYS,
        }
    }
}

pub fn fear_greed_zone(index: u32) -> &'static str {
    match index {
        0..=24 => "Extreme Fear",
        25..=49 => "Fear",
        50..=74 => "Greed",
        _ => "Extreme Greed",
    }
}

fn green_days(prices: &[f64]) -> usize {
    let recent = &prices[prices.len().saturating_sub(GREEN_DAYS_WINDOW)..];
    recent.windows(2).filter(|w| w[1] > w[0]).count()
}

/// All forecasts for one asset at one instant. Indicators are computed once
/// and shared by every horizon.
pub struct Forecaster {
    series: PriceSeries,
    prices: Vec<f64>,
    volumes: Vec<f64>,
    current_price: f64,
    market_cap: f64,
    now: DateTime<Utc>,
    options: ForecastOptions,
    indicators: IndicatorSet,
}

impl Forecaster {
    /// `None` for an empty series. The series is expected to be sanitized already.
    pub fn new(series: PriceSeries, market_cap: f64, now: DateTime<Utc>, options: ForecastOptions) -> Option<Self> {
        let current_price = series.last_price()?;
        let prices = series.prices();
        let volumes = series.volumes();
        let indicators = compute_indicator_set(&prices, &volumes);

        Some(Self {
            series,
            prices,
            volumes,
            current_price,
            market_cap,
            now,
            options,
            indicators,
        })
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Trading-day volatility of the last 30 observations, 0 when unmeasurable.
    pub fn historical_volatility(&self) -> f64 {
        let recent = &self.prices[self.prices.len().saturating_sub(VOLATILITY_LOOKBACK)..];
        finite_or(annualized_volatility(recent, AnnualizationBasis::TradingDays), 0.0)
    }

    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> YearlyPredictions {
        RegimeSimulator::new(self.current_price, self.historical_volatility(), self.market_cap)
            .with_horizon_years(self.options.horizon_years)
            .simulate(self.now, rng)
    }

    /// Short targets use the indicator-driven predictor; anything further out is
    /// read off the simulated path so tables and charts agree.
    pub fn forecast(&self, target: DateTime<Utc>, yearly: &YearlyPredictions) -> PredictionResult {
        let days = days_until(self.now, target);
        if days < self.options.short_horizon_days {
            if self.prices.len() < 2 || self.volumes.len() < 2 {
                return short_horizon::insufficient_data_result(self.current_price);
            }
            ShortHorizonPredictor::with_indicators(&self.prices, &self.volumes, self.current_price, self.indicators.clone())
                .predict(days)
        } else {
            resolve_month(yearly, target.year(), target.month(), self.current_price)
        }
    }

    pub fn technical_summary(&self) -> TechnicalSummary {
        let sma50 = finite_or(self.indicators.sma50, 0.0);
        let sma200 = finite_or(self.indicators.sma200, 0.0);
        let rsi14 = self.indicators.rsi_or_neutral();
        let green = green_days(&self.prices);
        let fear_greed = self.indicators.fear_greed_index;

        TechnicalSummary {
            sma50,
            sma200,
            rsi14,
            fear_greed_index: fear_greed,
            fear_greed_zone: fear_greed_zone(fear_greed).to_string(),
            green_days: format!("{}/30 ({}%)", green, (green as f64 / 30.0 * 100.0).round()),
            is_profitable: rsi14 > 50.0 && sma50 > sma200 && green > 15,
        }
    }

    fn months_ahead(&self, months: u32) -> DateTime<Utc> {
        self.now
            .checked_add_months(Months::new(months))
            .unwrap_or_else(|| self.now + Duration::days(30 * months as i64))
    }

    pub fn bundle<R: Rng + ?Sized>(&self, rng: &mut R) -> PredictionBundle {
        let yearly = self.simulate(rng);
        let one_year = self.months_ahead(12);

        let predictions = HorizonPredictions {
            three_day: self.forecast(self.now + Duration::days(3), &yearly),
            five_day: self.forecast(self.now + Duration::days(5), &yearly),
            one_month: self.forecast(self.months_ahead(1), &yearly),
            three_month: self.forecast(self.months_ahead(3), &yearly),
            six_month: self.forecast(self.months_ahead(6), &yearly),
            one_year: self.forecast(one_year, &yearly),
        };

        let chart_data = ChartPathBuilder::new(&yearly, self.current_price, self.now)
            .with_intervals(self.options.chart_intervals)
            .with_history_days(self.options.chart_history_days)
            .build(&self.series, days_until(self.now, one_year), rng);

        PredictionBundle {
            current_price: self.current_price,
            predictions,
            yearly_predictions: yearly,
            technical_indicators: self.technical_summary(),
            chart_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::models::{MarketPhase, PricePoint};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    // 100 daily points rising linearly from 100 to 110, ending at `now`.
    fn rising_series() -> PriceSeries {
        PriceSeries::new(
            (0..100)
                .map(|i| PricePoint {
                    timestamp: now() - Duration::days(99 - i),
                    price: 100.0 + 10.0 * i as f64 / 99.0,
                    volume: 1e6,
                })
                .collect(),
        )
    }

    fn forecaster(series: PriceSeries) -> Forecaster {
        Forecaster::new(series, 1e9, now(), ForecastOptions::default()).unwrap()
    }

    #[test]
    fn test_days_until_floors() {
        assert_eq!(days_until(now(), now() + Duration::hours(47)), 1);
        assert_eq!(days_until(now(), now() + Duration::days(5)), 5);
        assert_eq!(days_until(now(), now() - Duration::hours(1)), -1);
    }

    #[test]
    fn test_fear_greed_zones() {
        assert_eq!(fear_greed_zone(0), "Extreme Fear");
        assert_eq!(fear_greed_zone(24), "Extreme Fear");
        assert_eq!(fear_greed_zone(49), "Fear");
        assert_eq!(fear_greed_zone(74), "Greed");
        assert_eq!(fear_greed_zone(75), "Extreme Greed");
    }

    #[test]
    fn test_empty_series_has_no_forecaster() {
        assert!(Forecaster::new(PriceSeries::default(), 1e9, now(), ForecastOptions::default()).is_none());
    }

    #[test]
    fn test_five_day_target_uses_short_horizon() {
        let forecaster = forecaster(rising_series());
        assert!((forecaster.current_price() - 110.0).abs() < 1e-9);

        let yearly = YearlyPredictions::new();
        let result = forecaster.forecast(now() + Duration::days(5), &yearly);
        assert!(result.roi > 0.0);
        assert!(result.confidence >= 50.0 && result.confidence <= 100.0);
    }

    #[test]
    fn test_long_target_reads_simulated_path() {
        let forecaster = forecaster(rising_series());
        let mut rng = StdRng::seed_from_u64(21);
        let yearly = forecaster.simulate(&mut rng);

        // Near-zero volatility opens the path in recovery.
        assert!(yearly[&2025][..3].iter().all(|m| m.market_phase == MarketPhase::Recovery));

        let target = now() + Duration::days(400);
        let result = forecaster.forecast(target, &yearly);
        let expected = yearly[&target.year()].iter().find(|m| m.month == target.month()).unwrap();
        assert_eq!(result, PredictionResult::from(expected));

        // 400 days from March 2025 lands in April 2026, the 14th simulated month.
        let months: Vec<_> = yearly.values().flatten().collect();
        assert_eq!((months[13].year, months[13].month), (2026, 4));
    }

    #[test]
    fn test_technical_summary() {
        let summary = forecaster(rising_series()).technical_summary();
        assert!((summary.sma50 - (100.0 + 10.0 * 74.5 / 99.0)).abs() < 1e-9);
        assert_eq!(summary.sma200, 0.0);
        assert_eq!(summary.rsi14, 100.0);
        assert_eq!(summary.green_days, "29/30 (97%)");
        assert!(summary.is_profitable);
    }

    #[test]
    fn test_single_point_summary_defaults() {
        let series = PriceSeries::new(vec![PricePoint { timestamp: now(), price: 5.0, volume: 0.0 }]);
        let forecaster = forecaster(series);
        let summary = forecaster.technical_summary();
        assert_eq!(summary.sma50, 0.0);
        assert_eq!(summary.rsi14, 50.0);
        assert_eq!(summary.green_days, "0/30 (0%)");
        assert!(!summary.is_profitable);

        let result = forecaster.forecast(now() + Duration::days(3), &YearlyPredictions::new());
        assert_eq!(result, short_horizon::insufficient_data_result(5.0));
    }

    #[test]
    fn test_bundle_consistency() {
        let forecaster = forecaster(rising_series());
        let mut rng = StdRng::seed_from_u64(4);
        let bundle = forecaster.bundle(&mut rng);

        assert_eq!(bundle.current_price, forecaster.current_price());
        assert_eq!(bundle.yearly_predictions.len(), 31);

        let one_year = &bundle.yearly_predictions[&2026][2];
        assert_eq!(one_year.month, 3);
        assert_eq!(bundle.predictions.one_year, PredictionResult::from(one_year));
        let one_month = &bundle.yearly_predictions[&2025][1];
        assert_eq!(bundle.predictions.one_month, PredictionResult::from(one_month));

        // 30 days of history, the current point, 40 projections
        assert_eq!(bundle.chart_data.len(), 71);
        assert!(bundle.chart_data.iter().all(|p| p.price >= forecaster.current_price() * 0.5 || p.time < now()));
    }

    #[test]
    fn test_confidence_bounded_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..10_000 {
            let scale = 10f64.powf(rng.gen_range(-8.0..12.0));
            let len = rng.gen_range(2..60);
            let series = PriceSeries::new(
                (0..len)
                    .map(|i| PricePoint {
                        timestamp: now() - Duration::days(len - i),
                        price: scale * rng.gen_range(0.5..1.5),
                        volume: rng.gen_range(0.0..1e9),
                    })
                    .collect(),
            );
            let forecaster = Forecaster::new(series, 10f64.powf(rng.gen_range(5.0..13.0)), now(), ForecastOptions::default())
                .unwrap();
            let yearly = forecaster.simulate(&mut rng);
            let target = now() + Duration::days(rng.gen_range(1..=10_950));

            let result = forecaster.forecast(target, &yearly);
            assert!(result.confidence >= 0.0 && result.confidence <= 100.0, "{:?}", result);
            assert!(result.price.is_finite() && result.price > 0.0, "{:?}", result);
        }
    }

    #[test]
    fn test_bundle_serializes_camel_case() {
        let mut rng = StdRng::seed_from_u64(1);
        let bundle = forecaster(rising_series()).bundle(&mut rng);
        let json = serde_json::to_value(&bundle).unwrap();

        assert!(json["predictions"]["threeDay"]["minPrice"].is_number());
        assert!(json["technicalIndicators"]["fearGreedZone"].is_string());
        assert!(json["yearlyPredictions"]["2025"][0]["marketPhase"].is_string());
        assert!(json["chartData"][0]["time"].is_i64());
    }
}
