//! Synthetic index forecasts
//!
//! **These forecasts are not predictions.** There is no trained model behind
//! them: each point is the current value plus a random perturbation whose sign
//! and size depend only on the hour of day (hourly) or nothing at all (daily).
//! They exist so that downstream consumers have a plausible-looking forecast
//! shape to work with, and must be labelled as simulated wherever they are
//! shown. Every payload that carries one also carries [`FORECAST_MODEL`].
//!
//! The random source is owned by each [`ForecastSynthesizer`]; nothing is
//! shared between synthesizers, so concurrent callers never observe each
//! other's draws.

use crate::types::{round_half_up, weekday_name, DailyForecastPoint, HourlyForecastPoint};
use chrono::{Datelike, Days, Local, NaiveDate, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identifier of the forecast generator, embedded in every forecast payload
pub const FORECAST_MODEL: &str = "synthetic-random-v1";

/// Number of points in an hourly forecast
pub const HOURLY_POINTS: usize = 24;

/// Number of points in a daily forecast
pub const DEFAULT_DAILY_POINTS: usize = 5;

/// Half-width of the uniform daily perturbation
const DAILY_SPREAD: f64 = 15.0;

/// Time-of-day bucket that determines the hourly perturbation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourBucket {
    /// 05:00-08:59, air tends to improve
    EarlyMorning,
    /// 11:00-14:59, heat and traffic
    Midday,
    /// 17:00-19:59
    EveningRush,
    /// 22:00-04:59
    Night,
    /// Everything else
    Other,
}

impl HourBucket {
    pub fn for_hour(hour: u8) -> Self {
        match hour {
            5..=8 => HourBucket::EarlyMorning,
            11..=14 => HourBucket::Midday,
            17..=19 => HourBucket::EveningRush,
            22..=23 | 0..=4 => HourBucket::Night,
            _ => HourBucket::Other,
        }
    }

    /// Half-open interval `[low, high)` the perturbation is drawn from
    /// (the negative buckets are the mirror image, `(-magnitude, 0]`).
    pub fn bias_bounds(&self) -> (f64, f64) {
        match self {
            HourBucket::EarlyMorning => (-10.0, 0.0),
            HourBucket::Midday => (0.0, 15.0),
            HourBucket::EveningRush => (0.0, 10.0),
            HourBucket::Night => (-8.0, 0.0),
            HourBucket::Other => (-5.0, 5.0),
        }
    }

    /// Draw a perturbation for this bucket
    pub fn perturbation<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            HourBucket::EarlyMorning => -rng.gen_range(0.0..10.0),
            HourBucket::Midday => rng.gen_range(0.0..15.0),
            HourBucket::EveningRush => rng.gen_range(0.0..10.0),
            HourBucket::Night => -rng.gen_range(0.0..8.0),
            HourBucket::Other => rng.gen_range(-5.0..5.0),
        }
    }
}

/// Generator of synthetic forecasts (see module docs)
#[derive(Debug, Clone)]
pub struct ForecastSynthesizer<R = StdRng> {
    rng: R,
}

impl ForecastSynthesizer<StdRng> {
    /// Synthesizer seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible synthesizer
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ForecastSynthesizer<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> ForecastSynthesizer<R> {
    /// Use an arbitrary random source (e.g. a stub in tests)
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// 24 hourly points starting at the current local hour
    pub fn hourly(&mut self, current_value: f64) -> Vec<HourlyForecastPoint> {
        self.hourly_from(current_value, Local::now().hour() as u8)
    }

    /// 24 hourly points starting at `start_hour` and wrapping past midnight
    pub fn hourly_from(&mut self, current_value: f64, start_hour: u8) -> Vec<HourlyForecastPoint> {
        let start = start_hour % 24;
        let forecast: Vec<_> = (0..HOURLY_POINTS as u8)
            .map(|offset| {
                let hour = (start + offset) % 24;
                let bias = HourBucket::for_hour(hour).perturbation(&mut self.rng);
                HourlyForecastPoint {
                    hour,
                    predicted_value: floor_at_one(current_value + bias),
                }
            })
            .collect();

        debug!(
            model = FORECAST_MODEL,
            current_value,
            start_hour = start,
            "Generated synthetic hourly forecast"
        );
        forecast
    }

    /// Five daily points starting today (local calendar)
    pub fn daily(&mut self, current_value: f64) -> Vec<DailyForecastPoint> {
        self.daily_from(current_value, Local::now().date_naive(), DEFAULT_DAILY_POINTS)
    }

    /// `days` daily points starting at `start`
    pub fn daily_from(
        &mut self,
        current_value: f64,
        start: NaiveDate,
        days: usize,
    ) -> Vec<DailyForecastPoint> {
        let forecast: Vec<_> = (0..days as u64)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .map(|date| {
                let bias = self.rng.gen_range(-DAILY_SPREAD..DAILY_SPREAD);
                DailyForecastPoint {
                    date,
                    day: weekday_name(date.weekday()).to_string(),
                    predicted_value: floor_at_one(current_value + bias),
                }
            })
            .collect();

        debug!(
            model = FORECAST_MODEL,
            current_value,
            start = %start,
            days = forecast.len(),
            "Generated synthetic daily forecast"
        );
        forecast
    }
}

/// Synthetic hourly forecast from the current local hour, using a fresh random source
pub fn hourly_forecast(current_value: f64) -> Vec<HourlyForecastPoint> {
    ForecastSynthesizer::with_rng(rand::thread_rng()).hourly(current_value)
}

/// Synthetic five-day forecast from today, using a fresh random source
pub fn daily_forecast(current_value: f64) -> Vec<DailyForecastPoint> {
    ForecastSynthesizer::with_rng(rand::thread_rng()).daily(current_value)
}

/// The (up to) three hours with the lowest predicted value, best first.
/// Ties keep forecast order.
pub fn best_hours(forecast: &[HourlyForecastPoint]) -> Vec<u8> {
    let mut sorted = forecast.to_vec();
    sorted.sort_by_key(|p| p.predicted_value);
    sorted.into_iter().take(3).map(|p| p.hour).collect()
}

fn floor_at_one(value: f64) -> u32 {
    if value.is_nan() {
        return 1;
    }
    round_half_up(value).clamp(1.0, u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_hour_buckets() {
        assert_eq!(HourBucket::for_hour(5), HourBucket::EarlyMorning);
        assert_eq!(HourBucket::for_hour(8), HourBucket::EarlyMorning);
        assert_eq!(HourBucket::for_hour(9), HourBucket::Other);
        assert_eq!(HourBucket::for_hour(11), HourBucket::Midday);
        assert_eq!(HourBucket::for_hour(14), HourBucket::Midday);
        assert_eq!(HourBucket::for_hour(17), HourBucket::EveningRush);
        assert_eq!(HourBucket::for_hour(20), HourBucket::Other);
        assert_eq!(HourBucket::for_hour(22), HourBucket::Night);
        assert_eq!(HourBucket::for_hour(0), HourBucket::Night);
        assert_eq!(HourBucket::for_hour(4), HourBucket::Night);
    }

    #[test]
    fn test_hourly_structure() {
        let mut synth = ForecastSynthesizer::seeded(7);
        let forecast = synth.hourly_from(100.0, 21);

        assert_eq!(forecast.len(), 24);
        for (i, point) in forecast.iter().enumerate() {
            assert_eq!(point.hour as usize, (21 + i) % 24);
            assert!(point.predicted_value >= 1);
        }
    }

    #[test]
    fn test_hourly_values_within_bucket_bounds() {
        let mut synth = ForecastSynthesizer::seeded(42);
        for _ in 0..50 {
            for point in synth.hourly_from(100.0, 0) {
                let (low, high) = HourBucket::for_hour(point.hour).bias_bounds();
                let value = point.predicted_value as f64;
                assert!(value >= (100.0 + low).floor(), "{point:?}");
                assert!(value <= (100.0 + high).ceil(), "{point:?}");
            }
        }
    }

    #[test]
    fn test_predicted_values_never_below_one() {
        let mut synth = ForecastSynthesizer::seeded(3);
        assert!(synth.hourly_from(0.0, 5).iter().all(|p| p.predicted_value >= 1));
        assert!(synth.hourly_from(-40.0, 0).iter().all(|p| p.predicted_value == 1));
    }

    #[test]
    fn test_stubbed_rng_is_deterministic() {
        // An all-zero stream draws the low end of every range.
        let mut synth = ForecastSynthesizer::with_rng(StepRng::new(0, 0));
        let forecast = synth.hourly_from(50.0, 6);

        assert_eq!(forecast[0], HourlyForecastPoint { hour: 6, predicted_value: 50 });
        let nine = forecast.iter().find(|p| p.hour == 9).unwrap();
        assert_eq!(nine.predicted_value, 45);
    }

    #[test]
    fn test_same_seed_same_forecast() {
        let a = ForecastSynthesizer::seeded(99).hourly_from(80.0, 10);
        let b = ForecastSynthesizer::seeded(99).hourly_from(80.0, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_daily_structure() {
        // 2024-01-15 is a Monday
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let forecast = ForecastSynthesizer::seeded(1).daily_from(100.0, start, 5);

        assert_eq!(forecast.len(), 5);
        let days: Vec<_> = forecast.iter().map(|p| p.day.as_str()).collect();
        assert_eq!(days, vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]);
        for pair in forecast.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for point in &forecast {
            assert!((85..=115).contains(&point.predicted_value));
        }
    }

    #[test]
    fn test_daily_wraps_week() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 19).unwrap();
        let forecast = ForecastSynthesizer::seeded(5).daily_from(60.0, start, 5);
        assert_eq!(forecast[2].day, "Sunday");
        assert_eq!(forecast[3].day, "Monday");
    }

    #[test]
    fn test_free_functions_follow_the_clock() {
        let hourly = hourly_forecast(100.0);
        assert_eq!(hourly.len(), 24);
        for pair in hourly.windows(2) {
            assert_eq!((pair[0].hour + 1) % 24, pair[1].hour);
        }
        assert_eq!(daily_forecast(100.0).len(), 5);
    }

    #[test]
    fn test_best_hours() {
        let forecast = vec![
            HourlyForecastPoint { hour: 6, predicted_value: 40 },
            HourlyForecastPoint { hour: 7, predicted_value: 30 },
            HourlyForecastPoint { hour: 8, predicted_value: 40 },
            HourlyForecastPoint { hour: 9, predicted_value: 20 },
            HourlyForecastPoint { hour: 10, predicted_value: 90 },
        ];
        assert_eq!(best_hours(&forecast), vec![9, 7, 6]);
        assert!(best_hours(&[]).is_empty());
    }
}
