//! Core types for ClearAir
//!
//! This module defines the data structures that flow between the classifier,
//! the forecast synthesizer and the personalization engine: raw readings,
//! forecast points and the personalized recommendation output.

use crate::error::ClearAirError;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Which index family a reading belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingDomain {
    /// Air quality index, nominally 0-500
    Air,
    /// Water quality index, nominally 0-100
    Water,
}

impl ReadingDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingDomain::Air => "air",
            ReadingDomain::Water => "water",
        }
    }
}

/// A single index measurement produced by an external data source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexReading {
    /// Index family
    pub domain: ReadingDomain,
    /// Index value (unitless)
    pub value: f64,
    /// When the data source observed the value
    pub timestamp: DateTime<Utc>,
}

impl IndexReading {
    /// Create a reading, rejecting NaN and infinite values
    pub fn new(
        domain: ReadingDomain,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ClearAirError> {
        if !value.is_finite() {
            return Err(ClearAirError::InvalidReading(format!(
                "{} index value must be finite, got {}",
                domain.as_str(),
                value
            )));
        }
        Ok(Self {
            domain,
            value,
            timestamp,
        })
    }

    /// Air reading observed now
    pub fn air(value: f64) -> Result<Self, ClearAirError> {
        Self::new(ReadingDomain::Air, value, Utc::now())
    }

    /// Water reading observed now
    pub fn water(value: f64) -> Result<Self, ClearAirError> {
        Self::new(ReadingDomain::Water, value, Utc::now())
    }
}

/// One hour of a synthetic hourly forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyForecastPoint {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Predicted index value (always >= 1)
    pub predicted_value: u32,
}

/// One day of a synthetic daily forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecastPoint {
    /// Calendar date of the forecast day
    pub date: NaiveDate,
    /// Weekday name ("Monday", ...)
    pub day: String,
    /// Predicted index value (always >= 1)
    pub predicted_value: u32,
}

/// Output of the personalization engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedRecommendation {
    /// At most three hours, best (lowest predicted value) first
    pub recommended_hours: Vec<u8>,
    /// Advice tailored to the profile and the selected hours
    pub personal_advice: Vec<String>,
    /// Advice for the profile's health condition at the current category
    pub health_recommendations: Vec<String>,
}

/// Full English weekday name
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Round to the nearest integer, with halves going toward positive infinity
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_rejects_non_finite() {
        assert!(IndexReading::air(f64::NAN).is_err());
        assert!(IndexReading::water(f64::INFINITY).is_err());
        assert!(IndexReading::air(-3.0).is_ok());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(7.49), 7.0);
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
    }

    #[test]
    fn test_reading_serialization() {
        let reading = IndexReading::air(42.0).unwrap();
        let json = serde_json::to_value(reading).unwrap();
        assert_eq!(json["domain"], "air");
        assert_eq!(json["value"], 42.0);
    }
}
