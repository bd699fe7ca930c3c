//! Index classification
//!
//! Two independent category families live here and must not be conflated:
//! - [`AqiCategory`]: five air quality levels, no safety flag of its own
//! - [`WaterQuality`]: four water quality levels, each carrying `safe`
//!
//! Both classifiers are total over `f64`. Values below zero land in the lowest
//! category; values above the top explicit bound land in the worst one.

use crate::error::ClearAirError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Air quality category, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AqiCategory {
    Good,
    Moderate,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Inclusive display range of a category. `max` is `None` for the open top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl AqiCategory {
    /// All categories, best first
    pub const ALL: [AqiCategory; 5] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    /// Classify an AQI value.
    ///
    /// Picks the category with the smallest upper bound the value does not
    /// exceed. NaN compares false against every bound and is treated as
    /// hazardous.
    pub fn classify(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiCategory::Good
        } else if aqi <= 100.0 {
            AqiCategory::Moderate
        } else if aqi <= 150.0 {
            AqiCategory::Unhealthy
        } else if aqi <= 200.0 {
            AqiCategory::VeryUnhealthy
        } else {
            AqiCategory::Hazardous
        }
    }

    /// Upper bound of this category, `None` for hazardous
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            AqiCategory::Good => Some(50.0),
            AqiCategory::Moderate => Some(100.0),
            AqiCategory::Unhealthy => Some(150.0),
            AqiCategory::VeryUnhealthy => Some(200.0),
            AqiCategory::Hazardous => None,
        }
    }

    /// Whether `aqi` falls inside this category's half-open interval
    /// `(previous upper bound, upper bound]`. Good is unbounded below.
    pub fn contains(&self, aqi: f64) -> bool {
        let above_lower = match self.previous() {
            Some(prev) => prev.upper_bound().is_some_and(|bound| aqi > bound),
            None => true,
        };
        let below_upper = self.upper_bound().map_or(true, |bound| aqi <= bound);
        above_lower && below_upper
    }

    /// Whole-number display range
    pub fn range(&self) -> CategoryRange {
        match self {
            AqiCategory::Good => CategoryRange { min: 0, max: Some(50) },
            AqiCategory::Moderate => CategoryRange { min: 51, max: Some(100) },
            AqiCategory::Unhealthy => CategoryRange { min: 101, max: Some(150) },
            AqiCategory::VeryUnhealthy => CategoryRange { min: 151, max: Some(200) },
            AqiCategory::Hazardous => CategoryRange { min: 201, max: None },
        }
    }

    /// Stable kebab-case identifier
    pub fn id(&self) -> &'static str {
        match self {
            AqiCategory::Good => "good",
            AqiCategory::Moderate => "moderate",
            AqiCategory::Unhealthy => "unhealthy",
            AqiCategory::VeryUnhealthy => "very-unhealthy",
            AqiCategory::Hazardous => "hazardous",
        }
    }

    /// Human-readable label shown on dashboards
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::Unhealthy => "Unhealthy for Sensitive Groups",
            AqiCategory::VeryUnhealthy => "Unhealthy",
            AqiCategory::Hazardous => "Very Unhealthy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AqiCategory::Good => {
                "Air quality is considered satisfactory, and air pollution poses little or no risk."
            }
            AqiCategory::Moderate => {
                "Air quality is acceptable; however, there may be some health concerns for a small number of people."
            }
            AqiCategory::Unhealthy => {
                "Members of sensitive groups may experience health effects. The general public is not likely to be affected."
            }
            AqiCategory::VeryUnhealthy => {
                "Everyone may begin to experience health effects; members of sensitive groups may experience more serious health effects."
            }
            AqiCategory::Hazardous => {
                "Health alert: everyone may experience more serious health effects."
            }
        }
    }

    /// Good and moderate are rendered as "safe" by consumers
    pub fn is_visually_safe(&self) -> bool {
        matches!(self, AqiCategory::Good | AqiCategory::Moderate)
    }

    fn previous(&self) -> Option<AqiCategory> {
        match self {
            AqiCategory::Good => None,
            AqiCategory::Moderate => Some(AqiCategory::Good),
            AqiCategory::Unhealthy => Some(AqiCategory::Moderate),
            AqiCategory::VeryUnhealthy => Some(AqiCategory::Unhealthy),
            AqiCategory::Hazardous => Some(AqiCategory::VeryUnhealthy),
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AqiCategory {
    type Err = ClearAirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AqiCategory::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| ClearAirError::UnknownVariant {
                field: "category",
                value: s.to_string(),
            })
    }
}

/// Classify an AQI value
pub fn classify(aqi: f64) -> AqiCategory {
    AqiCategory::classify(aqi)
}

/// Water quality level, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl WaterQuality {
    pub const ALL: [WaterQuality; 4] = [
        WaterQuality::Excellent,
        WaterQuality::Good,
        WaterQuality::Fair,
        WaterQuality::Poor,
    ];

    /// Classify a water quality index (higher is worse)
    pub fn classify(index: f64) -> Self {
        if index <= 25.0 {
            WaterQuality::Excellent
        } else if index <= 50.0 {
            WaterQuality::Good
        } else if index <= 75.0 {
            WaterQuality::Fair
        } else {
            WaterQuality::Poor
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            WaterQuality::Excellent => "Excellent",
            WaterQuality::Good => "Good",
            WaterQuality::Fair => "Fair",
            WaterQuality::Poor => "Poor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WaterQuality::Excellent => "Water quality is excellent. Suitable for all uses.",
            WaterQuality::Good => "Water quality is good. Suitable for most uses.",
            WaterQuality::Fair => {
                "Water quality is fair. Some treatment may be required for certain uses."
            }
            WaterQuality::Poor => "Water quality is poor. Avoid use without proper treatment.",
        }
    }

    /// Poor is the only unsafe level
    pub fn is_safe(&self) -> bool {
        !matches!(self, WaterQuality::Poor)
    }
}

/// Result of evaluating a water quality index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterEvaluation {
    pub quality: WaterQuality,
    pub status: String,
    pub description: String,
    pub safe: bool,
}

/// Evaluate a water quality index
pub fn evaluate_water(index: f64) -> WaterEvaluation {
    let quality = WaterQuality::classify(index);
    WaterEvaluation {
        quality,
        status: quality.status().to_string(),
        description: quality.description().to_string(),
        safe: quality.is_safe(),
    }
}

/// Individual water chemistry parameter with a fixed safe band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterParameter {
    Ph,
    Turbidity,
    DissolvedOxygen,
    Conductivity,
    Nitrates,
    EColi,
}

/// Safety status of a single water parameter reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterStatus {
    pub parameter: WaterParameter,
    pub value: f64,
    pub safe: bool,
    pub min: f64,
    pub max: f64,
}

impl WaterParameter {
    pub const ALL: [WaterParameter; 6] = [
        WaterParameter::Ph,
        WaterParameter::Turbidity,
        WaterParameter::DissolvedOxygen,
        WaterParameter::Conductivity,
        WaterParameter::Nitrates,
        WaterParameter::EColi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterParameter::Ph => "ph",
            WaterParameter::Turbidity => "turbidity",
            WaterParameter::DissolvedOxygen => "dissolved_oxygen",
            WaterParameter::Conductivity => "conductivity",
            WaterParameter::Nitrates => "nitrates",
            WaterParameter::EColi => "e_coli",
        }
    }

    /// Whether `value` lies in the parameter's safe band
    pub fn is_safe(&self, value: f64) -> bool {
        match self {
            WaterParameter::Ph => (6.5..=8.5).contains(&value),
            // NTU
            WaterParameter::Turbidity => value < 5.0,
            // mg/L
            WaterParameter::DissolvedOxygen => value > 5.0,
            // µS/cm
            WaterParameter::Conductivity => value < 800.0,
            // mg/L
            WaterParameter::Nitrates => value < 10.0,
            // CFU/100mL
            WaterParameter::EColi => value < 10.0,
        }
    }

    /// Gauge range used when displaying the parameter
    pub fn display_range(&self) -> (f64, f64) {
        match self {
            WaterParameter::Ph => (0.0, 14.0),
            WaterParameter::Turbidity => (0.0, 10.0),
            WaterParameter::DissolvedOxygen => (0.0, 15.0),
            WaterParameter::Conductivity => (0.0, 1000.0),
            WaterParameter::Nitrates => (0.0, 20.0),
            WaterParameter::EColi => (0.0, 100.0),
        }
    }

    pub fn status(&self, value: f64) -> ParameterStatus {
        let (min, max) = self.display_range();
        ParameterStatus {
            parameter: *self,
            value,
            safe: self.is_safe(value),
            min,
            max,
        }
    }

    /// Evaluate every known parameter. Missing parameters read as zero.
    pub fn evaluate_all(readings: &BTreeMap<WaterParameter, f64>) -> Vec<ParameterStatus> {
        WaterParameter::ALL
            .iter()
            .map(|p| p.status(readings.get(p).copied().unwrap_or(0.0)))
            .collect()
    }
}

impl FromStr for WaterParameter {
    type Err = ClearAirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaterParameter::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ClearAirError::UnknownVariant {
                field: "water parameter",
                value: s.to_string(),
            })
    }
}
