//! Alert detection
//!
//! Turns successive readings into user-facing alerts: AQI threshold
//! crossings (both directions), unsafe water and a personal "alert me above N"
//! level. Delivery (toasts, notifications) is left to the caller.

use crate::category::{classify, WaterEvaluation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// AQI levels whose crossing raises an alert by default
pub const DEFAULT_CROSSING_THRESHOLDS: [u32; 5] = [50, 100, 150, 200, 300];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    AqiWorsened,
    AqiImproved,
    PersonalThreshold,
    WaterUnsafe,
}

/// A single alert ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub detail: String,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    fn new(kind: AlertKind, severity: AlertSeverity, title: String, detail: String) -> Self {
        warn!(kind = ?kind, severity = ?severity, %title, %detail, "Alert raised");
        Self {
            id: Uuid::new_v4(),
            kind,
            severity,
            title,
            detail,
            raised_at: Utc::now(),
        }
    }
}

/// Detects alert conditions between consecutive readings
#[derive(Debug, Clone)]
pub struct AlertDetector {
    crossing_thresholds: Vec<u32>,
}

impl Default for AlertDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CROSSING_THRESHOLDS.to_vec())
    }
}

impl AlertDetector {
    /// Thresholds are checked in ascending order
    pub fn new(mut crossing_thresholds: Vec<u32>) -> Self {
        crossing_thresholds.sort_unstable();
        crossing_thresholds.dedup();
        Self { crossing_thresholds }
    }

    pub fn crossing_thresholds(&self) -> &[u32] {
        &self.crossing_thresholds
    }

    /// Alert when the AQI moved across a threshold since the previous reading.
    ///
    /// Raw values are compared, so 49.6 followed by 50.0 crosses 50. Only the
    /// lowest crossed threshold is reported. Without a previous reading, or
    /// with a previous reading of zero, nothing is reported.
    pub fn check_crossing(&self, previous: Option<f64>, current: f64) -> Option<Alert> {
        let previous = previous.filter(|p| *p != 0.0)?;
        let crossed = self.crossing_thresholds.iter().map(|&t| t as f64).find(|&t| {
            (previous < t && current >= t) || (previous >= t && current < t)
        })?;

        let category = classify(current);
        let (kind, severity, verb) = if current >= crossed {
            let severity = if category.is_visually_safe() {
                AlertSeverity::Info
            } else {
                AlertSeverity::Warning
            };
            (AlertKind::AqiWorsened, severity, "worsened")
        } else {
            (AlertKind::AqiImproved, AlertSeverity::Info, "improved")
        };

        Some(Alert::new(
            kind,
            severity,
            format!("Air quality has {} to {}", verb, category.label()),
            format!("Current AQI: {current}"),
        ))
    }

    /// Alert when the water evaluation is unsafe
    pub fn check_water(&self, evaluation: &WaterEvaluation) -> Option<Alert> {
        if evaluation.safe {
            return None;
        }
        Some(Alert::new(
            AlertKind::WaterUnsafe,
            AlertSeverity::Critical,
            "Water Quality Alert".to_string(),
            format!(
                "Water quality is {}: {}",
                evaluation.status, evaluation.description
            ),
        ))
    }

    /// Alert when the AQI is strictly above the user's personal alert level
    pub fn check_personal_threshold(&self, threshold: u32, current: f64) -> Option<Alert> {
        if current <= threshold as f64 {
            return None;
        }
        Some(Alert::new(
            AlertKind::PersonalThreshold,
            AlertSeverity::Warning,
            "AQI above your alert threshold".to_string(),
            format!("Current AQI {current} exceeds your alert threshold of {threshold}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::evaluate_water;

    #[test]
    fn test_no_previous_reading_no_alert() {
        let detector = AlertDetector::default();
        assert!(detector.check_crossing(None, 180.0).is_none());
    }

    #[test]
    fn test_worsening_crossing() {
        let detector = AlertDetector::default();
        let alert = detector.check_crossing(Some(90.0), 120.0).unwrap();

        assert_eq!(alert.kind, AlertKind::AqiWorsened);
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert_eq!(alert.title, "Air quality has worsened to Unhealthy for Sensitive Groups");
        assert_eq!(alert.detail, "Current AQI: 120");
    }

    #[test]
    fn test_landing_exactly_on_threshold_counts() {
        let detector = AlertDetector::default();
        let alert = detector.check_crossing(Some(40.0), 50.0).unwrap();
        assert_eq!(alert.kind, AlertKind::AqiWorsened);
        assert_eq!(alert.severity, AlertSeverity::Info);
    }

    #[test]
    fn test_improving_crossing_reports_lowest_threshold() {
        let detector = AlertDetector::default();
        let alert = detector.check_crossing(Some(210.0), 45.0).unwrap();

        assert_eq!(alert.kind, AlertKind::AqiImproved);
        assert_eq!(alert.title, "Air quality has improved to Good");
    }

    #[test]
    fn test_fractional_values_are_not_rounded() {
        let detector = AlertDetector::default();
        let alert = detector.check_crossing(Some(49.6), 50.0).unwrap();
        assert_eq!(alert.kind, AlertKind::AqiWorsened);
        assert_eq!(alert.detail, "Current AQI: 50");

        let alert = detector.check_crossing(Some(50.0), 49.6).unwrap();
        assert_eq!(alert.kind, AlertKind::AqiImproved);
        assert_eq!(alert.detail, "Current AQI: 49.6");
    }

    #[test]
    fn test_zero_previous_reading_is_ignored() {
        let detector = AlertDetector::default();
        assert!(detector.check_crossing(Some(0.0), 160.0).is_none());
    }

    #[test]
    fn test_no_crossing_within_band() {
        let detector = AlertDetector::default();
        assert!(detector.check_crossing(Some(60.0), 95.0).is_none());
        assert!(detector.check_crossing(Some(100.0), 100.0).is_none());
    }

    #[test]
    fn test_custom_thresholds_are_sorted() {
        let detector = AlertDetector::new(vec![150, 75, 75]);
        assert_eq!(detector.crossing_thresholds(), &[75, 150]);
        assert!(detector.check_crossing(Some(60.0), 80.0).is_some());
        assert!(detector.check_crossing(Some(40.0), 49.0).is_none());
    }

    #[test]
    fn test_water_alert() {
        let detector = AlertDetector::default();
        assert!(detector.check_water(&evaluate_water(60.0)).is_none());

        let alert = detector.check_water(&evaluate_water(90.0)).unwrap();
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.title, "Water Quality Alert");
        assert!(alert.detail.starts_with("Water quality is Poor: "));
    }

    #[test]
    fn test_personal_threshold() {
        let detector = AlertDetector::default();
        assert!(detector.check_personal_threshold(100, 100.0).is_none());
        let alert = detector.check_personal_threshold(100, 101.0).unwrap();
        assert_eq!(alert.kind, AlertKind::PersonalThreshold);
    }

    #[test]
    fn test_alert_ids_are_unique() {
        let detector = AlertDetector::default();
        let a = detector.check_personal_threshold(10, 20.0).unwrap();
        let b = detector.check_personal_threshold(10, 20.0).unwrap();
        assert_ne!(a.id, b.id);
    }
}
