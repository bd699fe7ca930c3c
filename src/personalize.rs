//! Personalization engine
//!
//! Derives a personal AQI threshold from the user profile, picks the best
//! outdoor hours from an hourly forecast and writes advice around them.

use crate::advice::health_recommendations_for;
use crate::category::classify;
use crate::error::ClearAirError;
use crate::profile::{ActivityLevel, HealthCondition, UserProfile};
use crate::types::{HourlyForecastPoint, PersonalizedRecommendation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cap applied to anyone with respiratory or cardiovascular sensitivities
pub const SENSITIVITY_CAP: u32 = 50;

/// Maximum number of recommended hours
pub const MAX_RECOMMENDED_HOURS: usize = 3;

/// How the effective threshold was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdDerivation {
    /// Threshold implied by the activity level alone
    pub base: u32,
    /// Sensitivity cap, if the profile has sensitivities
    pub sensitivity_cap: Option<u32>,
    /// Health-condition cap, if the profile has a condition
    pub condition_cap: Option<u32>,
    /// Minimum of all of the above
    pub effective: u32,
}

/// Threshold implied by an activity level
pub fn activity_base_threshold(level: ActivityLevel) -> u32 {
    match level {
        ActivityLevel::Low => 100,
        ActivityLevel::Moderate => 75,
        ActivityLevel::High => 50,
    }
}

/// Cap imposed by a health condition, `None` when there is no condition
pub fn condition_cap(condition: HealthCondition) -> Option<u32> {
    match condition {
        HealthCondition::Asthma | HealthCondition::Copd | HealthCondition::Bronchitis => Some(40),
        HealthCondition::HeartDisease => Some(50),
        HealthCondition::Allergy => Some(60),
        HealthCondition::None => None,
    }
}

/// Derive the threshold for a profile; the most restrictive cap wins
pub fn derive_threshold(profile: &UserProfile) -> ThresholdDerivation {
    let base = activity_base_threshold(profile.activity_level);
    let sensitivity_cap = profile.has_sensitivities.then_some(SENSITIVITY_CAP);
    let condition_cap = condition_cap(profile.health_condition);

    let effective = [Some(base), sensitivity_cap, condition_cap]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(base);

    ThresholdDerivation {
        base,
        sensitivity_cap,
        condition_cap,
        effective,
    }
}

/// Highest predicted index value the profile still accepts for outdoor activity
pub fn effective_threshold(profile: &UserProfile) -> u32 {
    derive_threshold(profile).effective
}

/// Build a personalized recommendation.
///
/// Never fails: when no hour qualifies the recommended-hours list is empty and
/// the advice explains why.
pub fn recommend(
    current_value: f64,
    hourly_forecast: &[HourlyForecastPoint],
    profile: &UserProfile,
) -> PersonalizedRecommendation {
    let threshold = derive_threshold(profile);

    let mut candidates: Vec<HourlyForecastPoint> = hourly_forecast
        .iter()
        .filter(|p| {
            profile.typical_outdoor_hours.contains(p.hour) && p.predicted_value <= threshold.effective
        })
        .copied()
        .collect();
    // Stable, so equal values keep forecast order.
    candidates.sort_by_key(|p| p.predicted_value);
    let recommended_hours: Vec<u8> = candidates
        .into_iter()
        .take(MAX_RECOMMENDED_HOURS)
        .map(|p| p.hour)
        .collect();

    debug!(
        current_value,
        base = threshold.base,
        effective_threshold = threshold.effective,
        recommended = recommended_hours.len(),
        "Computed personalized recommendation"
    );

    let personal_advice = personal_advice(&recommended_hours, profile);
    let health_recommendations = health_recommendations_for(profile.health_condition, classify(current_value))
        .iter()
        .map(|line| line.to_string())
        .collect();

    PersonalizedRecommendation {
        recommended_hours,
        personal_advice,
        health_recommendations,
    }
}

fn personal_advice(recommended_hours: &[u8], profile: &UserProfile) -> Vec<String> {
    let mut advice = Vec::new();
    let condition = profile.health_condition;

    if recommended_hours.is_empty() {
        advice.push("Today's air quality doesn't meet your health requirements.".to_string());
        advice.push("Consider indoor activities or using air purification.".to_string());

        if profile.has_sensitivities {
            advice.push(
                "For sensitive individuals, wearing a mask is recommended if you must go outside."
                    .to_string(),
            );
        }
        if !condition.is_none() {
            advice.push(format!(
                "With {}, consult your healthcare provider before planning outdoor activities today.",
                condition.display_name()
            ));
        }
    } else {
        let hours: Vec<String> = recommended_hours.iter().map(|h| format!("{h}:00")).collect();
        advice.push(format!(
            "Best hours for your outdoor activities: {}",
            hours.join(", ")
        ));

        if profile.activity_level == ActivityLevel::High {
            advice.push(
                "For high-intensity activities, consider reducing duration if AQI rises above 50."
                    .to_string(),
            );
        }
        if profile.has_sensitivities {
            advice.push("Monitor your breathing and symptoms even during recommended hours.".to_string());
        }
        if !condition.is_none() {
            advice.push(format!(
                "Because of your {}, stay alert to symptoms and keep any prescribed medication with you.",
                condition.display_name()
            ));
        }
    }

    advice
}

/// Parse an externally supplied hourly forecast, rejecting hours outside 0-23
pub fn parse_hourly_forecast(json: &str) -> Result<Vec<HourlyForecastPoint>, ClearAirError> {
    let forecast: Vec<HourlyForecastPoint> = serde_json::from_str(json)?;
    if forecast.is_empty() {
        return Err(ClearAirError::InvalidForecast("forecast has no points".to_string()));
    }
    if let Some(point) = forecast.iter().find(|p| p.hour > 23) {
        return Err(ClearAirError::InvalidForecast(format!(
            "hour {} is outside 0-23",
            point.hour
        )));
    }
    Ok(forecast)
}
