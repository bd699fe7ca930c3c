//! End-to-end checks of the public API

use chrono::{Datelike, Local, Timelike};
use clearair::forecast::ForecastSynthesizer;
use clearair::{
    classify, daily_forecast, effective_threshold, evaluate_water, health_recommendations_for,
    hourly_forecast, recommend, recommendations_for, ActivityLevel, AqiCategory, HealthCondition,
    HourlyForecastPoint, IndexReading, JsonFileProfileStore, Monitor, MonitorConfig, OutdoorHours,
    ProfileUpdate, UserProfile, WaterQuality,
};
use pretty_assertions::assert_eq;

#[test]
fn classification_boundaries() {
    let cases = [
        (50.0, AqiCategory::Good),
        (51.0, AqiCategory::Moderate),
        (100.0, AqiCategory::Moderate),
        (101.0, AqiCategory::Unhealthy),
        (150.0, AqiCategory::Unhealthy),
        (151.0, AqiCategory::VeryUnhealthy),
        (200.0, AqiCategory::VeryUnhealthy),
        (201.0, AqiCategory::Hazardous),
        (-5.0, AqiCategory::Good),
    ];
    for (value, expected) in cases {
        assert_eq!(classify(value), expected, "AQI {value}");
    }

    assert_eq!(evaluate_water(25.0).quality, WaterQuality::Excellent);
    assert_eq!(evaluate_water(26.0).status, "Good");
    assert!(evaluate_water(75.0).safe);
    assert!(!evaluate_water(76.0).safe);
}

#[test]
fn advice_tables_are_complete() {
    for category in AqiCategory::ALL {
        assert!(!recommendations_for(category).is_empty());
        for condition in HealthCondition::ALL {
            assert!(!health_recommendations_for(condition, category).is_empty());
        }
    }
}

#[test]
fn hourly_forecast_starts_now_and_wraps() {
    let before = Local::now();
    let forecast = hourly_forecast(100.0);
    let after = Local::now();

    assert_eq!(forecast.len(), 24);
    assert!(forecast.iter().all(|p| p.predicted_value >= 1));
    let first = forecast[0].hour as u32;
    assert!(first == before.hour() || first == after.hour());
    for pair in forecast.windows(2) {
        assert_eq!((pair[0].hour + 1) % 24, pair[1].hour);
    }
}

#[test]
fn daily_forecast_follows_calendar() {
    let forecast = daily_forecast(100.0);
    assert_eq!(forecast.len(), 5);
    for pair in forecast.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
    for point in &forecast {
        assert_eq!(point.day, clearair::types::weekday_name(point.date.weekday()));
        assert!(point.predicted_value >= 1);
    }
}

#[test]
fn recommend_reference_example() {
    let profile = UserProfile {
        has_sensitivities: false,
        activity_level: ActivityLevel::Moderate,
        typical_outdoor_hours: OutdoorHours::new([9, 10, 11]).unwrap(),
        health_condition: HealthCondition::None,
    };
    let forecast = vec![
        HourlyForecastPoint { hour: 9, predicted_value: 60 },
        HourlyForecastPoint { hour: 10, predicted_value: 90 },
        HourlyForecastPoint { hour: 11, predicted_value: 40 },
    ];

    assert_eq!(effective_threshold(&profile), 75);
    let rec = recommend(80.0, &forecast, &profile);
    assert_eq!(rec.recommended_hours, vec![11, 9]);
}

#[test]
fn recommend_is_repeatable_with_stubbed_randomness() {
    let profile = UserProfile::default();
    let first = ForecastSynthesizer::seeded(2024).hourly_from(65.0, 8);
    let second = ForecastSynthesizer::seeded(2024).hourly_from(65.0, 8);

    assert_eq!(recommend(65.0, &first, &profile), recommend(65.0, &second, &profile));
}

#[test]
fn monitor_persists_profile_updates() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut monitor = Monitor::new(MonitorConfig::default(), JsonFileProfileStore::in_dir(dir.path())).unwrap();
        monitor.ingest_air(IndexReading::air(55.0).unwrap()).unwrap();
        let update = ProfileUpdate {
            has_sensitivities: Some(true),
            health_condition: Some(HealthCondition::Copd),
            ..Default::default()
        };
        assert!(monitor.update_profile(&update).unwrap().is_some());
    }

    let monitor = Monitor::new(MonitorConfig::default(), JsonFileProfileStore::in_dir(dir.path())).unwrap();
    assert!(monitor.profile().has_sensitivities);
    assert_eq!(monitor.profile().health_condition, HealthCondition::Copd);
    assert_eq!(effective_threshold(monitor.profile()), 40);
}
