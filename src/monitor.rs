//! Fetch-cycle orchestration
//!
//! [`Monitor`] is the stateful entry point for a polling caller. Each fetched
//! reading goes through:
//! 1. Classification and general advice
//! 2. Synthetic hourly and daily forecasts
//! 3. Personalization against the current profile
//! 4. Alert detection against the previous reading
//!
//! The monitor does no I/O of its own apart from saving profile updates
//! through the injected store.

use crate::advice::recommendations_for;
use crate::alerts::{Alert, AlertDetector};
use crate::category::{classify, evaluate_water, AqiCategory, WaterEvaluation};
use crate::config::MonitorConfig;
use crate::error::ClearAirError;
use crate::forecast::{best_hours, ForecastSynthesizer, FORECAST_MODEL};
use crate::personalize::{derive_threshold, recommend, ThresholdDerivation};
use crate::profile::{ProfileContext, ProfileStore, ProfileUpdate, UserProfile};
use crate::types::{
    DailyForecastPoint, HourlyForecastPoint, IndexReading, PersonalizedRecommendation,
    ReadingDomain,
};
use chrono::Local;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything derived from one air quality reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirSnapshot {
    pub reading: IndexReading,
    pub category: AqiCategory,
    pub label: String,
    pub description: String,
    pub recommendations: Vec<String>,
    /// Always [`FORECAST_MODEL`]; the forecasts below are simulated
    pub forecast_model: String,
    pub hourly_forecast: Vec<HourlyForecastPoint>,
    pub daily_forecast: Vec<DailyForecastPoint>,
    pub best_hours: Vec<u8>,
    pub threshold: ThresholdDerivation,
    pub personalized: PersonalizedRecommendation,
    pub alerts: Vec<Alert>,
}

/// Everything derived from one water quality reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterSnapshot {
    pub reading: IndexReading,
    pub evaluation: WaterEvaluation,
    pub alerts: Vec<Alert>,
}

/// Stateful processor for successive readings with a persistent profile
pub struct Monitor<S: ProfileStore, R: Rng = StdRng> {
    config: MonitorConfig,
    profile: ProfileContext<S>,
    synthesizer: ForecastSynthesizer<R>,
    detector: AlertDetector,
    last_air: Option<IndexReading>,
    last_hourly: Vec<HourlyForecastPoint>,
}

impl<S: ProfileStore> Monitor<S, StdRng> {
    /// Create a monitor with an entropy-seeded forecast source
    pub fn new(config: MonitorConfig, store: S) -> Result<Self, ClearAirError> {
        Self::with_synthesizer(config, store, ForecastSynthesizer::from_entropy())
    }
}

impl<S: ProfileStore, R: Rng> Monitor<S, R> {
    /// Create a monitor with an explicit forecast synthesizer
    pub fn with_synthesizer(
        config: MonitorConfig,
        store: S,
        synthesizer: ForecastSynthesizer<R>,
    ) -> Result<Self, ClearAirError> {
        config.validate()?;
        let detector = AlertDetector::new(config.crossing_thresholds.clone());
        Ok(Self {
            config,
            profile: ProfileContext::load(store),
            synthesizer,
            detector,
            last_air: None,
            last_hourly: Vec::new(),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn profile(&self) -> &UserProfile {
        self.profile.profile()
    }

    pub fn profile_context(&self) -> &ProfileContext<S> {
        &self.profile
    }

    pub fn last_air_reading(&self) -> Option<&IndexReading> {
        self.last_air.as_ref()
    }

    /// Process a new air quality reading.
    ///
    /// Forecasts start at the current local hour and date, whatever the
    /// reading's timestamp.
    pub fn ingest_air(&mut self, reading: IndexReading) -> Result<AirSnapshot, ClearAirError> {
        if reading.domain != ReadingDomain::Air {
            return Err(ClearAirError::InvalidReading(format!(
                "expected an air reading, got {}",
                reading.domain.as_str()
            )));
        }

        let value = reading.value;
        let category = classify(value);
        let hourly = self.synthesizer.hourly(value);
        let daily = self.synthesizer.daily_from(
            value,
            Local::now().date_naive(),
            self.config.daily_forecast_days,
        );

        let profile = self.profile.profile();
        let threshold = derive_threshold(profile);
        let personalized = recommend(value, &hourly, profile);

        let mut alerts = Vec::new();
        if let Some(alert) = self
            .detector
            .check_crossing(self.last_air.map(|r| r.value), value)
        {
            alerts.push(alert);
        }
        if let Some(level) = self.config.alert_threshold {
            if let Some(alert) = self.detector.check_personal_threshold(level, value) {
                alerts.push(alert);
            }
        }

        info!(
            aqi = value,
            category = category.id(),
            recommended_hours = personalized.recommended_hours.len(),
            alerts = alerts.len(),
            "Processed air quality reading"
        );

        let snapshot = AirSnapshot {
            reading,
            category,
            label: category.label().to_string(),
            description: category.description().to_string(),
            recommendations: recommendations_for(category)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            forecast_model: FORECAST_MODEL.to_string(),
            best_hours: best_hours(&hourly),
            hourly_forecast: hourly.clone(),
            daily_forecast: daily,
            threshold,
            personalized,
            alerts,
        };

        self.last_air = Some(reading);
        self.last_hourly = hourly;
        Ok(snapshot)
    }

    /// Process a new water quality reading
    pub fn ingest_water(&mut self, reading: IndexReading) -> Result<WaterSnapshot, ClearAirError> {
        if reading.domain != ReadingDomain::Water {
            return Err(ClearAirError::InvalidReading(format!(
                "expected a water reading, got {}",
                reading.domain.as_str()
            )));
        }

        let evaluation = evaluate_water(reading.value);
        let alerts: Vec<Alert> = self.detector.check_water(&evaluation).into_iter().collect();

        info!(
            index = reading.value,
            status = %evaluation.status,
            safe = evaluation.safe,
            "Processed water quality reading"
        );

        Ok(WaterSnapshot {
            reading,
            evaluation,
            alerts,
        })
    }

    /// Merge and persist a profile update, then recompute the personalized
    /// recommendation from the last reading and forecast.
    ///
    /// Returns `Ok(None)` when no air reading has been ingested yet.
    pub fn update_profile(
        &mut self,
        update: &ProfileUpdate,
    ) -> Result<Option<PersonalizedRecommendation>, ClearAirError> {
        let profile = self.profile.update(update)?;

        let Some(reading) = self.last_air else {
            debug!("Profile updated before any reading, nothing to recompute");
            return Ok(None);
        };
        Ok(Some(recommend(reading.value, &self.last_hourly, profile)))
    }
}
