//! ClearAir - Environmental index classification and personalized recommendations
//!
//! ClearAir turns raw air and water quality readings into categorized,
//! user-specific guidance: reading → classification → synthetic forecast →
//! personalized outdoor hours and advice → alerts.
//!
//! ## Modules
//!
//! - **Classification**: AQI categories and water quality levels ([`category`])
//! - **Advice**: general and health-condition advice tables ([`advice`])
//! - **Forecasts**: simulated hourly/daily forecasts, not a predictive model ([`forecast`])
//! - **Personalization**: profile-driven thresholds and hour selection ([`personalize`])
//! - **Monitor**: stateful fetch-cycle orchestration with alerts ([`monitor`])

pub mod advice;
pub mod alerts;
pub mod category;
pub mod config;
pub mod error;
pub mod forecast;
pub mod monitor;
pub mod personalize;
pub mod profile;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use advice::{health_recommendations_for, recommendations_for};
pub use alerts::{Alert, AlertDetector, AlertKind, AlertSeverity};
pub use category::{classify, evaluate_water, AqiCategory, WaterEvaluation, WaterParameter, WaterQuality};
pub use config::MonitorConfig;
pub use error::ClearAirError;
pub use forecast::{daily_forecast, hourly_forecast, ForecastSynthesizer, FORECAST_MODEL};
pub use monitor::{AirSnapshot, Monitor, WaterSnapshot};
pub use personalize::{effective_threshold, recommend};
pub use profile::{
    ActivityLevel, HealthCondition, JsonFileProfileStore, MemoryProfileStore, OutdoorHours,
    ProfileContext, ProfileStore, ProfileUpdate, UserProfile,
};
pub use types::{
    DailyForecastPoint, HourlyForecastPoint, IndexReading, PersonalizedRecommendation,
    ReadingDomain,
};

/// ClearAir version embedded in CLI and FFI output
pub const CLEARAIR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "clearair";
