//! ClearAir CLI - Command-line interface for ClearAir
//!
//! Commands:
//! - classify: Categorize an AQI value and print advice
//! - water: Evaluate a water quality index and chemistry parameters
//! - forecast: Print a simulated hourly or daily forecast
//! - recommend: Personalized outdoor hours for the stored profile
//! - profile: Show or update the stored profile
//! - doctor: Diagnose configuration and profile store

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clearair::category::{CategoryRange, ParameterStatus};
use clearair::forecast::{ForecastSynthesizer, FORECAST_MODEL};
use clearair::personalize::{derive_threshold, parse_hourly_forecast, ThresholdDerivation};
use clearair::{
    classify, evaluate_water, health_recommendations_for, recommend, recommendations_for,
    ActivityLevel, AqiCategory, ClearAirError, HealthCondition, JsonFileProfileStore,
    MonitorConfig, OutdoorHours, PersonalizedRecommendation, ProfileContext, ProfileStore,
    ProfileUpdate, WaterEvaluation, WaterParameter, CLEARAIR_VERSION, PRODUCER_NAME,
};

/// Default directory for the stored profile when neither flag nor config sets one
const DEFAULT_PROFILE_DIR: &str = ".clearair";

/// ClearAir - Air and water quality guidance
#[derive(Parser)]
#[command(name = "clearair")]
#[command(version = CLEARAIR_VERSION)]
#[command(about = "Classify air and water quality and plan outdoor activity", long_about = None)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "json-pretty")]
    format: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize an AQI value
    Classify {
        /// AQI value
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Also print advice for this health condition
        #[arg(long)]
        condition: Option<String>,
    },

    /// Evaluate a water quality index
    Water {
        /// Water quality index (0-100, higher is worse)
        #[arg(allow_negative_numbers = true)]
        index: f64,

        /// Chemistry parameter reading, e.g. --param ph=7.2 (repeatable).
        /// When any is given, all parameters are checked and missing ones read as 0.
        #[arg(long = "param")]
        params: Vec<String>,
    },

    /// Print a simulated forecast derived from the current value
    Forecast {
        /// Current AQI value
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Daily instead of hourly forecast
        #[arg(long)]
        daily: bool,

        /// Seed for a reproducible forecast
        #[arg(long)]
        seed: Option<u64>,

        /// First forecast hour (defaults to the current local hour)
        #[arg(long)]
        start_hour: Option<u8>,
    },

    /// Personalized outdoor hours and advice for the stored profile
    Recommend {
        /// Current AQI value
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Directory holding the stored profile
        #[arg(long)]
        profile_dir: Option<PathBuf>,

        /// Hourly forecast file (JSON array); simulated when omitted
        #[arg(long)]
        forecast: Option<PathBuf>,

        /// Seed for a reproducible simulated forecast
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show or update the stored profile
    Profile {
        /// Directory holding the stored profile
        #[arg(long, global = true)]
        profile_dir: Option<PathBuf>,

        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Diagnose configuration and profile store
    Doctor {
        /// Directory holding the stored profile
        #[arg(long)]
        profile_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the stored profile (or defaults)
    Show,

    /// Merge the given fields into the stored profile
    Set {
        /// Respiratory or cardiovascular sensitivities
        #[arg(long)]
        sensitivities: Option<bool>,

        /// Activity level: low, moderate, high
        #[arg(long)]
        activity: Option<String>,

        /// Typical outdoor hours, comma separated (e.g. 7,8,17)
        #[arg(long)]
        hours: Option<String>,

        /// Health condition: asthma, bronchitis, copd, heart-disease, allergy, none
        #[arg(long)]
        condition: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Human-readable text
    Text,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clearair=info".into());

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn run(cli: Cli) -> Result<(), ClearAirCliError> {
    // doctor reports a broken config instead of failing on it
    let config = match (&cli.config, &cli.command) {
        (Some(path), Commands::Doctor { .. }) => MonitorConfig::load(path).unwrap_or_default(),
        (Some(path), _) => MonitorConfig::load(path)?,
        (None, _) => MonitorConfig::default(),
    };
    debug!(?config, "Loaded configuration");
    let format = cli.format;

    match cli.command {
        Commands::Classify { value, condition } => cmd_classify(value, condition.as_deref(), &format),

        Commands::Water { index, params } => cmd_water(index, &params, &format),

        Commands::Forecast {
            value,
            daily,
            seed,
            start_hour,
        } => cmd_forecast(value, daily, seed, start_hour, &config, &format),

        Commands::Recommend {
            value,
            profile_dir,
            forecast,
            seed,
        } => {
            let dir = resolve_profile_dir(profile_dir, &config);
            cmd_recommend(value, &dir, forecast.as_deref(), seed, &format)
        }

        Commands::Profile { profile_dir, action } => {
            let dir = resolve_profile_dir(profile_dir, &config);
            cmd_profile(&dir, action, &format)
        }

        Commands::Doctor { profile_dir } => {
            let dir = resolve_profile_dir(profile_dir, &config);
            cmd_doctor(cli.config.as_deref(), &dir, &format)
        }
    }
}

fn resolve_profile_dir(flag: Option<PathBuf>, config: &MonitorConfig) -> PathBuf {
    flag.or_else(|| config.profile_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_DIR))
}

fn cmd_classify(
    value: f64,
    condition: Option<&str>,
    format: &OutputFormat,
) -> Result<(), ClearAirCliError> {
    let condition = condition.map(str::parse::<HealthCondition>).transpose()?;
    let category = classify(value);

    let report = ClassifyReport {
        value,
        category,
        label: category.label(),
        description: category.description(),
        range: category.range(),
        visually_safe: category.is_visually_safe(),
        recommendations: recommendations_for(category),
        condition,
        health_recommendations: condition.map(|c| health_recommendations_for(c, category)),
    };

    emit(format, &report, || {
        let mut lines = vec![
            format!("AQI {}: {} ({})", report.value, report.label, report.category),
            report.description.to_string(),
            String::new(),
            "Recommendations:".to_string(),
        ];
        lines.extend(report.recommendations.iter().map(|r| format!("  - {r}")));
        if let (Some(condition), Some(advice)) = (report.condition, report.health_recommendations) {
            lines.push(String::new());
            lines.push(format!("For {}:", condition.display_name()));
            lines.extend(advice.iter().map(|r| format!("  - {r}")));
        }
        lines.join("\n")
    })
}

fn cmd_water(index: f64, params: &[String], format: &OutputFormat) -> Result<(), ClearAirCliError> {
    let report = WaterReport {
        index,
        evaluation: evaluate_water(index),
        parameters: parameter_statuses(params)?,
    };

    emit(format, &report, || {
        let mut lines = vec![
            format!(
                "Water index {}: {} ({})",
                report.index,
                report.evaluation.status,
                if report.evaluation.safe { "safe" } else { "UNSAFE" }
            ),
            report.evaluation.description.clone(),
        ];
        for p in &report.parameters {
            lines.push(format!(
                "  {:<17} {:>8.2}  [{}]",
                p.parameter.as_str(),
                p.value,
                if p.safe { "OK" } else { "UNSAFE" }
            ));
        }
        lines.join("\n")
    })
}

/// Parse `name=value` pairs and check every parameter; none given means none checked
fn parameter_statuses(params: &[String]) -> Result<Vec<ParameterStatus>, ClearAirCliError> {
    if params.is_empty() {
        return Ok(Vec::new());
    }

    let mut readings = BTreeMap::new();
    for param in params {
        let (name, value) = param
            .split_once('=')
            .ok_or_else(|| ClearAirCliError::Usage(format!("expected name=value, got '{param}'")))?;
        let parameter: WaterParameter = name.trim().parse()?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| ClearAirCliError::Usage(format!("invalid number for {name}: '{value}'")))?;
        readings.insert(parameter, value);
    }
    Ok(WaterParameter::evaluate_all(&readings))
}

fn cmd_forecast(
    value: f64,
    daily: bool,
    seed: Option<u64>,
    start_hour: Option<u8>,
    config: &MonitorConfig,
    format: &OutputFormat,
) -> Result<(), ClearAirCliError> {
    if let Some(hour) = start_hour {
        if hour > 23 {
            return Err(ClearAirError::InvalidHour(hour).into());
        }
    }
    let mut synth = synthesizer(seed);

    if daily {
        let forecast = synth.daily_from(
            value,
            chrono::Local::now().date_naive(),
            config.daily_forecast_days,
        );
        let report = ForecastReport {
            model: FORECAST_MODEL,
            simulated: true,
            points: forecast,
        };
        emit(format, &report, || {
            let mut lines = vec![format!("Simulated daily forecast ({})", report.model)];
            lines.extend(report.points.iter().map(|p| {
                format!("  {:<9} {}  {}", p.day, p.date, p.predicted_value)
            }));
            lines.join("\n")
        })
    } else {
        let forecast = match start_hour {
            Some(hour) => synth.hourly_from(value, hour),
            None => synth.hourly(value),
        };
        let report = ForecastReport {
            model: FORECAST_MODEL,
            simulated: true,
            points: forecast,
        };
        emit(format, &report, || {
            let mut lines = vec![format!("Simulated hourly forecast ({})", report.model)];
            lines.extend(
                report
                    .points
                    .iter()
                    .map(|p| format!("  {:>2}:00  {}", p.hour, p.predicted_value)),
            );
            lines.join("\n")
        })
    }
}

fn cmd_recommend(
    value: f64,
    profile_dir: &Path,
    forecast_path: Option<&Path>,
    seed: Option<u64>,
    format: &OutputFormat,
) -> Result<(), ClearAirCliError> {
    let context = ProfileContext::load(JsonFileProfileStore::in_dir(profile_dir));
    let profile = context.profile();

    let (forecast, simulated) = match forecast_path {
        Some(path) => (parse_hourly_forecast(&fs::read_to_string(path)?)?, false),
        None => (synthesizer(seed).hourly(value), true),
    };

    let report = RecommendReport {
        value,
        category: classify(value),
        threshold: derive_threshold(profile),
        forecast_simulated: simulated,
        recommendation: recommend(value, &forecast, profile),
    };

    emit(format, &report, || {
        let mut lines = vec![format!(
            "AQI {} ({}), your threshold: {}",
            report.value,
            report.category.label(),
            report.threshold.effective
        )];
        lines.extend(report.recommendation.personal_advice.iter().cloned());
        lines.push(String::new());
        lines.push("Health recommendations:".to_string());
        lines.extend(
            report
                .recommendation
                .health_recommendations
                .iter()
                .map(|r| format!("  - {r}")),
        );
        lines.join("\n")
    })
}

fn cmd_profile(
    profile_dir: &Path,
    action: ProfileAction,
    format: &OutputFormat,
) -> Result<(), ClearAirCliError> {
    let mut context = ProfileContext::load(JsonFileProfileStore::in_dir(profile_dir));

    if let ProfileAction::Set {
        sensitivities,
        activity,
        hours,
        condition,
    } = action
    {
        let update = ProfileUpdate {
            has_sensitivities: sensitivities,
            activity_level: activity.as_deref().map(str::parse::<ActivityLevel>).transpose()?,
            typical_outdoor_hours: hours.as_deref().map(parse_hours).transpose()?,
            health_condition: condition.as_deref().map(str::parse::<HealthCondition>).transpose()?,
        };
        if update.is_empty() {
            return Err(ClearAirCliError::Usage(
                "profile set needs at least one field to change".to_string(),
            ));
        }
        context.update(&update)?;
    }

    let profile = context.profile();
    emit(format, profile, || {
        let hours: Vec<String> = profile.typical_outdoor_hours.iter().map(|h| h.to_string()).collect();
        [
            format!("Sensitivities:    {}", profile.has_sensitivities),
            format!("Activity level:   {}", profile.activity_level.as_str()),
            format!("Outdoor hours:    {}", hours.join(", ")),
            format!("Health condition: {}", profile.health_condition),
        ]
        .join("\n")
    })
}

fn parse_hours(raw: &str) -> Result<OutdoorHours, ClearAirCliError> {
    let hours = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .map_err(|_| ClearAirCliError::Usage(format!("invalid hour '{s}'")))
        })
        .collect::<Result<Vec<u8>, _>>()?;
    Ok(OutdoorHours::new(hours)?)
}

fn cmd_doctor(
    config_path: Option<&Path>,
    profile_dir: &Path,
    format: &OutputFormat,
) -> Result<(), ClearAirCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "clearair_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("ClearAir version {}", CLEARAIR_VERSION),
    });

    checks.push(DoctorCheck {
        name: "forecast_model".to_string(),
        status: CheckStatus::Warning,
        message: format!("Forecasts are simulated ({}), not predictions", FORECAST_MODEL),
    });

    if let Some(path) = config_path {
        checks.push(match MonitorConfig::load(path) {
            Ok(_) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!("Configuration {} is valid", path.display()),
            },
            Err(e) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid configuration: {}", e),
            },
        });
    }

    let store = JsonFileProfileStore::in_dir(profile_dir);
    checks.push(match store.load() {
        Ok(Some(profile)) => DoctorCheck {
            name: "profile".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Stored profile at {} (threshold {})",
                store.path().display(),
                derive_threshold(&profile).effective
            ),
        },
        Ok(None) => DoctorCheck {
            name: "profile".to_string(),
            status: CheckStatus::Warning,
            message: format!("No stored profile at {}, defaults will be used", store.path().display()),
        },
        Err(e) => DoctorCheck {
            name: "profile".to_string(),
            status: CheckStatus::Error,
            message: format!("Cannot read stored profile: {}", e),
        },
    });

    let stdout_check = if atty::is(atty::Stream::Stdout) {
        "stdout is a TTY (interactive mode)"
    } else {
        "stdout is a pipe"
    };
    checks.push(DoctorCheck {
        name: "stdout".to_string(),
        status: CheckStatus::Ok,
        message: stdout_check.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: CLEARAIR_VERSION.to_string(),
        checks,
    };

    emit(format, &report, || {
        let mut lines = vec![
            "ClearAir Doctor Report".to_string(),
            "======================".to_string(),
            format!("Producer: {}", report.producer),
            format!("Version:  {}", report.version),
            String::new(),
            "Checks:".to_string(),
        ];
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            lines.push(format!("  {} {}: {}", status_icon, check.name, check.message));
        }
        lines.join("\n")
    })?;

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(ClearAirCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn synthesizer(seed: Option<u64>) -> ForecastSynthesizer {
    match seed {
        Some(seed) => ForecastSynthesizer::seeded(seed),
        None => ForecastSynthesizer::from_entropy(),
    }
}

fn emit<T: serde::Serialize>(
    format: &OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<(), ClearAirCliError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text()),
    }
    Ok(())
}

// Error types

#[derive(Debug)]
enum ClearAirCliError {
    Io(io::Error),
    Core(ClearAirError),
    Json(serde_json::Error),
    Usage(String),
    DoctorFailed,
}

impl From<io::Error> for ClearAirCliError {
    fn from(e: io::Error) -> Self {
        ClearAirCliError::Io(e)
    }
}

impl From<ClearAirError> for ClearAirCliError {
    fn from(e: ClearAirError) -> Self {
        ClearAirCliError::Core(e)
    }
}

impl From<serde_json::Error> for ClearAirCliError {
    fn from(e: serde_json::Error) -> Self {
        ClearAirCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ClearAirCliError> for CliError {
    fn from(e: ClearAirCliError) -> Self {
        match e {
            ClearAirCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ClearAirCliError::Core(e) => {
                let hint = match &e {
                    ClearAirError::UnknownVariant { .. } => "Run with --help to see accepted values",
                    ClearAirError::ConfigError(_) => "Fix the configuration file and retry",
                    ClearAirError::ProfileStore(_) => "Remove or repair the stored profile",
                    _ => "Check the input values",
                };
                CliError {
                    code: "CLEARAIR_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            ClearAirCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ClearAirCliError::Usage(msg) => CliError {
                code: "USAGE_ERROR".to_string(),
                message: msg,
                hint: Some("Run with --help for usage".to_string()),
            },
            ClearAirCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ClassifyReport {
    value: f64,
    category: AqiCategory,
    label: &'static str,
    description: &'static str,
    range: CategoryRange,
    visually_safe: bool,
    recommendations: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<HealthCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    health_recommendations: Option<&'static [&'static str]>,
}

#[derive(serde::Serialize)]
struct WaterReport {
    index: f64,
    evaluation: WaterEvaluation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<ParameterStatus>,
}

#[derive(serde::Serialize)]
struct ForecastReport<P> {
    model: &'static str,
    simulated: bool,
    points: Vec<P>,
}

#[derive(serde::Serialize)]
struct RecommendReport {
    value: f64,
    category: AqiCategory,
    threshold: ThresholdDerivation,
    forecast_simulated: bool,
    recommendation: PersonalizedRecommendation,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_values_are_accepted() {
        for args in [
            vec!["clearair", "classify", "-5"],
            vec!["clearair", "forecast", "-5", "--seed", "1"],
            vec!["clearair", "recommend", "-5"],
        ] {
            let cli = Cli::try_parse_from(args.iter().copied());
            assert!(cli.is_ok(), "{args:?}");
        }

        match Cli::try_parse_from(["clearair", "recommend", "-5"]).unwrap().command {
            Commands::Recommend { value, .. } => assert_eq!(value, -5.0),
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_parameter_statuses_cover_every_parameter() {
        let statuses = parameter_statuses(&["ph=7.2".to_string()]).unwrap();
        assert_eq!(statuses.len(), WaterParameter::ALL.len());

        let oxygen = statuses
            .iter()
            .find(|s| s.parameter == WaterParameter::DissolvedOxygen)
            .unwrap();
        assert_eq!(oxygen.value, 0.0);
        assert!(!oxygen.safe);
    }

    #[test]
    fn test_parameter_statuses_empty_and_malformed() {
        assert!(parameter_statuses(&[]).unwrap().is_empty());
        assert!(matches!(
            parameter_statuses(&["ph".to_string()]),
            Err(ClearAirCliError::Usage(_))
        ));
        assert!(matches!(
            parameter_statuses(&["salinity=3".to_string()]),
            Err(ClearAirCliError::Core(_))
        ));
    }
}
