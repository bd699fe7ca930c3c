//! Print a morning briefing for a sample profile

use clearair::{
    ActivityLevel, HealthCondition, IndexReading, MemoryProfileStore, Monitor, MonitorConfig,
    OutdoorHours, UserProfile,
};

fn main() {
    let profile = UserProfile {
        has_sensitivities: false,
        activity_level: ActivityLevel::High,
        typical_outdoor_hours: OutdoorHours::new([6, 7, 8, 17, 18]).unwrap_or_default(),
        health_condition: HealthCondition::Allergy,
    };

    let mut monitor = match Monitor::new(MonitorConfig::default(), MemoryProfileStore::with_profile(profile)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    let snapshot = IndexReading::air(68.0).and_then(|r| monitor.ingest_air(r));
    match snapshot {
        Ok(s) => match serde_json::to_string_pretty(&s) {
            Ok(json) => print!("{json}"),
            Err(e) => eprintln!("Error: {e}"),
        },
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
