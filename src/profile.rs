//! User profile and profile persistence
//!
//! The profile drives personalization. It is persisted through an injected
//! [`ProfileStore`] and carried around in an explicit [`ProfileContext`];
//! nothing in the crate reads it from ambient storage.

use crate::error::ClearAirError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Well-known key the profile is stored under
pub const PROFILE_KEY: &str = "user-profile";

/// How strenuous the user's usual outdoor activity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 3] = [ActivityLevel::Low, ActivityLevel::Moderate, ActivityLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = ClearAirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ClearAirError::UnknownVariant {
                field: "activity level",
                value: s.to_string(),
            })
    }
}

/// Health condition that tightens the personal AQI threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthCondition {
    Asthma,
    Bronchitis,
    Copd,
    HeartDisease,
    Allergy,
    #[default]
    None,
}

impl HealthCondition {
    pub const ALL: [HealthCondition; 6] = [
        HealthCondition::Asthma,
        HealthCondition::Bronchitis,
        HealthCondition::Copd,
        HealthCondition::HeartDisease,
        HealthCondition::Allergy,
        HealthCondition::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthCondition::Asthma => "asthma",
            HealthCondition::Bronchitis => "bronchitis",
            HealthCondition::Copd => "copd",
            HealthCondition::HeartDisease => "heart-disease",
            HealthCondition::Allergy => "allergy",
            HealthCondition::None => "none",
        }
    }

    /// Name used inside advice sentences
    pub fn display_name(&self) -> &'static str {
        match self {
            HealthCondition::Asthma => "asthma",
            HealthCondition::Bronchitis => "bronchitis",
            HealthCondition::Copd => "COPD",
            HealthCondition::HeartDisease => "heart disease",
            HealthCondition::Allergy => "allergies",
            HealthCondition::None => "no known condition",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, HealthCondition::None)
    }
}

impl fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthCondition {
    type Err = ClearAirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HealthCondition::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ClearAirError::UnknownVariant {
                field: "health condition",
                value: s.to_string(),
            })
    }
}

/// Set of hours (0-23) the user is typically outdoors
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct OutdoorHours(BTreeSet<u8>);

impl OutdoorHours {
    /// Build from any list of hours. Duplicates collapse; hours above 23 are rejected.
    pub fn new<I: IntoIterator<Item = u8>>(hours: I) -> Result<Self, ClearAirError> {
        let mut set = BTreeSet::new();
        for hour in hours {
            if hour > 23 {
                return Err(ClearAirError::InvalidHour(hour));
            }
            set.insert(hour);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, hour: u8) -> bool {
        self.0.contains(&hour)
    }

    pub fn insert(&mut self, hour: u8) -> Result<bool, ClearAirError> {
        if hour > 23 {
            return Err(ClearAirError::InvalidHour(hour));
        }
        Ok(self.0.insert(hour))
    }

    pub fn remove(&mut self, hour: u8) -> bool {
        self.0.remove(&hour)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hours in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<u8>> for OutdoorHours {
    type Error = ClearAirError;

    fn try_from(hours: Vec<u8>) -> Result<Self, Self::Error> {
        OutdoorHours::new(hours)
    }
}

impl From<OutdoorHours> for Vec<u8> {
    fn from(hours: OutdoorHours) -> Self {
        hours.0.into_iter().collect()
    }
}

/// User profile used for personalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Respiratory or cardiovascular sensitivity
    #[serde(alias = "hasSensitivities")]
    pub has_sensitivities: bool,
    #[serde(alias = "activityLevel")]
    pub activity_level: ActivityLevel,
    #[serde(alias = "typicalOutdoorHours")]
    pub typical_outdoor_hours: OutdoorHours,
    #[serde(default, alias = "healthCondition")]
    pub health_condition: HealthCondition,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            has_sensitivities: false,
            activity_level: ActivityLevel::Moderate,
            typical_outdoor_hours: OutdoorHours((8..=18).collect()),
            health_condition: HealthCondition::None,
        }
    }
}

impl UserProfile {
    /// Return a copy of this profile with the partial update applied
    pub fn merged(&self, update: &ProfileUpdate) -> UserProfile {
        UserProfile {
            has_sensitivities: update.has_sensitivities.unwrap_or(self.has_sensitivities),
            activity_level: update.activity_level.unwrap_or(self.activity_level),
            typical_outdoor_hours: update
                .typical_outdoor_hours
                .clone()
                .unwrap_or_else(|| self.typical_outdoor_hours.clone()),
            health_condition: update.health_condition.unwrap_or(self.health_condition),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ClearAirError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ClearAirError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Partial profile update; `None` fields keep their last-known value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    #[serde(alias = "hasSensitivities")]
    pub has_sensitivities: Option<bool>,
    #[serde(alias = "activityLevel")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(alias = "typicalOutdoorHours")]
    pub typical_outdoor_hours: Option<OutdoorHours>,
    #[serde(alias = "healthCondition")]
    pub health_condition: Option<HealthCondition>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.has_sensitivities.is_none()
            && self.activity_level.is_none()
            && self.typical_outdoor_hours.is_none()
            && self.health_condition.is_none()
    }
}

/// Key-value persistence for the user profile
pub trait ProfileStore {
    /// Load the stored profile, `Ok(None)` if nothing has been saved yet
    fn load(&self) -> Result<Option<UserProfile>, ClearAirError>;

    /// Replace the stored profile
    fn save(&mut self, profile: &UserProfile) -> Result<(), ClearAirError>;
}

/// In-memory store, useful for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    saved: Option<UserProfile>,
    saves: usize,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            saved: Some(profile),
            saves: 0,
        }
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Option<UserProfile>, ClearAirError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, profile: &UserProfile) -> Result<(), ClearAirError> {
        self.saved = Some(profile.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Stores the profile as a single JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileProfileStore {
    path: PathBuf,
}

impl JsonFileProfileStore {
    /// Store at `<dir>/user-profile.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{PROFILE_KEY}.json")),
        }
    }

    /// Store at an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileProfileStore {
    fn load(&self) -> Result<Option<UserProfile>, ClearAirError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let profile = serde_json::from_str(&content).map_err(|e| {
            ClearAirError::ProfileStore(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Some(profile))
    }

    fn save(&mut self, profile: &UserProfile) -> Result<(), ClearAirError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(profile)?)?;
        Ok(())
    }
}

/// Explicit profile context: the last-known profile plus the store it came from
#[derive(Debug)]
pub struct ProfileContext<S: ProfileStore> {
    store: S,
    profile: UserProfile,
}

impl<S: ProfileStore> ProfileContext<S> {
    /// Load the stored profile, falling back to defaults when none is stored
    /// or the stored one cannot be read.
    pub fn load(store: S) -> Self {
        let profile = match store.load() {
            Ok(Some(profile)) => {
                info!("Loaded stored user profile");
                profile
            }
            Ok(None) => {
                debug!("No stored user profile, using defaults");
                UserProfile::default()
            }
            Err(e) => {
                warn!(error = %e, "Stored user profile unreadable, using defaults");
                UserProfile::default()
            }
        };
        Self { store, profile }
    }

    /// Start from an explicit profile without consulting the store
    pub fn with_profile(store: S, profile: UserProfile) -> Self {
        Self { store, profile }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge a partial update into the last-known profile and persist it.
    ///
    /// On a save failure the in-memory profile is left unchanged.
    pub fn update(&mut self, update: &ProfileUpdate) -> Result<&UserProfile, ClearAirError> {
        let merged = self.profile.merged(update);
        self.store.save(&merged)?;
        info!(
            activity_level = merged.activity_level.as_str(),
            has_sensitivities = merged.has_sensitivities,
            health_condition = merged.health_condition.as_str(),
            outdoor_hours = merged.typical_outdoor_hours.len(),
            "Saved user profile"
        );
        self.profile = merged;
        Ok(&self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert!(!profile.has_sensitivities);
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
        assert_eq!(profile.health_condition, HealthCondition::None);
        assert_eq!(
            profile.typical_outdoor_hours.iter().collect::<Vec<_>>(),
            (8..=18).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_outdoor_hours_dedupe_and_validate() {
        let hours = OutdoorHours::new([10, 9, 10, 11, 9]).unwrap();
        assert_eq!(hours.len(), 3);
        assert_eq!(hours.iter().collect::<Vec<_>>(), vec![9, 10, 11]);

        assert!(matches!(
            OutdoorHours::new([7, 24]),
            Err(ClearAirError::InvalidHour(24))
        ));

        let mut hours = OutdoorHours::default();
        assert!(hours.insert(6).unwrap());
        assert!(!hours.insert(6).unwrap());
        assert!(hours.insert(30).is_err());
        assert_eq!(hours.len(), 1);
    }

    #[test]
    fn test_outdoor_hours_deserialize_rejects_out_of_range() {
        let result: Result<OutdoorHours, _> = serde_json::from_str("[1, 2, 25]");
        assert!(result.is_err());
        let hours: OutdoorHours = serde_json::from_str("[3, 1, 3]").unwrap();
        assert_eq!(serde_json::to_string(&hours).unwrap(), "[1,3]");
    }

    #[test]
    fn test_profile_accepts_camel_case_and_missing_condition() {
        let json = r#"{
            "hasSensitivities": true,
            "activityLevel": "high",
            "typicalOutdoorHours": [7, 8]
        }"#;
        let profile = UserProfile::from_json(json).unwrap();
        assert!(profile.has_sensitivities);
        assert_eq!(profile.activity_level, ActivityLevel::High);
        assert_eq!(profile.health_condition, HealthCondition::None);
    }

    #[test]
    fn test_health_condition_ids() {
        assert_eq!(
            serde_json::to_string(&HealthCondition::HeartDisease).unwrap(),
            "\"heart-disease\""
        );
        for condition in HealthCondition::ALL {
            assert_eq!(condition.as_str().parse::<HealthCondition>().unwrap(), condition);
        }
        assert!("flu".parse::<HealthCondition>().is_err());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let profile = UserProfile::default();
        let update = ProfileUpdate {
            activity_level: Some(ActivityLevel::High),
            ..Default::default()
        };
        let merged = profile.merged(&update);
        assert_eq!(merged.activity_level, ActivityLevel::High);
        assert_eq!(merged.typical_outdoor_hours, profile.typical_outdoor_hours);
        assert_eq!(merged.has_sensitivities, profile.has_sensitivities);
        assert!(ProfileUpdate::default().is_empty());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_context_update_saves_merged_profile() {
        let mut context = ProfileContext::load(MemoryProfileStore::new());
        assert_eq!(context.profile(), &UserProfile::default());

        let update = ProfileUpdate {
            has_sensitivities: Some(true),
            health_condition: Some(HealthCondition::Asthma),
            ..Default::default()
        };
        context.update(&update).unwrap();

        assert!(context.profile().has_sensitivities);
        assert_eq!(context.store().save_count(), 1);
        let stored = context.store().load().unwrap().unwrap();
        assert_eq!(&stored, context.profile());
        assert_eq!(stored.activity_level, ActivityLevel::Moderate);
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileProfileStore::in_dir(dir.path().join("nested"));
        assert!(store.load().unwrap().is_none());

        let profile = UserProfile {
            has_sensitivities: true,
            activity_level: ActivityLevel::Low,
            typical_outdoor_hours: OutdoorHours::new([6, 7]).unwrap(),
            health_condition: HealthCondition::Copd,
        };
        store.save(&profile).unwrap();

        assert!(store.path().ends_with("user-profile.json"));
        assert_eq!(store.load().unwrap(), Some(profile));
    }

    #[test]
    fn test_corrupt_store_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileProfileStore::at(&path);
        assert!(matches!(store.load(), Err(ClearAirError::ProfileStore(_))));

        let context = ProfileContext::load(store);
        assert_eq!(context.profile(), &UserProfile::default());
    }
}
