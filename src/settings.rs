/// Dashboard settings and the per-section shallow merge.
///
/// The merge contract is deliberately explicit rather than a generic
/// deep-merge: sections are enumerated (profile, preferences, alerts, ai),
/// and within a submitted section only the keys present in the payload are
/// replaced. Absent keys, absent sections, and unknown keys are all left
/// alone, which keeps "what can a settings POST change" auditable from
/// this file alone.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Stored settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSettings {
    pub theme: String,
    /// Dashboard auto-refresh cadence, seconds.
    pub refresh_interval: u32,
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSettings {
    /// Composite risk score above which the dashboard highlights alerts.
    pub risk_threshold: f64,
    pub notify_email: bool,
    pub notify_sms: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    /// One of "conservative", "balanced", "aggressive".
    pub sensitivity: String,
    pub show_explainability: bool,
}

/// The full settings singleton, one per engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub profile: ProfileSettings,
    pub preferences: PreferenceSettings,
    pub alerts: AlertSettings,
    pub ai: AiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            profile: ProfileSettings {
                name: "User".to_string(),
                email: "user@example.com".to_string(),
                role: "operator".to_string(),
            },
            preferences: PreferenceSettings {
                theme: "dark".to_string(),
                refresh_interval: 30,
                units: "metric".to_string(),
            },
            alerts: AlertSettings {
                risk_threshold: 7.5,
                notify_email: true,
                notify_sms: false,
            },
            ai: AiSettings {
                sensitivity: "balanced".to_string(),
                show_explainability: true,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Partial update payload
// ---------------------------------------------------------------------------

/// Per-section partial update. Every field is optional at both levels;
/// unknown keys and unknown top-level sections are dropped by serde at
/// deserialization, so they can never reach the merge.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub profile: Option<ProfileUpdate>,
    pub preferences: Option<PreferenceUpdate>,
    pub alerts: Option<AlertUpdate>,
    pub ai: Option<AiUpdate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceUpdate {
    pub theme: Option<String>,
    pub refresh_interval: Option<u32>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertUpdate {
    pub risk_threshold: Option<f64>,
    pub notify_email: Option<bool>,
    pub notify_sms: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiUpdate {
    pub sensitivity: Option<String>,
    pub show_explainability: Option<bool>,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

impl Settings {
    /// Applies a partial update section by section. Only keys present in
    /// the payload are replaced.
    pub fn merge(&mut self, update: SettingsUpdate) {
        if let Some(p) = update.profile {
            if let Some(v) = p.name {
                self.profile.name = v;
            }
            if let Some(v) = p.email {
                self.profile.email = v;
            }
            if let Some(v) = p.role {
                self.profile.role = v;
            }
        }
        if let Some(p) = update.preferences {
            if let Some(v) = p.theme {
                self.preferences.theme = v;
            }
            if let Some(v) = p.refresh_interval {
                self.preferences.refresh_interval = v;
            }
            if let Some(v) = p.units {
                self.preferences.units = v;
            }
        }
        if let Some(a) = update.alerts {
            if let Some(v) = a.risk_threshold {
                self.alerts.risk_threshold = v;
            }
            if let Some(v) = a.notify_email {
                self.alerts.notify_email = v;
            }
            if let Some(v) = a.notify_sms {
                self.alerts.notify_sms = v;
            }
        }
        if let Some(a) = update.ai {
            if let Some(v) = a.sensitivity {
                self.ai.sensitivity = v;
            }
            if let Some(v) = a.show_explainability {
                self.ai.show_explainability = v;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_touches_only_submitted_keys() {
        let mut settings = Settings::default();
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"preferences":{"theme":"light"}}"#)
                .expect("valid update payload");
        settings.merge(update);

        assert_eq!(settings.preferences.theme, "light");
        assert_eq!(
            settings.preferences.refresh_interval, 30,
            "untouched key in the same section must survive"
        );
        assert_eq!(settings.profile, Settings::default().profile);
        assert_eq!(settings.alerts, Settings::default().alerts);
        assert_eq!(settings.ai, Settings::default().ai);
    }

    #[test]
    fn test_merge_applies_multiple_sections_at_once() {
        let mut settings = Settings::default();
        let update: SettingsUpdate = serde_json::from_str(
            r#"{"profile":{"name":"Shift Lead"},"alerts":{"notifySms":true,"riskThreshold":6.0}}"#,
        )
        .expect("valid update payload");
        settings.merge(update);

        assert_eq!(settings.profile.name, "Shift Lead");
        assert_eq!(settings.profile.email, "user@example.com");
        assert!(settings.alerts.notify_sms);
        assert_eq!(settings.alerts.risk_threshold, 6.0);
        assert!(settings.alerts.notify_email, "unsubmitted flag keeps its default");
    }

    #[test]
    fn test_unknown_sections_and_keys_are_ignored() {
        let mut settings = Settings::default();
        let update: SettingsUpdate = serde_json::from_str(
            r#"{"billing":{"plan":"pro"},"ai":{"sensitivity":"aggressive","turbo":true}}"#,
        )
        .expect("unknown keys must not fail deserialization");
        settings.merge(update);

        assert_eq!(settings.ai.sensitivity, "aggressive");
        assert_eq!(settings, {
            let mut expected = Settings::default();
            expected.ai.sensitivity = "aggressive".to_string();
            expected
        });
    }

    #[test]
    fn test_settings_serialize_with_camel_case_keys() {
        let json = serde_json::to_value(Settings::default()).expect("serialize");
        assert!(json["preferences"]["refreshInterval"].is_number());
        assert!(json["alerts"]["notifyEmail"].is_boolean());
        assert!(json["ai"]["showExplainability"].is_boolean());
    }
}
