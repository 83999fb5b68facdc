//! Alert engine configuration.
//!
//! Plain data, loadable from any configuration store. Channel toggles are
//! flags only; credentials and delivery live outside the engine.

use serde::{Deserialize, Serialize};

use crate::alert::AlertType;

/// How often notifications should be batched by the delivery layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchFrequency {
    #[default]
    Immediate,
    Hourly,
    Daily,
}

/// Process-wide alert settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Alert types that are active
    #[serde(default = "default_enabled_types")]
    pub enabled_types: Vec<AlertType>,
    /// Reviews at or below this rating are considered low-rated; drives
    /// the stock rating rule installed by `install_default_rules`
    #[serde(default = "default_min_rating")]
    pub min_rating_threshold: u8,
    /// Keywords the stock keyword rule watches for
    #[serde(default = "default_negative_keywords")]
    pub negative_keywords: Vec<String>,
    /// Email channel toggle
    #[serde(default = "default_true")]
    pub notify_email: bool,
    /// WhatsApp channel toggle
    #[serde(default)]
    pub notify_whatsapp: bool,
    /// Push channel toggle
    #[serde(default)]
    pub notify_push: bool,
    /// Whether old unread alerts are auto-resolved
    #[serde(default)]
    pub auto_resolve: bool,
    /// Age in hours after which auto-resolve kicks in
    #[serde(default = "default_auto_resolve_hours")]
    pub auto_resolve_hours: i64,
    /// Notification batching frequency
    #[serde(default)]
    pub batch_frequency: BatchFrequency,
}

fn default_enabled_types() -> Vec<AlertType> {
    vec![
        AlertType::Critical,
        AlertType::Urgent,
        AlertType::Negative,
        AlertType::Warning,
    ]
}

fn default_min_rating() -> u8 {
    2
}

fn default_negative_keywords() -> Vec<String> {
    ["defeito", "quebrado", "péssimo", "horrível", "atraso", "enganação"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_auto_resolve_hours() -> i64 {
    72
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled_types: default_enabled_types(),
            min_rating_threshold: default_min_rating(),
            negative_keywords: default_negative_keywords(),
            notify_email: true,
            notify_whatsapp: false,
            notify_push: false,
            auto_resolve: false,
            auto_resolve_hours: default_auto_resolve_hours(),
            batch_frequency: BatchFrequency::Immediate,
        }
    }
}

impl AlertConfig {
    /// Shallow replace-by-merge: every field present in the patch replaces
    /// the corresponding field wholesale.
    pub fn apply(&mut self, patch: AlertConfigPatch) {
        if let Some(v) = patch.enabled_types {
            self.enabled_types = v;
        }
        if let Some(v) = patch.min_rating_threshold {
            self.min_rating_threshold = v;
        }
        if let Some(v) = patch.negative_keywords {
            self.negative_keywords = v;
        }
        if let Some(v) = patch.notify_email {
            self.notify_email = v;
        }
        if let Some(v) = patch.notify_whatsapp {
            self.notify_whatsapp = v;
        }
        if let Some(v) = patch.notify_push {
            self.notify_push = v;
        }
        if let Some(v) = patch.auto_resolve {
            self.auto_resolve = v;
        }
        if let Some(v) = patch.auto_resolve_hours {
            self.auto_resolve_hours = v;
        }
        if let Some(v) = patch.batch_frequency {
            self.batch_frequency = v;
        }
    }
}

/// Partial configuration update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertConfigPatch {
    pub enabled_types: Option<Vec<AlertType>>,
    pub min_rating_threshold: Option<u8>,
    pub negative_keywords: Option<Vec<String>>,
    pub notify_email: Option<bool>,
    pub notify_whatsapp: Option<bool>,
    pub notify_push: Option<bool>,
    pub auto_resolve: Option<bool>,
    pub auto_resolve_hours: Option<i64>,
    pub batch_frequency: Option<BatchFrequency>,
}

impl AlertConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_resolve(mut self, enabled: bool, hours: i64) -> Self {
        self.auto_resolve = Some(enabled);
        self.auto_resolve_hours = Some(hours);
        self
    }

    pub fn enabled_types(mut self, types: Vec<AlertType>) -> Self {
        self.enabled_types = Some(types);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AlertConfig::default();
        assert_eq!(config.enabled_types.len(), 4);
        assert!(config.notify_email);
        assert!(!config.auto_resolve);
        assert_eq!(config.batch_frequency, BatchFrequency::Immediate);
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut config = AlertConfig::default();
        config.apply(
            AlertConfigPatch::new()
                .auto_resolve(true, 24)
                .enabled_types(vec![AlertType::Critical]),
        );

        assert!(config.auto_resolve);
        assert_eq!(config.auto_resolve_hours, 24);
        // Whole-field replacement, not element merge.
        assert_eq!(config.enabled_types, vec![AlertType::Critical]);
        // Untouched fields keep their values.
        assert!(config.notify_email);
    }

    #[test]
    fn test_config_from_json_with_partial_fields() {
        let config: AlertConfig = serde_json::from_str(r#"{"notify_push": true}"#).unwrap();
        assert!(config.notify_push);
        assert_eq!(config.min_rating_threshold, 2);
    }
}
