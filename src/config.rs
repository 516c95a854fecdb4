use anyhow::{Context, Result};

/// Names of the persisted preference keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceKeys {
    /// Locale the visitor chose (one of the supported codes)
    pub locale: String,
    /// Dismissal window expiry, decimal epoch milliseconds
    pub dismiss_until: String,
    /// Analytics consent, `granted` or `denied`
    pub analytics_consent: String,
}

impl PreferenceKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            locale: format!("{}_lang_preference", prefix),
            dismiss_until: format!("{}_lang_dismiss_until", prefix),
            analytics_consent: format!("{}_analytics_consent_v1", prefix),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Analytics
    /// Measurement identifier; `None` turns the consent gate off entirely
    pub analytics_measurement_id: Option<String>,
    pub analytics_tag_host: String,

    // Suggestion windows
    pub stay_days: i64,
    pub dismiss_days: i64,

    // Storage
    pub keys: PreferenceKeys,
}

pub const DEFAULT_TAG_HOST: &str = "https://www.googletagmanager.com";
pub const DEFAULT_KEY_PREFIX: &str = "site";
pub const DEFAULT_STAY_DAYS: i64 = 180;
pub const DEFAULT_DISMISS_DAYS: i64 = 14;
/// Longest accepted window, one hundred years.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

impl Default for Config {
    fn default() -> Self {
        Self {
            analytics_measurement_id: None,
            analytics_tag_host: DEFAULT_TAG_HOST.to_string(),
            stay_days: DEFAULT_STAY_DAYS,
            dismiss_days: DEFAULT_DISMISS_DAYS,
            keys: PreferenceKeys::with_prefix(DEFAULT_KEY_PREFIX),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Analytics
            analytics_measurement_id: std::env::var("ANALYTICS_MEASUREMENT_ID")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            analytics_tag_host: std::env::var("ANALYTICS_TAG_HOST")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_TAG_HOST.to_string()),

            // Suggestion windows
            stay_days: positive_days("LOCALE_STAY_DAYS", DEFAULT_STAY_DAYS)?,
            dismiss_days: positive_days("LOCALE_DISMISS_DAYS", DEFAULT_DISMISS_DAYS)?,

            // Storage
            keys: PreferenceKeys::with_prefix(
                &std::env::var("PREFERENCE_KEY_PREFIX")
                    .unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string()),
            ),
        })
    }

    /// Builder-style override of the analytics identifier.
    pub fn with_measurement_id(mut self, id: &str) -> Self {
        self.analytics_measurement_id = Some(id.to_string());
        self
    }
}

/// Day count for a dismissal window; must lie in `1..=MAX_WINDOW_DAYS`.
fn positive_days(var: &str, default: i64) -> Result<i64> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(default);
    };
    let days: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of days, got '{}'", var, raw))?;
    anyhow::ensure!(days > 0, "{} must be positive, got {}", var, days);
    anyhow::ensure!(
        days <= MAX_WINDOW_DAYS,
        "{} must be at most {} days, got {}",
        var,
        MAX_WINDOW_DAYS,
        days
    );
    Ok(days)
}
