//! LocaleCode type: a language edition validated against the registry.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::LocaleError;
use crate::i18n::{LocaleConfig, LocaleRegistry, LocaleStrings};

/// Lower-case a language tag and truncate it to its base subtag.
///
/// `"de-AT"` becomes `"de"`, `"ES"` becomes `"es"`, and an empty tag stays
/// empty. Both `-` and `_` separators are accepted.
pub fn base_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// A supported locale.
///
/// Only codes present in the registry can be constructed, so every
/// `LocaleCode` has exactly one canonical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocaleCode {
    /// ISO 639-1 language code (e.g., "en", "de")
    code: &'static str,
}

impl LocaleCode {
    pub const ENGLISH: LocaleCode = LocaleCode { code: "en" };
    pub const GERMAN: LocaleCode = LocaleCode { code: "de" };
    pub const SPANISH: LocaleCode = LocaleCode { code: "es" };
    pub const POLISH: LocaleCode = LocaleCode { code: "pl" };
    pub const SLOVAK: LocaleCode = LocaleCode { code: "sk" };

    /// Create a LocaleCode from an exact, already normalized code.
    pub fn from_code(code: &str) -> Result<LocaleCode, LocaleError> {
        LocaleRegistry::get()
            .get_by_code(code)
            .map(|config| LocaleCode { code: config.code })
            .ok_or_else(|| LocaleError::Unsupported(code.to_string()))
    }

    /// Normalize a free-form language tag (`"de-AT"`, `"PL"`) and look it up.
    ///
    /// Returns `None` for absent, empty or unsupported tags.
    pub fn from_tag(tag: &str) -> Option<LocaleCode> {
        LocaleCode::from_code(&base_subtag(tag)).ok()
    }

    /// The default edition, used whenever nothing else resolves.
    pub fn default_locale() -> LocaleCode {
        LocaleCode {
            code: LocaleRegistry::get().default_locale().code,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a value built through `from_code` or the constants.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("LocaleCode should always be registered")
    }

    /// Root path of this edition (e.g., "/de/").
    pub fn canonical_path(&self) -> &'static str {
        self.config().canonical_path
    }

    /// Language name in its own language (e.g., "Español").
    pub fn native_label(&self) -> &'static str {
        self.config().native_label
    }

    pub fn is_default(&self) -> bool {
        self.config().is_default
    }

    /// Prompt copy for visitors reading this edition.
    pub fn strings(&self) -> &'static LocaleStrings {
        self.config().strings
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for LocaleCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
