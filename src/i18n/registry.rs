//! Locale registry: Single source of truth for all supported language editions.
//!
//! The registry is a lazily initialized, immutable singleton (`OnceLock`). The
//! set of locales is closed; adding an edition means adding an entry here and
//! a matching `LocaleStrings` table.

use std::sync::OnceLock;

use crate::i18n::strings::{
    LocaleStrings, ENGLISH_STRINGS, GERMAN_STRINGS, POLISH_STRINGS, SLOVAK_STRINGS,
    SPANISH_STRINGS,
};

/// Order in which non-default locale prefixes are tested against a URL path.
pub const PREFIX_EXPLORATION_ORDER: [&str; 4] = ["sk", "de", "es", "pl"];

/// Configuration for a supported language edition.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 language code (e.g., "en", "de")
    pub code: &'static str,

    /// Name of the language in that language (e.g., "Deutsch", "Español")
    pub native_label: &'static str,

    /// Root path of this edition (e.g., "/", "/de/")
    pub canonical_path: &'static str,

    /// Whether this is the default edition (exactly one should be true)
    pub is_default: bool,

    /// Prompt copy shown to visitors reading this edition
    pub strings: &'static LocaleStrings,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its exact code.
    ///
    /// The lookup is case-sensitive; callers normalize tags first with
    /// [`crate::i18n::base_subtag`].
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all supported locales, default first.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get the default locale configuration.
    ///
    /// # Panics
    /// Panics if the registry does not contain exactly one default locale
    /// (this indicates a configuration error in `default_locales`).
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default locale found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default locales found in registry"),
        }
    }
}

fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            native_label: "English",
            canonical_path: "/",
            is_default: true,
            strings: &ENGLISH_STRINGS,
        },
        LocaleConfig {
            code: "de",
            native_label: "Deutsch",
            canonical_path: "/de/",
            is_default: false,
            strings: &GERMAN_STRINGS,
        },
        LocaleConfig {
            code: "es",
            native_label: "Español",
            canonical_path: "/es/",
            is_default: false,
            strings: &SPANISH_STRINGS,
        },
        LocaleConfig {
            code: "pl",
            native_label: "Polski",
            canonical_path: "/pl/",
            is_default: false,
            strings: &POLISH_STRINGS,
        },
        LocaleConfig {
            code: "sk",
            native_label: "Slovenčina",
            canonical_path: "/sk/",
            is_default: false,
            strings: &SLOVAK_STRINGS,
        },
    ]
}
