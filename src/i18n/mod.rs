//! Internationalization (i18n) module for the site's language editions.
//!
//! This module is the single place that knows which language editions exist,
//! where each one is rooted, and what the prompts say in every language.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their metadata
//! - `language`: Type-safe `LocaleCode` validated against the registry
//! - `strings`: Localized copy for the language suggestion and consent prompts
//!
//! # Example
//!
//! ```rust
//! use site_prefs::i18n::{LocaleCode, LocaleRegistry};
//!
//! let default = LocaleCode::default_locale();
//! assert_eq!(default.canonical_path(), "/");
//!
//! let german = LocaleCode::from_code("de").unwrap();
//! assert_eq!(german.canonical_path(), "/de/");
//!
//! assert_eq!(LocaleRegistry::get().list_all().len(), 5);
//! ```

mod language;
mod registry;
mod strings;

pub use language::{base_subtag, LocaleCode};
pub use registry::{LocaleConfig, LocaleRegistry, PREFIX_EXPLORATION_ORDER};
pub use strings::LocaleStrings;
