//! Locale suggestion and analytics consent for a multi-locale marketing site.
//!
//! Each page view builds a [`session::Session`] from the page inputs, a
//! preference store and a clock. The session decides whether to redirect the
//! visitor to a stored language edition, suggest the browser's language, or
//! stay quiet, and it gates the analytics tag behind a persisted consent
//! decision. All page effects go through [`document::DocumentSink`].

pub mod analytics;
pub mod clock;
pub mod config;
pub mod consent;
pub mod document;
pub mod error;
pub mod hreflang;
pub mod i18n;
pub mod page;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod suggestion;
