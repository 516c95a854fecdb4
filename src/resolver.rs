//! Locale of the current page and the path arithmetic between editions.

use tracing::debug;

use crate::i18n::{LocaleCode, PREFIX_EXPLORATION_ORDER};
use crate::page::PageContext;

/// Resolve the locale of the page being viewed.
///
/// Resolution order:
/// 1. The document's declared language, reduced to its base subtag, if supported
/// 2. A supported locale prefix at the start of the URL path
/// 3. The default locale
///
/// An unsupported dialect in the declared language therefore falls through
/// to path inspection, and any unprefixed path is the default edition.
pub fn current_locale(page: &PageContext) -> LocaleCode {
    resolve(page.document_lang.as_deref(), page.location.pathname())
}

/// [`current_locale`] on raw inputs.
pub fn resolve(document_lang: Option<&str>, path: &str) -> LocaleCode {
    if let Some(locale) = document_lang.and_then(LocaleCode::from_tag) {
        return locale;
    }

    for code in PREFIX_EXPLORATION_ORDER {
        let root = format!("/{}/", code);
        if path.starts_with(&root) {
            if let Ok(locale) = LocaleCode::from_code(code) {
                debug!("Resolved locale '{}' from path '{}'", code, path);
                return locale;
            }
        }
    }

    LocaleCode::default_locale()
}

/// Remove a recognized locale prefix from a path.
///
/// `/de` and `/de/` become `/`, `/de/pricing/` becomes `/pricing/`, and an
/// empty path becomes `/`. Paths without a recognized prefix are unchanged.
pub fn strip_locale_prefix(path: &str) -> String {
    for code in PREFIX_EXPLORATION_ORDER {
        let prefix = format!("/{}", code);
        if path == prefix || path == format!("{}/", prefix) {
            return "/".to_string();
        }
        if let Some(rest) = path.strip_prefix(&prefix) {
            if rest.starts_with('/') {
                return rest.to_string();
            }
        }
    }

    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// The site root, either bare or as its index document.
pub fn is_root_path(path: &str) -> bool {
    path == "/" || path == "/index.html"
}

/// Inverse of [`strip_locale_prefix`]: the path of `base_path` in `locale`.
///
/// The default locale keeps `base_path` as is. Other locales prefix it with
/// `/{code}`, except the root, which maps to the locale's canonical path. An
/// empty base path is treated as the root.
pub fn path_for_locale(locale: LocaleCode, base_path: &str) -> String {
    let base_path = if base_path.is_empty() { "/" } else { base_path };

    if locale.is_default() {
        return base_path.to_string();
    }
    if is_root_path(base_path) {
        return locale.canonical_path().to_string();
    }
    format!("/{}{}", locale.code(), base_path)
}
