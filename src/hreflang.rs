//! Per-page map of alternate-language editions.
//!
//! Localized pages don't always live at the mechanical `/{code}/...` rewrite
//! of the current path, so alternates declared by the page take precedence
//! over path arithmetic when building a suggestion target.

use std::collections::HashMap;

use tracing::debug;

use crate::i18n::LocaleCode;
use crate::page::PageContext;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HreflangMap {
    paths: HashMap<LocaleCode, String>,
}

impl HreflangMap {
    /// Build the map from the page's alternate links.
    ///
    /// - the first link for a locale wins
    /// - `x-default` and unsupported tags are ignored
    /// - relative hrefs resolve against the page URL, so an empty href names
    ///   the page itself; malformed ones are skipped
    pub fn from_page(page: &PageContext) -> Self {
        let mut paths = HashMap::new();

        for link in &page.alternates {
            let tag = link.hreflang.trim();
            if tag.eq_ignore_ascii_case("x-default") {
                continue;
            }
            let Some(locale) = LocaleCode::from_tag(tag) else {
                debug!("Ignoring alternate link with unsupported hreflang '{}'", tag);
                continue;
            };
            if paths.contains_key(&locale) {
                continue;
            }

            let href = link.href.trim();
            match page.location.url().join(href) {
                Ok(url) => {
                    paths.insert(locale, url.path().to_string());
                }
                Err(e) => debug!("Ignoring malformed alternate link '{}': {}", href, e),
            }
        }

        Self { paths }
    }

    /// Absolute path of the alternate for `locale`, if the page declares one.
    pub fn path_for(&self, locale: LocaleCode) -> Option<&str> {
        self.paths.get(&locale).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
