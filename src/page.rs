//! Read-only inputs describing one page view.
//!
//! A [`PageContext`] is captured once per document load: where the page lives,
//! what language it declares, which alternates it links to, and what the
//! browser reports about the visitor.

use serde::Serialize;
use url::Url;

/// Location of the current page, split the way browsers expose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(raw)?,
        })
    }

    /// Path component, always starting with `/`.
    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Query string including the leading `?`, or empty.
    pub fn search(&self) -> String {
        match self.url.query() {
            Some(query) if !query.is_empty() => format!("?{}", query),
            _ => String::new(),
        }
    }

    /// Fragment including the leading `#`, or empty.
    pub fn hash(&self) -> String {
        match self.url.fragment() {
            Some(fragment) if !fragment.is_empty() => format!("#{}", fragment),
            _ => String::new(),
        }
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// One `<link rel="alternate" hreflang="..." href="...">` from the page head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    pub hreflang: String,
    pub href: String,
}

impl AlternateLink {
    pub fn new(hreflang: &str, href: &str) -> Self {
        Self {
            hreflang: hreflang.to_string(),
            href: href.to_string(),
        }
    }
}

/// The browser's passive "do not track" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoNotTrack {
    /// The visitor asked not to be tracked
    Enabled,
    /// The visitor explicitly allows tracking
    Disabled,
    /// No preference expressed
    #[default]
    Unspecified,
}

impl DoNotTrack {
    /// Interpret raw signal values from the browser.
    ///
    /// Browsers expose the indicator in several places; the first one that is
    /// present and non-empty decides. `"1"` and `"yes"` assert the signal.
    pub fn from_signals(signals: &[Option<&str>]) -> Self {
        let first = signals
            .iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty());

        match first {
            Some("1") | Some("yes") => DoNotTrack::Enabled,
            Some("0") | Some("no") => DoNotTrack::Disabled,
            _ => DoNotTrack::Unspecified,
        }
    }

    pub fn is_asserted(&self) -> bool {
        matches!(self, DoNotTrack::Enabled)
    }
}

/// Everything the engine reads from the page for one view.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// `lang` attribute of the document root
    pub document_lang: Option<String>,
    pub location: PageLocation,
    pub alternates: Vec<AlternateLink>,
    /// Ordered browser language list (most preferred first)
    pub browser_languages: Vec<String>,
    /// Single primary browser language, used when the list is empty
    pub browser_language: Option<String>,
    pub do_not_track: DoNotTrack,
}

impl PageContext {
    pub fn new(location: PageLocation) -> Self {
        Self {
            document_lang: None,
            location,
            alternates: Vec::new(),
            browser_languages: Vec::new(),
            browser_language: None,
            do_not_track: DoNotTrack::Unspecified,
        }
    }

    pub fn with_document_lang(mut self, lang: &str) -> Self {
        self.document_lang = Some(lang.to_string());
        self
    }

    pub fn with_browser_languages(mut self, languages: &[&str]) -> Self {
        self.browser_languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_browser_language(mut self, language: &str) -> Self {
        self.browser_language = Some(language.to_string());
        self
    }

    pub fn with_alternate(mut self, hreflang: &str, href: &str) -> Self {
        self.alternates.push(AlternateLink::new(hreflang, href));
        self
    }

    pub fn with_do_not_track(mut self, signal: DoNotTrack) -> Self {
        self.do_not_track = signal;
        self
    }

    /// Visitor languages in preference order.
    ///
    /// Falls back to the single primary language when the ordered list is
    /// empty, mirroring browsers that only expose one.
    pub fn preferred_languages(&self) -> Vec<&str> {
        if !self.browser_languages.is_empty() {
            return self.browser_languages.iter().map(String::as_str).collect();
        }
        self.browser_language.iter().map(String::as_str).collect()
    }
}
