//! Per-page decision to redirect, suggest another edition, or stay quiet.
//!
//! Decision order (first match wins):
//! 1. A stored preference that differs from the current locale, on the site
//!    root, redirects to that edition without asking.
//! 2. An active dismissal window keeps the page silent.
//! 3. The first supported browser language, if it differs from the current
//!    locale, is suggested through a prompt.
//! 4. Otherwise nothing happens.
//!
//! The decision is computed once per page load and cached, so repeated
//! evaluation always returns the same [`Action`].

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{Config, PreferenceKeys};
use crate::document::{DocumentSink, Prompt, PromptKind, SuggestionPrompt};
use crate::hreflang::HreflangMap;
use crate::i18n::{LocaleCode, LocaleRegistry};
use crate::page::PageContext;
use crate::resolver::{current_locale, is_root_path, path_for_locale, strip_locale_prefix};
use crate::storage::PreferenceStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Navigate to the stored edition's root without prompting
    Redirect { locale: LocaleCode, href: String },
    /// Offer the browser's language through a prompt
    Suggest {
        locale: LocaleCode,
        target_href: String,
        message: String,
    },
    Silent,
}

/// One entry of the language switcher: every edition, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitcherLink {
    pub locale: LocaleCode,
    pub href: String,
    /// Set on the edition being read
    pub active: bool,
}

pub struct LocaleSuggestionController {
    current: LocaleCode,
    pathname: String,
    search: String,
    hash: String,
    hreflang: HreflangMap,
    browser_languages: Vec<String>,
    keys: PreferenceKeys,
    stay_window: Option<Duration>,
    dismiss_window: Option<Duration>,
    evaluated: Option<Action>,
    presented: bool,
    prompt_visible: bool,
}

impl LocaleSuggestionController {
    pub fn new(config: &Config, page: &PageContext) -> Self {
        Self {
            current: current_locale(page),
            pathname: page.location.pathname().to_string(),
            search: page.location.search(),
            hash: page.location.hash(),
            hreflang: HreflangMap::from_page(page),
            browser_languages: page
                .preferred_languages()
                .into_iter()
                .map(str::to_string)
                .collect(),
            keys: config.keys.clone(),
            stay_window: window(config.stay_days),
            dismiss_window: window(config.dismiss_days),
            evaluated: None,
            presented: false,
            prompt_visible: false,
        }
    }

    pub fn current_locale(&self) -> LocaleCode {
        self.current
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    /// Decide what this page view should do. Cached after the first call.
    pub fn evaluate(&mut self, store: &PreferenceStore, clock: &dyn Clock) -> Action {
        if let Some(action) = &self.evaluated {
            return action.clone();
        }
        let action = self.decide(store, clock.now());
        debug!("Locale decision for '{}': {:?}", self.pathname, action);
        self.evaluated = Some(action.clone());
        action
    }

    fn decide(&self, store: &PreferenceStore, now: DateTime<Utc>) -> Action {
        if let Some(preferred) = stored_preference(store, &self.keys) {
            if preferred != self.current && is_root_path(&self.pathname) {
                return Action::Redirect {
                    locale: preferred,
                    href: preferred.canonical_path().to_string(),
                };
            }
        }

        if dismissal_active(store, &self.keys, now) {
            return Action::Silent;
        }

        let Some(browser) = self
            .browser_languages
            .iter()
            .find_map(|lang| LocaleCode::from_tag(lang))
        else {
            return Action::Silent;
        };
        if browser == self.current {
            return Action::Silent;
        }

        Action::Suggest {
            locale: browser,
            target_href: self.target_href(browser),
            message: self
                .current
                .strings()
                .suggestion_for(browser.native_label()),
        }
    }

    /// Link target for `locale`: the page's declared alternate if any,
    /// otherwise the current path rewritten into that edition. Query string
    /// and fragment are carried over unchanged.
    fn target_href(&self, locale: LocaleCode) -> String {
        let path = match self.hreflang.path_for(locale) {
            Some(path) => path.to_string(),
            None => path_for_locale(locale, &strip_locale_prefix(&self.pathname)),
        };
        format!("{}{}{}", path, self.search, self.hash)
    }

    /// Links to every edition of this page for a language switcher. Each
    /// href is built like a suggestion target; the current locale is active.
    pub fn switcher_links(&self) -> Vec<SwitcherLink> {
        LocaleRegistry::get()
            .list_all()
            .into_iter()
            .filter_map(|config| LocaleCode::from_code(config.code).ok())
            .map(|locale| SwitcherLink {
                locale,
                href: self.target_href(locale),
                active: locale == self.current,
            })
            .collect()
    }

    /// Carry out the cached decision on the page: navigate for a redirect,
    /// show the prompt for a suggestion. Only the first call has an effect.
    pub fn present(&mut self, sink: &mut dyn DocumentSink) {
        if self.presented {
            return;
        }
        match &self.evaluated {
            Some(Action::Redirect { locale, href }) => {
                info!("Redirecting to stored locale '{}' at {}", locale, href);
                sink.navigate(href);
            }
            Some(Action::Suggest { .. }) => {
                if let Some(prompt) = self.prompt() {
                    sink.render_prompt(&Prompt::LocaleSuggestion(prompt));
                    self.prompt_visible = true;
                }
            }
            Some(Action::Silent) => {}
            None => {
                debug!("Nothing to present before evaluation");
                return;
            }
        }
        self.presented = true;
    }

    /// Prompt content for the current suggestion, if there is one.
    pub fn prompt(&self) -> Option<SuggestionPrompt> {
        let Some(Action::Suggest {
            locale,
            target_href,
            message,
        }) = &self.evaluated
        else {
            return None;
        };
        let strings = self.current.strings();
        Some(SuggestionPrompt {
            target: *locale,
            message: message.clone(),
            target_href: target_href.clone(),
            switch_label: strings.switch_label.to_string(),
            stay_label: strings.stay_label.to_string(),
            dismiss_label: strings.dismiss_label.to_string(),
        })
    }

    /// The visitor follows the suggestion. Persists the suggested locale and
    /// returns the href the page should navigate to.
    pub fn on_switch(&mut self, store: &mut PreferenceStore) -> Option<String> {
        let (locale, href) = self.visible_suggestion()?;
        info!("Visitor switched to '{}'", locale);
        store.set(&self.keys.locale, locale.code());
        Some(href)
    }

    /// The visitor keeps the current edition. Persists it as the preference
    /// and silences suggestions for the long window.
    pub fn on_stay(
        &mut self,
        store: &mut PreferenceStore,
        clock: &dyn Clock,
        sink: &mut dyn DocumentSink,
    ) -> bool {
        if self.visible_suggestion().is_none() {
            return false;
        }
        info!("Visitor chose to stay on '{}'", self.current);
        store.set(&self.keys.locale, self.current.code());
        self.silence_for(store, clock.now(), self.stay_window);
        self.hide(sink);
        true
    }

    /// The visitor closes the prompt. Silences suggestions for the short
    /// window without recording a preference.
    pub fn on_dismiss(
        &mut self,
        store: &mut PreferenceStore,
        clock: &dyn Clock,
        sink: &mut dyn DocumentSink,
    ) -> bool {
        if self.visible_suggestion().is_none() {
            return false;
        }
        info!("Visitor dismissed the language suggestion");
        self.silence_for(store, clock.now(), self.dismiss_window);
        self.hide(sink);
        true
    }

    fn visible_suggestion(&self) -> Option<(LocaleCode, String)> {
        if !self.prompt_visible {
            debug!("Ignoring suggestion command: no prompt is showing");
            return None;
        }
        match &self.evaluated {
            Some(Action::Suggest {
                locale, target_href, ..
            }) => Some((*locale, target_href.clone())),
            _ => None,
        }
    }

    fn silence_for(&self, store: &mut PreferenceStore, now: DateTime<Utc>, window: Option<Duration>) {
        match window.and_then(|window| now.checked_add_signed(window)) {
            Some(until) => open_dismissal_window(store, &self.keys, until),
            None => warn!("Dismissal window is out of range; not recording it"),
        }
    }

    fn hide(&mut self, sink: &mut dyn DocumentSink) {
        sink.hide_prompt(PromptKind::LocaleSuggestion);
        self.prompt_visible = false;
    }
}

fn window(days: i64) -> Option<Duration> {
    let window = Duration::try_days(days);
    if window.is_none() {
        warn!("Window of {} days is out of range", days);
    }
    window
}

/// Stored locale preference, if present and supported.
pub fn stored_preference(store: &PreferenceStore, keys: &PreferenceKeys) -> Option<LocaleCode> {
    let raw = store.get(&keys.locale)?;
    let locale = LocaleCode::from_tag(&raw);
    if locale.is_none() {
        debug!("Ignoring unsupported stored locale '{}'", raw);
    }
    locale
}

/// Whether a dismissal window is open at `now`. Missing, malformed and past
/// expiries all count as closed; an expiry beyond the calendar's range is
/// open.
pub fn dismissal_active(store: &PreferenceStore, keys: &PreferenceKeys, now: DateTime<Utc>) -> bool {
    let Some(raw) = store.get(&keys.dismiss_until) else {
        return false;
    };
    let Ok(ms) = raw.trim().parse::<i64>() else {
        debug!("Ignoring malformed dismissal expiry '{}'", raw);
        return false;
    };

    match Utc.timestamp_millis_opt(ms).single() {
        Some(until) => now < until,
        None => ms > 0,
    }
}

fn open_dismissal_window(store: &mut PreferenceStore, keys: &PreferenceKeys, until: DateTime<Utc>) {
    store.set(&keys.dismiss_until, &until.timestamp_millis().to_string());
}
