//! Analytics consent decision and the prompt that collects it.
//!
//! The decision moves from `unset` to `granted` or `denied` and is persisted.
//! The settings prompt can be reopened at any time, and answering it again
//! replaces the stored decision.
//!
//! A visitor whose browser sends "do not track" and who has never answered is
//! neither prompted nor tracked. Nothing is persisted in that case, so the
//! prompt returns in a later session without the signal.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::AnalyticsLoader;
use crate::clock::Clock;
use crate::config::Config;
use crate::document::{ConsentPrompt, DocumentSink, Prompt, PromptKind};
use crate::i18n::LocaleCode;
use crate::page::{DoNotTrack, PageContext};
use crate::storage::PreferenceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentDecision {
    #[default]
    Unset,
    Granted,
    Denied,
}

impl ConsentDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentDecision::Unset => "unset",
            ConsentDecision::Granted => "granted",
            ConsentDecision::Denied => "denied",
        }
    }

    /// Interpret a stored value; anything but `granted`/`denied` is unset.
    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(|r| r.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for ConsentDecision {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "granted" => Ok(ConsentDecision::Granted),
            "denied" => Ok(ConsentDecision::Denied),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ConsentDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the gate did on a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentOutcome {
    /// Analytics turned on
    Enabled,
    /// Analytics turned off and its cookies expired
    Disabled,
    /// Undecided visitor with "do not track": no prompt, no tracking
    Suppressed,
    /// Consent prompt shown
    Prompted,
    /// No analytics identifier configured; the gate does nothing
    Inactive,
    /// Command arrived while no consent prompt was showing
    Ignored,
}

pub struct ConsentGate {
    key: String,
    loader: Option<AnalyticsLoader>,
    locale: LocaleCode,
    hostname: String,
    do_not_track: DoNotTrack,
    prompt_visible: bool,
}

impl ConsentGate {
    pub fn new(config: &Config, page: &PageContext, locale: LocaleCode) -> Self {
        Self {
            key: config.keys.analytics_consent.clone(),
            loader: config
                .analytics_measurement_id
                .as_deref()
                .map(|id| AnalyticsLoader::new(id, &config.analytics_tag_host)),
            locale,
            hostname: page.location.hostname().to_string(),
            do_not_track: page.do_not_track,
            prompt_visible: false,
        }
    }

    pub fn decision(&self, store: &PreferenceStore) -> ConsentDecision {
        ConsentDecision::from_stored(store.get(&self.key).as_deref())
    }

    pub fn loader(&self) -> Option<&AnalyticsLoader> {
        self.loader.as_ref()
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    /// Apply the stored decision for this page view.
    pub fn on_load(
        &mut self,
        store: &PreferenceStore,
        sink: &mut dyn DocumentSink,
        clock: &dyn Clock,
    ) -> ConsentOutcome {
        let decision = self.decision(store);
        let hostname = self.hostname.clone();
        let Some(loader) = self.loader.as_mut() else {
            debug!("No analytics identifier configured, consent gate inactive");
            return ConsentOutcome::Inactive;
        };

        match decision {
            ConsentDecision::Granted => {
                loader.enable(sink, clock.now());
                ConsentOutcome::Enabled
            }
            ConsentDecision::Denied => {
                loader.disable(sink, &hostname);
                ConsentOutcome::Disabled
            }
            ConsentDecision::Unset if self.do_not_track.is_asserted() => {
                info!("Do-not-track asserted, skipping consent prompt");
                ConsentOutcome::Suppressed
            }
            ConsentDecision::Unset => self.open_settings(sink),
        }
    }

    /// Show the consent prompt, whatever was decided before.
    pub fn open_settings(&mut self, sink: &mut dyn DocumentSink) -> ConsentOutcome {
        if self.loader.is_none() {
            return ConsentOutcome::Inactive;
        }
        sink.render_prompt(&Prompt::Consent(self.prompt()));
        self.prompt_visible = true;
        ConsentOutcome::Prompted
    }

    pub fn accept(
        &mut self,
        store: &mut PreferenceStore,
        sink: &mut dyn DocumentSink,
        clock: &dyn Clock,
    ) -> ConsentOutcome {
        if !self.take_prompt(sink) {
            return ConsentOutcome::Ignored;
        }
        store.set(&self.key, ConsentDecision::Granted.as_str());
        match self.loader.as_mut() {
            Some(loader) => {
                loader.enable(sink, clock.now());
                ConsentOutcome::Enabled
            }
            None => ConsentOutcome::Inactive,
        }
    }

    pub fn decline(&mut self, store: &mut PreferenceStore, sink: &mut dyn DocumentSink) -> ConsentOutcome {
        if !self.take_prompt(sink) {
            return ConsentOutcome::Ignored;
        }
        store.set(&self.key, ConsentDecision::Denied.as_str());
        let hostname = self.hostname.clone();
        match self.loader.as_mut() {
            Some(loader) => {
                loader.disable(sink, &hostname);
                ConsentOutcome::Disabled
            }
            None => ConsentOutcome::Inactive,
        }
    }

    /// Consent prompt in the current page's language.
    pub fn prompt(&self) -> ConsentPrompt {
        let strings = self.locale.strings();
        ConsentPrompt {
            title: strings.consent_title.to_string(),
            text: strings.consent_text.to_string(),
            accept_label: strings.consent_accept.to_string(),
            decline_label: strings.consent_decline.to_string(),
            learn_more_label: strings.consent_learn_more.to_string(),
            privacy_href: format!("{}privacy/", self.locale.canonical_path()),
        }
    }

    fn take_prompt(&mut self, sink: &mut dyn DocumentSink) -> bool {
        if !self.prompt_visible {
            debug!("Ignoring consent command: no prompt is showing");
            return false;
        }
        sink.hide_prompt(PromptKind::Consent);
        self.prompt_visible = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::document::RecordingDocument;
    use crate::page::PageLocation;
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};

    // ==================== Test Helpers ====================

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
    }

    fn config() -> Config {
        Config::default().with_measurement_id("G-TEST123")
    }

    fn page() -> PageContext {
        PageContext::new(PageLocation::parse("https://www.example.com/de/").unwrap())
    }

    fn gate(page: &PageContext) -> ConsentGate {
        ConsentGate::new(&config(), page, LocaleCode::GERMAN)
    }

    fn store_with(value: &str) -> PreferenceStore {
        PreferenceStore::new(MemoryStorage::new().with_item(&config().keys.analytics_consent, value))
    }

    // ==================== ConsentDecision Tests ====================

    #[test]
    fn test_decision_from_stored() {
        assert_eq!(ConsentDecision::from_stored(Some("granted")), ConsentDecision::Granted);
        assert_eq!(ConsentDecision::from_stored(Some("denied")), ConsentDecision::Denied);
        assert_eq!(ConsentDecision::from_stored(Some("GRANTED")), ConsentDecision::Unset);
        assert_eq!(ConsentDecision::from_stored(Some("yes")), ConsentDecision::Unset);
        assert_eq!(ConsentDecision::from_stored(None), ConsentDecision::Unset);
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(ConsentDecision::Denied.to_string(), "denied");
    }

    // ==================== on_load Tests ====================

    #[test]
    fn test_granted_enables_on_load() {
        let page = page();
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();

        let outcome = gate.on_load(&store_with("granted"), &mut doc, &clock());
        assert_eq!(outcome, ConsentOutcome::Enabled);
        assert_eq!(doc.count_scripts(), 1);
        assert!(doc.visible_prompts.is_empty());
    }

    #[test]
    fn test_denied_disables_on_load() {
        let page = page();
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();

        let outcome = gate.on_load(&store_with("denied"), &mut doc, &clock());
        assert_eq!(outcome, ConsentOutcome::Disabled);
        assert_eq!(doc.count_scripts(), 0);
        assert_eq!(doc.cookie_writes.len(), 12);
        assert!(doc.visible_prompts.is_empty());
    }

    #[test]
    fn test_unset_prompts_in_page_language() {
        let page = page();
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();
        let store = PreferenceStore::new(MemoryStorage::new());

        let outcome = gate.on_load(&store, &mut doc, &clock());
        assert_eq!(outcome, ConsentOutcome::Prompted);

        let Some(Prompt::Consent(prompt)) = doc.visible(PromptKind::Consent) else {
            panic!("consent prompt should be visible");
        };
        assert_eq!(prompt.accept_label, "Akzeptieren");
        assert_eq!(prompt.privacy_href, "/de/privacy/");
        assert!(doc.commands.is_empty());
        assert!(doc.cookie_writes.is_empty());
    }

    #[test]
    fn test_unset_with_dnt_is_suppressed() {
        let page = page().with_do_not_track(DoNotTrack::Enabled);
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();
        let store = PreferenceStore::new(MemoryStorage::new());

        let outcome = gate.on_load(&store, &mut doc, &clock());
        assert_eq!(outcome, ConsentOutcome::Suppressed);
        assert!(doc.visible_prompts.is_empty());
        assert!(doc.flags.is_empty());
        assert!(doc.cookie_writes.is_empty());
        assert_eq!(gate.decision(&store), ConsentDecision::Unset);
    }

    #[test]
    fn test_dnt_ignored_once_decided() {
        let page = page().with_do_not_track(DoNotTrack::Enabled);
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();

        let outcome = gate.on_load(&store_with("granted"), &mut doc, &clock());
        assert_eq!(outcome, ConsentOutcome::Enabled);
    }

    #[test]
    fn test_without_measurement_id_gate_is_inactive() {
        let page = page();
        let mut gate = ConsentGate::new(&Config::default(), &page, LocaleCode::ENGLISH);
        let mut doc = RecordingDocument::new();

        let outcome = gate.on_load(&store_with("granted"), &mut doc, &clock());
        assert_eq!(outcome, ConsentOutcome::Inactive);
        assert_eq!(gate.open_settings(&mut doc), ConsentOutcome::Inactive);
        assert!(doc.visible_prompts.is_empty());
        assert!(doc.commands.is_empty());
    }

    // ==================== Command Tests ====================

    #[test]
    fn test_accept_persists_and_enables() {
        let page = page();
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();
        let mut store = PreferenceStore::new(MemoryStorage::new());
        gate.on_load(&store, &mut doc, &clock());

        let outcome = gate.accept(&mut store, &mut doc, &clock());
        assert_eq!(outcome, ConsentOutcome::Enabled);
        assert_eq!(gate.decision(&store), ConsentDecision::Granted);
        assert!(doc.visible_prompts.is_empty());
        assert!(gate.loader().unwrap().is_active());
    }

    #[test]
    fn test_decline_persists_and_disables() {
        let page = page();
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();
        let mut store = PreferenceStore::new(MemoryStorage::new());
        gate.on_load(&store, &mut doc, &clock());

        let outcome = gate.decline(&mut store, &mut doc);
        assert_eq!(outcome, ConsentOutcome::Disabled);
        assert_eq!(gate.decision(&store), ConsentDecision::Denied);
        assert_eq!(doc.flags.get("ga-disable-G-TEST123"), Some(&true));
    }

    #[test]
    fn test_commands_without_prompt_are_ignored() {
        let page = page();
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();
        let mut store = store_with("denied");
        gate.on_load(&store, &mut doc, &clock());

        assert_eq!(gate.accept(&mut store, &mut doc, &clock()), ConsentOutcome::Ignored);
        assert_eq!(gate.decision(&store), ConsentDecision::Denied);
    }

    #[test]
    fn test_settings_reopen_and_revoke() {
        let page = page();
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();
        let mut store = store_with("granted");
        gate.on_load(&store, &mut doc, &clock());

        assert_eq!(gate.open_settings(&mut doc), ConsentOutcome::Prompted);
        assert!(doc.visible(PromptKind::Consent).is_some());

        assert_eq!(gate.decline(&mut store, &mut doc), ConsentOutcome::Disabled);
        assert_eq!(gate.decision(&store), ConsentDecision::Denied);
        assert!(!gate.loader().unwrap().is_active());
    }

    #[test]
    fn test_storage_failure_still_applies_choice_for_this_page() {
        let page = page();
        let mut gate = gate(&page);
        let mut doc = RecordingDocument::new();
        let mut store = PreferenceStore::new(MemoryStorage::unavailable());
        gate.on_load(&store, &mut doc, &clock());

        assert_eq!(gate.accept(&mut store, &mut doc, &clock()), ConsentOutcome::Enabled);
        assert_eq!(gate.decision(&store), ConsentDecision::Unset);
        assert_eq!(doc.count_scripts(), 1);
    }
}
