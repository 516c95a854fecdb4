//! One page view: the components wired together over shared inputs.
//!
//! A [`Session`] is built once per document load from the configuration, the
//! page inputs, the preference store and a clock. [`Session::load`] runs the
//! locale decision and the consent gate; [`Session::dispatch`] handles the
//! visitor's clicks as explicit [`Command`]s.

use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::Config;
use crate::consent::{ConsentDecision, ConsentGate, ConsentOutcome};
use crate::document::DocumentSink;
use crate::error::CommandParseError;
use crate::i18n::LocaleCode;
use crate::page::PageContext;
use crate::storage::PreferenceStore;
use crate::suggestion::{Action, LocaleSuggestionController, SwitcherLink};

/// A visitor interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Follow the language suggestion
    Switch,
    /// Keep the current edition for good
    Stay,
    /// Close the language suggestion for now
    Dismiss,
    /// Allow analytics
    Accept,
    /// Refuse analytics
    Decline,
    /// Reopen the consent prompt ("cookie settings" link)
    OpenConsentSettings,
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "switch" => Ok(Command::Switch),
            "stay" => Ok(Command::Stay),
            "dismiss" => Ok(Command::Dismiss),
            "accept" => Ok(Command::Accept),
            "decline" => Ok(Command::Decline),
            "cookie-settings" | "settings" => Ok(Command::OpenConsentSettings),
            other => Err(CommandParseError(other.to_string())),
        }
    }
}

impl Command {
    /// Parse a sequence of command names, stopping at the first unknown one.
    pub fn parse_all<I, S>(names: I) -> Result<Vec<Command>, CommandParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| name.as_ref().parse()).collect()
    }
}

/// Result of a page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLoad {
    pub locale: LocaleCode,
    pub action: Action,
    pub consent: ConsentOutcome,
}

/// Result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The page should follow this link (the switch link's own target)
    Navigate { href: String },
    /// The suggestion prompt was closed and a dismissal window opened
    SuggestionClosed,
    /// The consent gate handled the command
    Consent { result: ConsentOutcome },
    /// Nothing to act on (e.g. no prompt showing)
    Ignored,
}

pub struct Session {
    store: PreferenceStore,
    clock: Box<dyn Clock>,
    suggestion: LocaleSuggestionController,
    consent: ConsentGate,
    loaded: Option<PageLoad>,
}

impl Session {
    pub fn new(
        config: &Config,
        page: &PageContext,
        store: PreferenceStore,
        clock: impl Clock + 'static,
    ) -> Self {
        let suggestion = LocaleSuggestionController::new(config, page);
        let consent = ConsentGate::new(config, page, suggestion.current_locale());
        Self {
            store,
            clock: Box::new(clock),
            suggestion,
            consent,
            loaded: None,
        }
    }

    pub fn current_locale(&self) -> LocaleCode {
        self.suggestion.current_locale()
    }

    /// The locale decision for this page view, without touching the page.
    pub fn evaluate(&mut self) -> Action {
        self.suggestion.evaluate(&self.store, self.clock.as_ref())
    }

    /// Run the page-load flow once. Later calls return the first result
    /// without repeating any effect.
    pub fn load(&mut self, sink: &mut dyn DocumentSink) -> PageLoad {
        if let Some(loaded) = &self.loaded {
            return loaded.clone();
        }

        let action = self.evaluate();
        self.suggestion.present(sink);
        let consent = self.consent.on_load(&self.store, sink, self.clock.as_ref());

        let loaded = PageLoad {
            locale: self.current_locale(),
            action,
            consent,
        };
        info!(
            "Page load in '{}': {:?}, consent {:?}",
            loaded.locale, loaded.action, loaded.consent
        );
        self.loaded = Some(loaded.clone());
        loaded
    }

    pub fn dispatch(&mut self, command: Command, sink: &mut dyn DocumentSink) -> CommandOutcome {
        debug!("Dispatching {:?}", command);
        let clock = self.clock.as_ref();
        match command {
            Command::Switch => match self.suggestion.on_switch(&mut self.store) {
                Some(href) => CommandOutcome::Navigate { href },
                None => CommandOutcome::Ignored,
            },
            Command::Stay => {
                if self.suggestion.on_stay(&mut self.store, clock, sink) {
                    CommandOutcome::SuggestionClosed
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::Dismiss => {
                if self.suggestion.on_dismiss(&mut self.store, clock, sink) {
                    CommandOutcome::SuggestionClosed
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::Accept => consent(self.consent.accept(&mut self.store, sink, clock)),
            Command::Decline => consent(self.consent.decline(&mut self.store, sink)),
            Command::OpenConsentSettings => consent(self.consent.open_settings(sink)),
        }
    }

    pub fn switcher_links(&self) -> Vec<SwitcherLink> {
        self.suggestion.switcher_links()
    }

    pub fn consent_decision(&self) -> ConsentDecision {
        self.consent.decision(&self.store)
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    /// Hand the store back, e.g. to build the next page's session.
    pub fn into_store(self) -> PreferenceStore {
        self.store
    }
}

fn consent(result: ConsentOutcome) -> CommandOutcome {
    match result {
        ConsentOutcome::Ignored => CommandOutcome::Ignored,
        result => CommandOutcome::Consent { result },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_str() {
        assert_eq!("switch".parse::<Command>().unwrap(), Command::Switch);
        assert_eq!(" Stay ".parse::<Command>().unwrap(), Command::Stay);
        assert_eq!(
            "cookie-settings".parse::<Command>().unwrap(),
            Command::OpenConsentSettings
        );
        assert!("reload".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_all_keeps_order() {
        assert_eq!(
            Command::parse_all(["cookie-settings", "decline"]).unwrap(),
            vec![Command::OpenConsentSettings, Command::Decline]
        );
        assert_eq!(Command::parse_all(Vec::<String>::new()).unwrap(), vec![]);

        let err = Command::parse_all(["stay", "reload", "accept"]).unwrap_err();
        assert_eq!(err, CommandParseError("reload".to_string()));
    }

    #[test]
    fn test_command_outcome_serializes_with_tag() {
        let json = serde_json::to_value(CommandOutcome::Navigate {
            href: "/de/".to_string(),
        })
        .unwrap();
        assert_eq!(json["outcome"], "navigate");
        assert_eq!(json["href"], "/de/");

        let json = serde_json::to_value(CommandOutcome::Consent {
            result: ConsentOutcome::Enabled,
        })
        .unwrap();
        assert_eq!(json["result"], "enabled");
    }
}
