//! Effects the engine asks the page to perform.
//!
//! The engine never touches markup, cookies or navigation itself. It describes
//! what should happen through [`DocumentSink`], and whatever owns the page
//! carries it out. [`RecordingDocument`] is an in-memory sink that simply
//! remembers every effect.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::i18n::LocaleCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    LocaleSuggestion,
    Consent,
}

/// Content of the "switch language?" prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionPrompt {
    pub target: LocaleCode,
    pub message: String,
    pub target_href: String,
    pub switch_label: String,
    pub stay_label: String,
    pub dismiss_label: String,
}

/// Content of the analytics consent prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsentPrompt {
    pub title: String,
    pub text: String,
    pub accept_label: String,
    pub decline_label: String,
    pub learn_more_label: String,
    pub privacy_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    LocaleSuggestion(SuggestionPrompt),
    Consent(ConsentPrompt),
}

impl Prompt {
    pub fn kind(&self) -> PromptKind {
        match self {
            Prompt::LocaleSuggestion(_) => PromptKind::LocaleSuggestion,
            Prompt::Consent(_) => PromptKind::Consent,
        }
    }
}

/// A resource-loading element in the page head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    /// `<link rel="preconnect" crossorigin="anonymous">`
    Preconnect { href: String },
    /// `<script async src="...">`
    Script { src: String },
}

/// A call into the vendor's command queue, e.g. `gtag("config", id, {...})`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsCommand {
    pub name: String,
    pub args: Vec<Value>,
}

impl AnalyticsCommand {
    pub fn new(name: &str, args: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            args,
        }
    }
}

/// Instruction to expire one cookie, optionally scoped to a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective {
    pub name: String,
    pub domain: Option<String>,
}

impl CookieDirective {
    pub fn expire(name: &str, domain: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            domain: domain.map(str::to_string),
        }
    }
}

impl fmt::Display for CookieDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=; Max-Age=0; path=/", self.name)?;
        if let Some(domain) = &self.domain {
            write!(f, "; domain={}", domain)?;
        }
        Ok(())
    }
}

/// Capability interface for page side effects.
pub trait DocumentSink {
    /// Show a prompt. A prompt of the same kind already on screen is replaced.
    fn render_prompt(&mut self, prompt: &Prompt);
    fn hide_prompt(&mut self, kind: PromptKind);
    fn navigate(&mut self, href: &str);
    fn has_resource(&self, resource: &Resource) -> bool;
    fn inject_resource(&mut self, resource: Resource);
    /// Set a page-global boolean the vendor script reads (e.g. `ga-disable-<id>`).
    fn set_flag(&mut self, name: &str, value: bool);
    fn push_command(&mut self, command: AnalyticsCommand);
    fn write_cookie(&mut self, directive: &CookieDirective);
}

/// Sink that records effects in memory.
#[derive(Debug, Default, Serialize)]
pub struct RecordingDocument {
    pub visible_prompts: Vec<Prompt>,
    pub render_count: usize,
    pub navigations: Vec<String>,
    pub resources: Vec<Resource>,
    pub flags: BTreeMap<String, bool>,
    pub commands: Vec<AnalyticsCommand>,
    pub cookie_writes: Vec<String>,
}

impl RecordingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self, kind: PromptKind) -> Option<&Prompt> {
        self.visible_prompts.iter().find(|p| p.kind() == kind)
    }

    pub fn count_scripts(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| matches!(r, Resource::Script { .. }))
            .count()
    }

    pub fn count_preconnects(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| matches!(r, Resource::Preconnect { .. }))
            .count()
    }
}

impl DocumentSink for RecordingDocument {
    fn render_prompt(&mut self, prompt: &Prompt) {
        self.hide_prompt(prompt.kind());
        self.visible_prompts.push(prompt.clone());
        self.render_count += 1;
    }

    fn hide_prompt(&mut self, kind: PromptKind) {
        self.visible_prompts.retain(|p| p.kind() != kind);
    }

    fn navigate(&mut self, href: &str) {
        self.navigations.push(href.to_string());
    }

    fn has_resource(&self, resource: &Resource) -> bool {
        self.resources.contains(resource)
    }

    fn inject_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    fn set_flag(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }

    fn push_command(&mut self, command: AnalyticsCommand) {
        self.commands.push(command);
    }

    fn write_cookie(&mut self, directive: &CookieDirective) {
        self.cookie_writes.push(directive.to_string());
    }
}
