//! Page-view simulator: runs one session against a JSON state file.
//!
//! Usage:
//!   site-prefs                          # load the page described by the environment
//!   site-prefs stay                     # load it, then click "Stay here"
//!   site-prefs cookie-settings decline  # reopen consent, then decline analytics
//!
//! Commands run in order within the same page view.
//!
//! Page inputs (environment):
//! - PAGE_URL (defaults to https://example.com/)
//! - PAGE_LANG, the document's lang attribute
//! - BROWSER_LANGUAGES, comma separated, most preferred first
//! - PAGE_ALTERNATES, comma separated `lang=href` pairs
//! - DO_NOT_TRACK, raw browser value ("1", "0", ...)
//! - STATE_FILE (defaults to site-prefs-state.json)

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use site_prefs::clock::SystemClock;
use site_prefs::config::Config;
use site_prefs::document::RecordingDocument;
use site_prefs::page::{DoNotTrack, PageContext, PageLocation};
use site_prefs::session::{Command, Session};
use site_prefs::storage::{FileStorage, PreferenceStore};

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays a clean JSON report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("site_prefs=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let page = page_from_env()?;
    let commands = Command::parse_all(std::env::args().skip(1))?;

    let state_file =
        std::env::var("STATE_FILE").unwrap_or_else(|_| "site-prefs-state.json".to_string());
    let storage = FileStorage::new(state_file);
    info!("Using state file {}", storage.path().display());
    let store = PreferenceStore::new(storage);

    let mut session = Session::new(&config, &page, store, SystemClock);
    let mut document = RecordingDocument::new();

    let page_load = session.load(&mut document);
    let command_outcomes: Vec<_> = commands
        .into_iter()
        .map(|command| session.dispatch(command, &mut document))
        .collect();

    let report = json!({
        "page_load": page_load,
        "commands": command_outcomes,
        "switcher": session.switcher_links(),
        "consent_decision": session.consent_decision(),
        "document": document,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn page_from_env() -> Result<PageContext> {
    let url = std::env::var("PAGE_URL").unwrap_or_else(|_| "https://example.com/".to_string());
    let location =
        PageLocation::parse(&url).with_context(|| format!("PAGE_URL is not a valid URL: {}", url))?;

    let mut page = PageContext::new(location);

    if let Ok(lang) = std::env::var("PAGE_LANG") {
        page = page.with_document_lang(&lang);
    }

    if let Ok(languages) = std::env::var("BROWSER_LANGUAGES") {
        let languages: Vec<&str> = split_list(&languages).collect();
        page = page.with_browser_languages(&languages);
    }

    if let Ok(alternates) = std::env::var("PAGE_ALTERNATES") {
        for pair in split_list(&alternates) {
            let (lang, href) = pair
                .split_once('=')
                .with_context(|| format!("PAGE_ALTERNATES entry must be lang=href, got '{}'", pair))?;
            page = page.with_alternate(lang.trim(), href.trim());
        }
    }

    let dnt = std::env::var("DO_NOT_TRACK").ok();
    page = page.with_do_not_track(DoNotTrack::from_signals(&[dnt.as_deref()]));

    Ok(page)
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
