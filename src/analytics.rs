//! Switches the third-party analytics tag on and off.
//!
//! Enabling injects the vendor's preconnect hint and runtime script (each at
//! most once) and queues a privacy-restricted configuration. Disabling raises
//! the vendor's opt-out flag and expires every first-party cookie the tag
//! may have set. Both are safe to repeat.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::document::{AnalyticsCommand, CookieDirective, DocumentSink, Resource};

pub struct AnalyticsLoader {
    measurement_id: String,
    tag_host: String,
    active: bool,
}

impl AnalyticsLoader {
    pub fn new(measurement_id: &str, tag_host: &str) -> Self {
        Self {
            measurement_id: measurement_id.to_string(),
            tag_host: tag_host.trim_end_matches('/').to_string(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn measurement_id(&self) -> &str {
        &self.measurement_id
    }

    /// Page-global flag the vendor script checks before sending anything.
    pub fn disable_flag(&self) -> String {
        format!("ga-disable-{}", self.measurement_id)
    }

    pub fn script_src(&self) -> String {
        let id: String = form_urlencoded::byte_serialize(self.measurement_id.as_bytes()).collect();
        format!("{}/gtag/js?id={}", self.tag_host, id)
    }

    /// Every cookie name the tag sets for this property.
    pub fn cookie_names(&self) -> Vec<String> {
        let suffix = self
            .measurement_id
            .strip_prefix("G-")
            .unwrap_or(&self.measurement_id);
        vec![
            "_ga".to_string(),
            format!("_ga_{}", suffix),
            "_gid".to_string(),
            "_gat".to_string(),
        ]
    }

    pub fn enable(&mut self, sink: &mut dyn DocumentSink, now: DateTime<Utc>) {
        if self.active {
            debug!("Analytics already enabled");
            return;
        }

        sink.set_flag(&self.disable_flag(), false);

        let preconnect = Resource::Preconnect {
            href: self.tag_host.clone(),
        };
        if !sink.has_resource(&preconnect) {
            sink.inject_resource(preconnect);
        }

        let script = Resource::Script {
            src: self.script_src(),
        };
        if !sink.has_resource(&script) {
            sink.inject_resource(script);
        }

        sink.push_command(AnalyticsCommand::new("js", vec![json!(now.to_rfc3339())]));
        sink.push_command(AnalyticsCommand::new(
            "config",
            vec![
                json!(self.measurement_id),
                json!({
                    "anonymize_ip": true,
                    "allow_google_signals": false,
                    "allow_ad_personalization_signals": false,
                }),
            ],
        ));

        self.active = true;
        info!("Analytics enabled for {}", self.measurement_id);
    }

    pub fn disable(&mut self, sink: &mut dyn DocumentSink, hostname: &str) {
        sink.set_flag(&self.disable_flag(), true);

        let domains = cookie_domains(hostname);
        for name in self.cookie_names() {
            for domain in &domains {
                sink.write_cookie(&CookieDirective::expire(&name, domain.as_deref()));
            }
        }

        self.active = false;
        info!("Analytics disabled for {}", self.measurement_id);
    }
}

/// Domains a tracking cookie may have been scoped to: none (host-only), the
/// bare hostname, and the dotted parent-domain form when the host has a dot.
fn cookie_domains(hostname: &str) -> Vec<Option<String>> {
    let mut domains = vec![None];
    if hostname.is_empty() {
        return domains;
    }
    domains.push(Some(hostname.to_string()));
    if hostname.contains('.') {
        domains.push(Some(format!(".{}", hostname)));
    }
    domains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RecordingDocument;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn loader() -> AnalyticsLoader {
        AnalyticsLoader::new("G-TEST123", "https://www.googletagmanager.com/")
    }

    #[test]
    fn test_script_src() {
        assert_eq!(
            loader().script_src(),
            "https://www.googletagmanager.com/gtag/js?id=G-TEST123"
        );
        let odd = AnalyticsLoader::new("G-A B", "https://tags.example.com");
        assert_eq!(odd.script_src(), "https://tags.example.com/gtag/js?id=G-A+B");
    }

    #[test]
    fn test_cookie_names_strip_g_prefix() {
        assert_eq!(
            loader().cookie_names(),
            vec!["_ga", "_ga_TEST123", "_gid", "_gat"]
        );
        let legacy = AnalyticsLoader::new("UA-1", "https://tags.example.com");
        assert!(legacy.cookie_names().contains(&"_ga_UA-1".to_string()));
    }

    #[test]
    fn test_cookie_domains() {
        assert_eq!(
            cookie_domains("www.example.com"),
            vec![
                None,
                Some("www.example.com".to_string()),
                Some(".www.example.com".to_string())
            ]
        );
        assert_eq!(cookie_domains("localhost"), vec![None, Some("localhost".to_string())]);
        assert_eq!(cookie_domains(""), vec![None]);
    }

    #[test]
    fn test_enable_injects_resources_and_config() {
        let mut loader = loader();
        let mut doc = RecordingDocument::new();
        loader.enable(&mut doc, now());

        assert!(loader.is_active());
        assert_eq!(doc.flags.get("ga-disable-G-TEST123"), Some(&false));
        assert_eq!(doc.count_preconnects(), 1);
        assert_eq!(doc.count_scripts(), 1);

        let config = doc
            .commands
            .iter()
            .find(|c| c.name == "config")
            .expect("config command queued");
        assert_eq!(config.args[0], "G-TEST123");
        assert_eq!(config.args[1]["anonymize_ip"], true);
        assert_eq!(config.args[1]["allow_google_signals"], false);
        assert_eq!(config.args[1]["allow_ad_personalization_signals"], false);
    }

    #[test]
    fn test_enable_twice_injects_once() {
        let mut loader = loader();
        let mut doc = RecordingDocument::new();
        loader.enable(&mut doc, now());
        loader.enable(&mut doc, now());

        assert_eq!(doc.count_scripts(), 1);
        assert_eq!(doc.count_preconnects(), 1);
        assert_eq!(doc.commands.len(), 2);
    }

    #[test]
    fn test_reenable_after_disable_reuses_existing_elements() {
        let mut loader = loader();
        let mut doc = RecordingDocument::new();
        loader.enable(&mut doc, now());
        loader.disable(&mut doc, "example.com");
        loader.enable(&mut doc, now());

        assert!(loader.is_active());
        assert_eq!(doc.count_scripts(), 1);
        assert_eq!(doc.count_preconnects(), 1);
        assert_eq!(doc.flags.get("ga-disable-G-TEST123"), Some(&false));
    }

    #[test]
    fn test_disable_expires_every_cookie_variant() {
        let mut loader = loader();
        let mut doc = RecordingDocument::new();
        loader.disable(&mut doc, "www.example.com");

        assert!(!loader.is_active());
        assert_eq!(doc.flags.get("ga-disable-G-TEST123"), Some(&true));
        // 4 names x 3 domains
        assert_eq!(doc.cookie_writes.len(), 12);
        assert!(doc
            .cookie_writes
            .contains(&"_ga_TEST123=; Max-Age=0; path=/; domain=.www.example.com".to_string()));
        assert!(doc.cookie_writes.contains(&"_gat=; Max-Age=0; path=/".to_string()));
    }

    #[test]
    fn test_disable_twice_is_harmless() {
        let mut loader = loader();
        let mut doc = RecordingDocument::new();
        loader.disable(&mut doc, "example.com");
        loader.disable(&mut doc, "example.com");

        assert!(!loader.is_active());
        assert_eq!(doc.cookie_writes.len(), 24);
        assert_eq!(doc.count_scripts(), 0);
    }
}
