//! The status widget controller.
//!
//! Owns the rendered display state and wires the two derivation cores
//! (display fields, version comparison) to the shell: registers as a
//! view-model, consumes the plugin push channel, runs the host
//! compatibility gate on login, and fires the one-shot status refresh
//! after startup.

use std::cmp::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::WidgetSettings;
use crate::display::DisplayState;
use crate::host::{
    HOST_VERSION_POINTER, HostClient, Notification, NotificationSink, Severity,
    ViewModelRegistration,
};
use crate::messages::ConnectionStatusMessage;
use crate::version::{CompareOptions, compare_versions};

/// View-model name the shell knows the widget by.
const VIEW_MODEL_NAME: &str = "cloudlink_status";

/// Element the shell renders the display fields into.
const ANCHOR_SELECTOR: &str = "#sidebar_plugin_cloudlink";

/// Auto-dismiss delay for the outdated-host warning.
const COMPAT_WARNING_TIMEOUT_MS: u64 = 10_000;

pub struct StatusWidget {
    settings: WidgetSettings,
    host: Arc<dyn HostClient>,
    notifications: Arc<dyn NotificationSink>,
    /// Replaced wholesale on every accepted message, so a reader never
    /// sees a mix of old and new fields.
    display: RwLock<DisplayState>,
    http: reqwest::Client,
}

impl StatusWidget {
    pub fn new(
        settings: WidgetSettings,
        host: Arc<dyn HostClient>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            settings,
            host,
            notifications,
            display: RwLock::new(DisplayState::default()),
            http: reqwest::Client::new(),
        }
    }

    /// Registration payload for the shell's view-model system.
    pub fn registration(&self) -> ViewModelRegistration {
        ViewModelRegistration {
            name: VIEW_MODEL_NAME.to_string(),
            dependencies: vec!["settings".to_string(), "login-state".to_string()],
            anchor: ANCHOR_SELECTOR.to_string(),
        }
    }

    /// Consistent snapshot of the three rendered fields.
    pub fn display(&self) -> DisplayState {
        self.display.read().clone()
    }

    /// Inbound push-message channel.
    ///
    /// Messages addressed to other plugins are dropped without touching
    /// any state. A payload that doesn't decode, or that carries a status
    /// this build doesn't know, leaves the current display untouched.
    pub fn on_plugin_message(&self, plugin: &str, payload: serde_json::Value) {
        if plugin != self.settings.plugin_identifier {
            return;
        }

        let message: ConnectionStatusMessage = match serde_json::from_value(payload) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("undecodable status payload: {e}");
                return;
            }
        };

        if let Some(next) = DisplayState::for_message(&message) {
            *self.display.write() = next;
        }
    }

    /// Login handler: one compatibility check per login.
    ///
    /// A failed system-information round trip ends the check silently;
    /// there is no retry and nothing user-visible for that session.
    pub async fn on_user_logged_in(&self) {
        let info = match self.host.system_info().await {
            Ok(info) => info,
            Err(e) => {
                tracing::debug!("host system info unavailable, skipping version check: {e}");
                return;
            }
        };

        let Some(host_version) = info.pointer(HOST_VERSION_POINTER).and_then(|v| v.as_str())
        else {
            tracing::debug!("system info has no version at {HOST_VERSION_POINTER}");
            return;
        };

        self.check_host_compatibility(host_version);
    }

    /// Compare the reported host version against the configured minimum
    /// and raise one warning when the host is too old. An undecidable
    /// comparison never gates.
    fn check_host_compatibility(&self, host_version: &str) {
        let minimum = &self.settings.min_host_version;
        let options = CompareOptions {
            zero_extend: true,
            ..CompareOptions::default()
        };

        match compare_versions(host_version, minimum, options) {
            Some(Ordering::Less) => {
                tracing::warn!(
                    "host version {host_version} is below the supported minimum {minimum}"
                );
                self.notifications.notify(Notification::new(
                    "Unsupported host version",
                    format!(
                        "The host reports version {host_version}, but this plugin requires at \
                         least {minimum}. Update the host to restore cloud connectivity features."
                    ),
                    Severity::Error,
                    COMPAT_WARNING_TIMEOUT_MS,
                ));
            }
            Some(_) => {}
            None => {
                tracing::debug!(
                    "cannot compare host version {host_version:?} against minimum {minimum:?}"
                );
            }
        }
    }

    /// Startup handler: one plain GET against the plugin status endpoint
    /// to nudge the connector into re-announcing its state. The response
    /// is ignored; failures are logged and never surfaced.
    pub async fn on_startup_complete(&self) {
        if let Err(e) = self.http.get(&self.settings.status_refresh_url).send().await {
            tracing::debug!("status refresh request failed: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Host double returning a canned system-information document.
    struct FakeHost {
        info: Result<serde_json::Value, String>,
    }

    impl FakeHost {
        fn with_version(version: &str) -> Self {
            Self {
                info: Ok(json!({ "systeminfo": { "version": version } })),
            }
        }
    }

    #[async_trait]
    impl HostClient for FakeHost {
        async fn system_info(&self) -> Result<serde_json::Value> {
            match &self.info {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(anyhow::anyhow!(e.clone())),
            }
        }
    }

    /// Sink double recording every notification it receives.
    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<Notification>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notification: Notification) {
            self.seen.lock().push(notification);
        }
    }

    fn widget_with(host: FakeHost) -> (StatusWidget, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let widget = StatusWidget::new(WidgetSettings::default(), Arc::new(host), sink.clone());
        (widget, sink)
    }

    fn widget() -> (StatusWidget, Arc<RecordingSink>) {
        widget_with(FakeHost::with_version("1.9.3"))
    }

    // -- Push channel --

    #[test]
    fn starts_on_the_waiting_placeholder() {
        let (widget, _) = widget();
        assert_eq!(widget.display(), DisplayState::default());
    }

    #[test]
    fn accepted_message_updates_all_three_fields() {
        let (widget, _) = widget();
        widget.on_plugin_message("cloudlink", json!({ "status": "connected" }));
        let state = widget.display();
        assert_eq!(state.status_class, "status-connected");
        assert!(state.title.contains("Connected"));
        assert!(state.description.contains("Click the icon"));
    }

    #[test]
    fn message_for_another_plugin_is_ignored() {
        let (widget, _) = widget();
        widget.on_plugin_message("other_plugin", json!({ "status": "connected" }));
        assert_eq!(widget.display(), DisplayState::default());
    }

    #[test]
    fn unknown_status_keeps_the_previous_state() {
        let (widget, _) = widget();
        widget.on_plugin_message("cloudlink", json!({ "status": "connecting" }));
        let before = widget.display();
        widget.on_plugin_message("cloudlink", json!({ "status": "warp-drive" }));
        assert_eq!(widget.display(), before);
    }

    #[test]
    fn undecodable_payload_keeps_the_previous_state() {
        let (widget, _) = widget();
        widget.on_plugin_message("cloudlink", json!({ "status": "connecting" }));
        let before = widget.display();
        widget.on_plugin_message("cloudlink", json!("just a string"));
        assert_eq!(widget.display(), before);
    }

    #[test]
    fn reconnect_clears_stale_error_text() {
        let (widget, _) = widget();
        widget.on_plugin_message(
            "cloudlink",
            json!({ "status": "disconnected", "error": "timeout", "advise": "check network" }),
        );
        assert!(widget.display().description.contains("timeout"));

        widget.on_plugin_message("cloudlink", json!({ "status": "connected" }));
        let state = widget.display();
        assert!(!state.description.contains("timeout"));
        assert!(!state.description.contains("check network"));
    }

    #[test]
    fn disconnected_with_error_renders_error_title() {
        let (widget, _) = widget();
        widget.on_plugin_message(
            "cloudlink",
            json!({ "status": "disconnected", "error": "timeout", "advise": "check network" }),
        );
        let state = widget.display();
        assert!(state.title.contains("Connection error"));
        assert!(state.description.contains("check network"));
        assert!(state.description.contains("timeout"));
    }

    // -- Compatibility gate --

    #[tokio::test]
    async fn outdated_host_raises_one_error_notification() {
        let (widget, sink) = widget_with(FakeHost::with_version("1.7.9"));
        widget.on_user_logged_in().await;

        let seen = sink.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].severity, Severity::Error);
        assert_eq!(seen[0].timeout_ms, COMPAT_WARNING_TIMEOUT_MS);
        assert!(seen[0].body.contains("1.7.9"));
        assert!(seen[0].body.contains("1.8"));
    }

    #[tokio::test]
    async fn newer_host_raises_nothing() {
        let (widget, sink) = widget_with(FakeHost::with_version("1.8.1"));
        widget.on_user_logged_in().await;
        assert!(sink.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn host_at_exact_minimum_raises_nothing() {
        // zero-extension makes "1.8.0" equal to the "1.8" minimum
        let (widget, sink) = widget_with(FakeHost::with_version("1.8.0"));
        widget.on_user_logged_in().await;
        assert!(sink.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn unparseable_host_version_never_gates() {
        let (widget, sink) = widget_with(FakeHost::with_version("1.8rc1"));
        widget.on_user_logged_in().await;
        assert!(sink.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn missing_version_field_skips_the_check() {
        let (widget, sink) = widget_with(FakeHost {
            info: Ok(json!({ "systeminfo": {} })),
        });
        widget.on_user_logged_in().await;
        assert!(sink.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_round_trip_skips_the_check() {
        let (widget, sink) = widget_with(FakeHost {
            info: Err("host unreachable".to_string()),
        });
        widget.on_user_logged_in().await;
        assert!(sink.seen.lock().is_empty());
    }

    // -- Registration --

    #[test]
    fn registration_declares_settings_and_login_state() {
        let (widget, _) = widget();
        let reg = widget.registration();
        assert_eq!(reg.name, "cloudlink_status");
        assert_eq!(reg.dependencies, vec!["settings", "login-state"]);
        assert_eq!(reg.anchor, "#sidebar_plugin_cloudlink");
    }

    // -- Status refresh --

    #[tokio::test]
    async fn startup_fires_one_get_against_the_status_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let refresh = server
            .mock("GET", "/api/plugin/cloudlink/status")
            .with_status(204)
            .create_async()
            .await;

        let settings = WidgetSettings {
            status_refresh_url: format!("{}/api/plugin/cloudlink/status", server.url()),
            ..WidgetSettings::default()
        };
        let widget = StatusWidget::new(
            settings,
            Arc::new(FakeHost::with_version("1.9.0")),
            Arc::new(RecordingSink::default()),
        );

        widget.on_startup_complete().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn startup_refresh_failure_is_silent() {
        let settings = WidgetSettings {
            // Nothing listens here; the request fails and that is fine.
            status_refresh_url: "http://127.0.0.1:9/api/plugin/cloudlink/status".to_string(),
            ..WidgetSettings::default()
        };
        let widget = StatusWidget::new(
            settings,
            Arc::new(FakeHost::with_version("1.9.0")),
            Arc::new(RecordingSink::default()),
        );
        widget.on_startup_complete().await;
    }
}
