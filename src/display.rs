//! Derivation of the rendered status panel fields from push messages.
//!
//! The shell binds three observable fields (style class, title markup,
//! description markup) into the widget anchor. Each accepted message
//! derives a complete fresh [`DisplayState`]; nothing is carried over from
//! the previous message, so stale error text cannot outlive the state
//! that produced it.

use serde::Serialize;

use crate::messages::{ConnectionStatus, ConnectionStatusMessage};

/// The three observable fields the shell renders into the widget anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    /// Style-selector class, e.g. `status-connected`.
    pub status_class: String,
    /// Short markup fragment summarizing the current state.
    pub title: String,
    /// Longer markup fragment with details and remediation text.
    pub description: String,
}

impl Default for DisplayState {
    /// State shown before the first push message arrives.
    fn default() -> Self {
        Self {
            status_class: ConnectionStatus::Unknown.css_class().to_string(),
            title: r#"<span class="text-muted">Waiting for status</span>"#.to_string(),
            description: "The cloud connector has not reported a state yet.".to_string(),
        }
    }
}

impl DisplayState {
    /// Derive the display fields for one push message.
    ///
    /// Pure and idempotent: the same message always yields the same state.
    /// Returns `None` for a status this build doesn't recognize; the
    /// caller keeps the current state untouched.
    pub fn for_message(message: &ConnectionStatusMessage) -> Option<DisplayState> {
        let (title, description) = match message.status {
            ConnectionStatus::Connecting => (
                warning_title("Connecting&hellip;"),
                format!(
                    "Establishing a link to the cloud service.{}",
                    error_detail(message.error.as_deref())
                ),
            ),
            ConnectionStatus::Connected => (
                success_title("Connected"),
                "The cloud link is up. Click the icon to open the remote view.".to_string(),
            ),
            ConnectionStatus::Disconnecting => (
                warning_title("Disconnecting&hellip;"),
                "Closing the link to the cloud service.".to_string(),
            ),
            ConnectionStatus::Disconnected => disconnected_fields(message),
            ConnectionStatus::Unknown => return None,
        };

        Some(DisplayState {
            status_class: message.status.css_class().to_string(),
            title,
            description,
        })
    }
}

/// Disconnected renders two ways: with an error it is a connection
/// failure (error styling, advise plus the raw error), without one it is
/// an ordinary disconnect (warning styling, advise only).
fn disconnected_fields(message: &ConnectionStatusMessage) -> (String, String) {
    let advise = message
        .advise
        .as_deref()
        .map(escape_html)
        .unwrap_or_default();

    match message.error.as_deref() {
        Some(error) => (
            error_title("Connection error"),
            format!("{advise}{}", error_detail(Some(error))),
        ),
        None => (warning_title("Disconnected"), advise),
    }
}

fn warning_title(text: &str) -> String {
    format!(r#"<span class="text-warning">{text}</span>"#)
}

fn success_title(text: &str) -> String {
    format!(r#"<span class="text-success">{text}</span>"#)
}

fn error_title(text: &str) -> String {
    format!(r#"<span class="text-error">{text}</span>"#)
}

/// Markup block carrying the raw connector error, appended to the fixed
/// description text. Empty when there is no error to show.
fn error_detail(error: Option<&str>) -> String {
    match error {
        Some(error) => format!(
            r#"<pre class="status-error-detail">{}</pre>"#,
            escape_html(error)
        ),
        None => String::new(),
    }
}

/// Minimal HTML escaping for connector-supplied text interpolated into
/// markup fragments.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
