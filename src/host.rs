//! Collaborator interfaces of the embedding shell.
//!
//! The shell owns transport, authentication, and rendering. The widget
//! only sees the narrow capabilities below, so tests (and alternative
//! shells) can substitute doubles at construction time.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// JSON pointer into the host's system-information payload at which the
/// host version string lives.
pub const HOST_VERSION_POINTER: &str = "/systeminfo/version";

/// Notification urgency, mirrored by the shell's toast styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A display request handed to the shell's notification surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub severity: Severity,
    /// Auto-dismiss delay; the shell removes the toast after this many
    /// milliseconds.
    pub timeout_ms: u64,
    pub created_at_ms: i64,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        severity: Severity,
        timeout_ms: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            severity,
            timeout_ms,
            created_at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Host queries the widget performs. Each call is a single asynchronous
/// round trip with no retry; the widget treats a failure as "this check
/// does not run".
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Fetch the host's system-information document. The widget reads the
    /// host version from [`HOST_VERSION_POINTER`].
    async fn system_info(&self) -> Result<serde_json::Value>;
}

/// Sink for notification display requests.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Registration payload the shell consumes to bind the widget into its
/// view-model system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModelRegistration {
    pub name: String,
    /// Shell view-models this widget observes.
    pub dependencies: Vec<String>,
    /// Selector of the element the display fields are rendered into.
    pub anchor: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
