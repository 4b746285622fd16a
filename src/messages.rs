//! Wire shapes for push messages delivered over the shell's plugin channel.
//!
//! The cloud connector announces every connection state change as a small
//! JSON payload. All fields default so a partially populated payload still
//! decodes; an unknown status string decodes to [`ConnectionStatus::Unknown`]
//! instead of failing the whole message.

use serde::{Deserialize, Serialize};

/// Connection lifecycle states the cloud connector reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnecting,
    Disconnected,
    /// Catch-all for wire values this build doesn't know. Produces no
    /// display transition.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConnectionStatus {
    /// Style-selector class the render layer attaches to the widget root.
    pub fn css_class(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "status-connecting",
            ConnectionStatus::Connected => "status-connected",
            ConnectionStatus::Disconnecting => "status-disconnecting",
            ConnectionStatus::Disconnected => "status-disconnected",
            ConnectionStatus::Unknown => "status-unknown",
        }
    }
}

/// One push message describing the current cloud connection state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionStatusMessage {
    pub status: ConnectionStatus,
    /// Human-readable error text from the connector, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Remediation hint to show alongside the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advise: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
