//! Widget settings persisted by the embedding shell.
//!
//! Stored as JSON in the platform config dir and written atomically (temp
//! file + rename). Every field has a default, so a missing or corrupt
//! file never blocks the widget; corrupt files are logged instead of
//! silently resetting state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file name inside the config dir.
const SETTINGS_FILE: &str = "cloudlink.json";

/// Get the config directory using the platform-appropriate location.
///
/// - macOS: `~/Library/Application Support/cloudlink/`
/// - Linux: `~/.config/cloudlink/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/cloudlink/`
///
/// Falls back to `~/.cloudlink/` if the platform dir is unavailable.
pub(crate) fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("cloudlink"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cloudlink")
        })
}

/// Settings the shell exposes on the widget's settings pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetSettings {
    /// Identifier this widget answers to on the plugin push channel.
    pub plugin_identifier: String,
    /// Oldest host version the plugin supports.
    pub min_host_version: String,
    /// Cloud endpoint handed to the transport collaborator.
    pub cloud_ws_url: String,
    /// Device pairing key for the cloud service. Sensitive; the settings
    /// file is written with owner-only permissions because of it.
    pub device_key: String,
    /// `;`-separated list of path prefixes the transport may forward.
    pub path_whitelist: String,
    /// Endpoint of the one-shot status refresh fired after startup.
    pub status_refresh_url: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            plugin_identifier: "cloudlink".to_string(),
            min_host_version: "1.8".to_string(),
            cloud_ws_url: "wss://cloud.cloudlink.io/ws".to_string(),
            device_key: String::new(),
            path_whitelist: "/api/".to_string(),
            status_refresh_url: "http://127.0.0.1:5000/api/plugin/cloudlink/status".to_string(),
        }
    }
}

impl WidgetSettings {
    /// Device key masked for display surfaces: first and last two
    /// characters kept. Keys of four characters or fewer are returned
    /// as-is (there is nothing meaningful left to mask). `None` when no
    /// key is configured.
    pub fn redacted_key(&self) -> Option<String> {
        if self.device_key.is_empty() {
            return None;
        }
        let chars: Vec<char> = self.device_key.chars().collect();
        if chars.len() <= 4 {
            return Some(self.device_key.clone());
        }
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[chars.len() - 2..].iter().collect();
        Some(format!("{head}{}{tail}", "*".repeat(chars.len() - 4)))
    }

    /// Forwarding path whitelist, split on `;` with empty entries dropped.
    pub fn whitelist(&self) -> Vec<&str> {
        self.path_whitelist
            .split(';')
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Validate that the cloud endpoint is a WebSocket URL.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.cloud_ws_url).context("invalid cloud endpoint URL")?;
        match parsed.scheme() {
            "ws" | "wss" => Ok(()),
            scheme => {
                anyhow::bail!("cloud endpoint scheme \"{scheme}\" is not allowed; use ws or wss")
            }
        }
    }
}

/// Load settings from the config dir, returning defaults if missing or
/// corrupt.
pub fn load_settings() -> WidgetSettings {
    load_from(&config_dir().join(SETTINGS_FILE))
}

pub(crate) fn load_from(path: &Path) -> WidgetSettings {
    if !path.exists() {
        return WidgetSettings::default();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(
                "could not read settings {}: {e}; using defaults",
                path.display()
            );
            return WidgetSettings::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("corrupt settings {}: {e}; using defaults", path.display());
            WidgetSettings::default()
        }
    }
}

/// Save settings atomically (temp file + rename). Sets 0600 permissions
/// on Unix because the file carries the device key.
pub fn save_settings(settings: &WidgetSettings) -> Result<()> {
    save_to(&config_dir().join(SETTINGS_FILE), settings)
}

pub(crate) fn save_to(path: &Path, settings: &WidgetSettings) -> Result<()> {
    let dir = path
        .parent()
        .context("settings path has no parent directory")?;
    std::fs::create_dir_all(dir).context("failed to create config directory")?;

    let json = serde_json::to_string_pretty(settings).context("failed to serialize settings")?;

    let temp = dir.join(format!(
        "{}.tmp.{}",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    ));
    std::fs::write(&temp, &json).context("failed to write temp settings file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o600))
            .context("failed to set settings permissions")?;
    }

    // Atomic rename: either the old file or the new file exists, never partial
    std::fs::rename(&temp, path).context("failed to move settings into place")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
