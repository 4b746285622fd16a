//! Cloud connection status widget for host plugin shells.
//!
//! Two independent cores drive the widget:
//!
//! - [`display`] derives the three rendered fields (style class, title,
//!   description) from push messages announcing cloud connection state.
//! - [`version`] compares dot-separated version strings and backs the
//!   one-per-session host compatibility gate.
//!
//! [`widget::StatusWidget`] wires both to the embedding shell through the
//! collaborator traits in [`host`]: the shell delivers plugin push
//! messages, signals login and startup, and renders the display snapshot;
//! the widget raises a notification when the host is too old to support
//! the plugin. Transport and authentication stay on the shell's side of
//! those traits.

pub mod config;
pub mod display;
pub mod host;
pub mod logging;
pub mod messages;
pub mod version;
pub mod widget;

pub use config::{WidgetSettings, load_settings, save_settings};
pub use display::DisplayState;
pub use host::{HostClient, Notification, NotificationSink, Severity, ViewModelRegistration};
pub use messages::{ConnectionStatus, ConnectionStatusMessage};
pub use version::{CompareOptions, compare_versions};
pub use widget::StatusWidget;
