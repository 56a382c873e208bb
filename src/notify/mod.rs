//! Run notifications.
//!
//! One notification is sent after every completed run. Delivery is
//! best-effort: a failed notification is reported to the caller, which logs
//! it and carries on.

mod desktop;
mod terminal;
mod traits;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use desktop::DesktopNotifier;
pub use terminal::TerminalNotifier;
pub use traits::{NOTIFICATION_TITLE, NoOpNotifier, Notifier, format_message};

/// Which notifier the binary wires into the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Native desktop toast (`notify-send` / `osascript`)
    #[default]
    Desktop,
    /// OSC 9 escape sequence on the controlling terminal
    Terminal,
    /// No notifications
    None,
}

/// Build the notifier for `kind`.
pub fn build_notifier(kind: NotifierKind) -> Arc<dyn Notifier> {
    match kind {
        NotifierKind::Desktop => Arc::new(DesktopNotifier::new()),
        NotifierKind::Terminal => Arc::new(TerminalNotifier::stderr()),
        NotifierKind::None => Arc::new(NoOpNotifier),
    }
}
