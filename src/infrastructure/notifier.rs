//! Desktop notifications via `osascript`.

use std::process::Command;

use crate::application::Notifier;
use crate::domain::ToolConfig;

/// Fire-and-forget notifier running `display notification` in `AppleScript`.
#[derive(Debug, Clone)]
pub struct OsascriptNotifier {
    program: String,
}

impl OsascriptNotifier {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn from_config(tools: &ToolConfig) -> Self {
        Self::new(tools.notifier.clone())
    }
}

impl Notifier for OsascriptNotifier {
    fn notify(&self, title: &str, message: &str) {
        let script = notification_script(title, message);

        match Command::new(&self.program).args(["-e", script.as_str()]).output() {
            Ok(output) if output.status.success() => {
                tracing::debug!(%title, %message, "Notification shown");
            }
            Ok(output) => {
                tracing::debug!(
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "Notification tool failed"
                );
            }
            Err(e) => {
                tracing::debug!(program = %self.program, error = %e, "Could not run notification tool");
            }
        }
    }
}

/// `AppleScript` source for the notification.
fn notification_script(title: &str, message: &str) -> String {
    format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(message),
        escape_applescript(title)
    )
}

/// Escape a value for use inside an `AppleScript` string literal.
fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
