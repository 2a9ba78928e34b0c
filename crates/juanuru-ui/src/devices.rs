//! Host capabilities used by the bindings.

use std::io::Write;
use std::process::{Command, Stdio};

use juanuru_core::DeviceError;
use parking_lot::Mutex;

/// Whole-string, write-only system clipboard.
pub trait Clipboard: Send + Sync {
    /// # Errors
    /// Fails when the host refuses or cannot complete the write.
    fn write_text(&self, text: &str) -> Result<(), DeviceError>;
}

/// Blocking acknowledgement shown to the user.
pub trait Notifier: Send + Sync {
    fn acknowledge(&self, message: &str);
}

/// A named text field or output region.
pub trait TextSink: Send + Sync {
    fn set_text(&self, text: &str);
}

/// Pipes text into an external command, e.g. `wl-copy`, `pbcopy`, `xclip -selection clipboard`.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    argv: Vec<String>,
}

impl CommandClipboard {
    /// Returns `None` for an empty argv.
    pub fn new(argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() {
            return None;
        }
        Some(Self { argv })
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), DeviceError> {
        run_command(&self.argv, Some(text))
            .map(|_| ())
            .map_err(DeviceError::Clipboard)
    }
}

/// Prints acknowledgements to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn acknowledge(&self, message: &str) {
        println!("{}", message);
    }
}

/// Prints `label: text` to stdout.
#[derive(Debug, Clone)]
pub struct StdoutSink {
    label: String,
}

impl StdoutSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl TextSink for StdoutSink {
    fn set_text(&self, text: &str) {
        println!("{}: {}", self.label, text);
    }
}

/// Holds the last text written.
#[derive(Debug, Default)]
pub struct MemorySink {
    text: Mutex<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.lock().clone()
    }
}

impl TextSink for MemorySink {
    fn set_text(&self, text: &str) {
        *self.text.lock() = text.to_string();
    }
}

/// Run `argv`, optionally feeding `stdin`, and return its stdout.
pub(crate) fn run_command(argv: &[String], stdin: Option<&str>) -> Result<String, String> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| "empty command".to_string())?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("{}: {}", program, e))?;

    if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
        pipe.write_all(input.as_bytes())
            .map_err(|e| format!("{}: {}", program, e))?;
        // Dropping the pipe closes stdin so the command can finish.
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("{}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} exited with {}: {}", program, output.status, stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
