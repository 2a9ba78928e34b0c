//! Views of the live data panel and the output regions they are drawn into.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use juanuru_core::StorageError;
use parking_lot::Mutex;

use crate::types::{LiveReading, MissingFieldPolicy, MissingFieldPolicyExt};

const HEADING: &str = "Live Solar Data";
const CACHED_HEADING: &str = "Live Solar Data (Cached)";
const UNAVAILABLE: &str = "Live data unavailable";

/// What the panel shows after a fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiveView {
    /// Freshly fetched reading.
    Live(LiveReading),
    /// Last good reading, shown because the fetch failed.
    Cached(LiveReading),
    Unavailable,
}

impl LiveView {
    pub fn reading(&self) -> Option<&LiveReading> {
        match self {
            LiveView::Live(r) | LiveView::Cached(r) => Some(r),
            LiveView::Unavailable => None,
        }
    }
}

/// A view plus the policy for displaying missing fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePanel {
    pub view: LiveView,
    pub policy: MissingFieldPolicy,
}

impl LivePanel {
    pub fn new(view: LiveView, policy: MissingFieldPolicy) -> Self {
        Self { view, policy }
    }

    fn lines(&self) -> Vec<String> {
        let (heading, reading) = match &self.view {
            LiveView::Live(r) => (HEADING, r),
            LiveView::Cached(r) => (CACHED_HEADING, r),
            LiveView::Unavailable => return vec![UNAVAILABLE.to_string()],
        };

        vec![
            heading.to_string(),
            format!("Temperature: {}°C", self.policy.display_value(reading.temperature)),
            format!("Wind Speed: {} m/s", self.policy.display_value(reading.wind_speed)),
        ]
    }

    /// HTML fragment for the output container.
    pub fn html(&self) -> String {
        let lines = self.lines();
        match self.view {
            LiveView::Unavailable => format!("<p>{}</p>", lines[0]),
            _ => {
                let mut html = format!("<h3>{}</h3>", lines[0]);
                for line in &lines[1..] {
                    html.push_str(&format!("<p>{}</p>", line));
                }
                html
            }
        }
    }

    /// Plain text, one line per row.
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

/// An output region whose contents are replaced on every render.
pub trait RenderTarget: Send + Sync {
    /// # Errors
    /// Fails when the region cannot be written.
    fn replace_contents(&self, panel: &LivePanel) -> Result<(), StorageError>;
}

/// Keeps the last rendered panel in memory.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    current: Mutex<Option<LivePanel>>,
    renders: Mutex<usize>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<LivePanel> {
        *self.current.lock()
    }

    pub fn html(&self) -> Option<String> {
        self.current().map(|p| p.html())
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        *self.renders.lock()
    }
}

impl RenderTarget for MemoryTarget {
    fn replace_contents(&self, panel: &LivePanel) -> Result<(), StorageError> {
        *self.current.lock() = Some(*panel);
        *self.renders.lock() += 1;
        Ok(())
    }
}

/// Overwrites a file with the panel's HTML fragment.
#[derive(Debug, Clone)]
pub struct HtmlFileTarget {
    path: PathBuf,
}

impl HtmlFileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RenderTarget for HtmlFileTarget {
    fn replace_contents(&self, panel: &LivePanel) -> Result<(), StorageError> {
        fs::write(&self.path, panel.html()).map_err(|e| StorageError::WriteFailed {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Prints the text form to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalTarget;

impl RenderTarget for TerminalTarget {
    fn replace_contents(&self, panel: &LivePanel) -> Result<(), StorageError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", panel.text()).map_err(|e| StorageError::WriteFailed {
            key: "stdout".to_string(),
            message: e.to_string(),
        })
    }
}
