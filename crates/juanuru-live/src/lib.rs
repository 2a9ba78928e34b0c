//! Live solar data widget for JuaNuru
//!
//! Fetches the current reading for a coordinate pair, renders it into an
//! output region, and keeps the last good reading in a cache slot so a
//! failed fetch can still show something.

pub mod types;
pub mod client;
pub mod retry;
pub mod storage;
pub mod render;
pub mod widget;

pub use types::*;
pub use client::LiveDataClient;
pub use storage::{CacheSlot, FileStore, KeyValueStore, MemoryStore};
pub use render::{HtmlFileTarget, LivePanel, LiveView, MemoryTarget, RenderTarget, TerminalTarget};
pub use widget::LiveDataWidget;
