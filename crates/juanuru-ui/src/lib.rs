//! User-facing bindings for JuaNuru: share text, cost estimate, voice input.
//!
//! Host capabilities (clipboard, speech recognition, acknowledgements, text
//! fields) are traits so the bindings stay testable without a desktop.

pub mod devices;
pub mod share;
pub mod cost;
pub mod voice;

pub use cost::{CostBinding, CostEstimator};
pub use devices::{Clipboard, CommandClipboard, MemorySink, Notifier, StdoutNotifier, StdoutSink, TextSink};
pub use share::{compose_share_text, Badge, ShareComposer};
pub use voice::{CommandRecognizer, SpeechRecognizer, VoiceCapture};
