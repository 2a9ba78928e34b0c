use std::fmt::Display;
use std::sync::Arc;

use crate::devices::{Clipboard, Notifier};

/// Build the share message. Inputs are interpolated as given.
pub fn compose_share_text(
    score: impl Display,
    badge: impl Display,
    place: impl Display,
    app_name: impl Display,
) -> String {
    format!(
        "My {} solar score is {}! I'm a {} with {}.",
        place, score, badge, app_name
    )
}

/// Badge earned for a solar score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    SolarSuperstar,
    EcoWarrior,
    SunStarter,
}

impl Badge {
    pub fn for_score(score: u32) -> Self {
        match score {
            s if s > 90 => Badge::SolarSuperstar,
            s if s > 70 => Badge::EcoWarrior,
            _ => Badge::SunStarter,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Badge::SolarSuperstar => "Solar Superstar",
            Badge::EcoWarrior => "Eco Warrior",
            Badge::SunStarter => "Sun Starter",
        }
    }
}

impl Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Copies share text to the clipboard and tells the user what was copied.
pub struct ShareComposer {
    app_name: String,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
}

impl ShareComposer {
    pub fn new(
        app_name: impl Into<String>,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            clipboard,
            notifier,
        }
    }

    /// Compose, copy, acknowledge. Returns the composed text.
    ///
    /// A clipboard failure is logged and the acknowledgement still shown.
    pub fn share_results(&self, score: impl Display, badge: impl Display, place: impl Display) -> String {
        let text = compose_share_text(score, badge, place, &self.app_name);

        if let Err(e) = self.clipboard.write_text(&text) {
            tracing::warn!("Clipboard write failed: {}", e);
        }

        self.notifier
            .acknowledge(&format!("Copied to clipboard: {}", text));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juanuru_core::DeviceError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingClipboard {
        contents: Mutex<Option<String>>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<(), DeviceError> {
            if self.fail {
                return Err(DeviceError::Clipboard("permission denied".into()));
            }
            *self.contents.lock() = Some(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn acknowledge(&self, message: &str) {
            self.messages.lock().push(message.to_string());
        }
    }

    #[test]
    fn test_compose_share_text() {
        assert_eq!(
            compose_share_text(87, "Solar Star", "Nairobi", "JuaNuru"),
            "My Nairobi solar score is 87! I'm a Solar Star with JuaNuru."
        );
    }

    #[test]
    fn test_compose_interpolates_as_is() {
        assert_eq!(
            compose_share_text("", "", "", "JuaNuru"),
            "My  solar score is ! I'm a  with JuaNuru."
        );
        assert_eq!(
            compose_share_text(4.5, Badge::EcoWarrior, "<b>Mombasa</b>", "JuaNuru"),
            "My <b>Mombasa</b> solar score is 4.5! I'm a Eco Warrior with JuaNuru."
        );
    }

    #[test]
    fn test_badge_thresholds() {
        assert_eq!(Badge::for_score(100), Badge::SolarSuperstar);
        assert_eq!(Badge::for_score(91), Badge::SolarSuperstar);
        assert_eq!(Badge::for_score(90), Badge::EcoWarrior);
        assert_eq!(Badge::for_score(71), Badge::EcoWarrior);
        assert_eq!(Badge::for_score(70), Badge::SunStarter);
        assert_eq!(Badge::for_score(0), Badge::SunStarter);
        assert_eq!(Badge::SunStarter.to_string(), "Sun Starter");
    }

    #[test]
    fn test_share_results_copies_and_acknowledges() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let composer = ShareComposer::new("JuaNuru", clipboard.clone(), notifier.clone());

        let text = composer.share_results(87, "Solar Star", "Nairobi");

        let expected = "My Nairobi solar score is 87! I'm a Solar Star with JuaNuru.";
        assert_eq!(text, expected);
        assert_eq!(clipboard.contents.lock().as_deref(), Some(expected));
        assert_eq!(
            *notifier.messages.lock(),
            vec![format!("Copied to clipboard: {}", expected)]
        );
    }

    #[test]
    fn test_clipboard_failure_is_silent() {
        let clipboard = Arc::new(RecordingClipboard {
            fail: true,
            ..Default::default()
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let composer = ShareComposer::new("JuaNuru", clipboard, notifier.clone());

        let text = composer.share_results(42, Badge::SunStarter, "Kisumu");

        assert_eq!(text, "My Kisumu solar score is 42! I'm a Sun Starter with JuaNuru.");
        assert_eq!(notifier.messages.lock().len(), 1);
    }
}
