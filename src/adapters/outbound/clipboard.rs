use cli_clipboard::{ClipboardContext, ClipboardProvider};
use tracing::{debug, warn};

use crate::core::ports::Clipboard;

/// Copies text to the desktop clipboard. Failures (headless sessions, no display
/// server) are logged and otherwise ignored.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    fn copy_text(&self, text: &str) {
        let mut ctx = match ClipboardContext::new() {
            Ok(ctx) => ctx,
            Err(err) => {
                warn!("clipboard unavailable: {err}");
                return;
            }
        };
        match ctx.set_contents(text.to_owned()) {
            Ok(()) => debug!(chars = text.chars().count(), "copied text to clipboard"),
            Err(err) => warn!("failed to write clipboard: {err}"),
        }
    }
}
