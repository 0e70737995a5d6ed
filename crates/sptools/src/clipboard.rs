use crate::prelude::*;

/// Write-only access to the system clipboard.
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner.set_text(text.to_string())?;
        Ok(())
    }
}

/// Fallback for headless terminals where no clipboard is available.
pub struct NoopClipboard;

impl ClipboardProvider for NoopClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Pick the system clipboard when one exists, otherwise fall back to a
/// no-op so copy actions never crash the interface.
pub fn create_clipboard() -> Box<dyn ClipboardProvider> {
    match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            log::warn!("System clipboard unavailable, copy will be a no-op: {e}");
            Box::new(NoopClipboard)
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct TestClipboard {
    pub last_text: Option<String>,
    pub fail: bool,
}

#[cfg(test)]
impl ClipboardProvider for TestClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            return Err(eyre!("clipboard error"));
        }
        self.last_text = Some(text.to_string());
        Ok(())
    }
}
