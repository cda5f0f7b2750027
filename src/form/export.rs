use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{ExportError, FormError};
use crate::form::state::ShiftForm;

/// How long the "copied" indicator stays on after a copy
pub const COPIED_FLAG_DURATION: Duration = Duration::from_secs(2);

const WHATSAPP_BASE: &str = "https://wa.me/?text=";

/// Everything except the characters encodeURIComponent leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Write-only access to a clipboard
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Holds the copied text so it can be handed to the browser,
/// which does the actual clipboard write
#[derive(Debug, Default)]
pub struct CapturedClipboard {
    pub text: Option<String>,
}

impl ClipboardSink for CapturedClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// Builds the messaging deep link carrying `text`
pub fn whatsapp_share_url(text: &str) -> String {
    format!("{}{}", WHATSAPP_BASE, utf8_percent_encode(text, URI_COMPONENT))
}

impl ShiftForm {
    /// Copies the last report into `sink` and raises the copied flag.
    /// Sink failures are not surfaced.
    pub fn copy_to_clipboard(&mut self, sink: &mut dyn ClipboardSink) -> Result<(), FormError> {
        let report = self.output.as_deref().ok_or(FormError::NoReport)?;
        if let Err(e) = sink.write_text(report) {
            tracing::warn!(error = %e, "Clipboard write failed");
        }
        self.copied = true;
        Ok(())
    }

    pub fn clear_copied(&mut self) {
        self.copied = false;
    }

    pub fn share_url(&self) -> Result<String, FormError> {
        self.output
            .as_deref()
            .map(whatsapp_share_url)
            .ok_or(FormError::NoReport)
    }
}
