use thiserror::Error;

/// A form transition that was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("No room is open for editing")]
    EditorClosed,

    #[error("No extra item at position {0}")]
    ExtraIndex(usize),

    #[error("No report has been generated yet")]
    NoReport,
}

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum ExportError {
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("Invalid extra '{0}', expected TYPE=ROOM")]
    InvalidExtra(String),

    #[error(transparent)]
    Form(#[from] FormError),
}
