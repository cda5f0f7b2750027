pub mod state;
pub mod editor;
pub mod extras;
pub mod export;

pub use state::ShiftForm;
pub use extras::{ExtraField, ExtraItem};
pub use export::{CapturedClipboard, COPIED_FLAG_DURATION};
