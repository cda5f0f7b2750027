use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::display::generate_report;
use crate::form::editor::RoomEditor;
use crate::form::extras::ExtraItem;
use crate::rooms::RoomRegistry;

/// Everything one attendant has entered during a page session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftForm {
    pub date: String,
    pub attendant: String,
    pub rooms: RoomRegistry,
    pub extras: Vec<ExtraItem>,
    pub editor: RoomEditor,
    pub output: Option<String>,
    pub copied: bool,
}

/// Default date text, e.g. "Dec. 14, 2025"
pub fn default_date_text() -> String {
    Local::now().format("%b. %-d, %Y").to_string()
}

impl ShiftForm {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn for_today() -> Self {
        Self::new(default_date_text())
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn set_attendant(&mut self, attendant: impl Into<String>) {
        self.attendant = attendant.into();
    }

    /// Rebuilds the report from the current state, replacing any previous one
    pub fn generate_report(&mut self) -> &str {
        let report = generate_report(self);
        tracing::debug!(lines = report.lines().count(), "Report generated");
        self.output.insert(report)
    }
}
