use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::form::state::ShiftForm;
use crate::rooms::{is_known_room, RoomStatus, StatusCode};

/// Room currently open in the status modal and the values staged for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEditor {
    pub room: Option<String>,
    pub staged_status: Option<StatusCode>,
    /// Raw text of the occupancy field, as typed
    pub staged_occupancy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Editing,
}

impl RoomEditor {
    pub fn modal_state(&self) -> ModalState {
        if self.room.is_some() {
            ModalState::Editing
        } else {
            ModalState::Closed
        }
    }

    fn close(&mut self) {
        *self = RoomEditor::default();
    }
}

/// Reads the leading integer of `text` the way a browser number field
/// value read with parseInt does: "3" -> 3, " 4 " -> 4, "2.5" -> 2,
/// "-1" -> -1, "" or "abc" -> none. Zero counts as no value.
/// Digits beyond the i64 range also read as none.
pub fn parse_occupancy(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(sign * value).filter(|n| *n != 0)
}

impl ShiftForm {
    /// Opens the modal for `room`, staging its saved status (or blanks)
    pub fn open_editor(&mut self, room: &str) -> Result<(), FormError> {
        if !is_known_room(room) {
            return Err(FormError::UnknownRoom(room.to_string()));
        }

        let current = self.rooms.get(room);
        self.editor = RoomEditor {
            room: Some(room.to_string()),
            staged_status: current.map(|s| s.status()),
            staged_occupancy: current
                .and_then(|s| s.occupancy())
                .map(|n| n.to_string())
                .unwrap_or_default(),
        };
        tracing::debug!(room, "Editor opened");
        Ok(())
    }

    /// Stages `status`; a status without occupancy always clears the staged number
    pub fn select_status(&mut self, status: StatusCode) -> Result<(), FormError> {
        if self.editor.modal_state() == ModalState::Closed {
            return Err(FormError::EditorClosed);
        }
        self.editor.staged_status = Some(status);
        if !status.needs_occupancy() {
            self.editor.staged_occupancy.clear();
        }
        Ok(())
    }

    pub fn set_occupancy(&mut self, text: impl Into<String>) -> Result<(), FormError> {
        if self.editor.modal_state() == ModalState::Closed {
            return Err(FormError::EditorClosed);
        }
        self.editor.staged_occupancy = text.into();
        Ok(())
    }

    /// Commits the staged status and closes the modal.
    /// Returns false, changing nothing, when no room is open or no status is staged.
    pub fn save_room(&mut self) -> bool {
        let (Some(room), Some(status)) = (self.editor.room.clone(), self.editor.staged_status) else {
            return false;
        };

        let occupancy = if status.needs_occupancy() {
            parse_occupancy(&self.editor.staged_occupancy)
        } else {
            None
        };
        let saved = RoomStatus::new(status, occupancy);
        tracing::debug!(room = %room, status = %saved.display_text(), "Room status saved");
        self.rooms.set(&room, saved);
        self.editor.close();
        true
    }

    /// Closes the modal without touching the saved statuses
    pub fn cancel_editor(&mut self) {
        self.editor.close();
    }
}
