use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::form::state::ShiftForm;

/// Ad hoc amenity note tied to a room, e.g. "Baby Cot" in 105
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub room: String,
}

impl ExtraItem {
    #[cfg(test)]
    pub fn new(kind: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            room: room.into(),
        }
    }

    /// Only items with both fields filled in make it into the report
    pub fn is_complete(&self) -> bool {
        !self.kind.is_empty() && !self.room.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraField {
    Type,
    Room,
}

impl ShiftForm {
    /// Appends an empty row and returns its position
    pub fn add_extra(&mut self) -> usize {
        self.extras.push(ExtraItem::default());
        self.extras.len() - 1
    }

    pub fn update_extra(&mut self, index: usize, field: ExtraField, value: impl Into<String>) -> Result<(), FormError> {
        let item = self.extras.get_mut(index).ok_or(FormError::ExtraIndex(index))?;
        match field {
            ExtraField::Type => item.kind = value.into(),
            ExtraField::Room => item.room = value.into(),
        }
        Ok(())
    }
}
