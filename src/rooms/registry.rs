use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{RoomStatus, ROOMS};

/// Saved statuses keyed by room id. Rooms without an entry are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomRegistry {
    rooms: HashMap<String, RoomStatus>,
}

impl RoomRegistry {
    pub fn get(&self, room: &str) -> Option<&RoomStatus> {
        self.rooms.get(room)
    }

    /// Creates or overwrites the entry for `room`
    pub fn set(&mut self, room: &str, status: RoomStatus) {
        self.rooms.insert(room.to_string(), status);
    }

    pub fn is_filled(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Every room of the grid in canonical order, set or not
    pub fn iter_canonical(&self) -> impl Iterator<Item = (&'static str, Option<&RoomStatus>)> + '_ {
        ROOMS.iter().map(move |&room| (room, self.rooms.get(room)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::StatusCode;

    #[test]
    fn set_overwrites_previous_status() {
        let mut registry = RoomRegistry::default();
        registry.set("101", RoomStatus::new(StatusCode::Occ, Some(4)));
        registry.set("101", RoomStatus::new(StatusCode::VacantDirty, None));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("101").map(|s| s.status()), Some(StatusCode::VacantDirty));
    }

    #[test]
    fn canonical_iteration_covers_every_room() {
        let mut registry = RoomRegistry::default();
        registry.set("309", RoomStatus::new(StatusCode::SleepOut, None));
        registry.set("101", RoomStatus::new(StatusCode::VacantClean, None));

        let rooms: Vec<_> = registry.iter_canonical().collect();
        assert_eq!(rooms.len(), 27);
        assert_eq!(rooms[0].0, "101");
        assert!(rooms[0].1.is_some());
        assert!(rooms[1].1.is_none());
        assert_eq!(rooms[26].0, "309");
        assert!(rooms[26].1.is_some());
    }
}
