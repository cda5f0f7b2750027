use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// The fixed room grid, floor by floor. Report lines follow this order.
pub const ROOMS: [&str; 27] = [
    "101", "102", "103", "104", "105", "106", "107", "108", "109",
    "201", "202", "203", "204", "205", "206", "207", "208", "209",
    "301", "302", "303", "304", "305", "306", "307", "308", "309",
];

/// Min/max the occupancy input advertises. Not enforced on the model.
pub const OCCUPANCY_BOUNDS: RangeInclusive<i64> = 1..=10;

pub fn is_known_room(room: &str) -> bool {
    ROOMS.contains(&room)
}

/// Housekeeping status code for a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "occ")]
    Occ,
    #[serde(rename = "VC")]
    VacantClean,
    #[serde(rename = "VD")]
    VacantDirty,
    #[serde(rename = "DND")]
    DoNotDisturb,
    #[serde(rename = "S/O")]
    SleepOut,
}

impl StatusCode {
    /// Display order of the status buttons
    pub const ALL: [StatusCode; 5] = [
        StatusCode::Occ,
        StatusCode::VacantClean,
        StatusCode::VacantDirty,
        StatusCode::DoNotDisturb,
        StatusCode::SleepOut,
    ];

    pub fn code(self) -> &'static str {
        match self {
            StatusCode::Occ => "occ",
            StatusCode::VacantClean => "VC",
            StatusCode::VacantDirty => "VD",
            StatusCode::DoNotDisturb => "DND",
            StatusCode::SleepOut => "S/O",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusCode::Occ => "Occupied (OCC)",
            StatusCode::VacantClean => "Vacant Clean (VC)",
            StatusCode::VacantDirty => "Vacant Dirty (VD)",
            StatusCode::DoNotDisturb => "Do Not Disturb (DND)",
            StatusCode::SleepOut => "Sleep Out (S/O)",
        }
    }

    pub fn needs_occupancy(self) -> bool {
        matches!(self, StatusCode::Occ)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for StatusCode {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusCode::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| FormError::UnknownStatus(s.to_string()))
    }
}

/// One entry of the status picker, as published to the page
#[derive(Debug, Clone, Serialize)]
pub struct StatusOption {
    pub value: StatusCode,
    pub label: &'static str,
    pub needs_occupancy: bool,
}

pub fn status_options() -> Vec<StatusOption> {
    StatusCode::ALL
        .into_iter()
        .map(|value| StatusOption {
            value,
            label: value.label(),
            needs_occupancy: value.needs_occupancy(),
        })
        .collect()
}

/// Saved status of a single room.
/// Occupancy is only ever kept alongside `occ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRoomStatus")]
pub struct RoomStatus {
    status: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    occupancy: Option<i64>,
}

#[derive(Deserialize)]
struct StoredRoomStatus {
    status: StatusCode,
    #[serde(default)]
    occupancy: Option<i64>,
}

impl From<StoredRoomStatus> for RoomStatus {
    fn from(stored: StoredRoomStatus) -> Self {
        RoomStatus::new(stored.status, stored.occupancy)
    }
}

impl RoomStatus {
    pub fn new(status: StatusCode, occupancy: Option<i64>) -> Self {
        let occupancy = if status.needs_occupancy() { occupancy } else { None };
        Self { status, occupancy }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn occupancy(&self) -> Option<i64> {
        self.occupancy
    }

    /// `<status>` or `<status> <occupancy>`
    pub fn display_text(&self) -> String {
        match self.occupancy {
            Some(guests) => format!("{} {}", self.status, guests),
            None => self.status.to_string(),
        }
    }
}
