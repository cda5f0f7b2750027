use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;

use crate::error::AppError;
use crate::form::{ExtraField, ShiftForm};
use crate::rooms::{is_known_room, StatusCode};

/// One row of a room status CSV (`room,status,occupancy`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRecord {
    pub room: String,
    pub status: StatusCode,
    pub occupancy: String,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    room: String,
    status: String,
    #[serde(default)]
    occupancy: Option<String>,
}

/// Loads room statuses from a CSV file, in file order
pub fn load_room_statuses(csv_path: impl AsRef<Path>) -> Result<Vec<RoomRecord>, AppError> {
    let reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(csv_path)?;
    read_room_statuses(reader)
}

fn read_room_statuses<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RoomRecord>, AppError> {
    let mut records = Vec::new();

    for (i, row) in reader.deserialize::<RawRecord>().enumerate() {
        let line = i + 1;
        let raw = row?;

        if !is_known_room(&raw.room) {
            return Err(AppError::InvalidRecord {
                line,
                reason: format!("unknown room '{}'", raw.room),
            });
        }
        let status = raw.status.parse::<StatusCode>().map_err(|e| AppError::InvalidRecord {
            line,
            reason: e.to_string(),
        })?;

        records.push(RoomRecord {
            room: raw.room,
            status,
            occupancy: raw.occupancy.unwrap_or_default(),
        });
    }

    Ok(records)
}

/// Feeds records through the room editor, the same path the page takes
pub fn apply_records(form: &mut ShiftForm, records: &[RoomRecord]) -> Result<(), AppError> {
    for record in records {
        form.open_editor(&record.room)?;
        form.select_status(record.status)?;
        if record.status.needs_occupancy() {
            form.set_occupancy(record.occupancy.as_str())?;
        }
        form.save_room();
    }
    Ok(())
}

/// Parses a `TYPE=ROOM` argument and appends it to the extras list
pub fn add_extra_arg(form: &mut ShiftForm, arg: &str) -> Result<(), AppError> {
    let (kind, room) = arg
        .rsplit_once('=')
        .ok_or_else(|| AppError::InvalidExtra(arg.to_string()))?;
    let index = form.add_extra();
    form.update_extra(index, ExtraField::Type, kind.trim())?;
    form.update_extra(index, ExtraField::Room, room.trim())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ExtraItem;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn reads_records_in_file_order() {
        let records = read_room_statuses(reader("room,status,occupancy\n102,occ,2\n101,VC,\n305,S/O\n")).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].room, "102");
        assert_eq!(records[0].status, StatusCode::Occ);
        assert_eq!(records[0].occupancy, "2");
        assert_eq!(records[1].occupancy, "");
        assert_eq!(records[2].status, StatusCode::SleepOut);
    }

    #[test]
    fn rejects_unknown_room_with_line_number() {
        let err = read_room_statuses(reader("room,status,occupancy\n101,VC,\n410,VD,\n")).unwrap_err();
        match err {
            AppError::InvalidRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("410"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let err = read_room_statuses(reader("room,status,occupancy\n101,OOO,\n")).unwrap_err();
        assert!(matches!(err, AppError::InvalidRecord { line: 1, .. }));
    }

    #[test]
    fn applying_records_goes_through_editor_rules() {
        let records = read_room_statuses(reader("room,status,occupancy\n102,occ,2\n103,VD,4\n102,DND,\n")).unwrap();
        let mut form = ShiftForm::new("Dec. 14, 2025");
        apply_records(&mut form, &records).unwrap();

        assert_eq!(form.rooms.get("102").unwrap().display_text(), "DND");
        assert_eq!(form.rooms.get("103").unwrap().occupancy(), None);
        assert!(form.editor.room.is_none());
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("occupancy_rooms_{}.csv", std::process::id()));
        std::fs::write(&path, "room,status,occupancy\n201,occ,3\n").unwrap();
        let records = load_room_statuses(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(records[0].room, "201");
    }

    #[test]
    fn extra_args_split_on_last_equals() {
        let mut form = ShiftForm::new("");
        add_extra_arg(&mut form, "Baby Cot=105").unwrap();
        add_extra_arg(&mut form, "Bed=Large=206").unwrap();
        assert!(add_extra_arg(&mut form, "Crib").is_err());

        assert_eq!(form.extras, vec![ExtraItem::new("Baby Cot", "105"), ExtraItem::new("Bed=Large", "206")]);
    }
}
