use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::form::ShiftForm;
use crate::rooms::RoomRegistry;

pub const REPORT_TITLE: &str = "Occupancy - Morning";

/// Text shown on a room card of the grid
pub fn room_card_text(registry: &RoomRegistry, room: &str) -> String {
    match registry.get(room) {
        Some(status) => status.display_text(),
        None => "Tap to set".to_string(),
    }
}

/// Builds the plain-text shift report:
/// title, date and attendant, then one `<room>- <status>` line per room in
/// grid order (unset rooms keep the trailing space), then `<type>: <room>`
/// for every complete extra.
pub fn generate_report(form: &ShiftForm) -> String {
    let mut report = format!("{}\nDate: {}\nAttendant: {}\n", REPORT_TITLE, form.date, form.attendant);

    for (room, status) in form.rooms.iter_canonical() {
        let status_text = status.map(|s| s.display_text()).unwrap_or_default();
        report.push_str(&format!("{}- {}\n", room, status_text));
    }

    for extra in form.extras.iter().filter(|e| e.is_complete()) {
        report.push_str(&format!("{}: {}\n", extra.kind, extra.room));
    }

    report
}

/// Writes a generated report to `path`, replacing any existing file
pub fn write_report_to_file(report: &str, path: &Path) -> Result<(), std::io::Error> {
    let mut file = File::create(path)?;
    file.write_all(report.as_bytes())?;
    Ok(())
}
