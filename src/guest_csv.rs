// 📄 Guest Spreadsheet - CSV import/export of the guest list
//
// Columns: Full Name, Phone Number, Relation, Invited Count, Confirmation, Notes.
// Sheets exported by the Hebrew dashboard use translated headers and values;
// both are accepted on import. Export always writes the English form.

use csv::{ReaderBuilder, Trim, Writer};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::entities::{Guest, NewGuest, Relation, Rsvp};
use crate::error::ImportError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct GuestRow {
    #[serde(rename = "Full Name", alias = "שם מלא", default)]
    full_name: String,

    #[serde(rename = "Phone Number", alias = "מספר טלפון", default)]
    phone_number: Option<String>,

    #[serde(rename = "Relation", alias = "קשר (משפחה/חברים/עבודה)", default)]
    relation: Option<String>,

    #[serde(rename = "Invited Count", alias = "כמות מוזמנים", default)]
    invited_count: Option<String>,

    #[serde(rename = "Confirmation", alias = "אישור הגעה (כן/לא/אולי)", default)]
    confirmed: Option<String>,

    #[serde(rename = "Notes", alias = "הערות מיוחדות", default)]
    special_notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl GuestRow {
    /// Blank cells fall back to the add-guest defaults. `line` is the
    /// 1-based spreadsheet line, used in error messages.
    fn into_new_guest(self, line: usize) -> Result<NewGuest, ImportError> {
        let invalid = |message: String| ImportError::InvalidRow { row: line, message };

        let relation = match non_blank(self.relation) {
            Some(text) => Some(
                Relation::parse(&text)
                    .ok_or_else(|| invalid(format!("unknown relation {:?}", text)))?,
            ),
            None => None,
        };

        let invited_count = match non_blank(self.invited_count) {
            Some(text) => Some(
                text.trim()
                    .parse::<u32>()
                    .map_err(|_| invalid(format!("invited count {:?} is not a number", text)))?,
            ),
            None => None,
        };

        let confirmed = match non_blank(self.confirmed) {
            Some(text) => Some(
                Rsvp::parse(&text)
                    .ok_or_else(|| invalid(format!("unknown confirmation {:?}", text)))?,
            ),
            None => None,
        };

        Ok(NewGuest {
            full_name: self.full_name,
            phone_number: non_blank(self.phone_number),
            relation,
            invited_count,
            confirmed,
            special_notes: non_blank(self.special_notes),
        })
    }

    fn from_guest(guest: &Guest) -> Self {
        GuestRow {
            full_name: guest.full_name.clone(),
            phone_number: Some(guest.phone_number.clone()),
            relation: Some(guest.relation.as_str().to_string()),
            invited_count: Some(guest.invited_count.to_string()),
            confirmed: Some(guest.confirmed.as_str().to_string()),
            special_notes: Some(guest.special_notes.clone()),
        }
    }
}

// ============================================================================
// IMPORT
// ============================================================================

/// Parse a guest sheet into drafts ready for `EntityStore::import_guests`.
/// Rows without a name are passed through; the store counts them as skipped.
pub fn read_guest_rows<R: Read>(reader: R) -> Result<Vec<NewGuest>, ImportError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<GuestRow>().enumerate() {
        // Line 1 is the header
        rows.push(record?.into_new_guest(index + 2)?);
    }

    debug!("Read {} guest rows", rows.len());
    Ok(rows)
}

pub fn load_guest_csv<P: AsRef<Path>>(path: P) -> Result<Vec<NewGuest>, ImportError> {
    let file = File::open(path.as_ref())?;
    read_guest_rows(file)
}

// ============================================================================
// EXPORT
// ============================================================================

/// One row per guest, in list order
pub fn write_guest_csv<W: Write>(writer: W, guests: &[Guest]) -> Result<(), ImportError> {
    let mut csv_writer = Writer::from_writer(writer);
    for guest in guests {
        csv_writer.serialize(GuestRow::from_guest(guest))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_guest_csv<P: AsRef<Path>>(path: P, guests: &[Guest]) -> Result<(), ImportError> {
    let file = File::create(path.as_ref())?;
    write_guest_csv(file, guests)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntityStore, ImportReport};

    #[test]
    fn test_reads_english_headers_with_defaults() {
        let sheet = "\
Full Name,Phone Number,Relation,Invited Count,Confirmation,Notes
David Cohen,050-1234567,family,4,yes,Nut allergy
Rachel Levi,052-7654321,,,,
";
        let rows = read_guest_rows(sheet.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].relation, Some(Relation::Family));
        assert_eq!(rows[0].invited_count, Some(4));
        assert_eq!(rows[0].confirmed, Some(Rsvp::Yes));
        assert_eq!(rows[0].special_notes.as_deref(), Some("Nut allergy"));

        // Blank cells become None so the draft defaults apply
        assert_eq!(rows[1].relation, None);
        assert_eq!(rows[1].invited_count, None);
        assert_eq!(rows[1].special_notes, None);
    }

    #[test]
    fn test_reads_hebrew_headers_and_values() {
        let sheet = "\
שם מלא,מספר טלפון,קשר (משפחה/חברים/עבודה),כמות מוזמנים,אישור הגעה (כן/לא/אולי),הערות מיוחדות
דוד כהן,050-1234567,משפחה,4,כן,
יוסי גולדברג,054-9876543,עבודה,1,לא,צמחוני
";
        let rows = read_guest_rows(sheet.as_bytes()).unwrap();

        assert_eq!(rows[0].full_name, "דוד כהן");
        assert_eq!(rows[0].relation, Some(Relation::Family));
        assert_eq!(rows[1].confirmed, Some(Rsvp::No));
        assert_eq!(rows[1].special_notes.as_deref(), Some("צמחוני"));
    }

    #[test]
    fn test_bad_value_reports_line() {
        let sheet = "\
Full Name,Relation,Invited Count
Dana,friends,2
Avi,friends,lots
";
        let err = read_guest_rows(sheet.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { row: 3, .. }));

        let sheet = "Full Name,Relation\nDana,cousins\n";
        assert!(read_guest_rows(sheet.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_columns_are_tolerated() {
        let rows = read_guest_rows("Full Name\nDana\n".as_bytes()).unwrap();
        assert_eq!(rows, vec![NewGuest::named("Dana")]);
    }

    #[test]
    fn test_export_writes_english_header_in_list_order() {
        let mut store = EntityStore::new();
        store
            .add(NewGuest::named("Noa").phone("050-1").relation(Relation::Work))
            .unwrap()
            .into_inner();
        store.add(NewGuest::named("Avi")).unwrap().into_inner();

        let mut out = Vec::new();
        write_guest_csv(&mut out, store.guests()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Full Name,Phone Number,Relation,Invited Count,Confirmation,Notes"
        );
        assert_eq!(lines[1], "Noa,050-1,work,1,maybe,");
        assert_eq!(lines[2], "Avi,,friends,1,maybe,");
    }

    #[test]
    fn test_export_then_import_reports_only_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guests.csv");

        let mut store = EntityStore::new();
        store.load_demo().unwrap().into_inner();
        let before = store.guests().to_vec();

        export_guest_csv(&path, store.guests()).unwrap();
        let rows = load_guest_csv(&path).unwrap();
        let report = store.import_guests(rows).into_inner();

        assert_eq!(
            report,
            ImportReport {
                added: 0,
                updated: before.len(),
                skipped: 0,
            }
        );
        assert_eq!(store.guests(), before.as_slice());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_guest_csv("/no/such/guests.csv").unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
