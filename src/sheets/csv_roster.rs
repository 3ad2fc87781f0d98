use csv::ReaderBuilder;
use log::debug;

use super::LoadError;
use crate::grades::{CellValue, Roster};

/// Parse CSV text (first record is the header) into a roster.
pub fn parse_csv_roster(text: &str) -> Result<Roster, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(CellValue::from_raw).collect::<Vec<_>>());
    }

    let roster = Roster::from_records(headers, records);
    debug!(
        "Parsed CSV roster with {} columns and {} rows",
        roster.columns().len(),
        roster.len()
    );
    Ok(roster)
}
