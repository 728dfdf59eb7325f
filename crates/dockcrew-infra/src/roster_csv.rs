//! Roster CSV import
//!
//! Each record is one batch: its fields are the labor names, in order.
//! Records may have different lengths. A first record that looks like a
//! header (`member`, `labor`, `name`, ...) is skipped.

use std::io::Read;
use std::path::Path;

use dockcrew_types::{Error, Result};

fn is_header(record: &csv::StringRecord) -> bool {
    record.iter().any(|field| {
        let field = field.trim().to_lowercase();
        field.starts_with("member") || field.starts_with("labor") || field == "name"
    })
}

/// Read member lists, one per record, skipping blank names and empty records
pub fn read_rosters<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rosters = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record
            .map_err(|e| Error::Validation(format!("invalid roster CSV: {}", e)))?;
        if index == 0 && is_header(&record) {
            continue;
        }

        let members: Vec<String> = record
            .iter()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .collect();
        if !members.is_empty() {
            rosters.push(members);
        }
    }
    Ok(rosters)
}

/// Load member lists from a CSV file
pub fn load_rosters_from_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = std::fs::File::open(path)?;
    let rosters = read_rosters(file)?;
    tracing::debug!(batches = rosters.len(), path = %path.display(), "roster loaded");
    Ok(rosters)
}
