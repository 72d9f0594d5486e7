//! CSV import of ownership tables (`owner_id,percentage` rows).

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::validators::OwnershipEntry;

#[derive(Debug)]
pub enum OwnershipImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Percentage { row: usize, value: String },
}

impl std::fmt::Display for OwnershipImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnershipImportError::Io(err) => write!(f, "failed to read ownership file: {}", err),
            OwnershipImportError::Csv(err) => write!(f, "invalid ownership CSV data: {}", err),
            OwnershipImportError::Percentage { row, value } => {
                write!(f, "row {}: '{}' is not a percentage", row, value)
            }
        }
    }
}

impl std::error::Error for OwnershipImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OwnershipImportError::Io(err) => Some(err),
            OwnershipImportError::Csv(err) => Some(err),
            OwnershipImportError::Percentage { .. } => None,
        }
    }
}

impl From<std::io::Error> for OwnershipImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for OwnershipImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct OwnershipRow {
    owner_id: String,
    percentage: String,
}

pub fn entries_from_path(path: impl AsRef<Path>) -> Result<Vec<OwnershipEntry>, OwnershipImportError> {
    let file = File::open(path)?;
    entries_from_reader(file)
}

/// Read ownership entries; percentages may use `,` as the decimal separator.
pub fn entries_from_reader<R: Read>(reader: R) -> Result<Vec<OwnershipEntry>, OwnershipImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for (index, record) in csv_reader.deserialize::<OwnershipRow>().enumerate() {
        let row = record?;
        let percentage = parse_percentage(&row.percentage).ok_or_else(|| {
            OwnershipImportError::Percentage {
                // header is line 1
                row: index + 2,
                value: row.percentage.clone(),
            }
        })?;
        entries.push(OwnershipEntry::new(row.owner_id, percentage));
    }

    Ok(entries)
}

fn parse_percentage(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}
