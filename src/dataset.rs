use crate::error::{Result, WasteVizError};
use crate::waste::WasteType;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use strum::IntoEnumIterator;

/// Expected header row, in order. Extra trailing columns are tolerated.
pub const EXPECTED_HEADERS: [&str; 5] = ["Sector", "Disposed", "Recycle", "Organics", "Other"];

/// One dataset row in wide form: a sector and its four waste amounts,
/// all in tons per employee per year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteRecord {
    pub sector: String,
    pub disposed: f64,
    pub recycle: f64,
    pub organics: f64,
    pub other: f64,
}

impl WasteRecord {
    /// Returns the amount stored for one waste type.
    pub fn amount(&self, waste_type: WasteType) -> f64 {
        use WasteType::*;
        match waste_type {
            Disposed => self.disposed,
            Recycle => self.recycle,
            Organics => self.organics,
            Other => self.other,
        }
    }
}

/// Long-form row derived from a `WasteRecord`: one (sector, waste type) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteObservation {
    pub sector: String,
    pub waste_type: WasteType,
    pub amount: f64,
}

/// The loaded dataset. Never mutated after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WasteTable {
    records: Vec<WasteRecord>,
}

impl WasteTable {
    pub fn from_records(records: Vec<WasteRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[WasteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sector names in file order, for populating a selector.
    pub fn sectors(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.sector.as_str()).collect()
    }

    pub fn contains_sector(&self, sector: &str) -> bool {
        self.records.iter().any(|r| r.sector == sector)
    }

    pub fn get(&self, sector: &str) -> Option<&WasteRecord> {
        self.records.iter().find(|r| r.sector == sector)
    }

    /// Reshapes the table to long form: `len() * 4` observations, one per
    /// (sector, waste type) pair, amounts preserved exactly.
    pub fn to_long(&self) -> Vec<WasteObservation> {
        self.records
            .iter()
            .flat_map(|record| {
                WasteType::iter().map(|waste_type| WasteObservation {
                    sector: record.sector.clone(),
                    waste_type,
                    amount: record.amount(waste_type),
                })
            })
            .collect()
    }

    /// Long-form observations for a single sector.
    ///
    /// # Errors
    /// Returns `UnknownSector` if the sector is not present in the table.
    pub fn sector_observations(&self, sector: &str) -> Result<Vec<WasteObservation>> {
        let record = self
            .get(sector)
            .ok_or_else(|| WasteVizError::UnknownSector(sector.to_string()))?;
        Ok(WasteType::iter()
            .map(|waste_type| WasteObservation {
                sector: record.sector.clone(),
                waste_type,
                amount: record.amount(waste_type),
            })
            .collect())
    }
}

/// Reads waste data from a CSV file
///
/// # Errors
/// Returns error if the file cannot be read or the CSV does not match the
/// `Sector,Disposed,Recycle,Organics,Other` schema
pub fn read_waste_csv<P: AsRef<Path>>(path: P) -> Result<WasteTable> {
    let file = std::fs::File::open(path)?;
    read_waste_from_reader(file)
}

/// Read CSV with `Sector,Disposed,Recycle,Organics,Other` format.
/// - Amounts must be non-negative finite reals
/// - Sector names must be unique
/// - Fully empty rows are skipped
pub fn read_waste_from_reader<R: Read>(reader: R) -> Result<WasteTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true) // allow additional columns
        .from_reader(reader);

    validate_csv_headers(&mut rdr)?;

    let mut records: Vec<WasteRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = i + 2; // CSV rows are 1-indexed, +1 for header

        if let Some(record) = parse_record(&rec, row)? {
            if !seen.insert(record.sector.clone()) {
                return Err(WasteVizError::DuplicateSector {
                    row,
                    sector: record.sector,
                });
            }
            records.push(record);
        }
    }

    Ok(WasteTable::from_records(records))
}

/// Validates CSV headers match the expected schema
fn validate_csv_headers<R: Read>(csv_reader: &mut csv::Reader<R>) -> Result<()> {
    let headers = csv_reader
        .headers()
        .map_err(|e| WasteVizError::CsvHeader(format!("Failed to read headers: {}", e)))?;

    for (idx, expected) in EXPECTED_HEADERS.iter().enumerate() {
        let found = headers.get(idx).ok_or_else(|| {
            WasteVizError::CsvHeader(format!("Missing '{}' column at index {}", expected, idx))
        })?;
        if !found.eq_ignore_ascii_case(expected) {
            return Err(WasteVizError::CsvHeader(format!(
                "Expected '{}' in column {}, found '{}'",
                expected, idx, found
            )));
        }
    }

    Ok(())
}

fn parse_record(rec: &StringRecord, row: usize) -> Result<Option<WasteRecord>> {
    if rec.iter().all(|f| f.trim().is_empty()) {
        return Ok(None);
    }

    let sector = get_column_value(rec, 0, row)?;
    if sector.is_empty() {
        return Ok(None);
    }

    let mut amounts = [0.0_f64; 4];
    for (offset, &column) in EXPECTED_HEADERS[1..].iter().enumerate() {
        let value = get_column_value(rec, offset + 1, row)?;
        amounts[offset] = parse_amount(value, row, column)?;
    }

    Ok(Some(WasteRecord {
        sector: sector.to_string(),
        disposed: amounts[0],
        recycle: amounts[1],
        organics: amounts[2],
        other: amounts[3],
    }))
}

/// Safely extracts a column value from a CSV record
fn get_column_value(record: &StringRecord, column_index: usize, row_number: usize) -> Result<&str> {
    record
        .get(column_index)
        .map(str::trim)
        .ok_or_else(|| WasteVizError::CsvRow {
            row: row_number,
            got: record.len(),
        })
}

/// Parses an amount cell into a non-negative finite f64
fn parse_amount(value: &str, row: usize, column: &'static str) -> Result<f64> {
    let amount: f64 = value.parse().map_err(|parse_error| WasteVizError::AmountParse {
        row,
        column,
        value: value.to_string(),
        source: parse_error,
    })?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(WasteVizError::NegativeAmount {
            row,
            column,
            value: amount,
        });
    }

    Ok(amount)
}

static DATASET: OnceLock<WasteTable> = OnceLock::new();

/// Process-wide memoized load: the first successful call populates the cache,
/// every later call returns the same table regardless of `path`. A failed
/// load is not cached, so the next call retries the read.
pub fn load_cached<P: AsRef<Path>>(path: P) -> Result<&'static WasteTable> {
    if let Some(table) = DATASET.get() {
        return Ok(table);
    }
    let table = read_waste_csv(path)?;
    Ok(DATASET.get_or_init(|| table))
}
