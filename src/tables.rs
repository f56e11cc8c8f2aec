use crate::error::TableError;
use crate::models::{HistoryRecord, Pair, Person};
use chrono::{DateTime, Utc};
use csv::{Reader, ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

pub const PERSON_COLUMNS: [&str; 3] = ["first name", "last name", "gender"];
pub const PAIR_COLUMNS: [&str; 4] = ["male first name", "male last name", "female first name", "female last name"];
pub const HISTORY_COLUMNS: [&str; 5] = ["date", "male first name", "male last name", "female first name", "female last name"];

/// Format used to stamp new history rows (UTC)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Deserialize)]
struct PersonRow {
    #[serde(rename = "first name")]
    first_name: String,
    #[serde(rename = "last name")]
    last_name: String,
    gender: String,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Person::new(row.first_name, row.last_name, row.gender.into())
    }
}

#[derive(Debug, Serialize)]
struct PairRow {
    #[serde(rename = "male first name")]
    male_first_name: String,
    #[serde(rename = "male last name")]
    male_last_name: String,
    #[serde(rename = "female first name")]
    female_first_name: String,
    #[serde(rename = "female last name")]
    female_last_name: String,
}

impl From<&Pair> for PairRow {
    fn from(pair: &Pair) -> Self {
        Self {
            male_first_name: pair.male_first_name.clone(),
            male_last_name: pair.male_last_name.clone(),
            female_first_name: pair.female_first_name.clone(),
            female_last_name: pair.female_last_name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    date: String,
    #[serde(rename = "male first name")]
    male_first_name: String,
    #[serde(rename = "male last name")]
    male_last_name: String,
    #[serde(rename = "female first name")]
    female_first_name: String,
    #[serde(rename = "female last name")]
    female_last_name: String,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            date: record.date.clone(),
            male_first_name: record.pair.male_first_name.clone(),
            male_last_name: record.pair.male_last_name.clone(),
            female_first_name: record.pair.female_first_name.clone(),
            female_last_name: record.pair.female_last_name.clone(),
        }
    }
}

impl HistoryRow {
    /// Value for a history column; columns this crate does not know stay blank
    fn field(&self, column: &str) -> &str {
        match column {
            "date" => &self.date,
            "male first name" => &self.male_first_name,
            "male last name" => &self.male_last_name,
            "female first name" => &self.female_first_name,
            "female last name" => &self.female_last_name,
            _ => "",
        }
    }
}

impl From<HistoryRow> for HistoryRecord {
    fn from(row: HistoryRow) -> Self {
        let pair = Pair {
            male_first_name: row.male_first_name,
            male_last_name: row.male_last_name,
            female_first_name: row.female_first_name,
            female_last_name: row.female_last_name,
        };
        HistoryRecord::new(row.date, pair)
    }
}

fn open_reader(path: &Path, columns: &[&'static str]) -> Result<Reader<File>, TableError> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| TableError::csv(path, e))?;

    let headers = reader.headers().map_err(|e| TableError::csv(path, e))?;
    for &column in columns {
        if !headers.iter().any(|header| header == column) {
            return Err(TableError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    Ok(reader)
}

/// Read a registration or deny-list table
///
/// Columns other than `first name`, `last name` and `gender` are ignored.
pub fn read_people<P: AsRef<Path>>(path: P) -> Result<Vec<Person>, TableError> {
    let path = path.as_ref();
    let mut reader = open_reader(path, &PERSON_COLUMNS)?;

    let people = reader
        .deserialize::<PersonRow>()
        .map(|row| row.map(Person::from).map_err(|e| TableError::csv(path, e)))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Read {} people from {}", people.len(), path.display());
    Ok(people)
}

/// Read the history table, creating an empty one if it does not exist yet
pub fn read_history<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryRecord>, TableError> {
    let path = path.as_ref();

    if !path.exists() {
        tracing::info!("History file {} not found, creating it", path.display());
        create_history(path)?;
        return Ok(Vec::new());
    }

    // A hand-made history file may be completely empty
    if std::fs::metadata(path).map_err(|e| TableError::io(path, e))?.len() == 0 {
        return Ok(Vec::new());
    }

    let mut reader = open_reader(path, &HISTORY_COLUMNS)?;
    let records = reader
        .deserialize::<HistoryRow>()
        .map(|row| row.map(HistoryRecord::from).map_err(|e| TableError::csv(path, e)))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Read {} history records from {}", records.len(), path.display());
    Ok(records)
}

/// Write a history table containing only the header row
pub fn create_history<P: AsRef<Path>>(path: P) -> Result<(), TableError> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| TableError::csv(path, e))?;

    writer.write_record(HISTORY_COLUMNS).map_err(|e| TableError::csv(path, e))?;
    writer.flush().map_err(|e| TableError::io(path, e))
}

/// Write the new assignment, replacing any previous output
pub fn write_pairs<P: AsRef<Path>>(path: P, pairs: &[Pair]) -> Result<(), TableError> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| TableError::csv(path, e))?;

    writer.write_record(PAIR_COLUMNS).map_err(|e| TableError::csv(path, e))?;
    for pair in pairs {
        writer.serialize(PairRow::from(pair)).map_err(|e| TableError::csv(path, e))?;
    }

    writer.flush().map_err(|e| TableError::io(path, e))
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Stamp freshly made pairs so they can be stored as history
pub fn stamp_pairs(pairs: &[Pair], at: DateTime<Utc>) -> Vec<HistoryRecord> {
    let date = format_timestamp(at);
    pairs
        .iter()
        .map(|pair| HistoryRecord::new(date.clone(), pair.clone()))
        .collect()
}

/// Header of an existing history table, or `None` if the file is empty
fn history_header(path: &Path) -> Result<Option<Vec<String>>, TableError> {
    if std::fs::metadata(path).map_err(|e| TableError::io(path, e))?.len() == 0 {
        return Ok(None);
    }

    let mut reader = open_reader(path, &HISTORY_COLUMNS)?;
    let headers = reader.headers().map_err(|e| TableError::csv(path, e))?;
    Ok(Some(headers.iter().map(str::to_string).collect()))
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Append records to the history table
///
/// Rows follow the column order of the existing header, so hand-edited
/// tables with reordered or extra columns stay readable. Extra columns are
/// left blank. The header row is written first when the file is new or empty.
pub fn append_history<P: AsRef<Path>>(path: P, records: &[HistoryRecord]) -> Result<(), TableError> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| TableError::io(path, e))?;

    let header = history_header(path)?;
    if !ends_with_newline(&mut file).map_err(|e| TableError::io(path, e))? {
        file.write_all(b"\n").map_err(|e| TableError::io(path, e))?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    let columns = match header {
        Some(columns) => columns,
        None => {
            writer.write_record(HISTORY_COLUMNS).map_err(|e| TableError::csv(path, e))?;
            HISTORY_COLUMNS.iter().map(|column| column.to_string()).collect()
        }
    };

    for record in records {
        let row = HistoryRow::from(record);
        writer
            .write_record(columns.iter().map(|column| row.field(column)))
            .map_err(|e| TableError::csv(path, e))?;
    }

    writer.flush().map_err(|e| TableError::io(path, e))?;
    tracing::debug!("Appended {} history records to {}", records.len(), path.display());
    Ok(())
}
