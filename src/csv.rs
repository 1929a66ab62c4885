//! CSV ingestion and account statement output.

use serde::Serialize;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::engine::Account;
use crate::model::{ClientId, TxRecord};
use crate::validate::{self, RawRecord, ValidationError};

/// Errors that abort ingestion. Both carry the 1-indexed input line.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: failed to parse row: {source}")]
    Row { line: usize, source: csv::Error },

    #[error("line {line}: {source}")]
    Validation {
        line: usize,
        source: ValidationError,
    },
}

/// Read validated transaction records from a csv file.
///
/// Rows with an empty transaction id are dropped silently. Short rows
/// without an amount column are accepted. Returns `Err` only when the file
/// itself cannot be opened; per-row failures surface through the iterator.
pub fn read_records(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<TxRecord, CsvError>>, csv::Error> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let records = reader
        .into_deserialize::<RawRecord>()
        .enumerate()
        .filter_map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, header on line 1
            let row = match result {
                Ok(row) => row,
                Err(source) => return Some(Err(CsvError::Row { line, source })),
            };
            match validate::validate(&row) {
                Ok(Some(record)) => Some(Ok(record)),
                Ok(None) => None,
                Err(source) => Some(Err(CsvError::Validation { line, source })),
            }
        });

    Ok(records)
}

#[derive(Debug, Serialize)]
struct OutputRow {
    client: ClientId,
    available: String,
    held: String,
    total: String,
    locked: bool,
}

/// Write the final account statement in csv format.
///
/// The header is emitted lazily by the csv writer, so an empty account set
/// produces no output at all.
pub fn write_accounts<'a, W: io::Write>(
    writer: W,
    accounts: impl IntoIterator<Item = (ClientId, &'a Account)>,
) {
    let mut writer = csv::Writer::from_writer(writer);

    for (client, account) in accounts {
        let row = OutputRow {
            client,
            available: account.available.to_string(),
            held: account.held.to_string(),
            total: account.total.to_string(),
            locked: account.locked,
        };
        writer.serialize(&row).expect("failed to write csv row");
    }

    writer.flush().expect("failed to flush csv writer");
}
