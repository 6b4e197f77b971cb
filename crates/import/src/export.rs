//! CSV output for processed and raw records.
//!
//! Headers are written explicitly so an empty batch still produces a file
//! with a header row.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use cuenta_core::{OutputPaths, RawTransaction, Transaction};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub const TRANSACTION_HEADERS: [&str; 5] = ["Fecha", "Descripción", "Categoría", "Monto", "Tipo"];
pub const RAW_HEADERS: [&str; 3] = ["Fecha", "Descripción", "Monto"];

fn write_records<W, T>(writer: W, headers: &[&str], records: &[T]) -> Result<(), ExportError>
where
    W: Write,
    T: Serialize,
{
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(headers)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_transactions<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), ExportError> {
    write_records(writer, &TRANSACTION_HEADERS, transactions)
}

pub fn write_raw_transactions<W: Write>(writer: W, raw: &[RawTransaction]) -> Result<(), ExportError> {
    write_records(writer, &RAW_HEADERS, raw)
}

/// Partition into (expenses, incomes), each keeping input order.
pub fn split_by_type(transactions: &[Transaction]) -> (Vec<Transaction>, Vec<Transaction>) {
    transactions.iter().cloned().partition(|tx| tx.is_expense())
}

fn create(path: &Path) -> Result<File, ExportError> {
    let io_err = |source| ExportError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    File::create(path).map_err(io_err)
}

pub fn write_transactions_file(path: &Path, transactions: &[Transaction]) -> Result<(), ExportError> {
    write_transactions(create(path)?, transactions)?;
    info!(path = %path.display(), count = transactions.len(), "Wrote transactions");
    Ok(())
}

pub fn write_raw_file(path: &Path, raw: &[RawTransaction]) -> Result<(), ExportError> {
    write_raw_transactions(create(path)?, raw)?;
    info!(path = %path.display(), count = raw.len(), "Wrote raw transactions");
    Ok(())
}

/// Write the expense, income and combined files named by `outputs`.
pub fn export_grouped(transactions: &[Transaction], outputs: &OutputPaths) -> Result<(), ExportError> {
    let (expenses, incomes) = split_by_type(transactions);
    write_transactions_file(&outputs.expenses(), &expenses)?;
    write_transactions_file(&outputs.incomes(), &incomes)?;
    write_transactions_file(&outputs.all(), transactions)?;
    Ok(())
}
