//! Record merger: raw per-region files in, one canonical dataset out.
//!
//! Each raw file is filtered to the target product, its price column is
//! stripped of the currency symbol, and revenue is derived as
//! `quantity × price`.  Files are concatenated in the order given and each
//! file keeps its own row order.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, info};

use dashboard_core::dates::parse_date;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{RawSalesRow, SalesRecord, RAW_COLUMNS};

/// Product kept by default.
pub const DEFAULT_PRODUCT: &str = "pink morsel";

// ── Outcome types ─────────────────────────────────────────────────────────────

/// Row counts for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub path: PathBuf,
    pub rows_read: usize,
    pub rows_kept: usize,
}

/// Result of merging a set of raw files.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Unified records in input-file order.
    pub records: Vec<SalesRecord>,
    /// Per-file statistics, in the same order as the inputs.
    pub files: Vec<FileStats>,
}

impl MergeOutcome {
    pub fn rows_read(&self) -> usize {
        self.files.iter().map(|f| f.rows_read).sum()
    }
}

// ── Cell parsers ──────────────────────────────────────────────────────────────

/// Parse a currency-prefixed price such as `"$3.00"`.
///
/// One leading currency symbol is stripped; what remains must be a finite,
/// non-negative number.
///
/// ```
/// use dashboard_data::merger::parse_price;
///
/// assert_eq!(parse_price("$3.00").unwrap(), 3.0);
/// assert_eq!(parse_price("4.5").unwrap(), 4.5);
/// assert!(parse_price("$").is_err());
/// ```
pub fn parse_price(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let numeric = match trimmed.chars().next() {
        Some(c) if !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+') => {
            trimmed[c.len_utf8()..].trim_start()
        }
        _ => trimmed,
    };

    let value: f64 = numeric
        .parse()
        .map_err(|_| DashboardError::InvalidPrice(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(DashboardError::InvalidPrice(raw.to_string()));
    }
    Ok(value)
}

/// Parse a non-negative integer quantity.
pub fn parse_quantity(raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| DashboardError::InvalidQuantity(raw.to_string()))
}

/// Turn a raw row into a record, or `None` when it is for another product.
pub fn record_from_raw(row: &RawSalesRow, product: &str) -> Result<Option<SalesRecord>> {
    if row.product != product {
        return Ok(None);
    }
    let quantity = parse_quantity(&row.quantity)?;
    let price = parse_price(&row.price)?;
    let date = parse_date(&row.date)?;
    Ok(Some(SalesRecord::new(date, row.region.clone(), quantity, price)))
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Fail with [`DashboardError::MissingColumn`] for the first absent column.
pub(crate) fn ensure_columns(headers: &StringRecord, required: &[&str], source: &Path) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DashboardError::MissingColumn {
                path: source.to_path_buf(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Read raw rows from any reader.  `source` is only used in error messages.
pub fn read_raw<R: Read>(reader: R, source: &Path, product: &str) -> Result<(Vec<SalesRecord>, FileStats)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    ensure_columns(&headers, &RAW_COLUMNS, source)?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.deserialize::<RawSalesRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;
        let row = result?;
        if let Some(record) = record_from_raw(&row, product).map_err(|e| e.at_row(source, line))? {
            records.push(record);
        }
    }

    let stats = FileStats {
        path: source.to_path_buf(),
        rows_read,
        rows_kept: records.len(),
    };
    Ok((records, stats))
}

/// Read one raw file from disk.
pub fn read_raw_file(path: &Path, product: &str) -> Result<(Vec<SalesRecord>, FileStats)> {
    let file = File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_raw(file, path, product)
}

/// Merge `paths` in order into one record set.
///
/// Any missing file or unparseable target-product row aborts the whole merge.
pub fn merge_files(paths: &[PathBuf], product: &str) -> Result<MergeOutcome> {
    let mut records = Vec::new();
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let (mut file_records, stats) = read_raw_file(path, product)?;
        debug!(
            "{}: kept {} of {} rows",
            path.display(),
            stats.rows_kept,
            stats.rows_read
        );
        records.append(&mut file_records);
        files.push(stats);
    }

    Ok(MergeOutcome { records, files })
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Header of the merged file; `Quantity` is optional on read.
const MERGED_HEADER: [&str; 4] = ["Sales", "Date", "Region", "Quantity"];

/// Write records using the canonical `Sales,Date,Region,Quantity` schema.
///
/// Rows go to a sibling `.tmp` file that is renamed over `path` once
/// complete, so a failed write never leaves a truncated merged file.
pub fn write_canonical(records: &[SalesRecord], path: &Path) -> Result<()> {
    let write_err = |source: std::io::Error| DashboardError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let written = write_rows(records, &tmp).and_then(|()| {
        std::fs::rename(&tmp, path).map_err(write_err)
    });
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}

fn write_rows(records: &[SalesRecord], tmp: &Path) -> Result<()> {
    let write_err = |source: std::io::Error| DashboardError::FileWrite {
        path: tmp.to_path_buf(),
        source,
    };
    let file = File::create(tmp).map_err(write_err)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(MERGED_HEADER)?;
    for record in records {
        writer.serialize(record.to_canonical())?;
    }
    writer.flush().map_err(write_err)?;
    Ok(())
}

/// Merge `paths` and write the canonical file to `output`.
pub fn merge_to_file(paths: &[PathBuf], product: &str, output: &Path) -> Result<MergeOutcome> {
    let outcome = merge_files(paths, product)?;
    write_canonical(&outcome.records, output)?;
    info!(
        "Merged {} of {} rows from {} files into {}",
        outcome.records.len(),
        outcome.rows_read(),
        outcome.files.len(),
        output.display()
    );
    Ok(outcome)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
