//! Input discovery and canonical dataset loading.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{CanonicalRow, SalesRecord, CANONICAL_COLUMNS};

use crate::merger::ensure_columns;

/// List the raw `.csv` files directly inside `data_dir` in natural order.
///
/// Numeric runs in file names compare by value, giving the documented merge
/// order (`daily_sales_data_0.csv`, `daily_sales_data_1.csv`, ...,
/// `daily_sales_data_10.csv`).
pub fn discover_input_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    if !data_dir.is_dir() {
        return Err(DashboardError::FileRead {
            path: data_dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "data directory not found"),
        });
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    if files.is_empty() {
        warn!("No CSV files found in {}", data_dir.display());
        return Err(DashboardError::NoInputFiles(data_dir.to_path_buf()));
    }

    files.sort_by_cached_key(|path| natural_key(path));
    debug!("Discovered {} input files in {}", files.len(), data_dir.display());
    Ok(files)
}

/// One run of a file name: digits compare as numbers, everything else as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum NameChunk {
    Number(u64),
    Text(String),
}

/// Sort key that orders `file_2.csv` before `file_10.csv`.
///
/// The stem is compared run by run, then the extension, then the full path,
/// so leading zeros and over-long digit runs still sort deterministically.
fn natural_key(path: &Path) -> (Vec<NameChunk>, String, String) {
    let lower = |part: Option<&std::ffi::OsStr>| {
        part.map(|p| p.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    };
    let stem = lower(path.file_stem());

    let mut chunks = Vec::new();
    let mut rest = stem.as_str();
    while let Some(first) = rest.chars().next() {
        let is_digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        chunks.push(match run.parse::<u64>() {
            Ok(n) if is_digit => NameChunk::Number(n),
            _ => NameChunk::Text(run.to_string()),
        });
        rest = tail;
    }

    (chunks, lower(path.extension()), path.to_string_lossy().to_string())
}

/// Load canonical rows from any reader.  `source` is only used in errors.
pub fn load_canonical_from<R: Read>(reader: R, source: &Path) -> Result<Vec<SalesRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    ensure_columns(&headers, &CANONICAL_COLUMNS, source)?;

    let mut records = Vec::new();
    for (idx, result) in csv_reader.deserialize::<CanonicalRow>().enumerate() {
        let row = result?;
        let record = SalesRecord::from_canonical(&row).map_err(|e| e.at_row(source, idx + 2))?;
        records.push(record);
    }
    Ok(records)
}

/// Load the merged canonical file from disk.
pub fn load_canonical(path: &Path) -> Result<Vec<SalesRecord>> {
    let file = File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_canonical_from(file, path)?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::{merge_files, write_canonical, DEFAULT_PRODUCT};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    // ── discover_input_files ──────────────────────────────────────────────────

    #[test]
    fn test_discover_sorted_csv_only() {
        let tmp = TempDir::new().unwrap();
        for name in ["daily_sales_data_2.csv", "daily_sales_data_0.csv", "notes.txt", "daily_sales_data_1.CSV"] {
            std::fs::write(tmp.path().join(name), "x").unwrap();
        }
        let files = discover_input_files(tmp.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["daily_sales_data_0.csv", "daily_sales_data_1.CSV", "daily_sales_data_2.csv"]
        );
    }

    #[test]
    fn test_discover_orders_numbers_by_value() {
        let tmp = TempDir::new().unwrap();
        for i in (0..=11).rev() {
            std::fs::write(tmp.path().join(format!("daily_sales_data_{i}.csv")), "x").unwrap();
        }
        let names: Vec<String> = discover_input_files(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        let expected: Vec<String> = (0..=11).map(|i| format!("daily_sales_data_{i}.csv")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_natural_key_orders_mixed_names() {
        let mut paths = vec![
            PathBuf::from("b.csv"),
            PathBuf::from("a10.csv"),
            PathBuf::from("a2.csv"),
            PathBuf::from("a.csv"),
        ];
        paths.sort_by_cached_key(|p| natural_key(p));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.csv"),
                PathBuf::from("a2.csv"),
                PathBuf::from("a10.csv"),
                PathBuf::from("b.csv"),
            ]
        );
    }

    #[test]
    fn test_discover_ignores_nested_dirs() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.csv"), "x").unwrap();
        std::fs::create_dir(tmp.path().join("old")).unwrap();
        std::fs::write(tmp.path().join("old").join("b.csv"), "x").unwrap();
        assert_eq!(discover_input_files(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_discover_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_input_files(tmp.path()),
            Err(DashboardError::NoInputFiles(_))
        ));
    }

    #[test]
    fn test_discover_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            discover_input_files(&missing),
            Err(DashboardError::FileRead { .. })
        ));
    }

    // ── load_canonical ────────────────────────────────────────────────────────

    #[test]
    fn test_load_canonical_four_columns() {
        let csv = "Sales,Date,Region,Quantity\n10.0,2021-01-10,north,5\n6.0,2021-01-20,North,3\n";
        let records = load_canonical_from(csv.as_bytes(), Path::new("mem.csv")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].region, "North");
        assert_eq!(records[1].quantity, 3);
        assert!((records[0].unit_price - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_canonical_three_columns() {
        let csv = "Sales,Date,Region\n10.0,2021-01-10,north\n";
        let records = load_canonical_from(csv.as_bytes(), Path::new("mem.csv")).unwrap();
        assert_eq!(records[0].quantity, 0);
        assert!((records[0].revenue - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_canonical_missing_region_column() {
        let csv = "Sales,Date\n10.0,2021-01-10\n";
        let err = load_canonical_from(csv.as_bytes(), Path::new("mem.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn { ref column, .. } if column == "Region"));
    }

    #[test]
    fn test_load_canonical_bad_date_is_fatal() {
        let csv = "Sales,Date,Region,Quantity\n10.0,2021-13-40,north,5\n";
        let err = load_canonical_from(csv.as_bytes(), Path::new("mem.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DateParse(_)));
    }

    #[test]
    fn test_load_canonical_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_canonical(&tmp.path().join("missing.csv")),
            Err(DashboardError::FileRead { .. })
        ));
    }

    // ── merge → write → reload ────────────────────────────────────────────────

    #[test]
    fn test_round_trip_revenue_matches_raw() {
        let tmp = TempDir::new().unwrap();
        let raw_rows = [
            (7u64, 3.0f64, "2021-01-10", "north"),
            (4, 3.0, "2021-01-14", "south"),
            (11, 5.0, "2021-01-15", "east"),
            (2, 5.0, "2021-02-01", "west"),
        ];
        let mut body = String::from("product,quantity,price,date,region\n");
        for (q, p, d, r) in &raw_rows {
            body.push_str(&format!("pink morsel,{q},${p:.2},{d},{r}\n"));
            body.push_str(&format!("gold morsel,{q},${p:.2},{d},{r}\n"));
        }
        let input = tmp.path().join("raw.csv");
        std::fs::write(&input, body).unwrap();

        let merged = merge_files(&[input], DEFAULT_PRODUCT).unwrap();
        let out = tmp.path().join("merged.csv");
        write_canonical(&merged.records, &out).unwrap();
        let reloaded = load_canonical(&out).unwrap();

        assert_eq!(reloaded.len(), raw_rows.len());
        for (record, (q, p, d, r)) in reloaded.iter().zip(raw_rows.iter()) {
            let expected = *q as f64 * p;
            assert!(
                (record.revenue - expected).abs() < 1e-9,
                "revenue {} != {}",
                record.revenue,
                expected
            );
            assert_eq!(record.date, d.parse::<NaiveDate>().unwrap());
            assert_eq!(record.region, *r);
            assert_eq!(record.quantity, *q);
        }
    }
}
