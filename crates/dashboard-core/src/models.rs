use std::ops::Add;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{format_date, parse_date};
use crate::error::Result;

/// One row of a raw per-region sales file, exactly as read.
///
/// Every cell stays a string until the product predicate has been applied,
/// so malformed cells on rows for other products never abort a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSalesRow {
    pub product: String,
    pub quantity: String,
    /// Currency-prefixed unit price, e.g. `"$3.00"`.
    pub price: String,
    pub date: String,
    pub region: String,
}

/// Column names every raw input file must provide.
pub const RAW_COLUMNS: [&str; 5] = ["product", "quantity", "price", "date", "region"];

/// One row of the merged (canonical) sales file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Region")]
    pub region: String,
    /// Absent from three-column files produced by older merges.
    #[serde(rename = "Quantity", default)]
    pub quantity: u64,
}

/// Column names every canonical file must provide (`Quantity` is optional).
pub const CANONICAL_COLUMNS: [&str; 3] = ["Sales", "Date", "Region"];

/// A single sale of the target product, normalised and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub region: String,
    pub quantity: u64,
    pub unit_price: f64,
    /// Always `quantity × unit_price` for records built from raw rows.
    pub revenue: f64,
}

impl SalesRecord {
    /// Build a record and derive its revenue.
    pub fn new(date: NaiveDate, region: impl Into<String>, quantity: u64, unit_price: f64) -> Self {
        Self {
            date,
            region: region.into(),
            quantity,
            unit_price,
            revenue: quantity as f64 * unit_price,
        }
    }

    /// Rebuild a record from a canonical row.
    ///
    /// Revenue is taken verbatim; the unit price is recovered as
    /// `revenue / quantity`, or `0.0` when the row carries no quantity.
    pub fn from_canonical(row: &CanonicalRow) -> Result<Self> {
        let date = parse_date(&row.date)?;
        let unit_price = if row.quantity > 0 {
            row.sales / row.quantity as f64
        } else {
            0.0
        };
        Ok(Self {
            date,
            region: row.region.clone(),
            quantity: row.quantity,
            unit_price,
            revenue: row.sales,
        })
    }

    /// Project onto the canonical output schema.
    pub fn to_canonical(&self) -> CanonicalRow {
        CanonicalRow {
            sales: self.revenue,
            date: format_date(self.date),
            region: self.region.clone(),
            quantity: self.quantity,
        }
    }
}

/// Summed revenue and quantity for a single calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub total_sales: f64,
    pub total_quantity: u64,
}

impl DailyAggregate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_sales: 0.0,
            total_quantity: 0,
        }
    }

    /// Accumulate one record into this day's totals.
    pub fn add_record(&mut self, record: &SalesRecord) {
        self.total_sales += record.revenue;
        self.total_quantity += record.quantity;
    }
}

/// A value split at the threshold date.
///
/// `before` holds dates strictly earlier than the threshold, `after` holds
/// the threshold date itself and everything later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSplit<T> {
    pub before: T,
    pub after: T,
}

impl<T: Copy + Add<Output = T>> PeriodSplit<T> {
    pub fn total(&self) -> T {
        self.before + self.after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sales_record_revenue() {
        let r = SalesRecord::new(ymd(2021, 1, 10), "north", 5, 2.0);
        assert!((r.revenue - 10.0).abs() < 1e-9);
        assert_eq!(r.region, "north");
    }

    #[test]
    fn test_sales_record_zero_quantity() {
        let r = SalesRecord::new(ymd(2021, 1, 10), "north", 0, 3.0);
        assert_eq!(r.revenue, 0.0);
    }

    #[test]
    fn test_canonical_projection() {
        let r = SalesRecord::new(ymd(2021, 1, 10), "north", 3, 2.5);
        let row = r.to_canonical();
        assert_eq!(row.date, "2021-01-10");
        assert_eq!(row.region, "north");
        assert_eq!(row.quantity, 3);
        assert!((row.sales - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_canonical_recovers_unit_price() {
        let row = CanonicalRow {
            sales: 9.0,
            date: "2021-01-20".to_string(),
            region: "south".to_string(),
            quantity: 3,
        };
        let r = SalesRecord::from_canonical(&row).unwrap();
        assert_eq!(r.date, ymd(2021, 1, 20));
        assert!((r.unit_price - 3.0).abs() < 1e-9);
        assert!((r.revenue - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_canonical_without_quantity() {
        let row = CanonicalRow {
            sales: 9.0,
            date: "2021-01-20".to_string(),
            region: "south".to_string(),
            quantity: 0,
        };
        let r = SalesRecord::from_canonical(&row).unwrap();
        assert_eq!(r.unit_price, 0.0);
        assert!((r.revenue - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_canonical_bad_date() {
        let row = CanonicalRow {
            sales: 1.0,
            date: "yesterday".to_string(),
            region: "east".to_string(),
            quantity: 1,
        };
        assert!(SalesRecord::from_canonical(&row).is_err());
    }

    #[test]
    fn test_daily_aggregate_accumulates() {
        let mut day = DailyAggregate::new(ymd(2021, 1, 10));
        day.add_record(&SalesRecord::new(ymd(2021, 1, 10), "north", 5, 2.0));
        day.add_record(&SalesRecord::new(ymd(2021, 1, 10), "south", 1, 3.0));
        assert_eq!(day.total_quantity, 6);
        assert!((day.total_sales - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_period_split_total() {
        let s: PeriodSplit<f64> = PeriodSplit { before: 10.0, after: 6.0 };
        assert!((s.total() - 16.0).abs() < 1e-9);
        let q: PeriodSplit<u64> = PeriodSplit { before: 5, after: 3 };
        assert_eq!(q.total(), 8);
    }

    #[test]
    fn test_period_split_default_is_zero() {
        let s: PeriodSplit<u64> = PeriodSplit::default();
        assert_eq!(s.total(), 0);
    }
}
