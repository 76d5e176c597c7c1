//! Daily sales aggregation with before/after threshold splits.
//!
//! Sales splits and grand totals are computed from the daily aggregates,
//! while quantity splits are computed from the filtered records directly.
//! The two paths agree because grouping never drops a record.

use std::collections::{BTreeMap, BTreeSet};

use dashboard_core::diagnostics::{emit, DiagnosticEvent, DiagnosticSink};
use dashboard_core::models::{DailyAggregate, PeriodSplit, SalesRecord};
use dashboard_core::partition::PartitionRule;
use dashboard_core::region::RegionFilter;
use tracing::debug;

// ── SalesSummary ──────────────────────────────────────────────────────────────

/// Everything computed for one region selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub region: RegionFilter,
    /// Number of records that passed the region filter.
    pub record_count: usize,
    /// One entry per date present, ascending.
    pub daily: Vec<DailyAggregate>,
    pub sales_split: PeriodSplit<f64>,
    pub quantity_split: PeriodSplit<u64>,
    pub total_sales: f64,
    pub total_quantity: u64,
}

impl SalesSummary {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Grand totals over a daily series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyTotals {
    pub sales: f64,
    pub quantity: u64,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that filters, groups and splits sales records.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Records whose region matches `filter`, in their original order.
    pub fn filter_records<'a>(
        records: &'a [SalesRecord],
        filter: &RegionFilter,
    ) -> Vec<&'a SalesRecord> {
        records.iter().filter(|r| filter.matches(&r.region)).collect()
    }

    /// Group by calendar date and sum revenue and quantity.
    ///
    /// Returns one aggregate per date present, sorted ascending.  Dates with
    /// no records are absent.
    pub fn aggregate_daily(records: &[&SalesRecord]) -> Vec<DailyAggregate> {
        let mut map: BTreeMap<chrono::NaiveDate, DailyAggregate> = BTreeMap::new();

        for record in records {
            map.entry(record.date)
                .or_insert_with(|| DailyAggregate::new(record.date))
                .add_record(record);
        }

        map.into_values().collect()
    }

    /// Revenue before/after the threshold, from the daily series.
    pub fn split_sales(daily: &[DailyAggregate], rule: &PartitionRule) -> PeriodSplit<f64> {
        rule.split(daily.iter().map(|d| (d.date, d.total_sales)))
    }

    /// Quantity before/after the threshold, from the filtered records.
    pub fn split_quantity(records: &[&SalesRecord], rule: &PartitionRule) -> PeriodSplit<u64> {
        rule.split(records.iter().map(|r| (r.date, r.quantity)))
    }

    /// Sum revenue and quantity over every day.
    pub fn calculate_totals(daily: &[DailyAggregate]) -> DailyTotals {
        let mut totals = DailyTotals::default();
        for day in daily {
            totals.sales += day.total_sales;
            totals.quantity += day.total_quantity;
        }
        totals
    }

    /// Distinct regions present in `records`, lowercased and sorted.
    pub fn available_regions(records: &[SalesRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.region.to_lowercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Run the full pipeline for one region selection.
    ///
    /// An unknown region or an empty dataset yields an all-zero summary.
    /// `sink`, when given, receives one event per stage.
    pub fn summarize(
        records: &[SalesRecord],
        filter: &RegionFilter,
        rule: &PartitionRule,
        sink: Option<&dyn DiagnosticSink>,
    ) -> SalesSummary {
        emit(sink, || {
            DiagnosticEvent::new("aggregate:entry", "Region selection received")
                .with("region", filter.to_string())
        });

        let filtered = Self::filter_records(records, filter);
        emit(sink, || {
            DiagnosticEvent::new("aggregate:after_filter", "After region filter")
                .with("branch", if filter.is_all() { "all" } else { "filtered" })
                .with("filtered_rows", filtered.len())
        });

        let daily = Self::aggregate_daily(&filtered);
        emit(sink, || {
            DiagnosticEvent::new("aggregate:after_groupby", "After daily grouping")
                .with("daily_rows", daily.len())
        });

        let sales_split = Self::split_sales(&daily, rule);
        let quantity_split = Self::split_quantity(&filtered, rule);
        let totals = Self::calculate_totals(&daily);

        emit(sink, || {
            DiagnosticEvent::new("aggregate:before_return", "Computed aggregates")
                .with("total_sales", totals.sales)
                .with("before_sales", sales_split.before)
                .with("after_sales", sales_split.after)
                .with("total_quantity", totals.quantity)
                .with("before_qty", quantity_split.before)
                .with("after_qty", quantity_split.after)
        });

        debug!(
            region = %filter,
            records = filtered.len(),
            days = daily.len(),
            "summary computed"
        );

        SalesSummary {
            region: filter.clone(),
            record_count: filtered.len(),
            daily,
            sales_split,
            quantity_split,
            total_sales: totals.sales,
            total_quantity: totals.quantity,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::diagnostics::MemorySink;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule() -> PartitionRule {
        PartitionRule::new(ymd(2021, 1, 15))
    }

    fn rec(date: NaiveDate, region: &str, quantity: u64, price: f64) -> SalesRecord {
        SalesRecord::new(date, region, quantity, price)
    }

    fn dataset() -> Vec<SalesRecord> {
        vec![
            rec(ymd(2021, 1, 10), "north", 5, 2.0),
            rec(ymd(2021, 1, 10), "south", 4, 3.0),
            rec(ymd(2021, 1, 14), "East", 2, 3.0),
            rec(ymd(2021, 1, 15), "north", 1, 5.0),
            rec(ymd(2021, 1, 15), "west", 6, 5.0),
            rec(ymd(2021, 1, 20), "North", 3, 2.0),
            rec(ymd(2021, 2, 1), "south", 7, 5.0),
        ]
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    // ── concrete scenario ─────────────────────────────────────────────────────

    #[test]
    fn test_two_row_scenario() {
        let records = vec![
            rec(ymd(2021, 1, 10), "North", 5, 2.0),
            rec(ymd(2021, 1, 20), "North", 3, 2.0),
        ];
        let s = SalesAggregator::summarize(&records, &RegionFilter::parse("north"), &rule(), None);

        assert_close(s.sales_split.before, 10.0);
        assert_close(s.sales_split.after, 6.0);
        assert_close(s.total_sales, 16.0);
        assert_eq!(s.total_quantity, 8);
        assert_eq!(s.quantity_split.before, 5);
        assert_eq!(s.quantity_split.after, 3);
    }

    // ── filter_records ────────────────────────────────────────────────────────

    #[test]
    fn test_filter_all_keeps_everything_in_order() {
        let data = dataset();
        let filtered = SalesAggregator::filter_records(&data, &RegionFilter::All);
        assert_eq!(filtered.len(), data.len());
        assert_eq!(filtered[0], &data[0]);
    }

    #[test]
    fn test_filter_region_case_insensitive() {
        let data = dataset();
        let lower = SalesAggregator::filter_records(&data, &RegionFilter::parse("north"));
        let upper = SalesAggregator::filter_records(&data, &RegionFilter::parse("North"));
        assert_eq!(lower.len(), 3);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_filter_unknown_region_is_empty() {
        let data = dataset();
        assert!(SalesAggregator::filter_records(&data, &RegionFilter::parse("atlantis")).is_empty());
    }

    // ── aggregate_daily ───────────────────────────────────────────────────────

    #[test]
    fn test_daily_groups_and_sorts() {
        let mut data = dataset();
        data.reverse();
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let daily = SalesAggregator::aggregate_daily(&refs);

        let dates: Vec<NaiveDate> = daily.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![
                ymd(2021, 1, 10),
                ymd(2021, 1, 14),
                ymd(2021, 1, 15),
                ymd(2021, 1, 20),
                ymd(2021, 2, 1)
            ]
        );
        assert_close(daily[0].total_sales, 22.0);
        assert_eq!(daily[0].total_quantity, 9);
    }

    #[test]
    fn test_daily_dates_unique_and_not_zero_filled() {
        let data = dataset();
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let daily = SalesAggregator::aggregate_daily(&refs);
        let unique: BTreeSet<NaiveDate> = daily.iter().map(|d| d.date).collect();
        assert_eq!(unique.len(), daily.len());
        assert!(!unique.contains(&ymd(2021, 1, 11)));
    }

    #[test]
    fn test_daily_empty() {
        assert!(SalesAggregator::aggregate_daily(&[]).is_empty());
    }

    // ── conservation / partition laws ─────────────────────────────────────────

    #[test]
    fn test_daily_revenue_conserved() {
        let data = dataset();
        for filter in ["all", "north", "south", "east", "west"] {
            let filter = RegionFilter::parse(filter);
            let filtered = SalesAggregator::filter_records(&data, &filter);
            let direct: f64 = filtered.iter().map(|r| r.revenue).sum();
            let daily = SalesAggregator::aggregate_daily(&filtered);
            let grouped: f64 = daily.iter().map(|d| d.total_sales).sum();
            assert_close(direct, grouped);
        }
    }

    #[test]
    fn test_splits_sum_to_totals() {
        let data = dataset();
        for filter in ["all", "north", "south", "east", "west", "nowhere"] {
            let s = SalesAggregator::summarize(&data, &RegionFilter::parse(filter), &rule(), None);
            assert_close(s.sales_split.total(), s.total_sales);
            assert_eq!(s.quantity_split.total(), s.total_quantity);
        }
    }

    #[test]
    fn test_region_summary_matches_manual_filter() {
        let data = dataset();
        let s = SalesAggregator::summarize(&data, &RegionFilter::parse("SOUTH"), &rule(), None);
        let manual: Vec<&SalesRecord> = data
            .iter()
            .filter(|r| r.region.eq_ignore_ascii_case("south"))
            .collect();
        let revenue: f64 = manual.iter().map(|r| r.revenue).sum();
        let quantity: u64 = manual.iter().map(|r| r.quantity).sum();
        assert_close(s.total_sales, revenue);
        assert_eq!(s.total_quantity, quantity);
        assert_eq!(s.record_count, manual.len());
    }

    #[test]
    fn test_case_variants_identical() {
        let data = dataset();
        let a = SalesAggregator::summarize(&data, &RegionFilter::parse("North"), &rule(), None);
        let b = SalesAggregator::summarize(&data, &RegionFilter::parse("north"), &rule(), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_threshold_day_counts_as_after() {
        let data = dataset();
        let s = SalesAggregator::summarize(&data, &RegionFilter::parse("west"), &rule(), None);
        assert_close(s.sales_split.before, 0.0);
        assert_close(s.sales_split.after, 30.0);
        assert_eq!(s.quantity_split.after, 6);
    }

    // ── empty results ─────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_region_all_zero() {
        let data = dataset();
        let s = SalesAggregator::summarize(&data, &RegionFilter::parse("atlantis"), &rule(), None);
        assert!(s.is_empty());
        assert!(s.daily.is_empty());
        assert_eq!(s.total_sales, 0.0);
        assert_eq!(s.total_quantity, 0);
        assert_eq!(s.sales_split, PeriodSplit::default());
        assert_eq!(s.quantity_split, PeriodSplit::default());
    }

    #[test]
    fn test_empty_dataset_all_zero() {
        let s = SalesAggregator::summarize(&[], &RegionFilter::All, &rule(), None);
        assert!(s.is_empty());
        assert_eq!(s.total_sales, 0.0);
    }

    // ── calculate_totals ──────────────────────────────────────────────────────

    #[test]
    fn test_calculate_totals() {
        let data = dataset();
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let totals = SalesAggregator::calculate_totals(&SalesAggregator::aggregate_daily(&refs));
        assert_eq!(totals.quantity, 28);
        assert_close(totals.sales, 10.0 + 12.0 + 6.0 + 5.0 + 30.0 + 6.0 + 35.0);
    }

    #[test]
    fn test_calculate_totals_empty() {
        assert_eq!(SalesAggregator::calculate_totals(&[]), DailyTotals::default());
    }

    // ── available_regions ─────────────────────────────────────────────────────

    #[test]
    fn test_available_regions_distinct_sorted_lowercase() {
        assert_eq!(
            SalesAggregator::available_regions(&dataset()),
            vec!["east", "north", "south", "west"]
        );
    }

    // ── diagnostics ───────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_emits_stage_events() {
        let sink = MemorySink::new();
        let data = dataset();
        SalesAggregator::summarize(&data, &RegionFilter::parse("north"), &rule(), Some(&sink));

        let events = sink.events();
        let locations: Vec<&str> = events.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(
            locations,
            vec![
                "aggregate:entry",
                "aggregate:after_filter",
                "aggregate:after_groupby",
                "aggregate:before_return"
            ]
        );
        assert_eq!(events[1].data["filtered_rows"], 3);
        assert_eq!(events[1].data["branch"], "filtered");
    }
}
