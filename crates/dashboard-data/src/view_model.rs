//! Immutable view-model handed to the presentation layer.

use chrono::NaiveDate;

use dashboard_core::formatting::{format_currency, format_currency_whole, format_quantity};
use dashboard_core::models::{DailyAggregate, PeriodSplit};
use dashboard_core::region::RegionFilter;

use crate::aggregator::SalesSummary;

/// Pre-formatted KPI strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiStrings {
    pub total_sales: String,
    pub total_quantity: String,
    pub before_sales: String,
    pub after_sales: String,
    pub before_quantity: String,
    pub after_quantity: String,
}

/// Everything the UI needs to draw one region selection.
///
/// Built once per region change and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub region: RegionFilter,
    /// Selectable regions, excluding the "all" sentinel.
    pub regions: Vec<String>,
    pub threshold: NaiveDate,
    /// Whole-dollar KPIs for the cards.
    pub kpis: KpiStrings,
    /// Two-decimal revenue total for the table footer.
    pub total_sales_exact: String,
    pub sales_split: PeriodSplit<f64>,
    pub quantity_split: PeriodSplit<u64>,
    pub sales_series: Vec<(NaiveDate, f64)>,
    pub quantity_series: Vec<(NaiveDate, u64)>,
    pub daily: Vec<DailyAggregate>,
    pub record_count: usize,
}

impl DashboardView {
    pub fn from_summary(summary: &SalesSummary, threshold: NaiveDate, regions: &[String]) -> Self {
        let kpis = KpiStrings {
            total_sales: format_currency_whole(summary.total_sales),
            total_quantity: format_quantity(summary.total_quantity),
            before_sales: format_currency_whole(summary.sales_split.before),
            after_sales: format_currency_whole(summary.sales_split.after),
            before_quantity: format_quantity(summary.quantity_split.before),
            after_quantity: format_quantity(summary.quantity_split.after),
        };

        Self {
            region: summary.region.clone(),
            regions: regions.to_vec(),
            threshold,
            kpis,
            total_sales_exact: format_currency(summary.total_sales),
            sales_split: summary.sales_split,
            quantity_split: summary.quantity_split,
            sales_series: summary.daily.iter().map(|d| (d.date, d.total_sales)).collect(),
            quantity_series: summary
                .daily
                .iter()
                .map(|d| (d.date, d.total_quantity))
                .collect(),
            daily: summary.daily.clone(),
            record_count: summary.record_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// First and last dates of the series, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.sales_series.first()?.0;
        let last = self.sales_series.last()?.0;
        Some((first, last))
    }

    /// Picker options: `"all"` followed by every region.
    pub fn region_options(&self) -> Vec<String> {
        std::iter::once(RegionFilter::ALL.to_string())
            .chain(self.regions.iter().cloned())
            .collect()
    }
}
