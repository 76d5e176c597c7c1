//! Plain-text KPI block printed by `--mode summary`.

use std::fmt::Write;

use dashboard_core::dates::format_date;
use dashboard_data::merger::MergeOutcome;
use dashboard_data::view_model::DashboardView;

pub fn format_summary(view: &DashboardView) -> String {
    let k = &view.kpis;
    let rows = [
        ("Total sales", k.total_sales.as_str()),
        ("Sales before", k.before_sales.as_str()),
        ("Sales after", k.after_sales.as_str()),
        ("Total quantity", k.total_quantity.as_str()),
        ("Quantity before", k.before_quantity.as_str()),
        ("Quantity after", k.after_quantity.as_str()),
    ];

    let mut out = format!(
        "Region: {}  (price change {})\n",
        view.region,
        format_date(view.threshold)
    );
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<16} {:>14}", label, value);
    }
    match view.date_range() {
        Some((first, last)) => {
            let _ = writeln!(
                out,
                "  {} days with sales, {} to {}",
                view.daily.len(),
                format_date(first),
                format_date(last)
            );
        }
        None => out.push_str("  No sales for this region\n"),
    }
    out
}

pub fn format_merge(outcome: &MergeOutcome) -> String {
    let mut out = String::new();
    for file in &outcome.files {
        let _ = writeln!(
            out,
            "  {}: kept {} of {} rows",
            file.path.display(),
            file.rows_kept,
            file.rows_read
        );
    }
    let _ = writeln!(
        out,
        "Merged {} rows from {} files",
        outcome.records.len(),
        outcome.files.len()
    );
    out
}
