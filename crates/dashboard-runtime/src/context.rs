//! Read-only dataset shared by every request handler.
//!
//! A [`DataContext`] is built once at startup, wrapped in an `Arc`, and
//! never mutated afterwards, so handlers can read it without locking.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use dashboard_core::models::SalesRecord;
use dashboard_core::partition::PartitionRule;
use dashboard_core::Result;
use dashboard_data::aggregator::SalesAggregator;
use dashboard_data::merger::{merge_to_file, MergeOutcome};
use dashboard_data::reader::load_canonical;

// ── DataContext ───────────────────────────────────────────────────────────────

/// Unified sales records plus everything derived from them once.
#[derive(Debug, Clone)]
pub struct DataContext {
    records: Vec<SalesRecord>,
    regions: Vec<String>,
    rule: PartitionRule,
}

impl DataContext {
    pub fn from_records(records: Vec<SalesRecord>, threshold: NaiveDate) -> Self {
        let regions = SalesAggregator::available_regions(&records);
        Self {
            records,
            regions,
            rule: PartitionRule::new(threshold),
        }
    }

    /// Load the merged canonical file.
    pub fn load(merged_path: &Path, threshold: NaiveDate) -> Result<Self> {
        let records = load_canonical(merged_path)?;
        tracing::info!(
            records = records.len(),
            path = %merged_path.display(),
            "dataset loaded"
        );
        Ok(Self::from_records(records, threshold))
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Distinct lowercase regions, sorted.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn rule(&self) -> &PartitionRule {
        &self.rule
    }

    pub fn threshold(&self) -> NaiveDate {
        self.rule.threshold()
    }
}

// ── Merge preparation ─────────────────────────────────────────────────────────

/// Where the merged file comes from and whether to rebuild it.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub inputs: Vec<PathBuf>,
    pub product: String,
    pub output: PathBuf,
    /// Rebuild even when `output` already exists.
    pub force: bool,
}

impl MergePlan {
    /// `true` when running this plan would rewrite the merged file.
    pub fn needs_merge(&self) -> bool {
        self.force || !self.output.is_file()
    }

    /// Merge when needed. Returns `None` when the existing file was reused.
    pub fn run(&self) -> Result<Option<MergeOutcome>> {
        if !self.needs_merge() {
            tracing::debug!(path = %self.output.display(), "reusing merged file");
            return Ok(None);
        }
        merge_to_file(&self.inputs, &self.product, &self.output).map(Some)
    }
}
