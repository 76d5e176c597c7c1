//! Region-change request handling.

use std::sync::Arc;

use dashboard_core::diagnostics::DiagnosticSink;
use dashboard_core::region::RegionFilter;
use dashboard_data::aggregator::{SalesAggregator, SalesSummary};
use dashboard_data::view_model::DashboardView;

use crate::context::DataContext;

/// What the presentation layer calls whenever the selected region changes.
pub trait RegionChangeHandler {
    fn region_changed(&self, filter: RegionFilter) -> DashboardView;
}

/// Default handler: aggregates the shared dataset for each request.
#[derive(Clone)]
pub struct DashboardService {
    ctx: Arc<DataContext>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl DashboardService {
    pub fn new(ctx: Arc<DataContext>) -> Self {
        Self { ctx, sink: None }
    }

    /// Attach a diagnostic sink that receives one event per aggregation stage.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn context(&self) -> &DataContext {
        &self.ctx
    }

    pub fn summarize(&self, filter: &RegionFilter) -> SalesSummary {
        SalesAggregator::summarize(
            self.ctx.records(),
            filter,
            self.ctx.rule(),
            self.sink.as_deref(),
        )
    }
}

impl RegionChangeHandler for DashboardService {
    fn region_changed(&self, filter: RegionFilter) -> DashboardView {
        tracing::debug!(region = %filter, "region changed");
        let summary = self.summarize(&filter);
        DashboardView::from_summary(&summary, self.ctx.threshold(), self.ctx.regions())
    }
}
