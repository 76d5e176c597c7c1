use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dashboard_core::settings::{Settings, APP_DIR_NAME};
use dashboard_data::merger::MergeOutcome;
use dashboard_data::reader::discover_input_files;
use dashboard_runtime::context::{DataContext, MergePlan};
use dashboard_runtime::diagnostics_log::JsonlDiagnosticSink;
use dashboard_runtime::service::DashboardService;

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.sales-dashboard`, or `./.sales-dashboard` without a home directory.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Ensure `~/.sales-dashboard/` and `~/.sales-dashboard/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&app_dir())
}

fn ensure_directories_in(app_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(app_dir.join("logs"))
        .with_context(|| format!("creating {}", app_dir.display()))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Where log output goes for these settings.
///
/// An explicit `--log-file` always wins.  Terminal UI modes default to
/// `~/.sales-dashboard/logs/dashboard.log` because stderr would draw over
/// the screen; one-shot modes log to stderr.
pub fn log_file_for(settings: &Settings) -> Option<PathBuf> {
    log_file_in(settings, &app_dir())
}

fn log_file_in(settings: &Settings, app_dir: &Path) -> Option<PathBuf> {
    match &settings.log_file {
        Some(path) => Some(path.clone()),
        None if settings.is_interactive() => Some(app_dir.join("logs").join("dashboard.log")),
        None => None,
    }
}

/// Map a `--log-level` name to an [`EnvFilter`] directive.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to `log_file` (appended, no ANSI colours) when given, otherwise
/// to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (None, Some(layer))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

// ── Dataset preparation ────────────────────────────────────────────────────────

/// Raw input files: explicit `--input` paths in the given order, otherwise
/// every CSV discovered in `--data-dir`.
pub fn resolve_inputs(settings: &Settings) -> anyhow::Result<Vec<PathBuf>> {
    if !settings.inputs.is_empty() {
        return Ok(settings.inputs.clone());
    }
    let files = discover_input_files(&settings.data_dir)?;
    Ok(files)
}

/// Merge the raw inputs into the merged file unconditionally.
pub fn run_merge(settings: &Settings) -> anyhow::Result<MergeOutcome> {
    let plan = MergePlan {
        inputs: resolve_inputs(settings)?,
        product: settings.product.clone(),
        output: settings.merged_file.clone(),
        force: true,
    };
    let outcome = plan
        .run()?
        .context("forced merge did not produce an outcome")?;
    Ok(outcome)
}

/// Make sure the merged file exists (merging first when asked to or when
/// it is missing), then load it.
pub fn load_context(settings: &Settings) -> anyhow::Result<DataContext> {
    let mut plan = MergePlan {
        inputs: Vec::new(),
        product: settings.product.clone(),
        output: settings.merged_file.clone(),
        force: settings.remerge,
    };
    if plan.needs_merge() {
        tracing::info!(
            "Merging raw files into {}",
            settings.merged_file.display()
        );
        plan.inputs = resolve_inputs(settings)?;
        plan.run()?;
    }
    let ctx = DataContext::load(&settings.merged_file, settings.threshold_date)?;
    Ok(ctx)
}

/// Build the region-change service, attaching the JSON-lines diagnostic
/// sink when `--diagnostics-log` is set.
pub fn build_service(settings: &Settings) -> anyhow::Result<DashboardService> {
    let ctx = Arc::new(load_context(settings)?);
    let service = DashboardService::new(ctx);
    Ok(match &settings.diagnostics_log {
        Some(path) => {
            tracing::info!("Diagnostic events go to {}", path.display());
            service.with_sink(Arc::new(JsonlDiagnosticSink::new(path)))
        }
        None => service,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
