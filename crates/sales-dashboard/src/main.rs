mod bootstrap;
mod report;

use anyhow::Result;
use dashboard_core::region::RegionFilter;
use dashboard_core::settings::Settings;
use dashboard_runtime::service::RegionChangeHandler;
use dashboard_ui::app::{App, ViewMode};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = bootstrap::log_file_for(&settings);
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Sales Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Mode: {}, Region: {}, Theme: {}, Threshold: {}",
        settings.mode,
        settings.region,
        settings.theme,
        settings.threshold_date
    );

    match settings.mode.as_str() {
        "merge" => {
            let outcome = bootstrap::run_merge(&settings)?;
            print!("{}", report::format_merge(&outcome));
            println!("Wrote {}", settings.merged_file.display());
        }

        "summary" => {
            let service = bootstrap::build_service(&settings)?;
            let view = service.region_changed(RegionFilter::parse(&settings.region));
            print!("{}", report::format_summary(&view));
        }

        "dashboard" | "table" => {
            let service = bootstrap::build_service(&settings)?;
            let app = App::new(
                &settings.theme,
                ViewMode::from_name(&settings.mode),
                service,
                RegionFilter::parse(&settings.region),
            );

            // 'q' / Ctrl+C inside the TUI end the loop; the signal arm covers
            // SIGINT sent from outside. Dropping `run` restores the terminal.
            tokio::select! {
                result = app.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }

        unknown => {
            eprintln!("Unknown mode: {}", unknown);
        }
    }

    Ok(())
}
