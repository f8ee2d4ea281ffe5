mod bootstrap;

use anyhow::{Context, Result};
use regtrend_core::categories::CategoryLookup;
use regtrend_core::formatting::format_count;
use regtrend_core::settings::Settings;
use regtrend_data::ingest;
use regtrend_runtime::cache::DatasetCache;
use regtrend_runtime::session::{DashboardSession, InitialFilters};
use regtrend_ui::app::App;
use regtrend_ui::report::render_report;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(
        &settings.log_level,
        settings.log_file.as_deref(),
        settings.view == "dashboard",
    )?;

    tracing::info!("regtrend v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Raw: {}, Processed: {}",
        settings.view,
        settings.raw_dir.display(),
        settings.processed_dir.display()
    );

    match settings.view.as_str() {
        "process" => run_process(&settings),
        "report" => run_report(&settings),
        "dashboard" => run_dashboard(&settings),
        unknown => anyhow::bail!("Unknown view mode: {unknown}"),
    }
}

fn load_lookup(settings: &Settings) -> Result<CategoryLookup> {
    let lookup = match &settings.category_table {
        Some(path) => CategoryLookup::from_csv_path(path)
            .with_context(|| format!("loading category table {}", path.display()))?,
        None => CategoryLookup::builtin()?,
    };
    tracing::debug!(entries = lookup.len(), "category lookup ready");
    Ok(lookup)
}

fn run_process(settings: &Settings) -> Result<()> {
    let lookup = load_lookup(settings)?;
    let output = settings.interchange_path();
    let summary = ingest::process(&settings.raw_dir, &output, &lookup)
        .with_context(|| format!("processing {}", settings.raw_dir.display()))?;

    let years: Vec<String> = summary.years.iter().map(i32::to_string).collect();
    println!(
        "Wrote {} rows from {} file(s) (years {}) to {}",
        format_count(summary.rows as i64),
        summary.files,
        years.join(", "),
        output.display()
    );
    if summary.unclassified_rows > 0 {
        println!(
            "{} rows from {} maker(s) have no category and will not appear in the dashboard",
            format_count(summary.unclassified_rows as i64),
            summary.unclassified_makers.len()
        );
    }
    Ok(())
}

fn open_session(settings: &Settings) -> Result<DashboardSession> {
    let path = settings.interchange_path();
    DashboardSession::open(DatasetCache::new(&path), &InitialFilters::from(settings))
        .with_context(|| {
            format!(
                "opening {} (run with --view process to create it)",
                path.display()
            )
        })
}

fn run_report(settings: &Settings) -> Result<()> {
    let session = open_session(settings)?;
    print!("{}", render_report(session.view(), session.selection()));
    Ok(())
}

fn run_dashboard(settings: &Settings) -> Result<()> {
    let session = open_session(settings)?;
    App::new(&settings.theme, session).run()?;
    Ok(())
}
