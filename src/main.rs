//! Risk dashboard entrypoint: loads the four datasets once, applies the
//! configured selections and writes every page as one JSON line on stdout.
//! Usage: `risk-dashboard [DATA_DIR]`.

use risk_dashboard::{
    config::DashboardConfig,
    data::load_all,
    logging::StructuredLogger,
    projection::TrendProjector,
    report::Dashboard,
};
use std::path::PathBuf;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("RISK_DASHBOARD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("dashboard.json"));
    let mut config = DashboardConfig::load(&config_path);
    if let Some(dir) = std::env::args_os().nth(1) {
        config.data_dir = PathBuf::from(dir);
    }

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(data_dir = ?config.data_dir, "risk dashboard starting");

    let data = match load_all(&config.data_dir, &config.files) {
        Ok(data) => data,
        Err(e) => {
            error!(path = %e.path().display(), error = %e, "data load failed; check the input directory");
            return Err(e.into());
        }
    };

    let quality = data.quality_report();
    if !quality.is_clean() {
        quality.log();
    }

    let projector = TrendProjector::new(config.projection.clone());
    let dashboard = Dashboard::new(&data, &config.filters, &projector);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for page in dashboard.pages() {
        StructuredLogger::emit_json(&page, &mut out)?;
    }
    info!(
        showing = dashboard.filtered_incidents().len(),
        total = data.incidents.len(),
        "pages rendered"
    );

    Ok(())
}
