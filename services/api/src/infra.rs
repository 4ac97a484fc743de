use bonus_panel::bonus::{BonusPanelService, MonthName};
use bonus_panel::config::BonusConfig;
use bonus_panel::error::AppError;
use bonus_panel::import::{BonusDocuments, CsvDirectorySource};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type DirectoryService = BonusPanelService<CsvDirectorySource>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the panel service over the documents and month sheets of a data directory.
pub(crate) fn load_service(
    data_dir: &Path,
    quarter_months: Vec<MonthName>,
) -> Result<DirectoryService, AppError> {
    let (engine, calendar) = BonusDocuments::load(data_dir)?.into_parts();
    Ok(BonusPanelService::new(
        engine,
        calendar,
        quarter_months,
        CsvDirectorySource::new(data_dir),
    ))
}

pub(crate) fn load_configured_service(config: &BonusConfig) -> Result<DirectoryService, AppError> {
    load_service(&config.data_dir, config.quarter_months.clone())
}
