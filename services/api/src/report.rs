use crate::infra::load_service;
use bonus_panel::bonus::report::views::BonusReportView;
use bonus_panel::bonus::{Period, ReportFilter};
use bonus_panel::config::AppConfig;
use bonus_panel::error::AppError;
use bonus_panel::telemetry;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Month name (as in the sheet file name) or QUARTER
    #[arg(long)]
    pub(crate) period: String,
    /// Directory holding the documents and month sheets (defaults to BONUS_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Case-insensitive fragment of the employee name
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) role: Option<String>,
    #[arg(long)]
    pub(crate) city: Option<String>,
    #[arg(long)]
    pub(crate) tenure: Option<String>,
    /// Print the report as JSON instead of cards
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        period,
        data_dir,
        name,
        role,
        city,
        tenure,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let data_dir = data_dir.unwrap_or(config.bonus.data_dir);
    let service = load_service(&data_dir, config.bonus.quarter_months)?;
    let filter = ReportFilter {
        name,
        role,
        city,
        tenure,
    };

    let report = service.report(Period::parse(&period), &filter)?;
    let view = report.view();

    if json {
        let rendered = serde_json::to_string_pretty(&view).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_report(&view);
    }

    Ok(())
}

pub(crate) fn render_report(view: &BonusReportView) {
    println!("Performance bonus panel ({})", view.period);
    println!(
        "Target {} | Earned {} | Forfeited {}",
        view.totals.target_label, view.totals.earned_label, view.totals.forfeited_label
    );

    if view.employees.is_empty() {
        println!("\nNo employees match the selected filters");
        return;
    }

    for card in &view.employees {
        println!("\n{} ({} / {})", card.name, card.role, card.city);
        println!(
            "  Admission {} | Tenure {}",
            card.admission_date, card.tenure
        );
        if !card.badge.is_empty() {
            println!("  [{}]", card.badge);
        }
        println!(
            "  {} {} | Earned {} | Forfeited {} | {}",
            card.target_kind,
            card.target_label,
            card.earned_label,
            card.forfeited_label,
            card.percentage_label
        );
        if !card.observation.is_empty() {
            println!("  Observation: {}", card.observation);
        }
        if card.missed.is_empty() {
            continue;
        }
        println!("  Missed:");
        for item in &card.missed {
            println!("  - {}", item);
        }
    }
}
