//! Loading of month sheets (CSV) and configuration documents (JSON).

mod documents;
mod mapping;
mod parser;

pub use documents::{
    parse_branch_profile, parse_indicator_calendar, parse_rule_book, DocumentError,
};

use crate::bonus::{
    BonusEngine, BranchProfile, EmployeeMonthRecord, IndicatorCalendar, MonthName, RowSource,
    RowSourceError, RuleBook,
};
use documents::open_document;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const WEIGHTS_FILE: &str = "weights.json";
pub const INDICATORS_FILE: &str = "indicators.json";
pub const BRANCH_FILE: &str = "branch.json";

#[derive(Debug, thiserror::Error)]
pub enum RowImportError {
    #[error("failed to read month sheet {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid month sheet data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads one month sheet exported as CSV.
pub fn read_month_sheet<R: Read>(reader: R) -> Result<Vec<EmployeeMonthRecord>, RowImportError> {
    Ok(parser::parse_records(reader)?)
}

/// Month sheets stored as `<MONTH>.csv` inside a directory.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sheet path for a month; matching ignores case and accents.
    pub fn sheet_path(&self, month: &MonthName) -> Option<PathBuf> {
        let entries = std::fs::read_dir(&self.dir).ok()?;
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                let is_csv = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false);
                let stem_matches = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(|stem| MonthName::new(stem) == *month)
                    .unwrap_or(false);
                is_csv && stem_matches
            })
    }
}

impl RowSource for CsvDirectorySource {
    fn month_rows(&self, month: &MonthName) -> Result<Vec<EmployeeMonthRecord>, RowSourceError> {
        let path = self
            .sheet_path(month)
            .ok_or_else(|| RowSourceError::MissingMonth(month.clone()))?;
        let file = std::fs::File::open(&path).map_err(|source| RowImportError::Io {
            path: path.clone(),
            source,
        })?;
        let rows = read_month_sheet(file)?;

        info!(%month, path = %path.display(), rows = rows.len(), "month sheet loaded");
        Ok(rows)
    }
}

/// Configuration documents found in the data directory.
#[derive(Debug, Clone)]
pub struct BonusDocuments {
    pub rules: RuleBook,
    pub calendar: IndicatorCalendar,
    pub branch: BranchProfile,
}

impl BonusDocuments {
    /// Loads weights and indicators; the branch document is optional and
    /// falls back to [`BranchProfile::standard`].
    pub fn load(data_dir: &Path) -> Result<Self, DocumentError> {
        let rules = parse_rule_book(open_document(&data_dir.join(WEIGHTS_FILE))?)?;
        let calendar = parse_indicator_calendar(open_document(&data_dir.join(INDICATORS_FILE))?)?;

        let branch_path = data_dir.join(BRANCH_FILE);
        let branch = if branch_path.exists() {
            parse_branch_profile(open_document(&branch_path)?)?
        } else {
            BranchProfile::standard()
        };

        info!(
            data_dir = %data_dir.display(),
            roles = rules.len(),
            indicator_months = calendar.months().count(),
            split_supervisors = branch.supervisor_splits.len(),
            "bonus documents loaded"
        );

        debug!(roles = ?rules.role_labels(), "weights by role");

        Ok(Self {
            rules,
            calendar,
            branch,
        })
    }

    pub fn into_parts(self) -> (BonusEngine, IndicatorCalendar) {
        (BonusEngine::new(self.rules, self.branch), self.calendar)
    }
}
