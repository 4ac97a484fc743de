use crate::bonus::normalize::normalize;

/// Spreadsheet columns the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SheetColumn {
    Role,
    City,
    Name,
    AdmissionDate,
    Tenure,
    MonthlyTarget,
    Observation,
    TotalDefects,
    SevereDefects,
}

impl SheetColumn {
    const ALL: [Self; 9] = [
        Self::Role,
        Self::City,
        Self::Name,
        Self::AdmissionDate,
        Self::Tenure,
        Self::MonthlyTarget,
        Self::Observation,
        Self::TotalDefects,
        Self::SevereDefects,
    ];

    /// Normalized header labels accepted for the column.
    const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Role => &["ROLE", "FUNCTION", "FUNCAO"],
            Self::City => &["CITY", "CIDADE"],
            Self::Name => &["NAME", "NOME"],
            Self::AdmissionDate => &["ADMISSION DATE", "DATA DE ADMISSAO"],
            Self::Tenure => &["TENURE", "TEMPO DE CASA"],
            Self::MonthlyTarget => &["MONTHLY TARGET", "VALOR MENSAL META"],
            Self::Observation => &["OBSERVATION", "OBSERVACAO"],
            Self::TotalDefects => &["TOTAL DEFECTS", "ERROS TOTAL"],
            Self::SevereDefects => &["SEVERE DEFECTS", "ERROS GG"],
        }
    }

    pub(crate) fn from_header(header: &str) -> Option<Self> {
        let header = normalize(header);
        Self::ALL
            .into_iter()
            .find(|column| column.headers().contains(&header.as_str()))
    }
}

/// Position of each known column within a sheet's header row.
#[derive(Debug, Default)]
pub(crate) struct ColumnIndex {
    positions: Vec<(SheetColumn, usize)>,
}

impl ColumnIndex {
    pub(crate) fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut positions: Vec<(SheetColumn, usize)> = Vec::new();
        for (position, header) in headers.into_iter().enumerate() {
            if let Some(column) = SheetColumn::from_header(header) {
                if !positions.iter().any(|(known, _)| *known == column) {
                    positions.push((column, position));
                }
            }
        }
        Self { positions }
    }

    pub(crate) fn position(&self, column: SheetColumn) -> Option<usize> {
        self.positions
            .iter()
            .find(|(known, _)| *known == column)
            .map(|(_, position)| *position)
    }
}
