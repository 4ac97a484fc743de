use super::mapping::{ColumnIndex, SheetColumn};
use crate::bonus::EmployeeMonthRecord;
use csv::StringRecord;
use std::io::Read;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<EmployeeMonthRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let index = ColumnIndex::from_headers(csv_reader.headers()?.iter());
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let text = |column| cell(&row, &index, column).unwrap_or_default().to_string();
        let number = |column| cell(&row, &index, column).and_then(parse_number);

        records.push(EmployeeMonthRecord {
            name: text(SheetColumn::Name),
            role: text(SheetColumn::Role),
            city: text(SheetColumn::City),
            admission_date: text(SheetColumn::AdmissionDate),
            tenure: text(SheetColumn::Tenure),
            monthly_target: number(SheetColumn::MonthlyTarget),
            observation: text(SheetColumn::Observation),
            total_defect_rate: number(SheetColumn::TotalDefects).unwrap_or_default(),
            severe_defect_rate: number(SheetColumn::SevereDefects).unwrap_or_default(),
        });
    }

    Ok(records)
}

fn cell<'r>(row: &'r StringRecord, index: &ColumnIndex, column: SheetColumn) -> Option<&'r str> {
    index.position(column).and_then(|position| row.get(position))
}

/// Lenient numeric cell parsing: the currency sign is dropped, a decimal comma
/// is accepted, anything else unparseable is `None`. Percent cells come back as
/// fractions, so "3,5%" reads as 0.035.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let percent = trimmed.ends_with('%');
    let cleaned: String = trimmed
        .trim_start_matches("R$")
        .trim_end_matches('%')
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let canonical = match (cleaned.contains('.'), cleaned.contains(',')) {
        (true, true) => cleaned.replace('.', "").replace(',', "."),
        (false, true) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    let value = canonical
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())?;

    Some(if percent { value / 100.0 } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_portuguese_sheet() {
        let csv = "NOME,FUNÇÃO,CIDADE,DATA DE ADMISSÃO,TEMPO DE CASA,VALOR MENSAL META,OBSERVAÇÃO,ERROS TOTAL,ERROS GG\n\
João Lima,VISTORIADOR,SANTA INÊS,2021-03-01,3 anos,300,,\"3,5\",1.2\n";

        let records = parse_records(Cursor::new(csv)).expect("sheet parses");

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "João Lima");
        assert_eq!(record.role, "VISTORIADOR");
        assert_eq!(record.city, "SANTA INÊS");
        assert_eq!(record.monthly_target, Some(300.0));
        assert_eq!(record.total_defect_rate, 3.5);
        assert_eq!(record.severe_defect_rate, 1.2);
        assert_eq!(record.observation, "");
    }

    #[test]
    fn malformed_numbers_degrade_to_defaults() {
        let csv = "NAME,ROLE,MONTHLY TARGET,TOTAL DEFECTS\nAna,Vendedor,n/a,abc\n";

        let records = parse_records(Cursor::new(csv)).expect("sheet parses");

        assert_eq!(records[0].monthly_target, None);
        assert_eq!(records[0].total_defect_rate, 0.0);
        assert_eq!(records[0].severe_defect_rate, 0.0);
        assert_eq!(records[0].city, "");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let csv = "NAME,ROLE\nAna,Vendedor\n,\nPedro,Supervisor\n";

        let records = parse_records(Cursor::new(csv)).expect("sheet parses");

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].role, "Supervisor");
    }

    #[test]
    fn number_formats() {
        assert_eq!(parse_number("300"), Some(300.0));
        assert_eq!(parse_number(" R$ 1.250,50 "), Some(1250.5));
        assert_eq!(parse_number("0.035"), Some(0.035));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn percent_cells_become_fractions() {
        let cases = [("3,5%", 0.035), ("3,50%", 0.035), ("0,50%", 0.005), (" 2 % ", 0.02)];

        for (raw, expected) in cases {
            let value = parse_number(raw).expect("percent parses");
            assert!((value - expected).abs() < 1e-12, "{raw} read as {value}");
        }
    }
}
