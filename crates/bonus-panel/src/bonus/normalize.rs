use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical form used for every key comparison: trimmed, uppercase, accents
/// stripped and whitespace runs collapsed to a single space.
pub fn normalize(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let stripped: String = cleaned
        .trim()
        .to_uppercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_opt(value: Option<&str>) -> String {
    value.map(normalize).unwrap_or_default()
}

/// Free-text observation as shown to the reader; spreadsheet placeholders
/// such as `nan` collapse to an empty string.
pub fn clean_observation(value: &str) -> String {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "nan" | "none" => String::new(),
        _ => trimmed.to_string(),
    }
}

/// `SÃO JOSÉ DE RIBAMAR` -> `São José De Ribamar`.
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_case_and_whitespace() {
        assert_eq!(normalize("  São   José de Ribamar "), "SAO JOSE DE RIBAMAR");
        assert_eq!(normalize("Organização da Loja 5s"), "ORGANIZACAO DA LOJA 5S");
        assert_eq!(normalize("\u{feff}Produção"), "PRODUCAO");
    }

    #[test]
    fn normalizing_twice_is_a_fixed_point() {
        for sample in ["Liderança & Organização", "  vistoriador ", "SANTA INÊS", ""] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn absent_values_become_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("chapadinha")), "CHAPADINHA");
    }

    #[test]
    fn observation_placeholders_are_dropped() {
        assert_eq!(clean_observation("NaN"), "");
        assert_eq!(clean_observation(" None "), "");
        assert_eq!(clean_observation(" Licença maternidade "), "Licença maternidade");
    }

    #[test]
    fn title_case_keeps_accents() {
        assert_eq!(title_case("SÃO JOSÉ DE RIBAMAR"), "São José De Ribamar");
        assert_eq!(title_case("chapadinha"), "Chapadinha");
    }
}
