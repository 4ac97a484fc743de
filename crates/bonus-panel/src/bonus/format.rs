//! Display helpers shared by missed-item narratives and rendered reports.

/// `0.035` -> `3.50%`.
pub fn format_pct(fraction: f64) -> String {
    if !fraction.is_finite() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", fraction * 100.0)
}

/// `1234.5` -> `R$ 1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rendered = format!("{:.2}", amount.abs());
    let (whole, cents) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && rendered != "0.00" { "-" } else { "" };
    format!("{sign}R$ {grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_use_two_decimals() {
        assert_eq!(format_pct(0.035), "3.50%");
        assert_eq!(format_pct(0.0), "0.00%");
        assert_eq!(format_pct(f64::NAN), "0.00%");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "R$ 0.00");
        assert_eq!(format_currency(300.0), "R$ 300.00");
        assert_eq!(format_currency(1234.5), "R$ 1,234.50");
        assert_eq!(format_currency(1_234_567.891), "R$ 1,234,567.89");
        assert_eq!(format_currency(-45.0), "-R$ 45.00");
    }
}
