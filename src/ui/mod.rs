pub mod panels;
pub mod sections;

/// `$123,456` style currency, rounded to whole dollars.
pub fn fmt_money(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Money or "N/A" for a missing aggregate.
pub fn fmt_opt_money(value: Option<f64>) -> String {
    value.map(fmt_money).unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_is_grouped_by_thousands() {
        assert_eq!(fmt_money(0.0), "$0");
        assert_eq!(fmt_money(999.4), "$999");
        assert_eq!(fmt_money(1_000.0), "$1,000");
        assert_eq!(fmt_money(123_456.7), "$123,457");
        assert_eq!(fmt_money(-2_500_000.0), "-$2,500,000");
        assert_eq!(fmt_opt_money(None), "N/A");
    }
}
