/// Format a count with comma thousands separators, e.g. `-12,345`
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Format years rounded to a whole number, never printing "-0"
pub fn format_years(years: f64) -> String {
    let rounded = years.round();
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// Format a signed delta as "+N" / "-N"
pub fn format_delta(delta: i64) -> String {
    format!("{:+}", delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(-21900), "-21,900");
        assert_eq!(format_count(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_format_years() {
        assert_eq!(format_years(0.0137), "0");
        assert_eq!(format_years(-0.2), "0");
        assert_eq!(format_years(2.5), "3");
        assert_eq!(format_years(-1.6), "-2");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(1), "+1");
        assert_eq!(format_delta(-3), "-3");
    }
}
