/// Formats a number the Danish way: `.` groups thousands, `,` separates decimals.
///
/// Rounds half away from zero before formatting, so `2.5` with zero decimals
/// prints as `"3"`.
pub fn format_danish(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    let text = format!("{:.*}", decimals, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push(',');
        grouped.push_str(frac);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_danish(5000.0, 0), "5.000");
        assert_eq!(format_danish(25000.0, 0), "25.000");
        assert_eq!(format_danish(1234567.0, 0), "1.234.567");
        assert_eq!(format_danish(999.0, 0), "999");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(format_danish(1.5, 1), "1,5");
        assert_eq!(format_danish(5.0, 1), "5,0");
        assert_eq!(format_danish(12345.67, 1), "12.345,7");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_danish(2.5, 0), "3");
        assert_eq!(format_danish(-1234.4, 0), "-1.234");
    }
}
