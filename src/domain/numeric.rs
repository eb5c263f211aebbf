use crate::domain::entities::table::Cell;

/// Parses the longest leading decimal literal of `text`, the way spreadsheet
/// exports are read by `parseFloat`: `"12abc"` is 12, `"1,5"` is 1.
pub fn parse_leading_decimal(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        let sign = if bytes.first() == Some(&b'-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// Numeric value of a price or quantity cell. Unparsable, negative and
/// non-finite values become 0.
pub fn coerce_non_negative(cell: &Cell) -> f64 {
    let value = match cell {
        Cell::Number(v) => Some(*v),
        Cell::Text(v) => parse_leading_decimal(v),
        Cell::Empty | Cell::Bool(_) => None,
    };
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value == 0.0 {
        // also folds -0 into "0"
        return "0".to_string();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_prefixed_numbers() {
        assert_eq!(parse_leading_decimal("12.5"), Some(12.5));
        assert_eq!(parse_leading_decimal("  7 "), Some(7.0));
        assert_eq!(parse_leading_decimal("12abc"), Some(12.0));
        assert_eq!(parse_leading_decimal("1,5"), Some(1.0));
        assert_eq!(parse_leading_decimal(".5"), Some(0.5));
        assert_eq!(parse_leading_decimal("5."), Some(5.0));
        assert_eq!(parse_leading_decimal("-3"), Some(-3.0));
        assert_eq!(parse_leading_decimal("2e3x"), Some(2000.0));
        assert_eq!(parse_leading_decimal("2e"), Some(2.0));
    }

    #[test]
    fn rejects_text_without_numeric_prefix() {
        assert_eq!(parse_leading_decimal(""), None);
        assert_eq!(parse_leading_decimal("abc"), None);
        assert_eq!(parse_leading_decimal("."), None);
        assert_eq!(parse_leading_decimal("-"), None);
        assert_eq!(parse_leading_decimal("$10"), None);
    }

    #[test]
    fn coercion_zeroes_invalid_and_negative_values() {
        assert_eq!(coerce_non_negative(&Cell::from("abc")), 0.0);
        assert_eq!(coerce_non_negative(&Cell::from("-4")), 0.0);
        assert_eq!(coerce_non_negative(&Cell::Number(-0.5)), 0.0);
        assert_eq!(coerce_non_negative(&Cell::Empty), 0.0);
        assert_eq!(coerce_non_negative(&Cell::Bool(true)), 0.0);
        assert_eq!(coerce_non_negative(&Cell::from("Infinity")), 0.0);
        assert_eq!(coerce_non_negative(&Cell::from("1500")), 1500.0);
        assert_eq!(coerce_non_negative(&Cell::Number(9.99)), 9.99);
    }

    #[test]
    fn format_number_drops_trailing_fraction() {
        assert_eq!(format_number(1500.0), "1500");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "");
    }
}
