//! Number formatting shared by validation messages and reports

/// Largest integer a double holds exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Round half up to a whole unit (`floor(x + 0.5)`)
///
/// Differs from `f64::round` for negative halves: -2.5 becomes -2, not -3.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Fixed two-decimal text, e.g. `3.41`
///
/// Rounds on the exact decimal value of the double, with exact ties going
/// away from zero: 1.125 -> "1.13", but 2.675 (stored just below) -> "2.67".
pub fn fixed2(value: f64) -> String {
    if value == 0.0 {
        return "0.00".to_string();
    }

    let magnitude = value.abs();
    let eighths = magnitude * 8.0;
    // Odd multiples of 1/8 are the only doubles ending exactly in a third-decimal 5
    if eighths.fract() == 0.0 && (magnitude * 4.0).fract() != 0.0 {
        let hundredths = ((eighths as u64) * 25 + 1) / 2;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100);
    }

    format!("{:.2}", value)
}

/// Group an amount with thousands separators, keeping up to three fraction digits
///
/// 100000 -> "100,000", 1234.5 -> "1,234.5", -950.1239 -> "-950.124"
pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scaled = (value.abs() * 1000.0).round() as u128;
    let whole = scaled / 1000;
    let frac = scaled % 1000;

    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if value < 0.0 && scaled != 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if frac != 0 {
        let frac_text = format!("{:03}", frac);
        out.push('.');
        out.push_str(frac_text.trim_end_matches('0'));
    }

    out
}

/// Dollar amount with grouping, e.g. `$100,000`
pub fn dollars(value: f64) -> String {
    format!("${}", grouped(value))
}
