//! Display formatting for timers and typed values.
//!
//! Everything here is invariant-culture: `.` is the only decimal separator,
//! so a value formatted here always parses back through the engine.

/// Format a duration in seconds as `hh:mm:ss.ff`.
///
/// Hours are not wrapped at 24. Hundredths are truncated, not rounded.
/// Negative and non-finite inputs format as zero.
///
/// # Examples
/// ```
/// use kat_types::formatting::format_clock;
/// assert_eq!(format_clock(0.0), "00:00:00.00");
/// assert_eq!(format_clock(75.256), "00:01:15.25");
/// assert_eq!(format_clock(3_723.5), "01:02:03.50");
/// assert_eq!(format_clock(-4.0), "00:00:00.00");
/// ```
pub fn format_clock(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
    let hundredths = (secs * 100.0).floor() as u64;
    let (whole, frac) = (hundredths / 100, hundredths % 100);
    let hours = whole / 3600;
    let mins = (whole % 3600) / 60;
    let s = whole % 60;
    format!("{:02}:{:02}:{:02}.{:02}", hours, mins, s, frac)
}

/// Canonical raw text for a float value.
///
/// Whole numbers keep one decimal place so the text reads as a float.
///
/// # Examples
/// ```
/// use kat_types::formatting::format_float_text;
/// assert_eq!(format_float_text(0.0), "0.0");
/// assert_eq!(format_float_text(10.0), "10.0");
/// assert_eq!(format_float_text(3.25), "3.25");
/// assert_eq!(format_float_text(-1.5), "-1.5");
/// ```
pub fn format_float_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.1}", n)
    } else {
        format!("{}", n)
    }
}

/// Compact value column for listings: at most `precision` decimals,
/// trailing zeros dropped.
///
/// # Examples
/// ```
/// use kat_types::formatting::format_reading;
/// assert_eq!(format_reading(10500.0, 2), "10500");
/// assert_eq!(format_reading(12.3456, 2), "12.35");
/// assert_eq!(format_reading(0.5, 3), "0.5");
/// ```
pub fn format_reading(n: f64, precision: usize) -> String {
    let s = format!("{:.prec$}", n, prec = precision);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00:00.00");
        assert_eq!(format_clock(9.999), "00:00:09.99");
        assert_eq!(format_clock(59.5), "00:00:59.50");
        assert_eq!(format_clock(60.0), "00:01:00.00");
        assert_eq!(format_clock(36_000.0), "10:00:00.00");
        assert_eq!(format_clock(90_000.0), "25:00:00.00");
    }

    #[test]
    fn test_format_clock_rejects_garbage() {
        assert_eq!(format_clock(f64::NAN), "00:00:00.00");
        assert_eq!(format_clock(f64::NEG_INFINITY), "00:00:00.00");
        assert_eq!(format_clock(-0.01), "00:00:00.00");
    }

    #[test]
    fn test_format_float_text() {
        assert_eq!(format_float_text(0.0), "0.0");
        assert_eq!(format_float_text(2.0), "2.0");
        assert_eq!(format_float_text(0.125), "0.125");
        assert_eq!(format_float_text(f64::INFINITY), "inf");
    }

    #[test]
    fn test_format_reading() {
        assert_eq!(format_reading(100.0, 1), "100");
        assert_eq!(format_reading(99.95, 1), "100");
        assert_eq!(format_reading(-3.10, 2), "-3.1");
    }
}
