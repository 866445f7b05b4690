// Display helpers for times and playback rates

/// Format a position in seconds as `m:ss`.
///
/// Unknown values (NaN, infinite, negative) render as `0:00` so a missing
/// duration never leaks into the UI.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Same as [`format_time`] for values that may be absent.
pub fn format_optional_time(seconds: Option<f64>) -> String {
    seconds.map(format_time).unwrap_or_else(|| format_time(f64::NAN))
}

/// Label for a playback rate option, e.g. `0.75x` or `1x`.
pub fn format_rate(rate: f64) -> String {
    let rounded = (rate * 100.0).round() / 100.0;
    format!("{}x", rounded)
}
