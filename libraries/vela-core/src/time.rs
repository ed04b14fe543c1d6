//! Display formatting for elapsed time

/// Format elapsed seconds as "mm:ss"
///
/// Fractions are truncated. Minutes are not wrapped into hours, so an hour
/// and a quarter reads "75:00". Negative and non-finite input reads "00:00".
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }

    let total = seconds.trunc() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
