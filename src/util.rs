// Formatting helpers for popups

/// Relative age in timeago style ("3 days ago"). Inputs are epoch milliseconds.
pub fn format_ago(then_ms: f64, now_ms: f64) -> String {
    let secs = ((now_ms - then_ms) / 1000.0).max(0.0) as u64;
    let units: [(u64, &str); 6] = [
        (365 * 24 * 3600, "year"),
        (30 * 24 * 3600, "month"),
        (7 * 24 * 3600, "week"),
        (24 * 3600, "day"),
        (3600, "hour"),
        (60, "minute"),
    ];
    for (size, name) in units {
        let n = secs / size;
        if n > 0 {
            return if n == 1 {
                format!("1 {} ago", name)
            } else {
                format!("{} {}s ago", n, name)
            };
        }
    }
    "just now".to_string()
}

/// Parses an ISO-8601 timestamp with the browser's date parser.
pub fn parse_timestamp_ms(iso: &str) -> Option<f64> {
    let ms = js_sys::Date::parse(iso);
    if ms.is_nan() { None } else { Some(ms) }
}

pub fn stars(count: u8) -> String {
    "★".repeat(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: f64 = 60_000.0;

    #[test]
    fn ago_picks_largest_unit() {
        assert_eq!(format_ago(0.0, 10_000.0), "just now");
        assert_eq!(format_ago(0.0, MIN), "1 minute ago");
        assert_eq!(format_ago(0.0, 5.0 * MIN), "5 minutes ago");
        assert_eq!(format_ago(0.0, 3.0 * 24.0 * 60.0 * MIN), "3 days ago");
        assert_eq!(format_ago(0.0, 400.0 * 24.0 * 60.0 * MIN), "1 year ago");
    }

    #[test]
    fn future_timestamps_read_as_now() {
        assert_eq!(format_ago(5.0 * MIN, 0.0), "just now");
    }

    #[test]
    fn stars_repeat_rating() {
        assert_eq!(stars(3), "★★★");
        assert_eq!(stars(0), "");
    }
}
