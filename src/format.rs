//! Display helpers for table cells.

use chrono::{DateTime, Utc};

/// Timestamp format used across the tables: "Aug 30, 2026 12:04".
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%b %d, %Y %H:%M").to_string()
}

/// "5 minutes ago" style rendering relative to now.
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    relative_from(ts, Utc::now())
}

fn relative_from(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(ts).num_seconds();
    let (secs, suffix) = if secs < 0 {
        (-secs, "from now")
    } else {
        (secs, "ago")
    };

    let span = match secs {
        0..=44 => "less than a minute".to_string(),
        45..=89 => "about a minute".to_string(),
        90..=3_599 => plural(secs / 60, "minute"),
        3_600..=86_399 => {
            let hours = secs / 3_600;
            if hours == 1 {
                "about an hour".to_string()
            } else {
                format!("about {hours} hours")
            }
        }
        86_400..=2_591_999 => plural(secs / 86_400, "day"),
        2_592_000..=31_535_999 => {
            let months = secs / 2_592_000;
            if months == 1 {
                "about a month".to_string()
            } else {
                format!("about {months} months")
            }
        }
        _ => {
            let years = secs / 31_536_000;
            if years == 1 {
                "about a year".to_string()
            } else {
                format!("about {years} years")
            }
        }
    };

    format!("{span} {suffix}")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Shorten long message content for a table cell. Char-based so multibyte
/// content never splits mid-character.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_len).collect();
    format!("{truncated}...")
}

/// 1024-based human size: "1.5 KB", "2 MB".
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).log(1024.0).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    let mut rendered = format!("{value:.2}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }

    format!("{rendered} {}", UNITS[exponent])
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_renders_month_day_year_time() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 30, 12, 4, 59).unwrap();
        assert_eq!(format_date(ts), "Aug 30, 2026 12:04");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let ago = |secs: i64| relative_from(now - chrono::Duration::seconds(secs), now);

        assert_eq!(ago(10), "less than a minute ago");
        assert_eq!(ago(60), "about a minute ago");
        assert_eq!(ago(300), "5 minutes ago");
        assert_eq!(ago(3_600), "about an hour ago");
        assert_eq!(ago(7_200), "about 2 hours ago");
        assert_eq!(ago(86_400), "1 day ago");
        assert_eq!(ago(3 * 86_400), "3 days ago");
        assert_eq!(ago(40 * 86_400), "about a month ago");
        assert_eq!(ago(2 * 31_536_000), "about 2 years ago");
        assert_eq!(ago(-300), "5 minutes from now");
    }

    #[test]
    fn truncation_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("hello world", 5), "hello...");
    }

    #[test]
    fn truncation_is_char_safe() {
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
    }

    #[test]
    fn capitalization() {
        assert_eq!(capitalize_first("assistant"), "Assistant");
        assert_eq!(capitalize_first(""), "");
    }
}
