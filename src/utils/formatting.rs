use chrono::{DateTime, NaiveDate, Utc};

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// `m:ss`, e.g. `125.0` -> `2:05`.
pub fn format_duration(seconds: f64) -> String {
    if !(seconds > 0.0) {
        return "0:00".to_string();
    }

    let minutes = (seconds / 60.0).floor() as u64;
    let remaining = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, remaining)
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, SIZE_UNITS[unit])
}

pub fn format_track_title(title: &str, max_length: usize) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return "Untitled Track".to_string();
    }
    if trimmed.chars().count() <= max_length {
        return trimmed.to_string();
    }

    let kept: String = trimmed.chars().take(max_length.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Renders an RFC 3339 (or bare `YYYY-MM-DD`) timestamp as `YYYY/MM/DD HH:MM` in UTC.
pub fn format_created_at(created_at: &str) -> String {
    let created_at = created_at.trim();
    if created_at.is_empty() {
        return "Unknown date".to_string();
    }

    let parsed = DateTime::parse_from_rfc3339(created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(created_at, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        });

    match parsed {
        Some(dt) => dt.format("%Y/%m/%d %H:%M").to_string(),
        None => "Invalid date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(-5.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(120.0), "2:00");
        assert_eq!(format_duration(185.4), "3:05");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024 * 1024), "3072.0 GB");
    }

    #[test]
    fn track_titles() {
        assert_eq!(format_track_title("", 50), "Untitled Track");
        assert_eq!(format_track_title("   ", 50), "Untitled Track");
        assert_eq!(format_track_title("  Summer Song  ", 50), "Summer Song");
        assert_eq!(format_track_title("abcdefghij", 8), "abcde...");
        assert_eq!(format_track_title("abcdefgh", 8), "abcdefgh");
    }

    #[test]
    fn created_at() {
        assert_eq!(format_created_at(""), "Unknown date");
        assert_eq!(format_created_at("yesterday"), "Invalid date");
        assert_eq!(format_created_at("2024-01-01T00:00:00Z"), "2024/01/01 00:00");
        assert_eq!(format_created_at("2024-03-05T18:30:00+09:00"), "2024/03/05 09:30");
        assert_eq!(format_created_at("2024-03-05"), "2024/03/05 00:00");
    }
}
