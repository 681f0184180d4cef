use chrono::{DateTime, Local, NaiveDateTime};

/// Human duration for an activity row: `0m`, `0.50m`, `45m`, `1h 30m`.
pub fn format_duration(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "0m".to_string();
    }
    if minutes < 1.0 {
        return format!("{minutes:.2}m");
    }

    let rounded = minutes.round() as u64;
    let (hours, mins) = (rounded / 60, rounded % 60);
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours}h")
}

pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) if score.is_finite() => format!("{score}/10"),
        _ => "-/10".to_string(),
    }
}

/// Wall-clock time of a backend timestamp. Offsets are converted to local
/// time, naive timestamps are shown as given and anything else verbatim.
pub fn format_clock(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return "Ongoing".to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format("%H:%M:%S").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format("%H:%M:%S").to_string();
        }
    }
    raw.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    High,
    Medium,
    Low,
    Poor,
    Accent,
    Neutral,
}

impl Tone {
    pub fn css_class(self) -> &'static str {
        match self {
            Tone::High => "tone-high",
            Tone::Medium => "tone-medium",
            Tone::Low => "tone-low",
            Tone::Poor => "tone-poor",
            Tone::Accent => "tone-accent",
            Tone::Neutral => "tone-neutral",
        }
    }
}

/// Badge colour for a single record's score.
pub fn score_tone(score: Option<f64>) -> Tone {
    match score.unwrap_or(0.0) {
        s if s >= 8.0 => Tone::High,
        s if s >= 6.0 => Tone::Medium,
        s if s >= 4.0 => Tone::Low,
        _ => Tone::Poor,
    }
}

/// Colour of the "Avg Productivity" card.
pub fn summary_tone(average_productivity: f64) -> Tone {
    if average_productivity <= 5.0 {
        Tone::Poor
    } else if average_productivity < 8.0 {
        Tone::Medium
    } else {
        Tone::High
    }
}

pub fn status_tone(status: &str) -> Tone {
    match status.trim().to_lowercase().as_str() {
        "completed" => Tone::High,
        "billed" => Tone::Accent,
        _ => Tone::Neutral,
    }
}

pub fn entry_type_tone(entry_type: &str) -> Tone {
    match entry_type {
        "Manual Entry" => Tone::Accent,
        "Automated Entry" => Tone::Medium,
        _ => Tone::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(0.0), "0m");
        assert_eq!(format_duration(0.5), "0.50m");
        assert_eq!(format_duration(90.0), "1h 30m");
        assert_eq!(format_duration(45.4), "45m");
        assert_eq!(format_duration(120.0), "2h 0m");
        assert_eq!(format_duration(119.7), "2h 0m");
        assert_eq!(format_duration(59.7), "1h 0m");
        assert_eq!(format_duration(f64::NAN), "0m");
    }

    #[test]
    fn hours_and_scores() {
        assert_eq!(format_hours(3.0), "3h");
        assert_eq!(format_hours(2.25), "2.25h");
        assert_eq!(format_score(Some(7.0)), "7/10");
        assert_eq!(format_score(Some(6.7)), "6.7/10");
        assert_eq!(format_score(None), "-/10");
    }

    #[test]
    fn clock_formats() {
        assert_eq!(format_clock(None), "Ongoing");
        assert_eq!(format_clock(Some("2026-01-05T09:15:30")), "09:15:30");
        assert_eq!(format_clock(Some("2026-01-05 17:00:00.123")), "17:00:00");
        assert_eq!(format_clock(Some("yesterday")), "yesterday");
    }

    #[test]
    fn tones() {
        assert_eq!(score_tone(Some(8.0)), Tone::High);
        assert_eq!(score_tone(Some(6.0)), Tone::Medium);
        assert_eq!(score_tone(Some(4.5)), Tone::Low);
        assert_eq!(score_tone(None), Tone::Poor);

        assert_eq!(summary_tone(5.0), Tone::Poor);
        assert_eq!(summary_tone(7.9), Tone::Medium);
        assert_eq!(summary_tone(8.0), Tone::High);

        assert_eq!(status_tone("Billed"), Tone::Accent);
        assert_eq!(status_tone("In Progress"), Tone::Neutral);
        assert_eq!(entry_type_tone("Manual Entry"), Tone::Accent);
    }
}
