/// Render a second count as `DD:HH:MM:SS`, `HH:MM:SS`, `MM:SS` or `00:SS`,
/// dropping leading units that are zero. Zero itself renders as `-`.
pub fn seconds_to_min(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = seconds / 3_600 % 24;
    let minutes = seconds % 3_600 / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{days:02}:{hours:02}:{minutes:02}:{secs:02}")
    } else if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else if minutes > 0 {
        format!("{minutes:02}:{secs:02}")
    } else if secs > 0 {
        format!("00:{secs:02}")
    } else {
        "-".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_unit_range() {
        assert_eq!(seconds_to_min(0), "-");
        assert_eq!(seconds_to_min(7), "00:07");
        assert_eq!(seconds_to_min(65), "01:05");
        assert_eq!(seconds_to_min(3_600), "01:00:00");
        assert_eq!(seconds_to_min(3_725), "01:02:05");
        assert_eq!(seconds_to_min(90_061), "01:01:01:01");
    }

    #[test]
    fn whole_hour_keeps_zero_minutes() {
        assert_eq!(seconds_to_min(7_200), "02:00:00");
    }
}
