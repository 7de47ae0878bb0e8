use crate::error::{Error, Result};

/// Render a duration in seconds as a human-readable string.
///
/// Hours appear only when nonzero; minutes appear whenever minutes or hours
/// are nonzero; seconds always appear. A unit is singular only when its value
/// is exactly 1, so a value of 0 renders plural ("0 seconds").
pub fn format_duration(seconds: i64) -> Result<String> {
    if seconds < 0 {
        return Err(Error::InvalidDuration(seconds));
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 || hours > 0 {
        parts.push(unit(minutes, "minute"));
    }
    parts.push(unit(secs, "second"));

    Ok(parts.join(" "))
}

fn unit(value: i64, name: &str) -> String {
    if value == 1 {
        format!("{value} {name}")
    } else {
        format!("{value} {name}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_renders_plural_seconds() {
        assert_eq!(format_duration(0).unwrap(), "0 seconds");
    }

    #[test]
    fn test_seconds_only() {
        assert_eq!(format_duration(59).unwrap(), "59 seconds");
    }

    #[test]
    fn test_singular_second() {
        assert_eq!(format_duration(1).unwrap(), "1 second");
    }

    #[test]
    fn test_exact_minute_keeps_zero_seconds() {
        assert_eq!(format_duration(60).unwrap(), "1 minute 0 seconds");
    }

    #[test]
    fn test_minutes_and_seconds() {
        assert_eq!(format_duration(125).unwrap(), "2 minutes 5 seconds");
    }

    #[test]
    fn test_all_units_singular() {
        assert_eq!(format_duration(3661).unwrap(), "1 hour 1 minute 1 second");
    }

    #[test]
    fn test_exact_hour_keeps_lower_units() {
        assert_eq!(format_duration(3600).unwrap(), "1 hour 0 minutes 0 seconds");
    }

    #[test]
    fn test_plural_everything() {
        assert_eq!(format_duration(7325).unwrap(), "2 hours 2 minutes 5 seconds");
    }

    #[test]
    fn test_negative_is_invalid() {
        assert!(matches!(format_duration(-1), Err(Error::InvalidDuration(-1))));
    }
}
