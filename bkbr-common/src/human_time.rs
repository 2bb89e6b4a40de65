//! Human-readable cooking time formatting
//!
//! Recipe times are whole minutes. Two renderings are provided: a long form
//! for the headline total time and a compact form for prep/cook times.

/// Format minutes in long form.
///
/// - Both hours and minutes: `"H hours and M minutes"`
/// - Whole hours: `"H hours"`
/// - Under an hour: `"M minutes"`
/// - Zero: empty string (nothing to show)
///
/// # Examples
///
/// ```
/// use bkbr_common::human_time::format_minutes_long;
///
/// assert_eq!(format_minutes_long(90), "1 hours and 30 minutes");
/// assert_eq!(format_minutes_long(120), "2 hours");
/// assert_eq!(format_minutes_long(45), "45 minutes");
/// assert_eq!(format_minutes_long(0), "");
/// ```
pub fn format_minutes_long(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{} hours and {} minutes", hours, minutes)
    } else if hours > 0 {
        format!("{} hours", hours)
    } else if minutes > 0 {
        format!("{} minutes", minutes)
    } else {
        String::new()
    }
}

/// Format minutes in compact form.
///
/// # Examples
///
/// ```
/// use bkbr_common::human_time::format_minutes_short;
///
/// assert_eq!(format_minutes_short(75), "1h and 15 min");
/// assert_eq!(format_minutes_short(60), "1h");
/// assert_eq!(format_minutes_short(20), "20 min");
/// assert_eq!(format_minutes_short(0), "0 min");
/// ```
pub fn format_minutes_short(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{}h and {} min", hours, minutes)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{} min", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_format_boundaries() {
        assert_eq!(format_minutes_long(1), "1 minutes");
        assert_eq!(format_minutes_long(59), "59 minutes");
        assert_eq!(format_minutes_long(60), "1 hours");
        assert_eq!(format_minutes_long(61), "1 hours and 1 minutes");
        assert_eq!(format_minutes_long(24 * 60), "24 hours");
    }

    #[test]
    fn test_short_format_boundaries() {
        assert_eq!(format_minutes_short(59), "59 min");
        assert_eq!(format_minutes_short(61), "1h and 1 min");
        assert_eq!(format_minutes_short(180), "3h");
    }
}
