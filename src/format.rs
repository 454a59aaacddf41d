// =============================================================================
// Presentation Formatters
// =============================================================================
//
// Number abbreviation and percentage-change formatting for the dashboard
// metric cards.  No algorithmic weight — pure string shaping.

/// Abbreviate a large number to T/B/M with two decimals, or comma-group it
/// below one million.  `prefix` is prepended verbatim (e.g. "$").
pub fn format_number(number: f64, prefix: &str) -> String {
    if number >= 1e12 {
        format!("{prefix}{:.2}T", number / 1e12)
    } else if number >= 1e9 {
        format!("{prefix}{:.2}B", number / 1e9)
    } else if number >= 1e6 {
        format!("{prefix}{:.2}M", number / 1e6)
    } else {
        format!("{prefix}{}", group_thousands(number.round() as i64))
    }
}

/// Percentage change from `previous` to `current` with a direction marker:
/// ▲ up, ▼ down, - flat.  A zero previous value yields (0.0, "") instead of
/// a division artifact.
pub fn percentage_change(current: f64, previous: f64) -> (f64, &'static str) {
    if previous == 0.0 {
        return (0.0, "");
    }
    let change = ((current - previous) / previous) * 100.0;
    let direction = if change > 0.0 {
        "▲"
    } else if change < 0.0 {
        "▼"
    } else {
        "-"
    };
    (change, direction)
}

/// Comma-group an integer: 1234567 -> "1,234,567".
fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_scales() {
        assert_eq!(format_number(2.5e12, "$"), "$2.50T");
        assert_eq!(format_number(3.1e9, "$"), "$3.10B");
        assert_eq!(format_number(7.25e6, ""), "7.25M");
    }

    #[test]
    fn groups_small_numbers() {
        assert_eq!(format_number(1234567.0 / 10.0, ""), "123,457");
        assert_eq!(format_number(999.0, "$"), "$999");
        assert_eq!(format_number(0.0, ""), "0");
    }

    #[test]
    fn change_directions() {
        let (pct, dir) = percentage_change(110.0, 100.0);
        assert!((pct - 10.0).abs() < 1e-10);
        assert_eq!(dir, "▲");

        let (pct, dir) = percentage_change(90.0, 100.0);
        assert!((pct + 10.0).abs() < 1e-10);
        assert_eq!(dir, "▼");

        let (pct, dir) = percentage_change(100.0, 100.0);
        assert_eq!(pct, 0.0);
        assert_eq!(dir, "-");
    }

    #[test]
    fn zero_previous_is_guarded() {
        assert_eq!(percentage_change(50.0, 0.0), (0.0, ""));
    }
}
