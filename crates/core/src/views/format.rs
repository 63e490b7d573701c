use crate::compare::MetricUnit;

/// Milliseconds with one decimal, switching to seconds past 1000ms.
pub fn format_ms(ms: f64) -> String {
    if ms.abs() >= 1_000.0 {
        format!("{:.2}s", ms / 1_000.0)
    } else {
        format!("{ms:.1}ms")
    }
}

/// Signed integer delta: `+3`, `-2`, `0`.
pub fn format_signed(diff: i64) -> String {
    if diff > 0 {
        format!("+{diff}")
    } else {
        diff.to_string()
    }
}

/// Signed percentage with a fixed number of decimals: `+25%`, `-50.0%`, `0%`.
pub fn format_percent(percent: f64, decimals: usize) -> String {
    // Values that round to zero print unsigned.
    let rounded = format!("{:.*}", decimals, percent.abs());
    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    if is_zero {
        format!("{rounded}%")
    } else if percent > 0.0 {
        format!("+{rounded}%")
    } else {
        format!("-{rounded}%")
    }
}

pub fn format_metric(value: f64, unit: MetricUnit) -> String {
    match unit {
        MetricUnit::Count => format!("{value:.0}"),
        MetricUnit::Milliseconds => format_ms(value),
    }
}

/// Arrow-prefixed change against the baseline capture: `↓ 12.5% vs before`.
pub fn format_change(change: f64) -> String {
    let arrow = if change < 0.0 { '↓' } else { '↑' };
    format!("{arrow} {:.1}% vs before", change.abs())
}

/// Shorten `text` to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 1 {
        return "…".chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milliseconds() {
        assert_eq!(format_ms(12.345), "12.3ms");
        assert_eq!(format_ms(0.0), "0.0ms");
        assert_eq!(format_ms(1500.0), "1.50s");
    }

    #[test]
    fn signed_values() {
        assert_eq!(format_signed(3), "+3");
        assert_eq!(format_signed(-2), "-2");
        assert_eq!(format_signed(0), "0");
        assert_eq!(format_percent(25.0, 0), "+25%");
        assert_eq!(format_percent(-50.0, 1), "-50.0%");
        assert_eq!(format_percent(0.0, 0), "0%");
        assert_eq!(format_percent(-0.01, 1), "0.0%");
    }

    #[test]
    fn change_arrows() {
        assert_eq!(format_change(-12.54), "↓ 12.5% vs before");
        assert_eq!(format_change(40.0), "↑ 40.0% vs before");
    }

    #[test]
    fn metrics_by_unit() {
        assert_eq!(format_metric(42.0, MetricUnit::Count), "42");
        assert_eq!(format_metric(3.26, MetricUnit::Milliseconds), "3.3ms");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("Button", 10), "Button");
        assert_eq!(truncate("VeryLongComponentName", 8), "VeryLon…");
        assert_eq!(truncate("abc", 1), "…");
        assert_eq!(truncate("abc", 0), "");
    }
}
