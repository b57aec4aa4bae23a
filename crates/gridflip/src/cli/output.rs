//! CLI output formatting.

use colored::Colorize;

use crate::geometry::Coords;

/// Prints a bold section heading.
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
}

/// Prints a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

/// Formats a pixel offset with two decimals.
#[must_use]
pub fn format_px(value: f64) -> String { format!("{value:.2}px") }

/// Formats a scale factor, dimmed when it is 1.
#[must_use]
pub fn format_scale(value: f64) -> String {
    let text = format!("{value:.3}");
    if (value - 1.0).abs() < f64::EPSILON {
        text.dimmed().to_string()
    } else {
        text
    }
}

/// Formats an applied transform, or a cleared one.
#[must_use]
pub fn format_transform(transform: Option<Coords>) -> String {
    transform.map_or_else(|| "cleared".green().to_string(), |coords| coords.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(-200.0), "-200.00px");
        assert_eq!(format_px(12.345), "12.35px");
    }

    #[test]
    fn test_format_scale() {
        colored::control::set_override(false);
        assert_eq!(format_scale(1.0), "1.000");
        assert_eq!(format_scale(0.5), "0.500");
    }

    #[test]
    fn test_format_transform() {
        colored::control::set_override(false);
        assert_eq!(format_transform(None), "cleared");
        assert_eq!(
            format_transform(Some(Coords::new(-200.0, 0.0, 1.0, 1.0))),
            "translateX(-200px) translateY(0px) scaleX(1) scaleY(1)"
        );
    }
}
