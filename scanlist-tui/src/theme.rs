//! Neon-on-charcoal palette and the style helpers the widgets use.
//!
//! # Color Palette
//! - **Accent**: electric cyan (focus, headers, selection)
//! - **Positive**: neon green (high quality scores)
//! - **Negative**: hot pink (errors, low scores)
//! - **Warning**: neon orange (drag indicator, warnings)
//! - **Neutral**: cool purple (aggregate row, secondary info)
//! - **Muted**: steel blue (hints, empty cells)

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Theme {
    /// Quality scores run 0..100.
    pub fn quality_color(&self, quality: f64) -> Color {
        match quality {
            q if q >= 70.0 => self.positive,
            q if q >= 50.0 => self.accent,
            q if q >= 30.0 => self.neutral,
            q if q > 0.0 => self.muted,
            _ => self.text_secondary,
        }
    }

    /// Label values are forward returns: sign decides the color.
    pub fn label_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }
}

const THEME: Theme = Theme {
    background: Color::Rgb(18, 18, 20),
    accent: Color::Rgb(0, 255, 255),
    positive: Color::Rgb(0, 255, 128),
    negative: Color::Rgb(255, 20, 147),
    warning: Color::Rgb(255, 140, 0),
    neutral: Color::Rgb(147, 112, 219),
    muted: Color::Rgb(100, 149, 237),
    text_primary: Color::White,
    text_secondary: Color::Rgb(170, 170, 170),
};

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn neutral() -> Style {
    Style::default().fg(THEME.neutral)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn selected_row() -> Style {
    Style::default()
        .fg(THEME.background)
        .bg(THEME.accent)
        .add_modifier(Modifier::BOLD)
}

pub fn aggregate_row() -> Style {
    neutral().add_modifier(Modifier::ITALIC)
}

pub fn drag_indicator() -> Style {
    warning().add_modifier(Modifier::BOLD)
}

/// Style for one rendered cell of a data column.
pub fn cell_style(column: &str, rendered: &str) -> Style {
    let Ok(value) = rendered.parse::<f64>() else {
        return text();
    };
    let color = match column {
        "avg_quality" | "max_quality" => THEME.quality_color(value),
        "label" => THEME.label_color(value),
        _ => THEME.text_primary,
    };
    Style::default().fg(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_sign_colors() {
        let theme = THEME;
        assert_eq!(theme.label_color(0.12), theme.positive);
        assert_eq!(theme.label_color(0.0), theme.positive);
        assert_eq!(theme.label_color(-0.01), theme.negative);
    }

    #[test]
    fn quality_gradient() {
        let theme = THEME;
        assert_eq!(theme.quality_color(85.0), theme.positive);
        assert_eq!(theme.quality_color(55.0), theme.accent);
        assert_eq!(theme.quality_color(35.0), theme.neutral);
        assert_eq!(theme.quality_color(5.0), theme.muted);
        assert_eq!(theme.quality_color(0.0), theme.text_secondary);
    }

    #[test]
    fn cell_style_by_column() {
        assert_eq!(cell_style("max_quality", "80.0").fg, Some(THEME.positive));
        assert_eq!(cell_style("label", "-0.2").fg, Some(THEME.negative));
        assert_eq!(cell_style("sector", "Tech"), text());
        assert_eq!(cell_style("total_breakouts", "4").fg, Some(THEME.text_primary));
    }
}
