// src/tui/theme.rs — Color scheme and style definitions for the flight dashboard.

use ratatui::style::{Color, Modifier, Style};

/// Sky-at-dusk palette.
pub struct Theme;

impl Theme {
    // ── Brand colors ─────────────────────────────────────────────
    pub const SKY_BLUE: Color = Color::Rgb(90, 160, 235);
    pub const SKY_WHITE: Color = Color::Rgb(240, 240, 240);
    pub const SKY_GREEN: Color = Color::Rgb(80, 200, 120);
    pub const SKY_AMBER: Color = Color::Rgb(235, 185, 70);
    pub const SKY_RED: Color = Color::Rgb(230, 80, 80);
    pub const SKY_GRAY: Color = Color::Rgb(120, 120, 140);
    pub const SKY_DIM: Color = Color::Rgb(80, 80, 100);

    // ── Semantic styles ──────────────────────────────────────────

    /// Main title / route header.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::SKY_BLUE)
            .add_modifier(Modifier::BOLD)
    }

    /// Block border (normal).
    pub fn border() -> Style {
        Style::default().fg(Theme::SKY_DIM)
    }

    /// Normal body text.
    pub fn text() -> Style {
        Style::default().fg(Theme::SKY_WHITE)
    }

    /// Dimmed / secondary text.
    pub fn text_dim() -> Style {
        Style::default().fg(Theme::SKY_GRAY)
    }

    /// The fare line on the price chart.
    pub fn price_line() -> Style {
        Style::default().fg(Theme::SKY_BLUE)
    }

    /// The reference (optimal fare) line.
    pub fn reference_line() -> Style {
        Style::default().fg(Theme::SKY_GREEN)
    }

    /// Recommended-flight marker.
    pub fn recommended() -> Style {
        Style::default()
            .fg(Theme::SKY_GREEN)
            .add_modifier(Modifier::BOLD)
    }

    /// Sample-data notice shown when the panel holds synthesized values.
    pub fn sample_notice() -> Style {
        Style::default().fg(Theme::SKY_AMBER)
    }

    /// Table header row.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::SKY_BLUE)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Selected table row.
    pub fn table_selected() -> Style {
        Style::default()
            .bg(Color::Rgb(40, 40, 60))
            .fg(Theme::SKY_WHITE)
    }

    /// Key hint in the footer.
    pub fn key_hint() -> Style {
        Style::default().fg(Theme::SKY_BLUE)
    }

    /// Description next to key hint.
    pub fn key_desc() -> Style {
        Style::default().fg(Theme::SKY_GRAY)
    }

    /// Color-code a fare against the reference price.
    pub fn price(value: f64, reference: f64) -> Style {
        if value <= reference {
            Style::default().fg(Theme::SKY_GREEN)
        } else if value <= reference * 1.2 {
            Style::default().fg(Theme::SKY_AMBER)
        } else {
            Style::default().fg(Theme::SKY_RED)
        }
    }
}
