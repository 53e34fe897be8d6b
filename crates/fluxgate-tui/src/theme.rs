//! Palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use fluxgate_core::series_color;

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT_CYAN: Color = Color::Rgb(0, 229, 255);
pub const ACCENT_PURPLE: Color = Color::Rgb(186, 104, 255);
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99);
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207);
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164);

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default()
        .fg(ACCENT_CYAN)
        .add_modifier(Modifier::BOLD)
}

/// Border for the main panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Active tab in the shortcut bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(ACCENT_PURPLE)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in the shortcut bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  r refresh").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default()
        .fg(ACCENT_CYAN)
        .add_modifier(Modifier::BOLD)
}

/// Style for the chart series at `index`, colored by the deterministic
/// core palette so the TUI and any other consumer agree on colors.
pub fn series_style(index: usize) -> Style {
    let rgb = series_color(index);
    Style::default().fg(Color::Rgb(rgb.r, rgb.g, rgb.b))
}

/// Highlighted (selected) chart bar.
pub fn bar_selected() -> Style {
    Style::default()
        .fg(ACCENT_PURPLE)
        .add_modifier(Modifier::BOLD)
}

/// Unselected chart bar.
pub fn bar_default() -> Style {
    Style::default().fg(ACCENT_CYAN)
}

/// Status / error line.
pub fn status_error() -> Style {
    Style::default().fg(ERROR_RED)
}
