//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::connection::ConnectivityState;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Indicator color while a connection attempt is in flight.
    pub connecting: Color,
    /// Color for offline barrels and a lost connection.
    pub offline: Color,
    /// Color for active barrels and a live connection.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Color for the count column of ranked lists.
    pub count: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            connecting: Color::Yellow,
            offline: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            count: Color::LightCyan,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            connecting: Color::Yellow,
            offline: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            count: Color::Blue,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for the connection indicator.
    pub fn connectivity_style(&self, state: ConnectivityState) -> Style {
        match state {
            ConnectivityState::Connected => Style::default().fg(self.healthy),
            ConnectivityState::Connecting => Style::default().fg(self.connecting),
            ConnectivityState::Disconnected => {
                Style::default().fg(self.offline).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Style for a barrel's status label.
    pub fn barrel_style(&self, is_healthy: bool) -> Style {
        if is_healthy {
            Style::default().fg(self.healthy).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.offline).add_modifier(Modifier::BOLD)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.connectivity_style(ConnectivityState::Connected).fg, Some(Color::Green));
        assert_eq!(theme.connectivity_style(ConnectivityState::Connecting).fg, Some(Color::Yellow));
        assert_eq!(theme.connectivity_style(ConnectivityState::Disconnected).fg, Some(Color::Red));
    }

    #[test]
    fn test_barrel_style() {
        let theme = Theme::light();
        assert_eq!(theme.barrel_style(true).fg, Some(theme.healthy));
        assert_eq!(theme.barrel_style(false).fg, Some(theme.offline));
    }
}
