//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_elapsed;

/// Render the header bar with the connection indicator and barrel overview.
///
/// Displays: indicator dot, connectivity, barrel counts by health, total requests.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let indicator = Span::styled(" ● ", app.theme.connectivity_style(app.connectivity));
    let title = Span::styled("BARRELWATCH ", Style::default().add_modifier(Modifier::BOLD));
    let state = Span::styled(
        app.connectivity.label(),
        app.theme.connectivity_style(app.connectivity),
    );

    let Some(ref view) = app.view else {
        let line = Line::from(vec![indicator, title, Span::raw("│ "), state, Span::raw(" │ Waiting for data...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let active = view.healthy_count();
    let offline = view.offline_count();

    let line = Line::from(vec![
        indicator,
        title,
        Span::raw("│ "),
        state,
        Span::raw(" │ "),
        Span::styled(format!("{}", active), Style::default().fg(app.theme.healthy)),
        Span::raw(" active "),
        if offline > 0 {
            Span::styled(
                format!("{}", offline),
                Style::default().fg(app.theme.offline).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" offline │ "),
        Span::raw(format!("{} reqs", format_count(view.total_requests()))),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Overview "), Line::from(" 2:Barrels ")];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Barrels => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last snapshot, available controls.
/// Temporary status messages and errors take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.filter_active {
        "Type to search | Enter:apply Esc:cancel"
    } else {
        "/:search Tab:switch e:export ?:help q:quit"
    };

    let status = match (app.last_updated, &app.load_error) {
        (_, Some(err)) if app.source_unavailable() => format!(" Error: {} | q:quit", err),
        (Some(at), Some(err)) => format!(
            " {} | Updated {} ago | {} | {}",
            app.source_description(),
            format_elapsed(at.elapsed()),
            err,
            controls
        ),
        (Some(at), None) => format!(
            " {} | Updated {} ago | {}",
            app.source_description(),
            format_elapsed(at.elapsed()),
            controls
        ),
        (None, Some(err)) => format!(" {} | {} | {}", app.source_description(), err, controls),
        (None, None) => format!(" {} | Waiting for data... | {}", app.source_description(), controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab ←/→     Switch views"),
        Line::from("  1/2         Overview / Barrels"),
        Line::from("  ↑/↓ j/k     Navigate barrels"),
        Line::from("  PgUp/PgDn   Jump 10 barrels"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Barrels",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /           Filter by name"),
        Line::from("  c Esc       Clear filter"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
