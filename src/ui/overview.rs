//! Overview rendering.
//!
//! Two ranked lists side by side: the most searched terms and the most
//! consulted URLs, each capped at five entries.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::RankedEntry;

pub const EMPTY_TERMS: &str = "No searches yet";
pub const EMPTY_URLS: &str = "No consulted URLs yet";

/// Render the Overview.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area);

    let (terms, urls): (&[RankedEntry], &[RankedEntry]) = match app.view {
        Some(ref view) => (view.top_terms.as_slice(), view.top_urls.as_slice()),
        None => (&[], &[]),
    };

    render_ranked(frame, app, chunks[0], " Top Searches ", "Term", terms, EMPTY_TERMS);
    render_ranked(frame, app, chunks[1], " Top URLs ", "URL", urls, EMPTY_URLS);
}

fn render_ranked(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    key_header: &str,
    entries: &[RankedEntry],
    empty: &str,
) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if entries.is_empty() {
        let paragraph = Paragraph::new(empty.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from(key_header.to_string()),
        Cell::from("Count"),
    ])
    .style(app.theme.header);

    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(entry.key.clone()),
                Cell::from(entry.count.to_string()).style(Style::default().fg(app.theme.count)),
            ])
        })
        .collect();

    let widths = [Constraint::Length(3), Constraint::Fill(1), Constraint::Length(10)];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
