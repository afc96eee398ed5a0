//! Barrels view rendering.
//!
//! One row per barrel card in snapshot order, with its status label,
//! index size, incoming links, mean latency and request count.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;

pub const EMPTY_BARRELS: &str = "Waiting for barrels...";

/// Render the Barrels view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.view.as_ref().map(|v| v.barrel_cards.len()).unwrap_or(0);
    let cards = app.filtered_barrels();

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let selected = app.selected_barrel_index.min(cards.len().saturating_sub(1));
    let position_info = if !cards.is_empty() {
        format!(" [{}/{}]", selected + 1, cards.len())
    } else {
        String::new()
    };

    let title = format!(" Barrels ({}/{}){}{} ", cards.len(), total, filter_info, position_info);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if total == 0 {
        let paragraph = Paragraph::new(EMPTY_BARRELS)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Barrel"),
        Cell::from("Status"),
        Cell::from("Words"),
        Cell::from("Links"),
        Cell::from("Latency"),
        Cell::from("Requests"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = cards
        .iter()
        .map(|card| {
            Row::new(vec![
                Cell::from(card.name.clone()),
                Cell::from(card.label).style(app.theme.barrel_style(card.is_healthy)),
                Cell::from(card.inverted_index_count.to_string()),
                Cell::from(card.incoming_links_count.to_string()),
                Cell::from(format!("{}ms", card.latency)),
                Cell::from(card.request_count.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Min(8),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
