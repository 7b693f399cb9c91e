//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering only reads state; the
//! one exception is the list selection, which ratatui needs mutably.
//!
//! ## For contributors
//!
//! * The list screen is a three-row split: search bar, scrollable list, and a
//!   one-line status bar.
//! * The detail screen is framed in the entry's accent colour (see
//!   [`DetailView::accent_color`]).

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::api::PokemonDetail;
use crate::app::{App, Screen};
use crate::detail::{type_color, DetailStatus, DetailView};
use crate::palette::Rgb;

/// Highest base stat in the main series; used to scale the stat bars.
const MAX_BASE_STAT: u32 = 255;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    if let Screen::Detail(view) = &app.screen {
        draw_detail(view, frame, area);
        return;
    }

    let [search_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_search_bar(app, frame, search_area);
    draw_pokemon_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn draw_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let (text, style) = if app.query.is_empty() && !app.editing {
        ("Search... (/)".to_string(), Style::default().fg(Color::DarkGray))
    } else if app.editing {
        (format!("{}▏", app.query), Style::default().fg(Color::White))
    } else {
        (app.query.clone(), Style::default().fg(Color::White))
    };

    let border = if app.editing { Color::Yellow } else { Color::Gray };
    let search = Paragraph::new(Span::styled(text, style)).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(search, area);
}

fn draw_pokemon_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .controller
        .state()
        .items()
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("#{:03}", entry.number),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(entry.name.as_str(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let list = List::new(list_items)
        .block(Block::default().title(" Pokédex ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.controller.state();

    let mut spans = vec![Span::raw(" ")];
    if !state.error_message().is_empty() {
        spans.push(Span::styled(
            format!("{}  r: retry", state.error_message()),
            Style::default().fg(Color::Red),
        ));
    } else if state.loading() {
        spans.push(Span::styled("Loading…", Style::default().fg(Color::Yellow)));
    } else if state.searching() {
        spans.push(Span::styled("Searching", Style::default().fg(Color::Cyan)));
    } else if state.end_reached() {
        spans.push(Span::styled("All loaded", Style::default().fg(Color::Green)));
    } else if let Some(at) = app.last_page_at {
        spans.push(Span::styled(
            format!("Updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("{} items", state.items().len()),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::raw("  q: quit  /: search  x: clear  Enter: open  ↑/↓: scroll"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_detail(view: &DetailView, frame: &mut Frame, area: Rect) {
    let accent = color(view.accent_color());
    let block = Block::default()
        .title(format!(" #{} {} ", view.number, view.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &view.status {
        DetailStatus::Loading => {
            frame.render_widget(Paragraph::new("Loading…").style(Style::default().fg(accent)), inner);
        }
        DetailStatus::Failed(message) => {
            let text = vec![
                Line::styled(message.as_str(), Style::default().fg(Color::Red)),
                Line::raw(""),
                Line::raw("Esc: back"),
            ];
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
        }
        DetailStatus::Loaded(detail) => draw_detail_body(detail, accent, frame, inner),
    }
}

fn draw_detail_body(detail: &PokemonDetail, accent: Color, frame: &mut Frame, area: Rect) {
    let stat_rows = detail.stats.len() as u16;
    let [info_area, stats_area, help_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(stat_rows),
        Constraint::Length(1),
    ])
    .areas(area);

    let mut types = vec![Span::raw("Type: ")];
    for name in detail.type_names() {
        let fg = type_color(name).map_or(Color::White, color);
        types.push(Span::styled(format!("{name} "), Style::default().fg(fg).add_modifier(Modifier::BOLD)));
    }

    let base_experience = detail
        .base_experience
        .map_or_else(|| "?".to_string(), |xp| xp.to_string());
    let info = vec![
        Line::from(types),
        Line::raw(format!("Height: {:.1} m", detail.height_m())),
        Line::raw(format!("Weight: {:.1} kg", detail.weight_kg())),
        Line::raw(format!("Base experience: {base_experience}")),
        Line::styled(
            detail.sprites.front_default.as_deref().unwrap_or("no sprite"),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(info), info_area);

    let rows = Layout::vertical(vec![Constraint::Length(1); detail.stats.len()]).split(stats_area);
    for (stat, row) in detail.stats.iter().zip(rows.iter()) {
        let ratio = f64::from(stat.base_stat.min(MAX_BASE_STAT)) / f64::from(MAX_BASE_STAT);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(accent))
            .ratio(ratio)
            .label(format!("{:<16} {:>3}", stat.stat.name, stat.base_stat));
        frame.render_widget(gauge, *row);
    }

    frame.render_widget(
        Paragraph::new("Esc: back").style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
