use custcache_core::utils::truncate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, AppState};

use super::styles;

/// Widest a column is allowed to get before its cells are truncated.
const MAX_COLUMN_WIDTH: usize = 32;

/// Narrowest column, so short headers stay readable.
const MIN_COLUMN_WIDTH: usize = 3;

pub fn render(frame: &mut Frame, app: &App) {
    let show_search = matches!(app.state, AppState::Searching) || !app.search_query.is_empty();

    let mut constraints = vec![Constraint::Length(2)]; // Title bar
    if show_search {
        constraints.push(Constraint::Length(3)); // Search input
    }
    constraints.push(Constraint::Min(5)); // Table
    constraints.push(Constraint::Length(1)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    render_title_bar(frame, app, chunks[next]);
    next += 1;
    if show_search {
        render_search_bar(frame, app, chunks[next]);
        next += 1;
    }
    render_table(frame, app, chunks[next]);
    render_status_bar(frame, app, chunks[next + 1]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  custcache";
    let scope = app.scope_label();
    let help_hint = "[?] Help";

    let used = title.len() + scope.chars().count() + help_hint.len() + 6;
    let title_line = Line::from(vec![
        Span::styled(title, styles::app_title_style()),
        Span::styled(format!("  {}", scope), styles::scope_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::hint_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::hint_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);
    let cursor = if searching { "▌" } else { "" };

    let line = Line::from(vec![
        Span::styled(" / ", styles::hint_style()),
        Span::styled(format!("{}{}", app.search_query, cursor), styles::search_text_style()),
    ]);

    let block = Block::default()
        .title(" Search ")
        .title_style(styles::hint_style())
        .borders(Borders::ALL)
        .border_style(styles::frame_style(searching));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.state, AppState::Normal);
    let block = Block::default()
        .title(format!(" Customers ({}) ", app.view.data_row_count()))
        .title_style(styles::hint_style())
        .borders(Borders::ALL)
        .border_style(styles::frame_style(focused));

    let Some(ref table) = app.view.table else {
        // Nothing rendered yet (still loading, or no data at all)
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    if table.is_placeholder() {
        let lines: Vec<Line> = table
            .rows
            .iter()
            .map(|row| {
                Line::from(Span::styled(
                    format!(" {}", row.join(" ")),
                    styles::empty_message_style(),
                ))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let header = Row::new(table.headers.iter().map(|h| Cell::from(h.clone())))
        .style(styles::column_header_style())
        .height(1);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            Row::new(
                row.iter()
                    .map(|cell| Cell::from(truncate(cell, MAX_COLUMN_WIDTH))),
            )
            .style(styles::row_style())
        })
        .collect();

    let widths: Vec<Constraint> = table
        .column_widths()
        .into_iter()
        .map(|w| Constraint::Length(w.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) as u16))
        .collect();

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_row_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(widget, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[/] search | [r]eload | [q]uit";

    let status_style = styles::status_style(app.load_state());

    let left_text = format!(" {} ", app.status_text());
    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, status_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::hint_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::key_style()),
        Span::styled(desc, styles::key_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 17, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!("  custcache {}", version),
            styles::app_title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::overlay_heading_style())),
        help_line("↑/↓ j/k", "Move selection"),
        help_line("PgUp/PgDn", "Scroll a page"),
        help_line("g/G", "First/last row"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::overlay_heading_style())),
        help_line("/", "Search all columns"),
        help_line("Esc", "Clear search"),
        help_line("r", "Reload data"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::hint_style()),
            Span::styled("?", styles::key_style()),
            Span::styled(" or ", styles::hint_style()),
            Span::styled("Esc", styles::key_style()),
            Span::styled(" to close", styles::hint_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::frame_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::overlay_heading_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::hint_style()),
            Span::styled("[Y]", styles::key_style()),
            Span::styled(" to quit, ", styles::hint_style()),
            Span::styled("[N]", styles::key_style()),
            Span::styled(" to cancel", styles::hint_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::frame_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
