//! TUI rendering logic for the movie browser.
//!
//! Draws a [`ViewDescription`]; regions that are `None` are skipped.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Tabs, Wrap};

use cinedex_api::catalog::Category;

use super::shell::{InputMode, ShellState};
use super::view::{
    CardView, CategoryMenuView, ContentView, DetailView, PaginationView, ViewDescription,
};

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, view: &ViewDescription, shell: &mut ShellState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], view, shell);
    draw_main(frame, chunks[1], view, shell);
    draw_footer(frame, chunks[2], view, shell);
}

/// Draws the category menu, search input and page indicator.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, view: &ViewDescription, shell: &ShellState) {
    let (Some(menu), Some(pagination)) = (&view.category_menu, &view.pagination) else {
        let title = if view.loading { " Loading... " } else { " Movie " };
        let back = Paragraph::new(if view.can_go_back {
            "b: back to list"
        } else {
            ""
        })
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(back, area);
        return;
    };

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
        ])
        .split(area);

    draw_category_menu(frame, header_chunks[0], menu);
    draw_search_input(frame, header_chunks[1], shell);
    draw_pagination(frame, header_chunks[2], pagination, view.loading);
}

fn draw_category_menu(frame: &mut Frame, area: Rect, menu: &CategoryMenuView) {
    let titles: Vec<Line> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!("{} {}", i.saturating_add(1), c.label())))
        .collect();
    let selected = Category::ALL.iter().position(|c| *c == menu.selected);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", menu.label)),
        );
    frame.render_widget(tabs, area);
}

fn draw_search_input(frame: &mut Frame, area: Rect, shell: &ShellState) {
    let style = if shell.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let search = Paragraph::new(shell.search.clone())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, area);
}

fn draw_pagination(frame: &mut Frame, area: Rect, pagination: &PaginationView, loading: bool) {
    let button = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };

    let line = Line::from(vec![
        button("\u{25c0} ", pagination.prev_enabled),
        Span::raw(pagination.page_label.clone()),
        button(" \u{25b6}", pagination.next_enabled),
    ]);
    let title = if loading { " Loading... " } else { " Page " };
    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

/// Draws the content area.
#[allow(clippy::indexing_slicing)]
fn draw_main(frame: &mut Frame, area: Rect, view: &ViewDescription, shell: &mut ShellState) {
    match &view.content {
        ContentView::Blank => {
            let blank = Paragraph::new("").block(Block::default().borders(Borders::ALL));
            frame.render_widget(blank, area);
        }
        ContentView::Grid(cards) => {
            let pane_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);

            draw_card_table(frame, pane_chunks[0], cards, shell);
            let selected = shell.selected().and_then(|idx| cards.get(idx));
            draw_card_panel(frame, pane_chunks[1], selected);
        }
        ContentView::Detail(detail) => draw_detail(frame, area, detail),
        ContentView::Unavailable { message } => {
            let widget = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Movie "));
            frame.render_widget(widget, area);
        }
    }
}

/// Draws the movie card list (left).
fn draw_card_table(frame: &mut Frame, area: Rect, cards: &[CardView], shell: &mut ShellState) {
    let header = Row::new(vec!["ID", "Title"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = cards
        .iter()
        .map(|c| Row::new(vec![c.movie_id.to_string(), c.title.clone()]))
        .collect();

    let widths = [Constraint::Length(9), Constraint::Min(20)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Movies ({}) ", cards.len())),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut shell.table_state);
}

/// Draws the selected card (right).
fn draw_card_panel(frame: &mut Frame, area: Rect, card: Option<&CardView>) {
    let lines = card.map_or_else(Vec::new, |c| {
        vec![
            Line::from(Span::styled(
                c.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(c.poster_url.clone().unwrap_or_default()),
            Line::from(""),
            Line::from(c.excerpt.clone()),
            Line::from(""),
            Line::from(c.footer.clone()),
        ]
    });

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Card "));
    frame.render_widget(panel, area);
}

fn draw_detail(frame: &mut Frame, area: Rect, detail: &DetailView) {
    let lines = vec![
        Line::from(Span::styled(
            detail.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(detail.poster_url.clone().unwrap_or_default()),
        Line::from(""),
        Line::from(detail.overview.clone()),
        Line::from(""),
        Line::from(detail.release.clone()),
        Line::from(detail.runtime.clone()),
        Line::from(detail.genres.clone()),
    ];

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Movie {} ", detail.movie_id)),
    );
    frame.render_widget(widget, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, view: &ViewDescription, shell: &ShellState) {
    let help_text = match (shell.input_mode, &view.content) {
        (InputMode::Search, _) => "Type to search | Esc: cancel | Enter: search",
        (InputMode::Normal, ContentView::Detail(_) | ContentView::Unavailable { .. }) => {
            "b/Esc: back  o: open in browser  q: quit"
        }
        (InputMode::Normal, _) => {
            "\u{2191}\u{2193}/j/k: move  Enter: open  \u{2190}\u{2192}/p/n: page  1-4/c: category  /: search  o: open in browser  q: quit"
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
