//! The UI renders the application state into the sectioned-article page shell.
//!
//! The draw function dispatches based on the current view (page list or article). The article
//! view is a header with the page title, a sticky topic navigation on the left whose highlight
//! follows the navigator's active section, the scrolling article body, and a footer.

use crate::app_state::{AppState, FileMode, View};
use crate::section::{DisplayMeta, Section};
use crate::viewport::{LineKind, RenderedLine};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Width of the topic navigation column.
const NAV_WIDTH: u16 = 30;

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    match app.current_view {
        View::PageList => draw_page_list(f, app),
        View::Article => draw_article(f, app),
    }
}

fn meta_color(meta: Option<&DisplayMeta>) -> Option<Color> {
    meta.and_then(|m| m.color.as_deref())
        .and_then(|name| name.parse::<Color>().ok())
}

fn draw_page_list(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let items: Vec<ListItem> = app
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let line = Line::from(vec![
                Span::styled(
                    page.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} sections)", page.sections.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            let style = if i == app.current_page_index {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!("Pages ({})", app.pages.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, chunks[0]);

    let help = app
        .message
        .clone()
        .unwrap_or_else(|| "↑/↓: Select | Enter: Open | q: Quit".to_string());
    let help_widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, chunks[1]);
}

fn draw_article(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Navigation + body
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(NAV_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);

    // Geometry first, so the navigator sees the regions the reader is about to see.
    let body_block = Block::default().borders(Borders::ALL);
    let body_area = body_block.inner(columns[1]);
    app.relayout(usize::from(body_area.width));
    app.set_viewport_height(usize::from(body_area.height));
    let app: &AppState = app;

    draw_header(f, app, chunks[0]);
    draw_navigation(f, app, columns[0]);

    let lines: Vec<Line> = app
        .viewport
        .visible_lines()
        .iter()
        .map(|line| render_line(line, app))
        .collect();
    let body = Paragraph::new(lines).block(body_block);
    f.render_widget(body, columns[1]);

    draw_footer(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(page) = app.current_page() else {
        return;
    };

    let lede = page.preamble.lines().next().unwrap_or_default().to_string();
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            page.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(lede, Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn nav_entry(section: &Section) -> Line<'static> {
    let meta = section.display_meta.as_ref();
    let icon = meta
        .and_then(|m| m.icon.clone())
        .unwrap_or_else(|| "•".to_string());
    let label_style = meta_color(meta).map_or_else(Style::default, |c| Style::default().fg(c));

    Line::from(vec![
        Span::raw(format!("{icon} ")),
        Span::styled(section.display_label.clone(), label_style),
    ])
}

fn draw_navigation(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(navigator) = app.navigator.as_ref() else {
        return;
    };
    let active = navigator.active_index();

    let items: Vec<ListItem> = navigator
        .sections()
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let mut line = nav_entry(section);
            let marker = if i == app.nav_focus { "› " } else { "  " };
            line.spans.insert(0, Span::raw(marker));

            let style = if i == active {
                Style::default()
                    .add_modifier(Modifier::REVERSED)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Topics"));
    f.render_widget(list, area);
}

fn render_line(line: &RenderedLine, app: &AppState) -> Line<'static> {
    match line.kind {
        LineKind::Heading => {
            let section = app
                .navigator
                .as_ref()
                .and_then(|n| n.sections().get(line.section));
            let meta = section.and_then(|s| s.display_meta.as_ref());
            let mut style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            if let Some(color) = meta_color(meta) {
                style = style.fg(color);
            }
            Line::from(Span::styled(line.text.clone(), style))
        }
        LineKind::Subheading => Line::from(Span::styled(
            line.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        LineKind::Quote => Line::from(Span::styled(
            line.text.clone(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
        LineKind::Code => Line::from(Span::styled(
            line.text.clone(),
            Style::default().fg(Color::Yellow),
        )),
        LineKind::Rule => Line::from(Span::styled(
            line.text.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        LineKind::ListItem | LineKind::Body | LineKind::Blank => Line::from(line.text.clone()),
    }
}

fn draw_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let help = app.message.clone().unwrap_or_else(|| {
        let quit = if app.file_mode == FileMode::Multi {
            "q: Pages"
        } else {
            "q: Quit"
        };
        format!("j/k: Scroll | Tab/S-Tab: Next/Prev | 1-9: Jump | [/]: Focus | Enter: Go | {quit}")
    });

    let position = app.navigator.as_ref().map_or_else(String::new, |n| {
        format!(
            "section {}/{} · {}%",
            n.active_index() + 1,
            n.sections().len(),
            app.viewport.scroll_percent()
        )
    });

    let footer = Paragraph::new(help).block(Block::default().borders(Borders::ALL).title(position));
    f.render_widget(footer, area);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
