use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, NoticeKind};

use super::editor::render_form;
use super::list::render_list;
use super::style::Theme;

/// Splits the screen into header, main panel and footer.
pub fn compute_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// A rectangle of `width` x `height` cells in the middle of `area`, clamped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, currency: &str) {
    let (header, main, footer) = compute_layout(frame.area());

    render_header(frame, header, app, theme);
    if app.is_loading() {
        let loading = Paragraph::new(Line::styled("Loading expenses...", theme.muted_style()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, main);
    } else {
        render_list(frame, main, app.records(), app.selected(), theme, currency);
    }
    render_footer(frame, footer, app, theme);

    if let Some(form) = app.form() {
        render_form(frame, centered_rect(64, 14, frame.area()), form, theme, currency);
    }
    if app.pending_delete().is_some() {
        render_confirm(frame, app, theme);
    }
    if app.notice().is_some() {
        render_notice(frame, app, theme);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = vec![Span::styled("Expense Tracker", theme.header_style())];
    if app.is_loading() {
        spans.push(Span::styled("  (loading)", theme.muted_style()));
    }
    let title = Line::from(spans);

    let search = match app.search_input() {
        Some(input) => Line::from(vec![
            Span::styled("Search: ", theme.key_style()),
            Span::styled(input.value(), theme.focused_style()),
        ]),
        None if app.search_text().is_empty() => Line::styled("", theme.muted_style()),
        None => Line::from(vec![
            Span::styled("Search: ", theme.muted_style()),
            Span::styled(app.search_text(), theme.text_style()),
        ]),
    };

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(inner);
    frame.render_widget(Paragraph::new(title), halves[0]);
    frame.render_widget(Paragraph::new(search.alignment(Alignment::Right)), halves[1]);

    if let Some(input) = app.search_input() {
        let tail = input.value().chars().count() - input.cursor_position();
        let x = (halves[1].x + halves[1].width).saturating_sub(tail as u16 + 1);
        frame.set_cursor_position((x, halves[1].y));
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let hints: &[(&str, &str)] = if app.search_input().is_some() {
        &[("Enter", "search"), ("Esc", "cancel")]
    } else {
        &[
            ("a", "add"),
            ("e", "edit"),
            ("d", "delete"),
            ("/", "search"),
            ("c", "clear"),
            ("r", "refresh"),
            ("q", "quit"),
        ]
    };
    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(*key, theme.key_style()));
        spans.push(Span::raw(format!(": {action}")));
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame, app: &App, theme: &Theme) {
    let name = app
        .pending_delete()
        .and_then(|id| app.records().iter().find(|record| record.id == id))
        .map(|record| record.name.as_str())
        .unwrap_or_default();
    let text = vec![
        Line::raw("Are you sure you want to delete this expense?"),
        Line::styled(name, theme.header_style()),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y", theme.key_style()),
            Span::raw(": yes | "),
            Span::styled("n", theme.key_style()),
            Span::raw(": no"),
        ]),
    ];
    let area = centered_rect(52, 6, frame.area());
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.error_style())
                .title(" Delete "),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_notice(frame: &mut Frame, app: &App, theme: &Theme) {
    let Some(notice) = app.notice() else {
        return;
    };
    let style = match notice.kind {
        NoticeKind::Success => theme.success_style(),
        NoticeKind::Failure => theme.error_style(),
    };
    let text = vec![
        Line::styled(notice.text.as_str(), style),
        Line::raw(""),
        Line::styled("Press any key", theme.muted_style()),
    ];
    let area = centered_rect(56, 6, frame.area());
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
