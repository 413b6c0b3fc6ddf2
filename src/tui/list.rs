use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::format::{expense_count, format_amount};
use crate::models::Expense;
use crate::summary::Summary;

use super::style::{CategoryStyle, Theme};

/// Draws the placeholder for an empty list, otherwise the total banner and one
/// card per record in the order the service returned them.
pub fn render_list(
    frame: &mut Frame,
    area: Rect,
    records: &[Expense],
    selected: usize,
    theme: &Theme,
    currency: &str,
) {
    let Some(summary) = Summary::of(records) else {
        render_empty(frame, area, theme);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    render_summary(frame, chunks[0], summary, theme, currency);

    let items: Vec<ListItem> = records
        .iter()
        .map(|record| card(record, theme, currency))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Expenses "))
        .highlight_style(theme.selected_style())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_empty(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::raw(""),
        Line::raw("📊"),
        Line::styled("No expenses yet", theme.header_style()),
        Line::styled("Press a to create your first entry", theme.muted_style()),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_summary(frame: &mut Frame, area: Rect, summary: Summary, theme: &Theme, currency: &str) {
    let text = vec![
        Line::styled("Total Expenses", theme.muted_style()),
        Line::styled(format_amount(summary.total, currency), theme.header_style()),
        Line::styled(expense_count(summary.count), theme.muted_style()),
    ];
    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn card<'a>(record: &'a Expense, theme: &Theme, currency: &str) -> ListItem<'a> {
    let style = CategoryStyle::for_category(&record.category);
    let title = Line::from(vec![
        Span::raw(format!("{} ", style.icon)),
        Span::styled(
            record.name.as_str(),
            theme.text_style().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", record.category),
            Style::default().fg(style.color),
        ),
    ]);
    let details = Line::from(vec![
        Span::raw("   "),
        Span::styled(format_amount(record.amount, currency), theme.header_style()),
        Span::styled(format!("   📅 {}", record.date), theme.muted_style()),
    ]);
    ListItem::new(vec![title, details])
}
