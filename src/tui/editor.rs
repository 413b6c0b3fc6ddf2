use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::form::{ExpenseForm, Field, LineEditor};

use super::style::{CategoryStyle, Theme};

const INDENT: &str = "  ";

/// Draws the create/update form as a popup over `area`.
pub fn render_form(frame: &mut Frame, area: Rect, form: &ExpenseForm, theme: &Theme, currency: &str) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.header_style())
        .title(format!(" {} ", form.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    for (field, field_area) in Field::ORDER.into_iter().zip(chunks.iter().copied()) {
        let focused = form.focus() == field;
        let label_style = if focused {
            theme.header_style()
        } else {
            theme.text_style()
        };
        let value = match field {
            Field::Name => input_line(form.name(), "", focused, theme),
            Field::Category => category_line(form, focused, theme),
            Field::Amount => input_line(form.amount(), currency, focused, theme),
            Field::Date => input_line(form.date(), "", focused, theme),
        };
        let text = vec![Line::styled(field.label(), label_style), value];
        frame.render_widget(Paragraph::new(text), field_area);

        if focused && !form.is_saving() {
            let editor = match field {
                Field::Name => Some((form.name(), "")),
                Field::Amount => Some((form.amount(), currency)),
                Field::Date => Some((form.date(), "")),
                Field::Category => None,
            };
            if let Some((editor, prefix)) = editor {
                let offset = INDENT.chars().count() + prefix.chars().count() + editor.cursor_position();
                frame.set_cursor_position((field_area.x + offset as u16, field_area.y + 1));
            }
        }
    }

    if let Some(error) = form.error() {
        frame.render_widget(
            Paragraph::new(Line::styled(error, theme.error_style())),
            chunks[4],
        );
    }

    let hint = if form.is_saving() {
        Line::styled("Saving...", theme.muted_style())
    } else {
        Line::from(vec![
            Span::styled("Enter", theme.key_style()),
            Span::raw(": save | "),
            Span::styled("Esc", theme.key_style()),
            Span::raw(": cancel | "),
            Span::styled("Tab", theme.key_style()),
            Span::raw(": next field | "),
            Span::styled("←/→", theme.key_style()),
            Span::raw(": category"),
        ])
    };
    frame.render_widget(Paragraph::new(hint), chunks[5]);
}

fn input_line<'a>(editor: &'a LineEditor, prefix: &'a str, focused: bool, theme: &Theme) -> Line<'a> {
    let style = if focused {
        theme.focused_style()
    } else {
        theme.text_style()
    };
    Line::from(vec![
        Span::raw(INDENT),
        Span::styled(prefix, theme.muted_style()),
        Span::styled(editor.value(), style),
    ])
}

fn category_line<'a>(form: &'a ExpenseForm, focused: bool, theme: &Theme) -> Line<'a> {
    let Some(category) = form.category() else {
        return Line::from(vec![
            Span::raw(INDENT),
            Span::styled("< Select a category >", theme.muted_style()),
        ]);
    };
    let style = CategoryStyle::for_category(category);
    let text_style = if focused {
        theme.focused_style()
    } else {
        Style::default().fg(style.color)
    };
    Line::from(vec![
        Span::raw(INDENT),
        Span::styled(format!("< {} {} >", style.icon, category), text_style),
    ])
}
