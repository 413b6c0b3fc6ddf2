use std::io;
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    MoveUp,
    MoveDown,
    ToTop,
    ToBottom,
    Add,
    Edit,
    Delete,
    Search,
    ClearSearch,
    Refresh,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingAction {
    InsertChar(char),
    MoveLeft,
    MoveRight,
    ToStart,
    ToEnd,
    DeleteLeft,
    DeleteRight,
    NextField,
    PrevField,
    CancelEditing,
    StopEditing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Yes,
    No,
}

/// Waits one tick for a key press.
pub fn key_pressed() -> io::Result<Option<KeyEvent>> {
    if poll(TICK)? {
        if let Event::Key(key) = read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn list_action(key: KeyEvent) -> Option<ListAction> {
    if is_ctrl_c(&key) {
        return Some(ListAction::Exit);
    }
    match key.code {
        KeyCode::Char(c) => match c {
            'k' => Some(ListAction::MoveUp),
            'j' => Some(ListAction::MoveDown),
            'g' => Some(ListAction::ToTop),
            'G' => Some(ListAction::ToBottom),
            'a' | '+' => Some(ListAction::Add),
            'e' | 'i' => Some(ListAction::Edit),
            'd' | '-' => Some(ListAction::Delete),
            '/' => Some(ListAction::Search),
            'c' => Some(ListAction::ClearSearch),
            'r' => Some(ListAction::Refresh),
            'q' => Some(ListAction::Exit),
            _ => None,
        },
        KeyCode::Up => Some(ListAction::MoveUp),
        KeyCode::Down => Some(ListAction::MoveDown),
        KeyCode::Home => Some(ListAction::ToTop),
        KeyCode::End => Some(ListAction::ToBottom),
        KeyCode::Enter => Some(ListAction::Edit),
        KeyCode::Delete => Some(ListAction::Delete),
        KeyCode::Esc => Some(ListAction::Exit),
        _ => None,
    }
}

pub fn editing_action(key: KeyEvent) -> Option<EditingAction> {
    if is_ctrl_c(&key) {
        return Some(EditingAction::CancelEditing);
    }
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) && !c.is_control() => {
            Some(EditingAction::InsertChar(c))
        }
        KeyCode::Left => Some(EditingAction::MoveLeft),
        KeyCode::Right => Some(EditingAction::MoveRight),
        KeyCode::Home => Some(EditingAction::ToStart),
        KeyCode::End => Some(EditingAction::ToEnd),
        KeyCode::Backspace => Some(EditingAction::DeleteLeft),
        KeyCode::Delete => Some(EditingAction::DeleteRight),
        KeyCode::Tab | KeyCode::Down => Some(EditingAction::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(EditingAction::PrevField),
        KeyCode::Enter => Some(EditingAction::StopEditing),
        KeyCode::Esc => Some(EditingAction::CancelEditing),
        _ => None,
    }
}

pub fn confirm_action(key: KeyEvent) -> Option<ConfirmAction> {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(ConfirmAction::Yes),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(ConfirmAction::No),
        _ if is_ctrl_c(&key) => Some(ConfirmAction::No),
        _ => None,
    }
}
