use std::io;
use std::sync::Arc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::ExpenseService;
use crate::app::{execute as run_command, App, Command, Message};
use crate::config::Config;
use crate::errors::SpendviewError;
use crate::form::{Field, LineEditor};

use self::actions::{
    confirm_action, editing_action, key_pressed, list_action, ConfirmAction, EditingAction,
    ListAction,
};
use self::style::Theme;

pub mod actions;
pub mod editor;
pub mod list;
pub mod style;
pub mod view;

type CrosstermTerminal = Terminal<CrosstermBackend<io::Stdout>>;

pub fn setup_terminal() -> io::Result<CrosstermTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

pub fn teardown_terminal(terminal: &mut CrosstermTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs commands in the background and hands their completions back to the
/// event loop. Responses are applied in arrival order.
struct Dispatcher<S> {
    service: Arc<S>,
    tx: UnboundedSender<Message>,
}

impl<S: ExpenseService + 'static> Dispatcher<S> {
    fn dispatch(&self, command: impl Into<Option<Command>>) {
        let Some(command) = command.into() else {
            return;
        };
        debug!("Dispatching {command:?}");
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let message = run_command(service.as_ref(), command).await;
            // the receiver is gone once the UI has exited
            let _ = tx.send(message);
        });
    }
}

/// Opens the terminal UI and loads the list. Returns when the user quits.
pub async fn run<S>(mut app: App, service: Arc<S>, config: &Config) -> Result<(), SpendviewError>
where
    S: ExpenseService + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher { service, tx };
    let theme = Theme::default();

    let mut terminal = setup_terminal()?;
    info!("Terminal UI started");
    dispatcher.dispatch(app.initialize());
    let result = event_loop(
        &mut terminal,
        &mut app,
        &dispatcher,
        &mut rx,
        &theme,
        &config.currency,
    );
    teardown_terminal(&mut terminal)?;
    info!("Terminal UI closed");
    result
}

fn event_loop<S: ExpenseService + 'static>(
    terminal: &mut CrosstermTerminal,
    app: &mut App,
    dispatcher: &Dispatcher<S>,
    rx: &mut UnboundedReceiver<Message>,
    theme: &Theme,
    currency: &str,
) -> Result<(), SpendviewError> {
    loop {
        terminal.draw(|frame| view::render(frame, app, theme, currency))?;
        if app.should_quit() {
            return Ok(());
        }

        if let Some(key) = tokio::task::block_in_place(key_pressed)? {
            dispatcher.dispatch(handle_key(app, key));
        }
        while let Ok(message) = rx.try_recv() {
            dispatcher.dispatch(app.update(message));
        }
    }
}

/// Applies a key press to whichever part of the screen has focus.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Command> {
    if app.notice().is_some() {
        app.dismiss_notice();
        return None;
    }
    if app.pending_delete().is_some() {
        return match confirm_action(key)? {
            ConfirmAction::Yes => app.confirm_remove(),
            ConfirmAction::No => {
                app.cancel_remove();
                None
            }
        };
    }
    if app.is_form_open() {
        return form_key(app, key);
    }
    if app.search_input().is_some() {
        return search_key(app, key);
    }

    match list_action(key)? {
        ListAction::MoveUp => app.select_previous(),
        ListAction::MoveDown => app.select_next(),
        ListAction::ToTop => app.select_first(),
        ListAction::ToBottom => app.select_last(),
        ListAction::Add => app.open_create_form(),
        ListAction::Edit => app.open_edit_selected(),
        ListAction::Delete => app.remove_selected(),
        ListAction::Search => app.start_search_input(),
        ListAction::ClearSearch => return Some(app.clear_search()),
        ListAction::Refresh => {
            let query = app.search_text().to_string();
            return Some(app.search(&query));
        }
        ListAction::Exit => app.quit(),
    }
    None
}

fn form_key(app: &mut App, key: KeyEvent) -> Option<Command> {
    let form = app.form_mut()?;
    if form.focus() == Field::Category {
        match key.code {
            KeyCode::Right | KeyCode::Char(' ') => {
                form.cycle_category(true);
                return None;
            }
            KeyCode::Left => {
                form.cycle_category(false);
                return None;
            }
            _ => {}
        }
    }

    match editing_action(key)? {
        EditingAction::NextField => form.focus_next(),
        EditingAction::PrevField => form.focus_previous(),
        EditingAction::CancelEditing => return Some(app.close_form()),
        EditingAction::StopEditing => return app.submit_form(),
        action => form.edit_focused(|editor| edit_line(editor, action)),
    }
    None
}

fn search_key(app: &mut App, key: KeyEvent) -> Option<Command> {
    match editing_action(key)? {
        EditingAction::StopEditing => app.submit_search_input(),
        EditingAction::CancelEditing => {
            app.cancel_search_input();
            None
        }
        action => {
            if let Some(input) = app.search_input_mut() {
                edit_line(input, action);
            }
            None
        }
    }
}

fn edit_line(editor: &mut LineEditor, action: EditingAction) {
    match action {
        EditingAction::InsertChar(c) => editor.insert_char(c),
        EditingAction::MoveLeft => editor.move_left(),
        EditingAction::MoveRight => editor.move_right(),
        EditingAction::ToStart => editor.move_to_start(),
        EditingAction::ToEnd => editor.move_to_end(),
        EditingAction::DeleteLeft => editor.delete_left(),
        EditingAction::DeleteRight => editor.delete_right(),
        EditingAction::NextField
        | EditingAction::PrevField
        | EditingAction::CancelEditing
        | EditingAction::StopEditing => {}
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::models::{Category, Expense, ExpenseId};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(handle_key(app, key(KeyCode::Char(c))), None);
        }
    }

    fn with_records() -> App {
        let mut app = App::new();
        let records = (1..=2)
            .map(|i| Expense {
                id: ExpenseId(i),
                name: format!("Expense {i}"),
                category: Category::Shopping,
                amount: i * 100,
                date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            })
            .collect();
        app.update(Message::Loaded(Ok(records)));
        app
    }

    #[test]
    fn typing_a_new_expense() {
        let mut app = with_records();
        handle_key(&mut app, key(KeyCode::Char('a')));
        assert!(app.is_form_open());

        type_text(&mut app, "Shoes");
        handle_key(&mut app, key(KeyCode::Tab));
        handle_key(&mut app, key(KeyCode::Right));
        handle_key(&mut app, key(KeyCode::Right));
        handle_key(&mut app, key(KeyCode::Right));
        handle_key(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "2500");

        let form = app.form().unwrap();
        assert_eq!(form.name().value(), "Shoes");
        assert_eq!(form.category(), Some(&Category::Shopping));

        match handle_key(&mut app, key(KeyCode::Enter)) {
            Some(Command::Create(draft)) => {
                assert_eq!(draft.name, "Shoes");
                assert_eq!(draft.amount, 2_500);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn letters_in_the_form_are_not_shortcuts() {
        let mut app = with_records();
        handle_key(&mut app, key(KeyCode::Char('a')));
        type_text(&mut app, "qd");
        assert!(!app.should_quit());
        assert_eq!(app.pending_delete(), None);
        assert_eq!(app.form().unwrap().name().value(), "qd");
    }

    #[test]
    fn escape_closes_the_form_and_reloads() {
        let mut app = with_records();
        handle_key(&mut app, key(KeyCode::Char('e')));
        assert_eq!(app.record_being_edited(), Some(ExpenseId(1)));
        assert_eq!(handle_key(&mut app, key(KeyCode::Esc)), Some(Command::FetchAll));
        assert!(!app.is_form_open());
    }

    #[test]
    fn delete_waits_for_yes() {
        let mut app = with_records();
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('d'))), None);
        assert_eq!(app.pending_delete(), Some(ExpenseId(2)));

        assert_eq!(handle_key(&mut app, key(KeyCode::Char('x'))), None);
        assert_eq!(app.pending_delete(), Some(ExpenseId(2)));

        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('y'))),
            Some(Command::Delete(ExpenseId(2)))
        );
    }

    #[test]
    fn declining_delete_sends_nothing() {
        let mut app = with_records();
        handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('n'))), None);
        assert_eq!(app.pending_delete(), None);
    }

    #[test]
    fn search_box() {
        let mut app = with_records();
        handle_key(&mut app, key(KeyCode::Char('/')));
        type_text(&mut app, "shop");
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Enter)),
            Some(Command::Search("shop".to_string()))
        );
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('r'))),
            Some(Command::Search("shop".to_string()))
        );
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('c'))), Some(Command::FetchAll));
        assert_eq!(app.search_text(), "");
    }

    #[test]
    fn any_key_dismisses_a_notice_first() {
        let mut app = with_records();
        app.update(Message::Deleted(Ok(Default::default())));
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q'))), None);
        assert!(app.notice().is_none());
        assert!(!app.should_quit());
        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }
}
