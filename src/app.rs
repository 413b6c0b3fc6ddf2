//! The view state and its update cycle.
//!
//! User intents are methods on [`App`]; completions of API calls come back as
//! [`Message`]s through [`App::update`]. Both may ask for one follow-up API
//! call by returning a [`Command`], which the caller runs with [`execute`].

use std::collections::VecDeque;

use chrono::{Local, NaiveDate};
use log::{error, info};

use crate::api::{Acknowledgement, ApiError, ExpenseService, Saved};
use crate::form::{ExpenseForm, LineEditor};
use crate::models::{Expense, ExpenseDraft, ExpenseId};

/// An API call requested by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchAll,
    Search(String),
    Create(ExpenseDraft),
    Update(ExpenseId, ExpenseDraft),
    Delete(ExpenseId),
}

/// Completion of a [`Command`].
#[derive(Debug)]
pub enum Message {
    Loaded(Result<Vec<Expense>, ApiError>),
    Searched(Result<Vec<Expense>, ApiError>),
    Saved {
        updated: bool,
        result: Result<Saved, ApiError>,
    },
    Deleted(Result<Acknowledgement, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A banner the user has to dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct App {
    records: Vec<Expense>,
    is_loading: bool,
    form: Option<ExpenseForm>,
    search_text: String,
    search_input: Option<LineEditor>,
    notices: VecDeque<Notice>,
    pending_delete: Option<ExpenseId>,
    selected: usize,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_form_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&ExpenseForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ExpenseForm> {
        self.form.as_mut()
    }

    /// Id of the record the open form is editing, if any.
    pub fn record_being_edited(&self) -> Option<ExpenseId> {
        self.form.as_ref().and_then(ExpenseForm::editing)
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// The notice on screen. Later ones wait until it is dismissed.
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn pending_delete(&self) -> Option<ExpenseId> {
        self.pending_delete
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&Expense> {
        self.records.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.records.len().saturating_sub(1);
    }

    pub fn initialize(&mut self) -> Command {
        self.load_all()
    }

    pub fn load_all(&mut self) -> Command {
        self.is_loading = true;
        Command::FetchAll
    }

    /// A blank query is the same as [`App::load_all`].
    pub fn search(&mut self, query: &str) -> Command {
        self.search_text = query.to_string();
        if query.trim().is_empty() {
            return self.load_all();
        }
        self.is_loading = true;
        Command::Search(query.to_string())
    }

    pub fn clear_search(&mut self) -> Command {
        self.search_input = None;
        self.search("")
    }

    pub fn search_input(&self) -> Option<&LineEditor> {
        self.search_input.as_ref()
    }

    pub fn search_input_mut(&mut self) -> Option<&mut LineEditor> {
        self.search_input.as_mut()
    }

    pub fn start_search_input(&mut self) {
        self.search_input = Some(LineEditor::new(self.search_text.clone()));
    }

    pub fn cancel_search_input(&mut self) {
        self.search_input = None;
    }

    pub fn submit_search_input(&mut self) -> Option<Command> {
        let input = self.search_input.take()?;
        Some(self.search(input.value()))
    }

    pub fn open_create_form(&mut self) {
        self.open_create_form_on(Local::now().date_naive());
    }

    pub fn open_create_form_on(&mut self, today: NaiveDate) {
        self.form = Some(ExpenseForm::create(today));
    }

    pub fn open_edit_form(&mut self, record: &Expense) {
        self.form = Some(ExpenseForm::edit(record));
    }

    pub fn open_edit_selected(&mut self) {
        if let Some(record) = self.selected_record().cloned() {
            self.open_edit_form(&record);
        }
    }

    /// Closes the form and reloads, whether anything was saved or not.
    pub fn close_form(&mut self) -> Command {
        self.form = None;
        self.load_all()
    }

    pub fn submit_form(&mut self) -> Option<Command> {
        self.form.as_mut()?.submit()
    }

    /// Asks for confirmation before deleting `id`.
    pub fn remove(&mut self, id: ExpenseId) {
        self.pending_delete = Some(id);
    }

    pub fn remove_selected(&mut self) {
        if let Some(id) = self.selected_record().map(|record| record.id) {
            self.remove(id);
        }
    }

    pub fn confirm_remove(&mut self) -> Option<Command> {
        self.pending_delete.take().map(Command::Delete)
    }

    pub fn cancel_remove(&mut self) {
        self.pending_delete = None;
    }

    pub fn update(&mut self, message: Message) -> Option<Command> {
        match message {
            Message::Loaded(result) => {
                self.is_loading = false;
                match result {
                    Ok(records) => self.replace_records(records),
                    Err(e) => {
                        error!("Error loading expenses: {e:?}");
                        self.fail(format!("Failed to load expenses: {e}"));
                    }
                }
                None
            }
            Message::Searched(result) => {
                self.is_loading = false;
                match result {
                    Ok(records) => self.replace_records(records),
                    Err(e) => {
                        error!("Error searching expenses: {e:?}");
                        self.fail(format!("Failed to search expenses: {e}"));
                    }
                }
                None
            }
            Message::Saved { updated, result } => match result {
                Ok(saved) => {
                    match saved.record() {
                        Some(record) => info!("Saved expense {}", record.id),
                        None => info!("Saved expense"),
                    }
                    self.succeed(if updated {
                        "Expense updated successfully!"
                    } else {
                        "Expense added successfully!"
                    });
                    Some(self.close_form())
                }
                Err(e) => {
                    error!("Error saving expense: {e:?}");
                    if let Some(form) = self.form.as_mut() {
                        form.saving_failed();
                    }
                    self.fail(format!("Failed to save expense. Please try again. ({e})"));
                    None
                }
            },
            Message::Deleted(result) => match result {
                Ok(_) => {
                    self.succeed("Expense deleted successfully");
                    Some(self.load_all())
                }
                Err(e) => {
                    error!("Error deleting expense: {e:?}");
                    self.fail(format!("Failed to delete expense: {e}"));
                    None
                }
            },
        }
    }

    fn replace_records(&mut self, records: Vec<Expense>) {
        info!("Showing {} expenses", records.len());
        self.records = records;
        self.selected = self.selected.min(self.records.len().saturating_sub(1));
    }

    fn succeed(&mut self, text: &str) {
        self.notices.push_back(Notice {
            kind: NoticeKind::Success,
            text: text.to_string(),
        });
    }

    fn fail(&mut self, text: String) {
        self.notices.push_back(Notice {
            kind: NoticeKind::Failure,
            text,
        });
    }
}

pub async fn execute<S>(service: &S, command: Command) -> Message
where
    S: ExpenseService + ?Sized,
{
    match command {
        Command::FetchAll => Message::Loaded(service.list_all().await),
        Command::Search(query) => Message::Searched(service.search(&query).await),
        Command::Create(draft) => Message::Saved {
            updated: false,
            result: service.create(&draft).await,
        },
        Command::Update(id, draft) => Message::Saved {
            updated: true,
            result: service.update(id, &draft).await,
        },
        Command::Delete(id) => Message::Deleted(service.delete(id).await),
    }
}

/// Runs `command` and every follow-up it causes, one after the other.
pub async fn drive<S>(app: &mut App, service: &S, command: impl Into<Option<Command>>)
where
    S: ExpenseService + ?Sized,
{
    let mut next = command.into();
    while let Some(command) = next {
        let message = execute(service, command).await;
        next = app.update(message);
    }
}
