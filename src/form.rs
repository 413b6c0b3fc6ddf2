use chrono::NaiveDate;

use crate::app::Command;
use crate::models::{Category, Expense, ExpenseDraft, ExpenseId};
use crate::parse::{parse_amount, parse_date, DATE_FORMAT};

/// Single line text input with a cursor counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    value: String,
    cursor_position: usize,
}

impl LineEditor {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            cursor_position: value.chars().count(),
            value,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn set(&mut self, value: impl Into<String>) {
        *self = Self::new(value);
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let before = self.value.chars().take(self.cursor_position);
        let after = self.value.chars().skip(self.cursor_position);
        self.value = before.chain(std::iter::once(c)).chain(after).collect();
        self.cursor_position += 1;
    }

    pub fn delete_left(&mut self) {
        if self.cursor_position > 0 {
            let before = self.value.chars().take(self.cursor_position - 1);
            let after = self.value.chars().skip(self.cursor_position);
            self.value = before.chain(after).collect();
            self.cursor_position -= 1;
        }
    }

    pub fn delete_right(&mut self) {
        if self.cursor_position < self.len() {
            let before = self.value.chars().take(self.cursor_position);
            let after = self.value.chars().skip(self.cursor_position + 1);
            self.value = before.chain(after).collect();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor_position < self.len() {
            self.cursor_position += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor_position = self.len();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Category,
    Amount,
    Date,
}

impl Field {
    pub const ORDER: [Field; 4] = [Field::Name, Field::Category, Field::Amount, Field::Date];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Expense Name",
            Field::Category => "Category",
            Field::Amount => "Amount",
            Field::Date => "Date",
        }
    }

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|&field| field == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Field {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Field {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// The create/update form. Holds its own draft, separate from the list.
#[derive(Debug, Clone)]
pub struct ExpenseForm {
    editing: Option<ExpenseId>,
    name: LineEditor,
    category: Option<Category>,
    amount: LineEditor,
    date: LineEditor,
    focus: Field,
    error: Option<String>,
    saving: bool,
}

impl ExpenseForm {
    pub fn create(today: NaiveDate) -> Self {
        Self {
            editing: None,
            name: LineEditor::default(),
            category: None,
            amount: LineEditor::default(),
            date: LineEditor::new(today.format(DATE_FORMAT).to_string()),
            focus: Field::Name,
            error: None,
            saving: false,
        }
    }

    pub fn edit(expense: &Expense) -> Self {
        let mut form = Self::create(expense.date);
        form.editing = Some(expense.id);
        form.fill(&expense.draft());
        form
    }

    /// Overwrites every field with `draft`.
    pub fn fill(&mut self, draft: &ExpenseDraft) {
        self.name.set(draft.name.clone());
        self.category = Some(draft.category.clone());
        self.amount.set(draft.amount.to_string());
        self.date.set(draft.date.format(DATE_FORMAT).to_string());
        self.error = None;
    }

    pub fn editing(&self) -> Option<ExpenseId> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Expense"
        } else {
            "Add Expense"
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn name(&self) -> &LineEditor {
        &self.name
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn amount(&self) -> &LineEditor {
        &self.amount
    }

    pub fn date(&self) -> &LineEditor {
        &self.date
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The text input under focus; the category field has none.
    pub fn focused_editor(&mut self) -> Option<&mut LineEditor> {
        match self.focus {
            Field::Name => Some(&mut self.name),
            Field::Amount => Some(&mut self.amount),
            Field::Date => Some(&mut self.date),
            Field::Category => None,
        }
    }

    /// Applies `edit` to the focused input and refreshes the amount check so
    /// that a non-numeric amount is flagged while it is being typed.
    pub fn edit_focused(&mut self, edit: impl FnOnce(&mut LineEditor)) {
        if self.saving {
            return;
        }
        if let Some(editor) = self.focused_editor() {
            edit(editor);
        }
        self.error = match self.focus {
            Field::Amount if !self.amount.value().trim().is_empty() => {
                parse_amount(self.amount.value()).err().map(|e| e.to_string())
            }
            _ => None,
        };
    }

    pub fn cycle_category(&mut self, forward: bool) {
        if self.saving {
            return;
        }
        self.category = Some(match (&self.category, forward) {
            (None, true) => Category::ALL[0].clone(),
            (None, false) => Category::ALL[Category::ALL.len() - 1].clone(),
            (Some(category), true) => category.next(),
            (Some(category), false) => category.previous(),
        });
        self.error = None;
    }

    pub fn validate(&self) -> Result<ExpenseDraft, String> {
        let name = self.name.value().trim();
        if name.is_empty() {
            return Err("Expense name is required".to_string());
        }
        let category = match &self.category {
            Some(category) => category.clone(),
            None => return Err("Select a category".to_string()),
        };
        let amount = parse_amount(self.amount.value()).map_err(|e| e.to_string())?;
        let date = parse_date(self.date.value()).map_err(|e| e.to_string())?;
        Ok(ExpenseDraft {
            name: name.to_string(),
            category,
            amount,
            date,
        })
    }

    /// Turns the draft into an update (when editing) or create command.
    ///
    /// Invalid drafts keep the form open with a message instead.
    pub fn submit(&mut self) -> Option<Command> {
        if self.saving {
            return None;
        }
        match self.validate() {
            Ok(draft) => {
                self.error = None;
                self.saving = true;
                Some(match self.editing {
                    Some(id) => Command::Update(id, draft),
                    None => Command::Create(draft),
                })
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    pub fn saving_failed(&mut self) {
        self.saving = false;
    }
}
