use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the expense service. Never created client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub i64);

impl Display for ExpenseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "expense_id")]
    pub id: ExpenseId,
    #[serde(rename = "expense_name")]
    pub name: String,
    #[serde(rename = "expense_category")]
    pub category: Category,
    #[serde(rename = "expense_amount")]
    pub amount: i64,
    #[serde(rename = "expense_date")]
    pub date: NaiveDate,
}

impl Expense {
    pub fn draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            amount: self.amount,
            date: self.date,
        }
    }
}

impl Display for Expense {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} [{}] {} on {}",
            self.id, self.name, self.category, self.amount, self.date
        )
    }
}

/// The payload of create and update requests: a record without its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    #[serde(rename = "expense_name")]
    pub name: String,
    #[serde(rename = "expense_category")]
    pub category: Category,
    #[serde(rename = "expense_amount")]
    pub amount: i64,
    #[serde(rename = "expense_date")]
    pub date: NaiveDate,
}

impl ExpenseDraft {
    pub fn with_id(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            name: self.name,
            category: self.category,
            amount: self.amount,
            date: self.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Health,
    Other,
    /// Whatever the service returned outside of the known set.
    Unrecognized(String),
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Bills,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Other => "Other",
            Category::Unrecognized(value) => value,
        }
    }

    /// Looks up one of the selectable categories, ignoring case.
    pub fn known(value: &str) -> Option<Category> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }

    fn position(&self) -> Option<usize> {
        Self::ALL.iter().position(|category| category == self)
    }

    pub fn next(&self) -> Category {
        match self.position() {
            Some(index) => Self::ALL[(index + 1) % Self::ALL.len()].clone(),
            None => Self::ALL[0].clone(),
        }
    }

    pub fn previous(&self) -> Category {
        match self.position() {
            Some(0) | None => Self::ALL[Self::ALL.len() - 1].clone(),
            Some(index) => Self::ALL[index - 1].clone(),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Food" => Self::Food,
            "Transport" => Self::Transport,
            "Shopping" => Self::Shopping,
            "Entertainment" => Self::Entertainment,
            "Bills" => Self::Bills,
            "Health" => Self::Health,
            "Other" => Self::Other,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Unrecognized(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
