use crate::models::Expense;

/// The banner shown above a non-empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: i64,
    pub count: usize,
}

impl Summary {
    /// `None` for an empty list: there is no total to show, only the placeholder.
    pub fn of(records: &[Expense]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let total = records
            .iter()
            .fold(0i64, |total, record| total.saturating_add(record.amount));
        Some(Self {
            total,
            count: records.len(),
        })
    }
}
