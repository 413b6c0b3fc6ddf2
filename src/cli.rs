use std::io::Write;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use inquire::{required, Confirm, CustomType, DateSelect, Select, Text};
use log::{debug, error};

use crate::api::ExpenseService;
use crate::app::{drive, execute, App, Command, NoticeKind};
use crate::errors::SpendviewError;
use crate::format::{expense_count, format_amount};
use crate::models::{Category, Expense, ExpenseDraft, ExpenseId};
use crate::parse::{parse_amount, parse_date};
use crate::summary::Summary;
use crate::tui::style::CategoryStyle;

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print every expense
    List,
    /// Print the expenses whose name or category matches QUERY
    Search { query: String },
    /// Print a single expense
    Show { id: i64 },
    /// Add an expense, asking for every field not given
    Add(DraftArgs),
    /// Change an expense; without any field flags every field is asked for
    Edit {
        id: i64,
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Delete an expense after confirmation
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct DraftArgs {
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long, value_parser = parse_category)]
    pub category: Option<Category>,
    #[arg(short, long, value_parser = parse_amount, allow_hyphen_values = true)]
    pub amount: Option<i64>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

impl DraftArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.amount.is_none() && self.date.is_none()
    }

    /// Fills whatever was not given from `base`. `None` if a field is still missing.
    fn merged(&self, base: Option<&ExpenseDraft>) -> Option<ExpenseDraft> {
        Some(ExpenseDraft {
            name: self.name.clone().or_else(|| base.map(|b| b.name.clone()))?,
            category: self
                .category
                .clone()
                .or_else(|| base.map(|b| b.category.clone()))?,
            amount: self.amount.or_else(|| base.map(|b| b.amount))?,
            date: self.date.or_else(|| base.map(|b| b.date))?,
        })
    }
}

pub fn parse_category(s: &str) -> Result<Category, SpendviewError> {
    Category::known(s).ok_or_else(|| {
        let options = Category::ALL.map(|category| category.to_string()).join(", ");
        SpendviewError::Parse(format!("unknown category {s:?}, expected one of {options}"))
    })
}

pub async fn run<S, W>(
    command: CliCommand,
    service: &S,
    currency: &str,
    out: &mut W,
) -> Result<(), SpendviewError>
where
    S: ExpenseService + ?Sized,
    W: Write,
{
    let mut app = App::new();
    match command {
        CliCommand::List => {
            let command = app.initialize();
            drive(&mut app, service, command).await;
            report(&app, out)?;
            print_records(out, app.records(), currency)?;
        }
        CliCommand::Search { query } => {
            let command = app.search(&query);
            drive(&mut app, service, command).await;
            report(&app, out)?;
            print_records(out, app.records(), currency)?;
        }
        CliCommand::Show { id } => {
            let record = service.get_one(ExpenseId(id)).await.map_err(|e| {
                error!("Error fetching expense {id}: {e:?}");
                e
            })?;
            writeln!(out, "{}", record_line(&record, currency))?;
        }
        CliCommand::Add(fields) => {
            let draft = match fields.merged(None) {
                Some(draft) => draft,
                None => prompt_draft(&fields, None, currency, out)?,
            };
            app.open_create_form();
            save(&mut app, service, &draft, out).await?;
        }
        CliCommand::Edit { id, fields } => {
            let record = service.get_one(ExpenseId(id)).await?;
            let base = record.draft();
            let draft = match fields.merged(Some(&base)) {
                Some(draft) if !fields.is_empty() => draft,
                _ => prompt_draft(&fields, Some(&base), currency, out)?,
            };
            app.open_edit_form(&record);
            save(&mut app, service, &draft, out).await?;
        }
        CliCommand::Delete { id, yes } => {
            app.remove(ExpenseId(id));
            let confirmed = yes
                || Confirm::new("Are you sure you want to delete this expense?")
                    .with_default(false)
                    .prompt()?;
            if !confirmed {
                app.cancel_remove();
                return Err(SpendviewError::Cancelled);
            }
            if let Some(command) = app.confirm_remove() {
                write_and_report(&mut app, service, command, out).await?;
            }
        }
    }
    Ok(())
}

async fn save<S, W>(
    app: &mut App,
    service: &S,
    draft: &ExpenseDraft,
    out: &mut W,
) -> Result<(), SpendviewError>
where
    S: ExpenseService + ?Sized,
    W: Write,
{
    if let Some(form) = app.form_mut() {
        form.fill(draft);
    }
    let Some(command) = app.submit_form() else {
        let message = app
            .form()
            .and_then(|form| form.error())
            .unwrap_or("Invalid expense")
            .to_string();
        return Err(SpendviewError::InvalidArgument(message));
    };
    write_and_report(app, service, command, out).await
}

/// Sends one write and reports its own outcome. The list reload that the
/// view would run next has nothing to show here and is skipped.
async fn write_and_report<S, W>(
    app: &mut App,
    service: &S,
    command: Command,
    out: &mut W,
) -> Result<(), SpendviewError>
where
    S: ExpenseService + ?Sized,
    W: Write,
{
    let message = execute(service, command).await;
    if let Some(reload) = app.update(message) {
        debug!("Skipping {reload:?} after the write");
    }
    report(app, out)
}

/// Prints a success notice; a failure notice becomes the error.
fn report<W: Write>(app: &App, out: &mut W) -> Result<(), SpendviewError> {
    match app.notice() {
        Some(notice) if notice.kind == NoticeKind::Failure => {
            Err(SpendviewError::Rejected(notice.text.clone()))
        }
        Some(notice) => {
            writeln!(out, "{}", notice.text)?;
            Ok(())
        }
        None => Ok(()),
    }
}

fn prompt_draft<W: Write>(
    fields: &DraftArgs,
    base: Option<&ExpenseDraft>,
    currency: &str,
    out: &mut W,
) -> Result<ExpenseDraft, SpendviewError> {
    let name = match &fields.name {
        Some(name) => name.clone(),
        None => {
            let mut prompt =
                Text::new("Expense name:").with_validator(required!("Expense name is required"));
            if let Some(base) = base {
                prompt = prompt.with_default(&base.name);
            }
            prompt.prompt()?
        }
    };

    let category = match &fields.category {
        Some(category) => category.clone(),
        None => {
            let start = base
                .and_then(|b| Category::ALL.iter().position(|c| *c == b.category))
                .unwrap_or_default();
            Select::new("Category:", Category::ALL.to_vec())
                .with_starting_cursor(start)
                .prompt()?
        }
    };

    let amount = match fields.amount {
        Some(amount) => amount,
        None => {
            let formatter = |amount: i64| format_amount(amount, currency);
            let mut prompt = CustomType::<i64>::new("Amount:")
                .with_formatter(&formatter)
                .with_error_message("Amount must be a whole number")
                .with_help_message("Whole currency units, no decimals");
            if let Some(base) = base {
                prompt = prompt.with_default(base.amount);
            }
            prompt.prompt()?
        }
    };

    let date = match fields.date {
        Some(date) => date,
        None => {
            let mut prompt = DateSelect::new("Date:");
            if let Some(base) = base {
                prompt = prompt.with_default(base.date);
            }
            prompt.prompt()?
        }
    };

    let draft = ExpenseDraft {
        name,
        category,
        amount,
        date,
    };
    writeln!(
        out,
        "{} [{}] {} on {}",
        draft.name,
        draft.category,
        format_amount(draft.amount, currency),
        draft.date
    )?;
    out.flush()?;
    if Confirm::new("Save this expense?").with_default(true).prompt()? {
        Ok(draft)
    } else {
        Err(SpendviewError::Cancelled)
    }
}

pub fn record_line(record: &Expense, currency: &str) -> String {
    let style = CategoryStyle::for_category(&record.category);
    format!(
        "#{:<5} {} {:<24} {:<16} {:>12}  {}",
        record.id.to_string(),
        style.icon,
        record.name,
        format!("[{}]", record.category),
        format_amount(record.amount, currency),
        record.date
    )
}

pub fn print_records<W: Write>(
    out: &mut W,
    records: &[Expense],
    currency: &str,
) -> Result<(), SpendviewError> {
    let Some(summary) = Summary::of(records) else {
        writeln!(out, "No expenses yet")?;
        return Ok(());
    };
    for record in records {
        writeln!(out, "{}", record_line(record, currency))?;
    }
    writeln!(
        out,
        "Total Expenses: {} ({})",
        format_amount(summary.total, currency),
        expense_count(summary.count)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::api::memory::MemoryService;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: CliCommand,
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> MemoryService {
        MemoryService::with_records(&[
            ExpenseDraft {
                name: "Groceries".to_string(),
                category: Category::Food,
                amount: 1_200,
                date: date(2024, 1, 3),
            },
            ExpenseDraft {
                name: "Train pass".to_string(),
                category: Category::Transport,
                amount: 800,
                date: date(2024, 1, 4),
            },
        ])
    }

    async fn run_to_string(
        command: CliCommand,
        service: &MemoryService,
    ) -> Result<String, SpendviewError> {
        let mut out = Vec::new();
        run(command, service, "₹", &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn add_flags_parse() {
        let cli = TestCli::try_parse_from([
            "spendview", "add", "--name", "Coffee", "-c", "food", "-a", "150", "--date",
            "2024-01-05",
        ])
        .unwrap();
        match cli.command {
            CliCommand::Add(fields) => {
                assert_eq!(
                    fields.merged(None),
                    Some(ExpenseDraft {
                        name: "Coffee".to_string(),
                        category: Category::Food,
                        amount: 150,
                        date: date(2024, 1, 5),
                    })
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert!(TestCli::try_parse_from(["spendview", "add", "-a", "1.5"]).is_err());
        assert!(TestCli::try_parse_from(["spendview", "add", "-c", "Pets"]).is_err());
        assert!(TestCli::try_parse_from(["spendview", "add", "--date", "05/01/2024"]).is_err());
    }

    #[test]
    fn merged_fills_gaps_from_the_base() {
        let base = ExpenseDraft {
            name: "Taxi".to_string(),
            category: Category::Transport,
            amount: 300,
            date: date(2024, 2, 2),
        };
        let fields = DraftArgs {
            amount: Some(350),
            ..Default::default()
        };
        assert!(!fields.is_empty());
        assert_eq!(fields.merged(None), None);
        let merged = fields.merged(Some(&base)).unwrap();
        assert_eq!(merged.amount, 350);
        assert_eq!(merged.name, "Taxi");
    }

    #[tokio::test]
    async fn list_prints_records_and_total() {
        let service = seeded();
        let text = run_to_string(CliCommand::List, &service).await.unwrap();
        assert!(text.contains("Groceries"));
        assert!(text.contains("[Transport]"));
        assert!(text.contains("Total Expenses: ₹2,000 (2 expenses)"));
    }

    #[tokio::test]
    async fn empty_list_prints_placeholder() {
        let service = MemoryService::default();
        let text = run_to_string(CliCommand::List, &service).await.unwrap();
        assert_eq!(text.trim(), "No expenses yet");
    }

    #[tokio::test]
    async fn search_filters() {
        let service = seeded();
        let text = run_to_string(
            CliCommand::Search {
                query: "train".to_string(),
            },
            &service,
        )
        .await
        .unwrap();
        assert!(text.contains("Train pass"));
        assert!(!text.contains("Groceries"));
        assert!(text.contains("1 expense"));
    }

    #[tokio::test]
    async fn add_with_every_flag_does_not_prompt() {
        let service = MemoryService::default();
        let fields = DraftArgs {
            name: Some("Coffee".to_string()),
            category: Some(Category::Food),
            amount: Some(150),
            date: Some(date(2024, 1, 5)),
        };
        let text = run_to_string(CliCommand::Add(fields), &service)
            .await
            .unwrap();
        assert!(text.contains("Expense added successfully!"));
        assert_eq!(service.records().len(), 1);
        assert_eq!(service.records()[0].name, "Coffee");
    }

    #[tokio::test]
    async fn add_succeeds_even_if_the_reload_fails() {
        let service = MemoryService::default();
        service.set_listing_fails(true);
        let fields = DraftArgs {
            name: Some("Coffee".to_string()),
            category: Some(Category::Food),
            amount: Some(150),
            date: Some(date(2024, 1, 5)),
        };
        let text = run_to_string(CliCommand::Add(fields), &service)
            .await
            .unwrap();
        assert_eq!(text.trim(), "Expense added successfully!");
        assert_eq!(service.records().len(), 1);
    }

    #[tokio::test]
    async fn delete_succeeds_even_if_the_reload_fails() {
        let service = seeded();
        service.set_listing_fails(true);
        let text = run_to_string(CliCommand::Delete { id: 2, yes: true }, &service)
            .await
            .unwrap();
        assert!(text.contains("Expense deleted successfully"));
        assert_eq!(service.records().len(), 1);
    }

    #[tokio::test]
    async fn blank_name_is_refused_before_any_request() {
        let service = MemoryService::default();
        let fields = DraftArgs {
            name: Some("   ".to_string()),
            category: Some(Category::Food),
            amount: Some(150),
            date: Some(date(2024, 1, 5)),
        };
        let err = run_to_string(CliCommand::Add(fields), &service)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Expense name is required");
        assert!(service.records().is_empty());
    }

    #[tokio::test]
    async fn edit_changes_only_the_given_fields() {
        let service = seeded();
        let fields = DraftArgs {
            amount: Some(950),
            ..Default::default()
        };
        let text = run_to_string(CliCommand::Edit { id: 2, fields }, &service)
            .await
            .unwrap();
        assert!(text.contains("Expense updated successfully!"));
        let record = &service.records()[1];
        assert_eq!(record.amount, 950);
        assert_eq!(record.name, "Train pass");
        assert_eq!(record.date, date(2024, 1, 4));
    }

    #[tokio::test]
    async fn delete_with_yes() {
        let service = seeded();
        let text = run_to_string(CliCommand::Delete { id: 1, yes: true }, &service)
            .await
            .unwrap();
        assert!(text.contains("Expense deleted successfully"));
        assert_eq!(service.records().len(), 1);
    }

    #[tokio::test]
    async fn deleting_an_unknown_id_fails() {
        let service = seeded();
        let err = run_to_string(CliCommand::Delete { id: 99, yes: true }, &service)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to delete expense: Expense not found"
        );
        assert_eq!(service.records().len(), 2);
    }

    #[tokio::test]
    async fn offline_service_is_an_error() {
        let service = seeded();
        service.set_offline(true);
        let err = run_to_string(CliCommand::List, &service).await.unwrap_err();
        assert!(matches!(err, SpendviewError::Rejected(_)));
        assert!(err.to_string().starts_with("Failed to load expenses"));
    }

    #[tokio::test]
    async fn show_unknown_id() {
        let service = seeded();
        let err = run_to_string(CliCommand::Show { id: 42 }, &service)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Expense not found");
    }

    #[test]
    fn record_line_contents() {
        let record = Expense {
            id: ExpenseId(7),
            name: "Rent".to_string(),
            category: Category::Bills,
            amount: 12_000,
            date: date(2024, 3, 1),
        };
        let line = record_line(&record, "₹");
        assert!(line.starts_with("#7 "));
        assert!(line.contains("Rent"));
        assert!(line.contains("[Bills]"));
        assert!(line.contains("₹12,000"));
        assert!(line.ends_with("2024-03-01"));
    }
}
