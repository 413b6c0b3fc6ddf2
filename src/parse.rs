use chrono::NaiveDate;
use nom::character::complete::{i64 as i64_parser, space0};
use nom::sequence::delimited;
use nom::IResult;

use crate::errors::SpendviewError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn amount_parser(input: &str) -> IResult<&str, i64> {
    delimited(space0, i64_parser, space0)(input)
}

/// Amounts are whole currency units; anything else is rejected with a message
/// meant for the person typing it.
pub fn parse_amount(s: &str) -> Result<i64, SpendviewError> {
    if s.trim().is_empty() {
        return Err(SpendviewError::Parse("Amount is required".to_string()));
    }
    match amount_parser(s) {
        Ok(("", value)) => Ok(value),
        Ok((_, _)) | Err(_) => Err(SpendviewError::Parse(
            "Amount must be a whole number".to_string(),
        )),
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, SpendviewError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SpendviewError::Parse("Date is required".to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| SpendviewError::Parse(format!("Date must be YYYY-MM-DD, got {s}")))
}
