pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

pub fn format_amount(value: i64, currency: &str) -> String {
    if value < 0 {
        format!("-{currency}{}", group_thousands(value.saturating_abs()))
    } else {
        format!("{currency}{}", group_thousands(value))
    }
}

pub fn expense_count(count: usize) -> String {
    if count == 1 {
        "1 expense".to_string()
    } else {
        format!("{count} expenses")
    }
}
