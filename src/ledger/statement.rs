use std::fmt;

use rust_decimal::Decimal;

use super::account::Account;
use crate::currency::CurrencyFormat;

pub const NO_MOVEMENTS: &str = "No movements recorded.";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read-only rendering of an account's history and balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub title: String,
    /// Movement lines followed by the balance line.
    pub lines: Vec<String>,
    pub balance: Decimal,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

pub fn generate_statement(account: &Account, format: &CurrencyFormat) -> Statement {
    let timezone = account.policy().timezone;
    let mut lines: Vec<String> = account
        .history()
        .iter()
        .map(|record| {
            format!(
                "{} - {}: {}",
                record.timestamp.with_timezone(&timezone).format(TIMESTAMP_FORMAT),
                record.kind,
                format.format_amount(record.amount)
            )
        })
        .collect();
    if lines.is_empty() {
        lines.push(NO_MOVEMENTS.to_string());
    }
    lines.push(format!("Balance: {}", format.format_amount(account.balance())));

    Statement {
        title: format!("STATEMENT - Account {}", account.display_number()),
        lines,
        balance: account.balance(),
    }
}
