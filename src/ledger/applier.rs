//! Validates requested movements and applies them to an [`Account`].
//!
//! Every entry point resolves the daily window for `now`, runs the rules
//! against that snapshot and only then mutates. A rejected request leaves the
//! account exactly as it was.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{
    account::Account,
    rules,
    transaction::{Receipt, TransactionKind, TransactionRecord, TransactionRequest},
};
use crate::errors::TransactionError;

pub fn deposit(
    account: &mut Account,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Receipt, TransactionError> {
    apply(account, TransactionRequest::deposit(amount), now)
}

pub fn withdraw(
    account: &mut Account,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Receipt, TransactionError> {
    apply(account, TransactionRequest::withdrawal(amount), now)
}

pub fn apply(
    account: &mut Account,
    request: TransactionRequest,
    now: DateTime<Utc>,
) -> Result<Receipt, TransactionError> {
    let usage = account.daily_usage(now);
    let checked = match request.kind {
        TransactionKind::Deposit => {
            rules::check_deposit(account.policy(), usage, account.balance(), request.amount)
        }
        TransactionKind::Withdrawal => rules::check_withdrawal(
            account.policy(),
            usage,
            account.balance(),
            request.amount,
        ),
    };
    if let Err(err) = checked {
        tracing::debug!(
            account = %account.display_number(),
            kind = %request.kind,
            amount = %request.amount,
            error = %err,
            "transaction rejected"
        );
        return Err(err);
    }

    if account.refresh_daily_window(now) {
        tracing::info!(account = %account.display_number(), "new day, daily limits restored");
    }
    let record = TransactionRecord::new(request.kind, request.amount, now);
    account.record(record.clone(), usage);

    tracing::info!(
        account = %account.display_number(),
        kind = %record.kind,
        amount = %record.amount,
        balance = %account.balance(),
        "transaction applied"
    );

    Ok(Receipt {
        record,
        balance: account.balance(),
        withdrawals_today: account.withdrawal_count_today(),
        transactions_today: account.transaction_count_today(),
    })
}
