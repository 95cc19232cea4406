use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons the applier refuses a deposit or withdrawal.
///
/// Every variant is recoverable: the account is left untouched and the caller
/// reports the message and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("The amount must be positive (got {amount}).")]
    InvalidAmount { amount: Decimal },
    #[error("Insufficient funds: requested {requested}, available {available}.")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Withdrawal of {requested} exceeds the per-operation limit of {limit}.")]
    WithdrawalLimitExceeded { requested: Decimal, limit: Decimal },
    #[error("Daily withdrawal limit reached ({limit} per day).")]
    DailyWithdrawalLimitExceeded { limit: u32 },
    #[error("Daily transaction limit reached ({limit} per day).")]
    DailyTransactionLimitExceeded { limit: u32 },
    #[error("Deposit of {amount} would overflow the balance of {balance}.")]
    BalanceOverflow { amount: Decimal, balance: Decimal },
}

impl TransactionError {
    /// True for the errors that clear on their own at the next local midnight.
    pub fn is_daily_limit(&self) -> bool {
        matches!(
            self,
            TransactionError::DailyWithdrawalLimitExceeded { .. }
                | TransactionError::DailyTransactionLimitExceeded { .. }
        )
    }
}

/// Error type that captures configuration and I/O failures around the ledger.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
