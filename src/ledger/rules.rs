//! Validation rules shared by deposits and withdrawals.

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::TransactionError;

pub const DEFAULT_WITHDRAWAL_LIMIT_CENTS: i64 = 500_00;
pub const DEFAULT_MAX_WITHDRAWALS_PER_DAY: u32 = 3;
pub const DEFAULT_MAX_TRANSACTIONS_PER_DAY: u32 = 10;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

/// Ceilings and calendar settings that govern a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountPolicy {
    pub withdrawal_limit_per_operation: Decimal,
    pub max_withdrawals_per_day: u32,
    pub max_transactions_per_day: u32,
    /// Zone whose calendar decides when the daily counters roll over.
    pub timezone: Tz,
    pub validation_order: ValidationOrder,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            withdrawal_limit_per_operation: Decimal::new(DEFAULT_WITHDRAWAL_LIMIT_CENTS, 2),
            max_withdrawals_per_day: DEFAULT_MAX_WITHDRAWALS_PER_DAY,
            max_transactions_per_day: DEFAULT_MAX_TRANSACTIONS_PER_DAY,
            timezone: DEFAULT_TIMEZONE,
            validation_order: ValidationOrder::default(),
        }
    }
}

/// Order in which withdrawal checks run. The first failing check is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOrder {
    /// Funds, per-operation cap, daily withdrawals, positive amount, daily transactions.
    #[default]
    BalanceFirst,
    /// Positive amount first, then the `BalanceFirst` sequence.
    AmountFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalCheck {
    SufficientFunds,
    PerOperationLimit,
    DailyWithdrawals,
    PositiveAmount,
    DailyTransactions,
}

impl ValidationOrder {
    pub fn withdrawal_checks(self) -> &'static [WithdrawalCheck] {
        use WithdrawalCheck::*;
        match self {
            ValidationOrder::BalanceFirst => &[
                SufficientFunds,
                PerOperationLimit,
                DailyWithdrawals,
                PositiveAmount,
                DailyTransactions,
            ],
            ValidationOrder::AmountFirst => &[
                PositiveAmount,
                SufficientFunds,
                PerOperationLimit,
                DailyWithdrawals,
                DailyTransactions,
            ],
        }
    }
}

/// Counters as they stand for the current local day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyUsage {
    pub withdrawals: u32,
    pub transactions: u32,
}

impl WithdrawalCheck {
    fn evaluate(
        self,
        policy: &AccountPolicy,
        usage: DailyUsage,
        balance: Decimal,
        amount: Decimal,
    ) -> Result<(), TransactionError> {
        match self {
            WithdrawalCheck::SufficientFunds if amount > balance => {
                Err(TransactionError::InsufficientFunds {
                    requested: amount,
                    available: balance,
                })
            }
            WithdrawalCheck::PerOperationLimit if amount > policy.withdrawal_limit_per_operation => {
                Err(TransactionError::WithdrawalLimitExceeded {
                    requested: amount,
                    limit: policy.withdrawal_limit_per_operation,
                })
            }
            WithdrawalCheck::DailyWithdrawals
                if usage.withdrawals >= policy.max_withdrawals_per_day =>
            {
                Err(TransactionError::DailyWithdrawalLimitExceeded {
                    limit: policy.max_withdrawals_per_day,
                })
            }
            WithdrawalCheck::PositiveAmount => ensure_positive(amount),
            WithdrawalCheck::DailyTransactions => ensure_transaction_capacity(policy, usage),
            _ => Ok(()),
        }
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), TransactionError> {
    if amount <= Decimal::ZERO {
        return Err(TransactionError::InvalidAmount { amount });
    }
    Ok(())
}

fn ensure_transaction_capacity(
    policy: &AccountPolicy,
    usage: DailyUsage,
) -> Result<(), TransactionError> {
    if usage.transactions >= policy.max_transactions_per_day {
        return Err(TransactionError::DailyTransactionLimitExceeded {
            limit: policy.max_transactions_per_day,
        });
    }
    Ok(())
}

pub fn check_deposit(
    policy: &AccountPolicy,
    usage: DailyUsage,
    balance: Decimal,
    amount: Decimal,
) -> Result<(), TransactionError> {
    ensure_positive(amount)?;
    ensure_transaction_capacity(policy, usage)?;
    if balance.checked_add(amount).is_none() {
        return Err(TransactionError::BalanceOverflow { amount, balance });
    }
    Ok(())
}

pub fn check_withdrawal(
    policy: &AccountPolicy,
    usage: DailyUsage,
    balance: Decimal,
    amount: Decimal,
) -> Result<(), TransactionError> {
    policy
        .validation_order
        .withdrawal_checks()
        .iter()
        .try_for_each(|check| check.evaluate(policy, usage, balance, amount))
}
