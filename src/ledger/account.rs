use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    daily::{self, ResetCountdown},
    rules::{AccountPolicy, DailyUsage},
    transaction::{TransactionKind, TransactionRecord},
};

pub const DEFAULT_AGENCY: &str = "0001";

/// Ledger state for a single account.
///
/// Fields are private: balance, history and counters only change through
/// [`crate::ledger::applier`], which validates first and mutates second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub agency: String,
    pub number: u32,
    balance: Decimal,
    history: Vec<TransactionRecord>,
    withdrawal_count_today: u32,
    transaction_count_today: u32,
    last_transaction_at: Option<DateTime<Utc>>,
    policy: AccountPolicy,
}

impl Account {
    /// Creates a new account with a zero balance and zeroed counters.
    pub fn new(number: u32, policy: AccountPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            agency: DEFAULT_AGENCY.to_string(),
            number,
            balance: Decimal::ZERO,
            history: Vec::new(),
            withdrawal_count_today: 0,
            transaction_count_today: 0,
            last_transaction_at: None,
            policy,
        }
    }

    pub fn with_agency(mut self, agency: impl Into<String>) -> Self {
        self.agency = agency.into();
        self
    }

    /// Starts the account with funds that predate this session. Not a movement.
    pub fn with_opening_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Stored count from the last recorded day. After a rollover it stays stale
    /// until the next successful operation; use [`Account::daily_usage`] for the
    /// count that applies now.
    pub fn withdrawal_count_today(&self) -> u32 {
        self.withdrawal_count_today
    }

    /// Stored count, see [`Account::withdrawal_count_today`].
    pub fn transaction_count_today(&self) -> u32 {
        self.transaction_count_today
    }

    pub fn last_transaction_at(&self) -> Option<DateTime<Utc>> {
        self.last_transaction_at
    }

    pub fn policy(&self) -> &AccountPolicy {
        &self.policy
    }

    pub fn display_number(&self) -> String {
        format!("{}/{}", self.agency, self.number)
    }

    pub fn has_rolled_over(&self, now: DateTime<Utc>) -> bool {
        daily::has_rolled_over(self.last_transaction_at, now, self.policy.timezone)
    }

    /// Counters that apply at `now`, with any pending rollover taken into account.
    pub fn daily_usage(&self, now: DateTime<Utc>) -> DailyUsage {
        if self.has_rolled_over(now) {
            DailyUsage::default()
        } else {
            DailyUsage {
                withdrawals: self.withdrawal_count_today,
                transactions: self.transaction_count_today,
            }
        }
    }

    /// Resets the counters if the local day has changed. Returns whether it did.
    pub fn refresh_daily_window(&mut self, now: DateTime<Utc>) -> bool {
        if !self.has_rolled_over(now) {
            return false;
        }
        if self.withdrawal_count_today == 0 && self.transaction_count_today == 0 {
            return false;
        }
        tracing::debug!(
            account = %self.display_number(),
            withdrawals = self.withdrawal_count_today,
            transactions = self.transaction_count_today,
            "daily counters reset"
        );
        self.withdrawal_count_today = 0;
        self.transaction_count_today = 0;
        true
    }

    pub fn time_until_reset(&self, now: DateTime<Utc>) -> Option<ResetCountdown> {
        daily::time_until_reset(self.last_transaction_at, now, self.policy.timezone)
    }

    /// Appends a validated movement. Callers must have run the rules first.
    pub(crate) fn record(&mut self, record: TransactionRecord, usage: DailyUsage) {
        match record.kind {
            TransactionKind::Deposit => {
                self.balance += record.amount;
                self.withdrawal_count_today = usage.withdrawals;
            }
            TransactionKind::Withdrawal => {
                self.balance -= record.amount;
                self.withdrawal_count_today = usage.withdrawals + 1;
            }
        }
        self.transaction_count_today = usage.transactions + 1;
        self.last_transaction_at = Some(record.timestamp);
        self.history.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn new_account_starts_empty() {
        let account = Account::new(1, AccountPolicy::default());
        assert_eq!(account.balance(), Decimal::ZERO);
        assert!(account.history().is_empty());
        assert_eq!(account.withdrawal_count_today(), 0);
        assert_eq!(account.transaction_count_today(), 0);
        assert!(account.last_transaction_at().is_none());
        assert_eq!(account.display_number(), "0001/1");
    }

    #[test]
    fn record_carries_counters_forward_from_usage() {
        let mut account = Account::new(7, AccountPolicy::default()).with_opening_balance(dec!(50));
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap();
        let usage = DailyUsage {
            withdrawals: 2,
            transactions: 4,
        };
        account.record(
            TransactionRecord::new(TransactionKind::Withdrawal, dec!(20), at),
            usage,
        );
        assert_eq!(account.balance(), dec!(30));
        assert_eq!(account.withdrawal_count_today(), 3);
        assert_eq!(account.transaction_count_today(), 5);
        assert_eq!(account.last_transaction_at(), Some(at));
    }
}
