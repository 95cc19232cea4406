mod common;

use bank_core::{
    errors::TransactionError,
    ledger::{self, Account, AccountPolicy, TransactionKind, ValidationOrder},
};
use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{account, friday_morning, funded_account};

fn assert_untouched(before: &Account, after: &Account) {
    assert_eq!(before.balance(), after.balance());
    assert_eq!(before.history(), after.history());
    assert_eq!(before.withdrawal_count_today(), after.withdrawal_count_today());
    assert_eq!(before.transaction_count_today(), after.transaction_count_today());
    assert_eq!(before.last_transaction_at(), after.last_transaction_at());
}

#[test]
fn non_positive_deposits_are_rejected_without_side_effects() {
    let mut account = funded_account(dec!(100));
    ledger::deposit(&mut account, dec!(10), friday_morning()).unwrap();
    for amount in [Decimal::ZERO, dec!(-0.01), dec!(-250)] {
        let before = account.clone();
        let err = ledger::deposit(&mut account, amount, friday_morning()).unwrap_err();
        assert_eq!(err, TransactionError::InvalidAmount { amount });
        assert_untouched(&before, &account);
    }
}

#[test]
fn non_positive_withdrawals_are_rejected_without_side_effects() {
    let mut account = funded_account(dec!(100));
    for amount in [Decimal::ZERO, dec!(-0.01), dec!(-250)] {
        let before = account.clone();
        let err = ledger::withdraw(&mut account, amount, friday_morning()).unwrap_err();
        assert_eq!(err, TransactionError::InvalidAmount { amount });
        assert_untouched(&before, &account);
    }
}

#[test]
fn deposit_adds_to_balance_and_appends_one_record() {
    let mut account = account();
    for (step, amount) in [dec!(100.00), dec!(0.01), dec!(2500.75)].into_iter().enumerate() {
        let before = account.balance();
        let receipt = ledger::deposit(&mut account, amount, friday_morning()).unwrap();
        assert_eq!(account.balance(), before + amount);
        assert_eq!(receipt.balance, account.balance());
        assert_eq!(account.history().len(), step + 1);
        let last = account.history().last().unwrap();
        assert_eq!(last.kind, TransactionKind::Deposit);
        assert_eq!(last.amount, amount);
        assert_eq!(account.withdrawal_count_today(), 0);
    }
}

#[test]
fn withdrawal_subtracts_and_bumps_both_counters() {
    let mut account = funded_account(dec!(1000));
    let receipt = ledger::withdraw(&mut account, dec!(250.50), friday_morning()).unwrap();
    assert_eq!(account.balance(), dec!(749.50));
    assert_eq!(receipt.kind(), TransactionKind::Withdrawal);
    assert_eq!(account.withdrawal_count_today(), 1);
    assert_eq!(account.transaction_count_today(), 1);
    assert_eq!(account.last_transaction_at(), Some(friday_morning()));
}

#[test]
fn insufficient_funds_wins_over_every_other_check() {
    let mut account = funded_account(dec!(100));
    for _ in 0..3 {
        ledger::withdraw(&mut account, dec!(1), friday_morning()).unwrap();
    }
    // Over balance, over the per-operation cap, and no withdrawals left today.
    let err = ledger::withdraw(&mut account, dec!(900), friday_morning()).unwrap_err();
    assert_eq!(
        err,
        TransactionError::InsufficientFunds {
            requested: dec!(900),
            available: dec!(97),
        }
    );
}

#[test]
fn withdrawing_the_exact_balance_empties_the_account() {
    let mut account = funded_account(dec!(320.10));
    ledger::withdraw(&mut account, dec!(320.10), friday_morning()).unwrap();
    assert_eq!(account.balance(), Decimal::ZERO);
    let err = ledger::withdraw(&mut account, dec!(0.01), friday_morning()).unwrap_err();
    assert!(matches!(err, TransactionError::InsufficientFunds { .. }));
}

#[test]
fn per_operation_limit_is_inclusive() {
    let mut account = funded_account(dec!(2000));
    assert!(ledger::withdraw(&mut account, dec!(500.00), friday_morning()).is_ok());
    let err = ledger::withdraw(&mut account, dec!(500.01), friday_morning()).unwrap_err();
    assert_eq!(
        err,
        TransactionError::WithdrawalLimitExceeded {
            requested: dec!(500.01),
            limit: dec!(500.00),
        }
    );
}

#[test]
fn fourth_withdrawal_of_the_day_is_refused() {
    let mut account = funded_account(dec!(1000));
    for _ in 0..3 {
        ledger::withdraw(&mut account, dec!(50), friday_morning()).unwrap();
    }
    let before = account.clone();
    let err = ledger::withdraw(&mut account, dec!(50), friday_morning()).unwrap_err();
    assert_eq!(err, TransactionError::DailyWithdrawalLimitExceeded { limit: 3 });
    assert_untouched(&before, &account);
    // Deposits are still allowed.
    assert!(ledger::deposit(&mut account, dec!(5), friday_morning()).is_ok());
}

#[test]
fn eleventh_operation_of_the_day_is_refused_for_any_kind() {
    let mut account = funded_account(dec!(1000));
    for _ in 0..3 {
        ledger::withdraw(&mut account, dec!(10), friday_morning()).unwrap();
    }
    for _ in 0..7 {
        ledger::deposit(&mut account, dec!(10), friday_morning()).unwrap();
    }
    assert_eq!(account.transaction_count_today(), 10);

    let err = ledger::deposit(&mut account, dec!(10), friday_morning()).unwrap_err();
    assert_eq!(err, TransactionError::DailyTransactionLimitExceeded { limit: 10 });

    let policy = AccountPolicy {
        max_withdrawals_per_day: 10,
        ..AccountPolicy::default()
    };
    let mut roomy = Account::new(2, policy).with_opening_balance(dec!(1000));
    for _ in 0..10 {
        ledger::withdraw(&mut roomy, dec!(1), friday_morning()).unwrap();
    }
    let err = ledger::withdraw(&mut roomy, dec!(1), friday_morning()).unwrap_err();
    // Daily withdrawals are checked before daily transactions.
    assert_eq!(err, TransactionError::DailyWithdrawalLimitExceeded { limit: 10 });
}

#[test]
fn daily_transactions_ceiling_applies_once_withdrawals_have_room() {
    let policy = AccountPolicy {
        max_withdrawals_per_day: 5,
        max_transactions_per_day: 4,
        ..AccountPolicy::default()
    };
    let mut account = Account::new(3, policy).with_opening_balance(dec!(100));
    for _ in 0..4 {
        ledger::deposit(&mut account, dec!(1), friday_morning()).unwrap();
    }
    let err = ledger::withdraw(&mut account, dec!(1), friday_morning()).unwrap_err();
    assert_eq!(err, TransactionError::DailyTransactionLimitExceeded { limit: 4 });
}

#[test]
fn counters_never_exceed_their_ceilings() {
    let mut account = funded_account(dec!(10000));
    let mut now = friday_morning();
    for step in 0..40 {
        let _ = if step % 2 == 0 {
            ledger::withdraw(&mut account, dec!(20), now)
        } else {
            ledger::deposit(&mut account, dec!(15), now)
        };
        assert!(account.withdrawal_count_today() <= 3);
        assert!(account.transaction_count_today() <= 10);
        assert!(account.balance() >= Decimal::ZERO);
        now += Duration::minutes(20);
    }
}

#[test]
fn over_balance_then_over_cap_after_a_withdrawal() {
    let mut account = funded_account(dec!(1000.00));

    ledger::withdraw(&mut account, dec!(200.00), friday_morning()).unwrap();
    assert_eq!(account.balance(), dec!(800.00));
    assert_eq!(account.withdrawal_count_today(), 1);

    let err = ledger::withdraw(&mut account, dec!(1500.00), friday_morning()).unwrap_err();
    assert!(matches!(err, TransactionError::InsufficientFunds { .. }));

    let err = ledger::withdraw(&mut account, dec!(600.00), friday_morning()).unwrap_err();
    assert!(matches!(err, TransactionError::WithdrawalLimitExceeded { .. }));

    assert_eq!(account.balance(), dec!(800.00));
    assert_eq!(account.history().len(), 1);
}

#[test]
fn amount_first_order_reports_invalid_amount_even_when_broke() {
    let policy = AccountPolicy {
        validation_order: ValidationOrder::AmountFirst,
        ..AccountPolicy::default()
    };
    let mut strict = Account::new(4, policy);
    let err = ledger::withdraw(&mut strict, dec!(-1), friday_morning()).unwrap_err();
    assert_eq!(err, TransactionError::InvalidAmount { amount: dec!(-1) });

    let mut default_order = account();
    let err = ledger::withdraw(&mut default_order, dec!(-1), friday_morning()).unwrap_err();
    // -1 is not above a zero balance, nor above the cap, so the positivity check fires.
    assert_eq!(err, TransactionError::InvalidAmount { amount: dec!(-1) });
}

#[test]
fn deposit_that_would_overflow_the_balance_is_refused() {
    let mut account = account();
    ledger::deposit(&mut account, Decimal::MAX, friday_morning()).unwrap();
    let before = account.clone();

    let err = ledger::deposit(&mut account, Decimal::ONE, friday_morning()).unwrap_err();
    assert_eq!(
        err,
        TransactionError::BalanceOverflow {
            amount: Decimal::ONE,
            balance: Decimal::MAX,
        }
    );
    assert_untouched(&before, &account);

    // A rejected overflow on a new day leaves the stored counters alone too.
    let tomorrow = friday_morning() + Duration::days(1);
    assert!(ledger::deposit(&mut account, Decimal::ONE, tomorrow).is_err());
    assert_untouched(&before, &account);
}

#[test]
fn error_messages_are_descriptive() {
    let err = TransactionError::WithdrawalLimitExceeded {
        requested: dec!(600.00),
        limit: dec!(500.00),
    };
    assert_eq!(
        err.to_string(),
        "Withdrawal of 600.00 exceeds the per-operation limit of 500.00."
    );
    assert!(TransactionError::DailyTransactionLimitExceeded { limit: 10 }.is_daily_limit());
    assert!(!TransactionError::InvalidAmount { amount: dec!(0) }.is_daily_limit());
}
