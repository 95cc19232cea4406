mod common;

use std::thread;

use bank_core::{
    clock::Clock,
    currency::CurrencyFormat,
    errors::TransactionError,
    ledger::{SharedAccount, TransactionRequest},
};
use chrono::Duration;
use rust_decimal_macros::dec;

use common::{clock, funded_account};

#[test]
fn concurrent_withdrawals_respect_the_daily_ceiling() {
    let clock = clock();
    let shared = SharedAccount::new(funded_account(dec!(1000)));

    let outcomes: Vec<Result<_, TransactionError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                let clock = &clock;
                scope.spawn(move || shared.withdraw(dec!(50), clock))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    let succeeded = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(succeeded, 3);
    assert!(outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().err())
        .all(|err| *err == TransactionError::DailyWithdrawalLimitExceeded { limit: 3 }));

    let account = shared.snapshot();
    assert_eq!(account.balance(), dec!(850));
    assert_eq!(account.withdrawal_count_today(), 3);
    assert_eq!(account.history().len(), 3);
}

#[test]
fn concurrent_deposits_never_lose_an_update() {
    let clock = clock();
    let shared = SharedAccount::new(funded_account(dec!(0)));

    thread::scope(|scope| {
        for _ in 0..10 {
            let shared = shared.clone();
            let clock = &clock;
            scope.spawn(move || {
                shared
                    .apply(TransactionRequest::deposit(dec!(12.34)), clock)
                    .expect("deposit within limits");
            });
        }
    });

    let account = shared.snapshot();
    assert_eq!(account.balance(), dec!(123.40));
    assert_eq!(account.transaction_count_today(), 10);
    assert!(matches!(
        shared.deposit(dec!(1), &clock),
        Err(TransactionError::DailyTransactionLimitExceeded { limit: 10 })
    ));
}

#[test]
fn balance_never_goes_negative_under_contention() {
    let clock = clock();
    let shared = SharedAccount::new(funded_account(dec!(120)));

    thread::scope(|scope| {
        for _ in 0..3 {
            let shared = shared.clone();
            let clock = &clock;
            scope.spawn(move || {
                let _ = shared.withdraw(dec!(50), clock);
            });
        }
    });

    let account = shared.snapshot();
    assert_eq!(account.balance(), dec!(20));
    assert_eq!(account.history().len(), 2);
}

#[test]
fn shared_statement_reflects_the_next_day() {
    let clock = clock();
    let shared = SharedAccount::new(funded_account(dec!(300)));
    for _ in 0..3 {
        shared.withdraw(dec!(10), &clock).unwrap();
    }
    clock.advance(Duration::days(1));
    let receipt = shared.withdraw(dec!(10), &clock).unwrap();
    assert_eq!(receipt.withdrawals_today, 1);
    assert!(shared.snapshot().time_until_reset(clock.now()).is_some());

    let statement = shared.statement(&CurrencyFormat::default());
    assert_eq!(statement.lines.len(), 5);
    assert_eq!(statement.lines[4], "Balance: R$ 260.00");
}
