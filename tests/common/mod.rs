#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use bank_core::{
    clock::ManualClock,
    ledger::{Account, AccountPolicy},
};
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// 09:00 in São Paulo on a Friday.
pub fn friday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn clock() -> ManualClock {
    ManualClock::new(friday_morning())
}

pub fn account() -> Account {
    Account::new(1, AccountPolicy::default())
}

pub fn funded_account(balance: Decimal) -> Account {
    account().with_opening_balance(balance)
}

/// Creates an isolated application directory for each test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}
