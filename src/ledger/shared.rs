//! Account handle for several sessions at once.
//!
//! The lock is held across the whole read-validate-mutate sequence so two
//! sessions can neither lose an update to the balance nor both slip under a
//! daily ceiling.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;

use super::{
    account::Account,
    applier,
    statement::{self, Statement},
    transaction::{Receipt, TransactionRequest},
};
use crate::{clock::Clock, currency::CurrencyFormat, errors::TransactionError};

#[derive(Debug, Clone)]
pub struct SharedAccount {
    inner: Arc<Mutex<Account>>,
}

impl SharedAccount {
    pub fn new(account: Account) -> Self {
        Self {
            inner: Arc::new(Mutex::new(account)),
        }
    }

    // The applier never leaves an account half-updated, so a poisoned lock
    // still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, Account> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn apply(
        &self,
        request: TransactionRequest,
        clock: &dyn Clock,
    ) -> Result<Receipt, TransactionError> {
        let mut account = self.lock();
        applier::apply(&mut account, request, clock.now())
    }

    pub fn deposit(&self, amount: Decimal, clock: &dyn Clock) -> Result<Receipt, TransactionError> {
        self.apply(TransactionRequest::deposit(amount), clock)
    }

    pub fn withdraw(&self, amount: Decimal, clock: &dyn Clock) -> Result<Receipt, TransactionError> {
        self.apply(TransactionRequest::withdrawal(amount), clock)
    }

    pub fn statement(&self, format: &CurrencyFormat) -> Statement {
        statement::generate_statement(&self.lock(), format)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Account {
        self.lock().clone()
    }
}
