//! Single-account ledger: state, validation rules and the applier.

pub mod account;
pub mod applier;
pub mod daily;
pub mod rules;
pub mod shared;
pub mod statement;
pub mod transaction;

pub use account::Account;
pub use applier::{apply, deposit, withdraw};
pub use daily::ResetCountdown;
pub use rules::{AccountPolicy, DailyUsage, ValidationOrder};
pub use shared::SharedAccount;
pub use statement::{generate_statement, Statement};
pub use transaction::{Receipt, TransactionKind, TransactionRecord, TransactionRequest};
