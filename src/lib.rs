#![doc(test(attr(deny(warnings))))]

//! Bank Core models a single checking account: deposits, withdrawals with
//! per-operation and daily ceilings, and statement rendering, plus the text
//! menu that drives them.

pub mod cli;
pub mod clock;
pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Bank Core tracing initialized.");
    });
}
