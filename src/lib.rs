#![doc(test(attr(deny(warnings))))]

//! BizBalance aggregates receivables, payables, credit cards, and bank
//! balances into a net-position dashboard driven from a terminal shell.

pub mod cli;
pub mod core;
pub mod currency;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("BizBalance tracing initialized.");
    });
}
