#![doc(test(attr(deny(warnings))))]

//! Huvudbok turns a Fortnox general-ledger ("huvudbok") export into per
//! account, per cost-center summaries, either as a flat table or as a
//! sectioned spreadsheet with subtotal formulas.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod report;
pub mod utils;

pub use errors::{HuvudbokError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Huvudbok tracing initialized.");
    });
}
