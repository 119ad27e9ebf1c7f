#![forbid(unsafe_code)]

pub mod analytics;
pub mod chart;
pub mod error;
pub mod ledger;
pub mod model;
pub mod time;

pub use error::Error;
pub use ledger::{AnswerLedger, AnswerSnapshot, LedgerError};
pub use time::Clock;
