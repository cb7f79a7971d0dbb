//! bizbalance-domain
//!
//! Pure domain models (FinancialRecord, BankAccount, BusinessData).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod bank;
pub mod business;
pub mod common;
pub mod record;

pub use bank::*;
pub use business::*;
pub use common::*;
pub use record::*;
