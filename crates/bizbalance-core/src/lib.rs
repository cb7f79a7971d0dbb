//! bizbalance-core
//!
//! Aggregation, editing, and insight orchestration for BizBalance.
//! Depends on bizbalance-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod aggregation;
pub mod chart;
pub mod editor;
pub mod error;
pub mod input;
pub mod insight;
pub mod storage;

pub use aggregation::*;
pub use chart::*;
pub use editor::*;
pub use error::CoreError;
pub use input::*;
pub use insight::*;

#[cfg(test)]
mod tests;
