//! Structure reader for Bayesian networks in BIF (Bayesian Interchange Format).
//!
//! Only the structure is read: variable names, their discrete states, and the
//! parent/child relation implied by `probability` blocks. Probability tables
//! are skipped.

mod lexer;
mod network;

pub use network::{BifNetwork, Variable};
pub use pgmrun_utils::error::BifError;
