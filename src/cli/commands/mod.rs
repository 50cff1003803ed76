//! CLI command implementations (facade).
//!
//! This module re-exports the command surface used by `run.rs`.
//! Implementations live in `commands/*`.

mod append;
mod common;
mod hide;
mod infer;
mod learn;
mod sample;
mod score;
mod split;

// Re-export command handlers
pub use append::execute_append_command;
pub use hide::execute_hide_command;
pub use infer::execute_infer_command;
pub use learn::execute_learn_command;
pub use sample::execute_sample_command;
pub use score::execute_score_command;
pub use split::execute_split_command;

// Re-export common helpers
pub use common::log_effective_config;
