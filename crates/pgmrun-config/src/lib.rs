//! Configuration management for pgmrun
//!
//! Hierarchical configuration with discovery and precedence CLI > file > defaults.
//! Configuration files are TOML with `[defaults]`, `[runner]` and `[tools]` sections.

mod config;

pub use config::{
    CliArgs, Config, ConfigSource, DEFAULT_JAVA, DEFAULT_JAVA_HEAP, DEFAULT_LIBRA, Defaults,
    RunnerSection, ToolsConfig,
};
