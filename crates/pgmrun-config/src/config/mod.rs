mod discovery;
mod model;
mod sources;
mod validation;

pub use model::{
    CliArgs, Config, ConfigSource, DEFAULT_JAVA, DEFAULT_JAVA_HEAP, DEFAULT_LIBRA, Defaults,
    RunnerSection, ToolsConfig,
};
