use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use pgmrun_runner::{RunnerOptions, timeout_from_secs};

/// Default executable used by `sample`
pub const DEFAULT_LIBRA: &str = "libra";
/// Java launcher used by the LearnSDD and BI drivers
pub const DEFAULT_JAVA: &str = "java";
/// `-Xmx` value passed to the BI driver
pub const DEFAULT_JAVA_HEAP: &str = "2G";

/// Configuration for pgmrun runs.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults.
///
/// # Discovery
///
/// Use [`Config::discover()`] for CLI-like behavior that searches for
/// `.pgmrun/config.toml` upward from the current directory and applies built-in
/// defaults for unspecified values.
///
/// # Example
///
/// ```rust,no_run
/// use pgmrun_config::{CliArgs, Config};
///
/// let config = Config::discover(&CliArgs::default())?;
/// println!("Timeout: {:?}", config.learner_timeout());
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Configuration File Format
///
/// ```toml
/// [defaults]
/// timeout_secs = 3600
/// verbose = false
/// seed = 42
///
/// [runner]
/// kill_grace_ms = 2000
/// drain_timeout_ms = 500
///
/// [tools]
/// libra = "libra"
/// java = "java"
/// java_heap = "2G"
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub defaults: Defaults,
    pub runner: RunnerSection,
    pub tools: ToolsConfig,
    /// Source attribution for each setting (for verbose logging).
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[defaults]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Learner/query deadline when `-t` is absent. `<= 0` disables it.
    pub timeout_secs: Option<i64>,
    pub verbose: Option<bool>,
    /// RNG seed when `--seed` is absent. Unset means a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout_secs: Some(0),
            verbose: Some(false),
            seed: None,
        }
    }
}

/// `[runner]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Time between SIGTERM and SIGKILL for a timed-out process group.
    pub kill_grace_ms: Option<u64>,
    /// How long to keep reading output once the child is gone.
    pub drain_timeout_ms: Option<u64>,
}

impl Default for RunnerSection {
    fn default() -> Self {
        let options = RunnerOptions::default();
        Self {
            kill_grace_ms: Some(duration_ms(options.kill_grace)),
            drain_timeout_ms: Some(duration_ms(options.drain_timeout)),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// `[tools]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    pub libra: Option<String>,
    pub java: Option<String>,
    pub java_heap: Option<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            libra: Some(DEFAULT_LIBRA.to_string()),
            java: Some(DEFAULT_JAVA.to_string()),
            java_heap: Some(DEFAULT_JAVA_HEAP.to_string()),
        }
    }
}

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    ConfigFile(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::ConfigFile(path) => write!(f, "config file ({})", path.display()),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

/// CLI values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub seed: Option<u64>,
    pub kill_grace_ms: Option<u64>,
    pub timeout_secs: Option<i64>,
}

impl Config {
    /// Deadline for learner and query steps.
    #[must_use]
    pub fn learner_timeout(&self) -> Option<Duration> {
        self.defaults.timeout_secs.and_then(timeout_from_secs)
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    /// Process-runner settings, falling back to the runner's own defaults.
    #[must_use]
    pub fn runner_options(&self) -> RunnerOptions {
        let defaults = RunnerOptions::default();
        RunnerOptions {
            kill_grace: self
                .runner
                .kill_grace_ms
                .map_or(defaults.kill_grace, Duration::from_millis),
            drain_timeout: self
                .runner
                .drain_timeout_ms
                .map_or(defaults.drain_timeout, Duration::from_millis),
        }
    }

    #[must_use]
    pub fn libra(&self) -> &str {
        self.tools.libra.as_deref().unwrap_or(DEFAULT_LIBRA)
    }

    #[must_use]
    pub fn java(&self) -> &str {
        self.tools.java.as_deref().unwrap_or(DEFAULT_JAVA)
    }

    #[must_use]
    pub fn java_heap(&self) -> &str {
        self.tools.java_heap.as_deref().unwrap_or(DEFAULT_JAVA_HEAP)
    }
}
