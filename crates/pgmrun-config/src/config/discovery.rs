use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{CliArgs, Config, ConfigSource, Defaults, RunnerSection, ToolsConfig};

/// Keys whose source is tracked
const TRACKED_KEYS: &[&str] = &[
    "timeout_secs",
    "verbose",
    "seed",
    "kill_grace_ms",
    "drain_timeout_ms",
    "libra",
    "java",
    "java_heap",
];

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    defaults: Option<Defaults>,
    runner: Option<RunnerSection>,
    tools: Option<ToolsConfig>,
}

/// Overwrite `slot` with `value` when set, recording where it came from.
fn apply<T>(
    slot: &mut Option<T>,
    value: Option<T>,
    key: &str,
    source: &ConfigSource,
    attribution: &mut HashMap<String, ConfigSource>,
) {
    if value.is_some() {
        *slot = value;
        attribution.insert(key.to_string(), source.clone());
    }
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for discovery unless `cli_args`
    /// names a config file explicitly.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut source_attribution: HashMap<String, ConfigSource> = TRACKED_KEYS
            .iter()
            .map(|key| (key.to_string(), ConfigSource::Defaults))
            .collect();

        let mut defaults = Defaults::default();
        let mut runner = RunnerSection::default();
        let mut tools = ToolsConfig::default();

        let config_path = match &cli_args.config_path {
            Some(explicit_path) => Some(explicit_path.clone()),
            None => Self::discover_config_file_from(start_dir)?,
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            let source = ConfigSource::ConfigFile(path.clone());
            let attribution = &mut source_attribution;

            if let Some(file_defaults) = file_config.defaults {
                apply(&mut defaults.timeout_secs, file_defaults.timeout_secs, "timeout_secs", &source, attribution);
                apply(&mut defaults.verbose, file_defaults.verbose, "verbose", &source, attribution);
                apply(&mut defaults.seed, file_defaults.seed, "seed", &source, attribution);
            }
            if let Some(file_runner) = file_config.runner {
                apply(&mut runner.kill_grace_ms, file_runner.kill_grace_ms, "kill_grace_ms", &source, attribution);
                apply(&mut runner.drain_timeout_ms, file_runner.drain_timeout_ms, "drain_timeout_ms", &source, attribution);
            }
            if let Some(file_tools) = file_config.tools {
                apply(&mut tools.libra, file_tools.libra, "libra", &source, attribution);
                apply(&mut tools.java, file_tools.java, "java", &source, attribution);
                apply(&mut tools.java_heap, file_tools.java_heap, "java_heap", &source, attribution);
            }
        }

        // CLI overrides everything
        let cli = ConfigSource::Cli;
        let attribution = &mut source_attribution;
        apply(&mut defaults.timeout_secs, cli_args.timeout_secs, "timeout_secs", &cli, attribution);
        apply(&mut defaults.verbose, cli_args.verbose, "verbose", &cli, attribution);
        apply(&mut defaults.seed, cli_args.seed, "seed", &cli, attribution);
        apply(&mut runner.kill_grace_ms, cli_args.kill_grace_ms, "kill_grace_ms", &cli, attribution);

        let config = Self {
            defaults,
            runner,
            tools,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// Walk up from `start_dir` looking for `.pgmrun/config.toml`, stopping at
    /// repository root markers (.git, .hg, .svn) or the filesystem root.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(".pgmrun").join("config.toml");
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists() {
                break;
            }

            current_dir = dir.parent();
        }

        Ok(None)
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: TomlConfig = toml::from_str(&content).with_context(|| {
                    format!("Failed to parse TOML config file: {}", path.display())
                })?;
                Ok(config)
            }
            // An explicit path that does not exist falls back to defaults
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TomlConfig::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }
}
