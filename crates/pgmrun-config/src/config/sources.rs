use super::{Config, ConfigSource};

impl Config {
    /// Effective configuration as `(key, value, source)` rows, sorted by key.
    #[must_use]
    pub fn effective_config(&self) -> Vec<(&'static str, String, String)> {
        let mut rows = Vec::new();

        let mut add = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                let source = self
                    .source_attribution
                    .get(key)
                    .unwrap_or(&ConfigSource::Defaults)
                    .to_string();
                rows.push((key, value, source));
            }
        };

        add("timeout_secs", self.defaults.timeout_secs.map(|v| v.to_string()));
        add("verbose", self.defaults.verbose.map(|v| v.to_string()));
        add("seed", self.defaults.seed.map(|v| v.to_string()));
        add("kill_grace_ms", self.runner.kill_grace_ms.map(|v| v.to_string()));
        add("drain_timeout_ms", self.runner.drain_timeout_ms.map(|v| v.to_string()));
        add("libra", self.tools.libra.clone());
        add("java", self.tools.java.clone());
        add("java_heap", self.tools.java_heap.clone());

        rows.sort_by_key(|(key, _, _)| *key);
        rows
    }
}
