use pgmrun_utils::error::ConfigError;

use super::Config;

/// Upper bound for `kill_grace_ms` and `drain_timeout_ms` (10 minutes).
const MAX_RUNNER_WAIT_MS: u64 = 600_000;

impl Config {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("kill_grace_ms", self.runner.kill_grace_ms),
            ("drain_timeout_ms", self.runner.drain_timeout_ms),
        ] {
            if let Some(ms) = value
                && ms > MAX_RUNNER_WAIT_MS
            {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: format!("{ms} exceeds maximum of {MAX_RUNNER_WAIT_MS}"),
                });
            }
        }

        for (key, value) in [
            ("libra", self.tools.libra.as_deref()),
            ("java", self.tools.java.as_deref()),
            ("java_heap", self.tools.java_heap.as_deref()),
        ] {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: "must not be empty".to_string(),
                });
            }
        }

        if let Some(heap) = self.tools.java_heap.as_deref()
            && !is_valid_heap_size(heap)
        {
            return Err(ConfigError::InvalidValue {
                key: "java_heap".to_string(),
                value: format!("'{heap}' is not a JVM heap size like 512M or 2G"),
            });
        }

        Ok(())
    }
}

/// Digits with an optional k/m/g unit suffix, as accepted by `-Xmx`.
fn is_valid_heap_size(value: &str) -> bool {
    let digits = value.trim_end_matches(['k', 'K', 'm', 'M', 'g', 'G']);
    value.len() - digits.len() <= 1
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_size_forms() {
        assert!(is_valid_heap_size("2G"));
        assert!(is_valid_heap_size("512m"));
        assert!(is_valid_heap_size("1048576"));
        assert!(!is_valid_heap_size("G"));
        assert!(!is_valid_heap_size("2GG"));
        assert!(!is_valid_heap_size("two"));
    }
}
