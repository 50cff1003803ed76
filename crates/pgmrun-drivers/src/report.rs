use tracing::info;

/// What happened to each item of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    /// `(item, reason)`
    pub failed: Vec<(String, String)>,
    /// `(item, reason)`
    pub skipped: Vec<(String, String)>,
}

impl BatchReport {
    pub fn succeed(&mut self, item: impl Into<String>) {
        self.succeeded.push(item.into());
    }

    pub fn fail(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        self.failed.push((item.into(), reason.into()));
    }

    pub fn skip(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push((item.into(), reason.into()));
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Log a one-line summary for `operation`.
    pub fn log_summary(&self, operation: &str) {
        info!(
            operation,
            succeeded = self.succeeded.len(),
            failed = self.failed.len(),
            skipped = self.skipped.len(),
            "batch finished"
        );
    }
}
