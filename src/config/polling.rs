/// Polling behavior for explorer verification status checks.
///
/// The defaults give an explorer one minute to settle a verification job.
///
/// # Examples
///
/// ```rust
/// use rdat_oft::PollingConfig;
///
/// // 12 checks, 5 seconds apart
/// let config = PollingConfig::default();
///
/// let config = PollingConfig::default()
///     .with_max_attempts(20)
///     .with_poll_interval_secs(10);
/// assert_eq!(config.total_timeout_secs(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Maximum number of status checks before giving up.
    pub max_attempts: u32,
    /// Seconds to wait before each status check.
    pub poll_interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            poll_interval_secs: 5,
        }
    }
}

impl PollingConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// `max_attempts * poll_interval_secs`
    pub fn total_timeout_secs(&self) -> u64 {
        self.max_attempts as u64 * self.poll_interval_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollingConfig::default();
        assert_eq!(config.max_attempts, 12);
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.total_timeout_secs(), 60);
    }

    #[test]
    fn test_builder_methods() {
        let config = PollingConfig::default()
            .with_max_attempts(3)
            .with_poll_interval_secs(1);
        assert_eq!(config.total_timeout_secs(), 3);
    }
}
