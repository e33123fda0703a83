use std::time::Duration;

const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration of the partition-aware load balancing policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PartitionAwareConfig {
    /// Interval between partition metadata refreshes.
    pub refresh_interval: Duration,
    /// Maximum time a single refresh may take, before it's considered failed.
    pub refresh_timeout: Duration,
}

impl Default for PartitionAwareConfig {
    fn default() -> Self {
        PartitionAwareConfig {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }
}

/// Builder structure that helps to configure the partition-aware policy.
#[derive(Default)]
pub struct PartitionAwareConfigBuilder {
    config: PartitionAwareConfig,
}

impl PartitionAwareConfigBuilder {
    pub fn new() -> PartitionAwareConfigBuilder {
        Default::default()
    }

    /// Sets the interval between partition metadata refreshes.
    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.config.refresh_interval = refresh_interval;
        self
    }

    /// Sets the timeout of a single partition metadata refresh.
    pub fn with_refresh_timeout(mut self, refresh_timeout: Duration) -> Self {
        self.config.refresh_timeout = refresh_timeout;
        self
    }

    /// Finalizes building process
    pub fn build(self) -> PartitionAwareConfig {
        self.config
    }
}
