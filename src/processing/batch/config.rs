use serde::{Deserialize, Serialize};
use crate::utils::ConfigError;

/// How the concurrency cap applies when several groups run at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyScope {
    /// One semaphore shared by every group: peak concurrency is the cap
    #[default]
    Global,
    /// One semaphore per group: peak concurrency is cap × running groups
    PerGroup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Files per group
    pub group_size: usize,
    /// Maximum in-flight files, per scope
    pub concurrency_cap: usize,
    pub scope: ConcurrencyScope,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            group_size: 5,
            concurrency_cap: 5,
            scope: ConcurrencyScope::Global,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_size == 0 {
            return Err(ConfigError::InvalidGroupSize(self.group_size));
        }
        if self.concurrency_cap == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency_cap));
        }
        Ok(())
    }
}
