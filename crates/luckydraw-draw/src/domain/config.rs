//! Engine sizing.

use luckydraw_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default number of tickets: the pool holds `1..=100`.
pub const DEFAULT_POOL_SIZE: u32 = 100;

/// Default number of winners kept in the history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Construction parameters for a [`DrawEngine`](super::aggregates::DrawEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Highest ticket number; the pool starts as `1..=pool_size`.
    pub pool_size: u32,
    /// Maximum number of winners kept in the history.
    pub history_capacity: usize,
}

impl DrawConfig {
    /// Checks that the configuration can build an engine.
    ///
    /// A zero `pool_size` is accepted and yields an engine that is exhausted
    /// from the start.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `history_capacity` is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.history_capacity == 0 {
            return Err(DomainError::Validation(
                "history capacity must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_page_widget() {
        let config = DrawConfig::default();
        assert_eq!(config.pool_size, 100);
        assert_eq!(config.history_capacity, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_history_capacity_is_rejected() {
        let config = DrawConfig {
            pool_size: 10,
            history_capacity: 0,
        };
        assert_eq!(
            config.validate(),
            Err(DomainError::Validation(
                "history capacity must be at least 1".to_owned()
            ))
        );
    }

    #[test]
    fn test_zero_pool_size_is_accepted() {
        let config = DrawConfig {
            pool_size: 0,
            history_capacity: 5,
        };
        assert!(config.validate().is_ok());
    }
}
