//! Console configuration read from the environment.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;
use luckydraw_draw::domain::config::{DEFAULT_HISTORY_CAPACITY, DEFAULT_POOL_SIZE, DrawConfig};

use crate::error::AppError;

/// Environment variable holding the highest ticket number.
pub const POOL_SIZE_VAR: &str = "LUCKYDRAW_POOL_SIZE";
/// Environment variable holding the history length.
pub const HISTORY_LIMIT_VAR: &str = "LUCKYDRAW_HISTORY_LIMIT";
/// Environment variable holding the roll refresh interval in milliseconds.
pub const ROLL_INTERVAL_VAR: &str = "LUCKYDRAW_ROLL_INTERVAL_MS";
/// Environment variable holding the post-commit cooldown in milliseconds.
pub const COOLDOWN_VAR: &str = "LUCKYDRAW_COOLDOWN_MS";
/// Environment variable holding an optional RNG seed.
pub const SEED_VAR: &str = "LUCKYDRAW_SEED";

const DEFAULT_ROLL_INTERVAL_MS: u64 = 50;
const DEFAULT_COOLDOWN_MS: i64 = 3_000;
const MAX_COOLDOWN_MS: u64 = 3_600_000;
/// Largest accepted pool; the engine allocates every ticket up front.
pub const MAX_POOL_SIZE: u32 = 1_000_000;

/// Settings for one console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Engine sizing.
    pub draw: DrawConfig,
    /// How often the rolling display refreshes.
    pub roll_interval: Duration,
    /// How long start is refused after a commit.
    pub cooldown: TimeDelta,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            draw: DrawConfig::default(),
            roll_interval: Duration::from_millis(DEFAULT_ROLL_INTERVAL_MS),
            cooldown: TimeDelta::milliseconds(DEFAULT_COOLDOWN_MS),
            seed: None,
        }
    }
}

impl ConsoleConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value does not parse or is out of
    /// range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let draw = DrawConfig {
            pool_size: parse_var(&lookup, POOL_SIZE_VAR, DEFAULT_POOL_SIZE)?,
            history_capacity: parse_var(&lookup, HISTORY_LIMIT_VAR, DEFAULT_HISTORY_CAPACITY)?,
        };
        if draw.pool_size > MAX_POOL_SIZE {
            return Err(AppError::Config(format!(
                "{POOL_SIZE_VAR} must be at most {MAX_POOL_SIZE}"
            )));
        }
        draw.validate()
            .map_err(|e| AppError::Config(format!("{HISTORY_LIMIT_VAR}: {e}")))?;

        let roll_interval_ms: u64 = parse_var(&lookup, ROLL_INTERVAL_VAR, DEFAULT_ROLL_INTERVAL_MS)?;
        if roll_interval_ms == 0 {
            return Err(AppError::Config(format!(
                "{ROLL_INTERVAL_VAR} must be greater than zero"
            )));
        }

        let cooldown_ms: u64 =
            parse_var(&lookup, COOLDOWN_VAR, DEFAULT_COOLDOWN_MS.unsigned_abs())?;
        if cooldown_ms > MAX_COOLDOWN_MS {
            return Err(AppError::Config(format!(
                "{COOLDOWN_VAR} must be at most {MAX_COOLDOWN_MS}"
            )));
        }
        let cooldown = i64::try_from(cooldown_ms)
            .map(TimeDelta::milliseconds)
            .map_err(|e| AppError::Config(format!("{COOLDOWN_VAR}: {e}")))?;

        let seed = lookup(SEED_VAR)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| AppError::Config(format!("{SEED_VAR} must be a valid u64: {e}")))
            })
            .transpose()?;

        Ok(Self {
            draw,
            roll_interval: Duration::from_millis(roll_interval_ms),
            cooldown,
            seed,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| {
            AppError::Config(format!(
                "{key} must be a valid {}: {e}",
                std::any::type_name::<T>()
            ))
        }),
    }
}
