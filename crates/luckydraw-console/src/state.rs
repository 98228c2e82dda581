//! Shared application state.

use std::sync::{Arc, Mutex};

use luckydraw_core::clock::{Clock, SystemClock};
use luckydraw_core::rng::{DeterministicRng, SystemRng};
use luckydraw_draw::domain::aggregates::DrawEngine;
use tracing::info;
use uuid::Uuid;

use crate::config::ConsoleConfig;
use crate::error::AppError;

/// Application state shared by the console loop.
///
/// The console owns the engine's lifetime; the engine itself holds no
/// global state.
#[derive(Clone)]
pub struct AppState {
    /// The draw engine, serialized behind a single lock.
    pub engine: Arc<Mutex<DrawEngine>>,
    /// Source of randomness for candidate sampling.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Time source for event timestamps and the cooldown.
    pub clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        engine: DrawEngine,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            rng,
            clock,
        }
    }

    /// Builds production state: a fresh engine, the system clock and an
    /// OS-seeded RNG (or a seeded one if the config names a seed).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the engine config is invalid.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, AppError> {
        let engine = DrawEngine::new(Uuid::new_v4(), config.draw)?;
        let rng = match config.seed {
            Some(seed) => SystemRng::seeded(seed),
            None => SystemRng::from_os(),
        };
        info!(
            engine_id = %engine.id,
            pool_size = config.draw.pool_size,
            history_capacity = config.draw.history_capacity,
            seeded = config.seed.is_some(),
            "draw engine created"
        );
        Ok(Self::new(
            engine,
            Arc::new(Mutex::new(rng)),
            Arc::new(SystemClock),
        ))
    }
}
