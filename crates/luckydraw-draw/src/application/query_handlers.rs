//! Query handlers for the Draw Engine context.
//!
//! Queries read the shared engine under its lock and return read-only
//! view DTOs. They never mutate the engine.

use std::sync::Mutex;

use luckydraw_core::aggregate::AggregateRoot;
use luckydraw_core::error::DomainError;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers::lock_engine;
use crate::domain::aggregates::DrawEngine;

/// Read-only view of a draw engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawStatusView {
    /// The engine identifier.
    pub engine_id: Uuid,
    /// Current phase as a string (`idle` or `rolling`).
    pub phase: String,
    /// Highest ticket number the engine was built with.
    pub pool_size: u32,
    /// Numbers still in the pool.
    pub remaining: usize,
    /// Whether the pool is empty.
    pub exhausted: bool,
    /// Past winners, newest first.
    pub history: Vec<u32>,
    /// All committed numbers, ascending.
    pub drawn: Vec<u32>,
    /// Number currently on display while rolling.
    pub current_candidate: Option<u32>,
    /// Current version (event count).
    pub version: i64,
}

impl From<&DrawEngine> for DrawStatusView {
    fn from(engine: &DrawEngine) -> Self {
        Self {
            engine_id: engine.aggregate_id(),
            phase: engine.phase().as_str().to_owned(),
            pool_size: engine.config().pool_size,
            remaining: engine.remaining_count(),
            exhausted: engine.is_exhausted(),
            history: engine.history_snapshot(),
            drawn: engine.drawn_numbers(),
            current_candidate: engine.current_candidate(),
            version: engine.version(),
        }
    }
}

/// Returns a snapshot of the engine's state.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the engine lock is poisoned.
pub fn get_draw_status(engine: &Mutex<DrawEngine>) -> Result<DrawStatusView, DomainError> {
    let engine = lock_engine(engine)?;
    Ok(DrawStatusView::from(&*engine))
}

/// Returns past winners, newest first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the engine lock is poisoned.
pub fn get_history(engine: &Mutex<DrawEngine>) -> Result<Vec<u32>, DomainError> {
    Ok(lock_engine(engine)?.history_snapshot())
}
