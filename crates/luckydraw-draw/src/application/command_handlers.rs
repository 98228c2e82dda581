//! Command handlers for the Draw Engine context.
//!
//! The engine is shared behind a single `Mutex` so that begin, sample and
//! commit are serialized even if more than one caller drives it. Each
//! handler holds the lock for the whole domain call and drains the events
//! it produced before releasing it.

use std::sync::{Mutex, MutexGuard};

use luckydraw_core::aggregate::AggregateRoot;
use luckydraw_core::clock::Clock;
use luckydraw_core::command::Command;
use luckydraw_core::error::DomainError;
use luckydraw_core::rng::DeterministicRng;
use tracing::{debug, info};

use crate::domain::aggregates::DrawEngine;
use crate::domain::commands::{BeginDraw, CommitDraw, SampleCandidate};
use crate::domain::events::DrawEvent;

/// Result of a successful commit.
#[derive(Debug, Clone)]
pub struct CommittedDraw {
    /// The number locked in as the winner.
    pub winner: u32,
    /// Numbers left in the pool after the commit.
    pub remaining: usize,
    /// Events produced by the commit.
    pub events: Vec<DrawEvent>,
}

/// Locks the shared engine, mapping a poisoned lock to an infrastructure error.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the mutex is poisoned.
pub(crate) fn lock_engine(
    engine: &Mutex<DrawEngine>,
) -> Result<MutexGuard<'_, DrawEngine>, DomainError> {
    engine
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("engine mutex poisoned: {e}")))
}

/// Takes the events recorded by the last domain call.
fn drain_events(engine: &mut DrawEngine) -> Vec<DrawEvent> {
    let events = engine.uncommitted_events().to_vec();
    engine.clear_uncommitted_events();
    events
}

/// Handles the `BeginDraw` command: moves the engine from idle to rolling
/// and returns the produced events.
///
/// # Errors
///
/// Returns `DomainError::PoolExhausted` if every number has been drawn,
/// `DomainError::InvalidState` if a draw is already rolling, or
/// `DomainError::Infrastructure` if the engine lock is poisoned.
pub fn handle_begin_draw(
    command: &BeginDraw,
    clock: &dyn Clock,
    engine: &Mutex<DrawEngine>,
) -> Result<Vec<DrawEvent>, DomainError> {
    let mut engine = lock_engine(engine)?;

    engine.begin_draw(command.correlation_id, clock)?;
    let events = drain_events(&mut engine);

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        engine_id = %engine.aggregate_id(),
        remaining = engine.remaining_count(),
        "draw started"
    );

    Ok(events)
}

/// Handles the `SampleCandidate` command: surfaces a random pooled number
/// using the shared RNG.
///
/// The RNG lock is taken inside the engine lock and released before return.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if no draw is rolling, or
/// `DomainError::Infrastructure` if either lock is poisoned.
pub fn handle_sample_candidate(
    command: &SampleCandidate,
    rng: &Mutex<dyn DeterministicRng + Send>,
    engine: &Mutex<DrawEngine>,
) -> Result<Option<u32>, DomainError> {
    let mut engine = lock_engine(engine)?;
    let candidate = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        engine.sample_candidate(&mut *rng_guard)?
    };

    debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        candidate = ?candidate,
        "candidate sampled"
    );

    Ok(candidate)
}

/// Handles the `CommitDraw` command: locks in the current candidate and
/// returns it together with the produced events.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if no draw is rolling or no
/// candidate was sampled, or `DomainError::Infrastructure` if the engine
/// lock is poisoned.
pub fn handle_commit_draw(
    command: &CommitDraw,
    clock: &dyn Clock,
    engine: &Mutex<DrawEngine>,
) -> Result<CommittedDraw, DomainError> {
    let mut engine = lock_engine(engine)?;

    let winner = engine.commit_draw(command.correlation_id, clock)?;
    let events = drain_events(&mut engine);
    let remaining = engine.remaining_count();

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        engine_id = %engine.aggregate_id(),
        winner,
        remaining,
        "winner committed"
    );

    Ok(CommittedDraw {
        winner,
        remaining,
        events,
    })
}
