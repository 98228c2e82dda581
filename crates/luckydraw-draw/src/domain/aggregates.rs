//! Aggregate roots for the Draw Engine context.

use std::collections::{BTreeSet, HashMap, VecDeque};

use luckydraw_core::aggregate::AggregateRoot;
use luckydraw_core::clock::Clock;
use luckydraw_core::error::DomainError;
use luckydraw_core::event::EventMetadata;
use luckydraw_core::rng::DeterministicRng;
use tracing::warn;
use uuid::Uuid;

use super::config::DrawConfig;
use super::events::{DrawEvent, DrawEventKind, DrawStarted, WinnerCommitted};

/// Draw session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPhase {
    /// No draw in progress. The default state.
    Idle,
    /// Candidates are being surfaced; one of them will be committed.
    Rolling,
}

impl DrawPhase {
    /// Returns the `snake_case` name used in views and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Rolling => "rolling",
        }
    }
}

/// The aggregate root for a lottery draw.
///
/// Every number in `1..=pool_size` sits in exactly one of the pool or the
/// drawn set. Numbers only move from pool to drawn, one per commit.
#[derive(Debug)]
pub struct DrawEngine {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Sizing the engine was built with.
    pub(crate) config: DrawConfig,
    /// Current draw phase.
    pub(crate) phase: DrawPhase,
    /// Numbers not yet drawn, in no particular order.
    pub(crate) pool: Vec<u32>,
    /// Slot of each pooled number inside `pool`.
    slots: HashMap<u32, usize>,
    /// Numbers already committed.
    pub(crate) drawn: BTreeSet<u32>,
    /// Committed winners, newest first, capped at `config.history_capacity`.
    pub(crate) history: VecDeque<u32>,
    /// Last number surfaced while rolling (cleared on commit).
    pub(crate) candidate: Option<u32>,
    /// Events recorded but not yet drained.
    uncommitted_events: Vec<DrawEvent>,
}

impl DrawEngine {
    /// Creates an engine whose pool holds `1..=config.pool_size`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the config is invalid.
    pub fn new(id: Uuid, config: DrawConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let pool: Vec<u32> = (1..=config.pool_size).collect();
        let slots = pool
            .iter()
            .enumerate()
            .map(|(slot, &number)| (number, slot))
            .collect();

        Ok(Self {
            id,
            version: 0,
            config,
            phase: DrawPhase::Idle,
            pool,
            slots,
            drawn: BTreeSet::new(),
            history: VecDeque::with_capacity(config.history_capacity),
            candidate: None,
            uncommitted_events: Vec::new(),
        })
    }

    /// Returns the next sequence number for a new event.
    fn next_sequence_number(&self) -> i64 {
        self.version + 1
    }

    fn build_event(
        &self,
        kind: DrawEventKind,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> DrawEvent {
        DrawEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        }
    }

    /// Applies `event` and queues it for the application layer.
    fn record(&mut self, event: DrawEvent) {
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    /// Starts rolling, producing a `DrawStarted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if a draw is already rolling and
    /// `DomainError::PoolExhausted` if no numbers remain. Nothing changes in
    /// either case.
    pub fn begin_draw(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase != DrawPhase::Idle {
            return Err(DomainError::InvalidState(
                "a draw is already rolling".to_owned(),
            ));
        }
        if self.pool.is_empty() {
            return Err(DomainError::PoolExhausted);
        }

        let event = self.build_event(
            DrawEventKind::DrawStarted(DrawStarted {
                engine_id: self.id,
                remaining: self.pool.len(),
            }),
            correlation_id,
            clock,
        );
        self.record(event);
        Ok(())
    }

    /// Picks a uniformly random pooled number and makes it the current
    /// candidate. The number stays in the pool; repeated calls may surface
    /// the same number again.
    ///
    /// Returns `Ok(None)` if the pool is empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if no draw is rolling.
    pub fn sample_candidate(
        &mut self,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Option<u32>, DomainError> {
        if self.phase != DrawPhase::Rolling {
            return Err(DomainError::InvalidState(
                "cannot sample a candidate while idle".to_owned(),
            ));
        }
        if self.pool.is_empty() {
            return Ok(None);
        }

        let slot = rng.next_index(self.pool.len()).min(self.pool.len() - 1);
        let number = self.pool[slot];
        self.candidate = Some(number);
        Ok(Some(number))
    }

    /// Locks in the current candidate, producing a `WinnerCommitted` event,
    /// and returns the winner.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if no draw is rolling or no
    /// candidate has been sampled since the draw began. Nothing changes.
    pub fn commit_draw(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<u32, DomainError> {
        if self.phase != DrawPhase::Rolling {
            return Err(DomainError::InvalidState(
                "cannot commit while idle".to_owned(),
            ));
        }
        let Some(winner) = self.candidate else {
            return Err(DomainError::InvalidState(
                "no candidate has been sampled".to_owned(),
            ));
        };

        let event = self.build_event(
            DrawEventKind::WinnerCommitted(WinnerCommitted {
                engine_id: self.id,
                winner,
                remaining: self.pool.len() - 1,
            }),
            correlation_id,
            clock,
        );
        self.record(event);
        Ok(winner)
    }

    /// Number of tickets still in the pool.
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.pool.len()
    }

    /// Whether every ticket has been drawn.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pool.is_empty()
    }

    /// Past winners, newest first.
    #[must_use]
    pub fn history_snapshot(&self) -> Vec<u32> {
        self.history.iter().copied().collect()
    }

    /// Committed numbers in ascending order.
    #[must_use]
    pub fn drawn_numbers(&self) -> Vec<u32> {
        self.drawn.iter().copied().collect()
    }

    /// Current draw phase.
    #[must_use]
    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    /// The number most recently surfaced while rolling, if any.
    #[must_use]
    pub fn current_candidate(&self) -> Option<u32> {
        self.candidate
    }

    /// Sizing the engine was built with.
    #[must_use]
    pub fn config(&self) -> DrawConfig {
        self.config
    }

    fn remove_from_pool(&mut self, number: u32) -> bool {
        let Some(slot) = self.slots.remove(&number) else {
            return false;
        };
        self.pool.swap_remove(slot);
        if let Some(&moved) = self.pool.get(slot) {
            self.slots.insert(moved, slot);
        }
        true
    }
}

impl AggregateRoot for DrawEngine {
    type Event = DrawEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            DrawEventKind::DrawStarted(_) => {
                self.phase = DrawPhase::Rolling;
                self.candidate = None;
            }
            DrawEventKind::WinnerCommitted(payload) => {
                if self.remove_from_pool(payload.winner) {
                    self.drawn.insert(payload.winner);
                    self.history.push_front(payload.winner);
                    self.history.truncate(self.config.history_capacity);
                } else {
                    warn!(
                        engine_id = %self.id,
                        winner = payload.winner,
                        "committed winner was not in the pool; ignoring"
                    );
                }
                self.phase = DrawPhase::Idle;
                self.candidate = None;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use luckydraw_core::event::DomainEvent;
    use luckydraw_test_support::{FixedClock, MockRng, SequenceRng};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn engine_with(pool_size: u32) -> DrawEngine {
        DrawEngine::new(
            Uuid::new_v4(),
            DrawConfig {
                pool_size,
                history_capacity: 5,
            },
        )
        .unwrap()
    }

    /// Runs one begin → sample → commit cycle and returns the winner.
    fn draw_once(engine: &mut DrawEngine, rng: &mut dyn DeterministicRng) -> u32 {
        let clock = fixed_clock();
        engine.begin_draw(Uuid::new_v4(), &clock).unwrap();
        engine.sample_candidate(rng).unwrap().unwrap();
        engine.commit_draw(Uuid::new_v4(), &clock).unwrap()
    }

    fn assert_partition(engine: &DrawEngine) {
        let mut all: Vec<u32> = engine.pool.clone();
        all.extend(engine.drawn.iter().copied());
        all.sort_unstable();
        let expected: Vec<u32> = (1..=engine.config.pool_size).collect();
        assert_eq!(all, expected);
        for number in &engine.pool {
            assert!(!engine.drawn.contains(number));
        }
    }

    // --- construction ---

    #[test]
    fn test_new_engine_has_full_pool() {
        let engine = engine_with(100);

        assert_eq!(engine.remaining_count(), 100);
        assert!(!engine.is_exhausted());
        assert_eq!(engine.phase(), DrawPhase::Idle);
        assert!(engine.history_snapshot().is_empty());
        assert!(engine.drawn_numbers().is_empty());
        assert_eq!(engine.current_candidate(), None);
        assert_eq!(engine.version(), 0);
        assert_partition(&engine);
    }

    #[test]
    fn test_new_engine_for_various_sizes() {
        for n in [1, 2, 3, 10, 250] {
            let engine = engine_with(n);
            assert_eq!(engine.remaining_count(), n as usize);
            assert!(!engine.is_exhausted());
        }
    }

    #[test]
    fn test_zero_sized_pool_is_exhausted_from_start() {
        let mut engine = engine_with(0);

        assert!(engine.is_exhausted());
        assert_eq!(
            engine.begin_draw(Uuid::new_v4(), &fixed_clock()),
            Err(DomainError::PoolExhausted)
        );
        assert_eq!(engine.phase(), DrawPhase::Idle);
    }

    #[test]
    fn test_new_rejects_zero_history_capacity() {
        let result = DrawEngine::new(
            Uuid::new_v4(),
            DrawConfig {
                pool_size: 10,
                history_capacity: 0,
            },
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    // --- begin_draw ---

    #[test]
    fn test_begin_draw_in_idle_phase_produces_event() {
        let engine_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let mut engine = DrawEngine::new(engine_id, DrawConfig::default()).unwrap();

        let result = engine.begin_draw(correlation_id, &fixed_clock());

        assert!(result.is_ok());
        assert_eq!(engine.phase(), DrawPhase::Rolling);
        let events = engine.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "draw.started");

        let meta = events[0].metadata();
        assert_eq!(meta.aggregate_id, engine_id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, fixed_clock().0);
        match &events[0].kind {
            DrawEventKind::DrawStarted(payload) => assert_eq!(payload.remaining, 100),
            other => panic!("expected DrawStarted, got {other:?}"),
        }
    }

    #[test]
    fn test_begin_draw_while_rolling_returns_invalid_state() {
        let mut engine = engine_with(10);
        engine.begin_draw(Uuid::new_v4(), &fixed_clock()).unwrap();

        let result = engine.begin_draw(Uuid::new_v4(), &fixed_clock());

        match result.unwrap_err() {
            DomainError::InvalidState(msg) => assert_eq!(msg, "a draw is already rolling"),
            other => panic!("expected InvalidState, got {other:?}"),
        }
        assert_eq!(engine.uncommitted_events().len(), 1);
        assert_eq!(engine.version(), 1);
    }

    // --- sample_candidate ---

    #[test]
    fn test_sample_candidate_while_idle_returns_invalid_state() {
        let mut engine = engine_with(10);

        let result = engine.sample_candidate(&mut MockRng);

        assert!(matches!(result, Err(DomainError::InvalidState(_))));
        assert_eq!(engine.current_candidate(), None);
        assert_eq!(engine.remaining_count(), 10);
    }

    #[test]
    fn test_sample_candidate_does_not_remove_from_pool() {
        let mut engine = engine_with(10);
        engine.begin_draw(Uuid::new_v4(), &fixed_clock()).unwrap();
        let mut rng = SequenceRng::new(vec![3, 7, 3]);

        assert_eq!(engine.sample_candidate(&mut rng).unwrap(), Some(4));
        assert_eq!(engine.sample_candidate(&mut rng).unwrap(), Some(8));
        assert_eq!(engine.sample_candidate(&mut rng).unwrap(), Some(4));

        assert_eq!(engine.current_candidate(), Some(4));
        assert_eq!(engine.remaining_count(), 10);
        assert_eq!(engine.phase(), DrawPhase::Rolling);
        assert_eq!(engine.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_sample_candidate_clamps_out_of_range_slot() {
        let mut engine = engine_with(3);
        engine.begin_draw(Uuid::new_v4(), &fixed_clock()).unwrap();
        let mut rng = SequenceRng::new(vec![99]);

        assert_eq!(engine.sample_candidate(&mut rng).unwrap(), Some(3));
    }

    // --- commit_draw ---

    #[test]
    fn test_commit_draw_records_winner() {
        let engine_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let mut engine = DrawEngine::new(engine_id, DrawConfig::default()).unwrap();
        engine.begin_draw(Uuid::new_v4(), &fixed_clock()).unwrap();
        engine
            .sample_candidate(&mut SequenceRng::new(vec![41]))
            .unwrap();

        let winner = engine.commit_draw(correlation_id, &fixed_clock()).unwrap();

        assert_eq!(winner, 42);
        assert_eq!(engine.phase(), DrawPhase::Idle);
        assert_eq!(engine.current_candidate(), None);
        assert_eq!(engine.remaining_count(), 99);
        assert_eq!(engine.history_snapshot(), vec![42]);
        assert_eq!(engine.drawn_numbers(), vec![42]);
        assert!(!engine.pool.contains(&42));
        assert_partition(&engine);

        let events = engine.uncommitted_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_type(), "draw.winner_committed");
        assert_eq!(events[1].metadata().sequence_number, 2);
        assert_eq!(events[1].metadata().correlation_id, correlation_id);
        match &events[1].kind {
            DrawEventKind::WinnerCommitted(payload) => {
                assert_eq!(payload.engine_id, engine_id);
                assert_eq!(payload.winner, 42);
                assert_eq!(payload.remaining, 99);
            }
            other => panic!("expected WinnerCommitted, got {other:?}"),
        }
    }

    #[test]
    fn test_commit_draw_while_idle_returns_invalid_state() {
        let mut engine = engine_with(10);

        let result = engine.commit_draw(Uuid::new_v4(), &fixed_clock());

        match result.unwrap_err() {
            DomainError::InvalidState(msg) => assert_eq!(msg, "cannot commit while idle"),
            other => panic!("expected InvalidState, got {other:?}"),
        }
        assert_eq!(engine.version(), 0);
    }

    #[test]
    fn test_commit_draw_without_candidate_mutates_nothing() {
        let mut engine = engine_with(10);
        engine.begin_draw(Uuid::new_v4(), &fixed_clock()).unwrap();

        let result = engine.commit_draw(Uuid::new_v4(), &fixed_clock());

        match result.unwrap_err() {
            DomainError::InvalidState(msg) => assert_eq!(msg, "no candidate has been sampled"),
            other => panic!("expected InvalidState, got {other:?}"),
        }
        assert_eq!(engine.phase(), DrawPhase::Rolling);
        assert_eq!(engine.remaining_count(), 10);
        assert!(engine.history_snapshot().is_empty());
        assert!(engine.drawn_numbers().is_empty());
        assert_eq!(engine.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_candidate_from_previous_draw_does_not_carry_over() {
        let mut engine = engine_with(10);
        draw_once(&mut engine, &mut MockRng);
        engine.begin_draw(Uuid::new_v4(), &fixed_clock()).unwrap();

        let result = engine.commit_draw(Uuid::new_v4(), &fixed_clock());

        assert!(matches!(result, Err(DomainError::InvalidState(_))));
        assert_eq!(engine.remaining_count(), 9);
    }

    // --- sequences ---

    #[test]
    fn test_committed_values_are_distinct_and_pool_shrinks() {
        let mut engine = engine_with(20);
        let mut winners = Vec::new();

        for k in 1..=20 {
            winners.push(draw_once(&mut engine, &mut MockRng));
            assert_eq!(engine.remaining_count(), 20 - k);
            assert_partition(&engine);
        }

        let distinct: BTreeSet<u32> = winners.iter().copied().collect();
        assert_eq!(distinct.len(), 20);
        assert!(engine.is_exhausted());
    }

    #[test]
    fn test_mock_rng_swap_remove_order() {
        // Slot 0 is always sampled; swap_remove moves the last number into it.
        let mut engine = engine_with(5);

        let winners: Vec<u32> = (0..5).map(|_| draw_once(&mut engine, &mut MockRng)).collect();

        assert_eq!(winners, vec![1, 5, 4, 3, 2]);
    }

    #[test]
    fn test_three_ticket_scenario() {
        let mut engine = engine_with(3);
        assert_eq!(engine.remaining_count(), 3);
        let mut rng = SequenceRng::new(vec![1, 1, 0]);
        let mut committed = Vec::new();

        for expected_remaining in [2, 1, 0] {
            engine.begin_draw(Uuid::new_v4(), &fixed_clock()).unwrap();
            let candidate = engine.sample_candidate(&mut rng).unwrap().unwrap();
            assert!((1..=3).contains(&candidate));
            let winner = engine.commit_draw(Uuid::new_v4(), &fixed_clock()).unwrap();
            assert_eq!(winner, candidate);
            assert_eq!(engine.remaining_count(), expected_remaining);
            committed.push(winner);
        }

        assert!(engine.is_exhausted());
        let reversed: Vec<u32> = committed.iter().rev().copied().collect();
        assert_eq!(engine.history_snapshot(), reversed);
        let mut sorted = committed.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3]);

        assert_eq!(
            engine.begin_draw(Uuid::new_v4(), &fixed_clock()),
            Err(DomainError::PoolExhausted)
        );
        assert_eq!(engine.phase(), DrawPhase::Idle);
    }

    #[test]
    fn test_history_caps_at_five_newest_first() {
        let mut engine = engine_with(10);
        let mut rng = SequenceRng::new(vec![0, 2, 4, 1, 3, 0]);
        let committed: Vec<u32> = (0..6).map(|_| draw_once(&mut engine, &mut rng)).collect();

        let history = engine.history_snapshot();
        assert_eq!(history.len(), 5);
        assert!(!history.contains(&committed[0]));
        assert_eq!(history[0], committed[5]);
        let expected: Vec<u32> = committed[1..].iter().rev().copied().collect();
        assert_eq!(history, expected);
        assert_eq!(engine.drawn_numbers().len(), 6);
    }

    #[test]
    fn test_history_length_tracks_commit_count() {
        let mut engine = engine_with(12);
        for k in 1..=12 {
            draw_once(&mut engine, &mut MockRng);
            assert_eq!(engine.history_snapshot().len(), k.min(5));
        }
    }

    // --- apply / replay ---

    #[test]
    fn test_replay_reconstructs_state() {
        let engine_id = Uuid::new_v4();
        let config = DrawConfig {
            pool_size: 8,
            history_capacity: 3,
        };
        let mut live = DrawEngine::new(engine_id, config).unwrap();
        let mut rng = SequenceRng::new(vec![6, 2, 0, 4]);
        for _ in 0..4 {
            draw_once(&mut live, &mut rng);
        }
        let events = live.uncommitted_events().to_vec();
        live.clear_uncommitted_events();
        assert_eq!(events.len(), 8);
        assert!(live.uncommitted_events().is_empty());

        let mut replayed = DrawEngine::new(engine_id, config).unwrap();
        for event in &events {
            replayed.apply(event);
        }

        assert_eq!(replayed.version(), live.version());
        assert_eq!(replayed.history_snapshot(), live.history_snapshot());
        assert_eq!(replayed.drawn_numbers(), live.drawn_numbers());
        assert_eq!(replayed.remaining_count(), live.remaining_count());
        assert_eq!(replayed.phase(), DrawPhase::Idle);
        assert!(replayed.uncommitted_events().is_empty());
        assert_partition(&replayed);
    }

    #[test]
    fn test_apply_unknown_winner_leaves_pool_untouched() {
        let engine_id = Uuid::new_v4();
        let mut engine = engine_with(3);
        let event = DrawEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: "draw.winner_committed".to_owned(),
                aggregate_id: engine_id,
                sequence_number: 1,
                correlation_id: Uuid::new_v4(),
                causation_id: Uuid::new_v4(),
                occurred_at: Utc::now(),
            },
            kind: DrawEventKind::WinnerCommitted(WinnerCommitted {
                engine_id,
                winner: 77,
                remaining: 2,
            }),
        };

        engine.apply(&event);

        assert_eq!(engine.remaining_count(), 3);
        assert!(engine.drawn_numbers().is_empty());
        assert_eq!(engine.version(), 1);
        assert_partition(&engine);
    }

    #[test]
    fn test_clear_uncommitted_events() {
        let mut engine = engine_with(4);
        draw_once(&mut engine, &mut MockRng);
        assert_eq!(engine.uncommitted_events().len(), 2);

        engine.clear_uncommitted_events();

        assert!(engine.uncommitted_events().is_empty());
        assert_eq!(engine.version(), 2);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(DrawPhase::Idle.as_str(), "idle");
        assert_eq!(DrawPhase::Rolling.as_str(), "rolling");
    }
}
