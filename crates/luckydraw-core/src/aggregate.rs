//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots whose state is driven by domain events.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state (used for recording and replay).
    fn apply(&mut self, event: &Self::Event);

    /// Returns events recorded by command handling and not yet drained.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events once a handler has taken them.
    fn clear_uncommitted_events(&mut self);
}
