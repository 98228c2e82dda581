//! Domain events for the Draw Engine context.

use luckydraw_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when a draw starts rolling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawStarted {
    /// The engine identifier.
    pub engine_id: Uuid,
    /// Numbers left in the pool when the draw started.
    pub remaining: usize,
}

/// Emitted when a candidate is locked in as a winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerCommitted {
    /// The engine identifier.
    pub engine_id: Uuid,
    /// The committed number.
    pub winner: u32,
    /// Numbers left in the pool after the commit.
    pub remaining: usize,
}

/// Event payload variants for the Draw Engine context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawEventKind {
    /// A draw has started rolling.
    DrawStarted(DrawStarted),
    /// A winner has been committed.
    WinnerCommitted(WinnerCommitted),
}

impl DrawEventKind {
    /// Type name recorded in `EventMetadata::event_type`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DrawStarted(_) => "draw.started",
            Self::WinnerCommitted(_) => "draw.winner_committed",
        }
    }
}

/// Domain event envelope for the Draw Engine context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: DrawEventKind,
}

impl DomainEvent for DrawEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("DrawEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn metadata(event_type: &str) -> EventMetadata {
        EventMetadata {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            aggregate_id: Uuid::new_v4(),
            sequence_number: 1,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_event_type_names() {
        let started = DrawEvent {
            metadata: metadata("draw.started"),
            kind: DrawEventKind::DrawStarted(DrawStarted {
                engine_id: Uuid::new_v4(),
                remaining: 100,
            }),
        };
        let committed = DrawEvent {
            metadata: metadata("draw.winner_committed"),
            kind: DrawEventKind::WinnerCommitted(WinnerCommitted {
                engine_id: Uuid::new_v4(),
                winner: 42,
                remaining: 99,
            }),
        };

        assert_eq!(started.event_type(), "draw.started");
        assert_eq!(committed.event_type(), "draw.winner_committed");
    }

    #[test]
    fn test_winner_committed_payload_shape() {
        let engine_id = Uuid::new_v4();
        let event = DrawEvent {
            metadata: metadata("draw.winner_committed"),
            kind: DrawEventKind::WinnerCommitted(WinnerCommitted {
                engine_id,
                winner: 7,
                remaining: 2,
            }),
        };

        let payload = event.to_payload();
        assert_eq!(payload["WinnerCommitted"]["winner"], 7);
        assert_eq!(payload["WinnerCommitted"]["remaining"], 2);
        assert_eq!(
            payload["WinnerCommitted"]["engine_id"],
            engine_id.to_string()
        );

        let kind: DrawEventKind = serde_json::from_value(payload).unwrap();
        assert_eq!(kind, event.kind);
    }
}
