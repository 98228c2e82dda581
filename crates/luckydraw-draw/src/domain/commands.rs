//! Commands for the Draw Engine context.

use luckydraw_core::command::Command;
use uuid::Uuid;

/// Command to start rolling (Idle → Rolling).
#[derive(Debug, Clone)]
pub struct BeginDraw {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for BeginDraw {
    fn command_type(&self) -> &'static str {
        "draw.begin_draw"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to surface a fresh random candidate while rolling.
#[derive(Debug, Clone)]
pub struct SampleCandidate {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for SampleCandidate {
    fn command_type(&self) -> &'static str {
        "draw.sample_candidate"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to lock in the current candidate as the winner (Rolling → Idle).
#[derive(Debug, Clone)]
pub struct CommitDraw {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for CommitDraw {
    fn command_type(&self) -> &'static str {
        "draw.commit_draw"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
