//! Text shown by the console.

/// Title printed when the session starts.
pub const TITLE: &str = "Lucky Draw";

/// Notice shown when start is pressed with nothing left to draw.
pub const EXHAUSTED_NOTICE: &str = "All numbers have been drawn!";

/// Notice shown when start is pressed during the post-commit cooldown.
pub const COOLDOWN_NOTICE: &str = "Please wait, the next draw is not ready yet.";

/// Command summary.
pub const HELP: &str =
    "Commands: start (s), stop (x), <Enter> to toggle, status, help, quit (q)";

/// Label of the start control for the given number of remaining tickets.
#[must_use]
pub fn start_label(remaining: usize) -> String {
    if remaining == 0 {
        "All numbers drawn".to_owned()
    } else {
        format!("Start draw ({remaining} remaining)")
    }
}

/// The rolling display, redrawn in place.
#[must_use]
pub fn rolling_line(candidate: u32) -> String {
    format!("\rRolling... {candidate:>3}")
}

/// Announcement of a committed winner.
#[must_use]
pub fn winner_line(winner: u32) -> String {
    format!("Winner: No. {winner}")
}

/// History entries, newest first, one line each.
#[must_use]
pub fn history_lines(history: &[u32]) -> Vec<String> {
    history.iter().map(|n| format!("No. {n}")).collect()
}

/// Cooldown announcement after a commit.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cooldown_line(millis: i64) -> String {
    format!("Next draw available in {:.1}s", millis as f64 / 1000.0)
}
