//! Parsing of console input lines.

/// A single user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Press the start control.
    Start,
    /// Press the stop control.
    Stop,
    /// Empty line: start when idle, stop when rolling.
    Toggle,
    /// Print the engine status as JSON.
    Status,
    /// Print the command summary.
    Help,
    /// End the session.
    Quit,
    /// Anything else.
    Unknown(String),
}

impl Input {
    /// Parses one line of input. Case and surrounding whitespace are ignored.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Self::Toggle,
            "s" | "start" => Self::Start,
            "x" | "stop" => Self::Stop,
            "status" => Self::Status,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(trimmed.to_owned()),
        }
    }
}
