//! The console front end: turns user input and timer ticks into draw
//! commands and renders the results.
//!
//! The engine knows nothing about timers. While a draw is rolling the run
//! loop ticks every `roll_interval` and asks for a fresh candidate; stop
//! commits whatever is on display. After a commit, start is refused until
//! the cooldown has passed.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use luckydraw_core::error::DomainError;
use luckydraw_core::event::DomainEvent;
use luckydraw_draw::application::command_handlers::{
    handle_begin_draw, handle_commit_draw, handle_sample_candidate,
};
use luckydraw_draw::application::query_handlers::{
    DrawStatusView, get_draw_status, get_history,
};
use luckydraw_draw::domain::commands::{BeginDraw, CommitDraw, SampleCandidate};
use luckydraw_draw::domain::events::DrawEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::ConsoleConfig;
use crate::error::AppError;
use crate::input::Input;
use crate::render;
use crate::state::AppState;

/// Whether the session should keep going after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// End the session.
    Quit,
}

/// Presentation-layer driver for one draw engine.
pub struct Console<'a, W: Write> {
    state: AppState,
    cooldown: TimeDelta,
    out: &'a mut W,
    rolling: bool,
    cooldown_until: Option<DateTime<Utc>>,
}

impl<'a, W: Write> Console<'a, W> {
    /// Creates a console writing to `out`.
    pub fn new(state: AppState, config: &ConsoleConfig, out: &'a mut W) -> Self {
        Self {
            state,
            cooldown: config.cooldown,
            out,
            rolling: false,
            cooldown_until: None,
        }
    }

    /// Whether a draw is currently rolling.
    #[must_use]
    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    /// Time left before start is accepted again, if a cooldown is pending.
    #[must_use]
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        let until = self.cooldown_until?;
        Some((until - self.state.clock.now()).to_std().unwrap_or(Duration::ZERO))
    }

    /// Prints the title, the command summary and the start label.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the engine cannot be read or output fails.
    pub fn greet(&mut self) -> Result<(), AppError> {
        let status = get_draw_status(&self.state.engine)?;
        writeln!(self.out, "{}", render::TITLE)?;
        writeln!(self.out, "{}", render::HELP)?;
        writeln!(self.out, "{}", render::start_label(status.remaining))?;
        Ok(())
    }

    /// Dispatches one parsed input.
    ///
    /// # Errors
    ///
    /// Returns `AppError` on unrecoverable domain errors or output failure.
    pub fn handle(&mut self, input: Input) -> Result<Flow, AppError> {
        match input {
            Input::Stop | Input::Toggle if self.rolling => self.on_stop()?,
            Input::Start | Input::Toggle => self.on_start()?,
            Input::Stop => debug!("stop ignored while idle"),
            Input::Status => self.on_status()?,
            Input::Help => writeln!(self.out, "{}", render::HELP)?,
            Input::Quit => return Ok(Flow::Quit),
            Input::Unknown(text) => {
                writeln!(self.out, "Unknown command: {text}")?;
                writeln!(self.out, "{}", render::HELP)?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Start control: begins a draw and shows the first candidate.
    ///
    /// # Errors
    ///
    /// Returns `AppError` on unrecoverable domain errors or output failure.
    #[instrument(skip(self))]
    pub fn on_start(&mut self) -> Result<(), AppError> {
        if self.rolling {
            debug!("start ignored while rolling");
            return Ok(());
        }
        if let Some(until) = self.cooldown_until {
            if self.state.clock.now() < until {
                writeln!(self.out, "{}", render::COOLDOWN_NOTICE)?;
                return Ok(());
            }
            self.cooldown_until = None;
        }

        let command = BeginDraw {
            correlation_id: Uuid::new_v4(),
        };
        match handle_begin_draw(&command, self.state.clock.as_ref(), &self.state.engine) {
            Ok(events) => {
                log_events(&events);
                self.rolling = true;
                // Sample right away so a stop before the first tick still
                // has a displayed number to commit.
                self.on_tick()
            }
            Err(err) => self.recover(err),
        }
    }

    /// Timer tick: shows a fresh candidate while rolling.
    ///
    /// # Errors
    ///
    /// Returns `AppError` on unrecoverable domain errors or output failure.
    pub fn on_tick(&mut self) -> Result<(), AppError> {
        if !self.rolling {
            return Ok(());
        }
        let command = SampleCandidate {
            correlation_id: Uuid::new_v4(),
        };
        match handle_sample_candidate(&command, &*self.state.rng, &self.state.engine) {
            Ok(Some(candidate)) => {
                write!(self.out, "{}", render::rolling_line(candidate))?;
                self.out.flush()?;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => self.recover(err),
        }
    }

    /// Stop control: commits the displayed candidate and shows the winner,
    /// the history and what happens next.
    ///
    /// # Errors
    ///
    /// Returns `AppError` on unrecoverable domain errors or output failure.
    #[instrument(skip(self))]
    pub fn on_stop(&mut self) -> Result<(), AppError> {
        if !self.rolling {
            debug!("stop ignored while idle");
            return Ok(());
        }
        let command = CommitDraw {
            correlation_id: Uuid::new_v4(),
        };
        let committed =
            match handle_commit_draw(&command, self.state.clock.as_ref(), &self.state.engine) {
                Ok(committed) => committed,
                Err(err) => return self.recover(err),
            };
        self.rolling = false;
        log_events(&committed.events);

        writeln!(self.out)?;
        writeln!(self.out, "{}", render::winner_line(committed.winner))?;
        writeln!(self.out, "History:")?;
        for line in render::history_lines(&get_history(&self.state.engine)?) {
            writeln!(self.out, "  {line}")?;
        }

        if committed.remaining == 0 {
            writeln!(self.out, "{}", render::start_label(0))?;
        } else if self.cooldown > TimeDelta::zero() {
            self.cooldown_until = Some(self.state.clock.now() + self.cooldown);
            writeln!(
                self.out,
                "{}",
                render::cooldown_line(self.cooldown.num_milliseconds())
            )?;
        } else {
            writeln!(self.out, "{}", render::start_label(committed.remaining))?;
        }
        Ok(())
    }

    /// Called by the run loop once the cooldown has passed.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the engine cannot be read or output fails.
    pub fn on_cooldown_elapsed(&mut self) -> Result<(), AppError> {
        self.cooldown_until = None;
        let status = get_draw_status(&self.state.engine)?;
        writeln!(self.out, "{}", render::start_label(status.remaining))?;
        Ok(())
    }

    /// Prints the engine status as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the engine cannot be read or output fails.
    pub fn on_status(&mut self) -> Result<(), AppError> {
        let status = get_draw_status(&self.state.engine)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", serde_json::to_string_pretty(&status)?)?;
        Ok(())
    }

    /// Current engine snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the engine lock is poisoned.
    pub fn status(&self) -> Result<DrawStatusView, AppError> {
        Ok(get_draw_status(&self.state.engine)?)
    }

    /// Surfaces the user-facing domain errors and propagates the rest.
    fn recover(&mut self, err: DomainError) -> Result<(), AppError> {
        match err {
            DomainError::PoolExhausted => {
                warn!("start requested on an exhausted pool");
                writeln!(self.out, "{}", render::EXHAUSTED_NOTICE)?;
                Ok(())
            }
            DomainError::InvalidState(reason) => {
                warn!(%reason, "draw command rejected");
                Ok(())
            }
            other => Err(other.into()),
        }
    }
}

fn log_events(events: &[DrawEvent]) {
    for event in events {
        debug!(
            event_type = event.event_type(),
            sequence_number = event.metadata().sequence_number,
            payload = %event.to_payload(),
            "domain event"
        );
    }
}

/// Runs a console session until `quit` or end of input and returns the
/// final engine snapshot.
///
/// # Errors
///
/// Returns `AppError` on input/output failure or an unrecoverable domain
/// error.
pub async fn run<R, W>(
    state: AppState,
    config: &ConsoleConfig,
    input: R,
    out: &mut W,
) -> Result<DrawStatusView, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut console = Console::new(state, config, out);
    console.greet()?;

    let mut lines = input.lines();
    let mut ticker = tokio::time::interval(config.roll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let cooldown = console.cooldown_remaining();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed");
                    break;
                };
                if console.handle(Input::parse(&line))? == Flow::Quit {
                    info!("quit requested");
                    break;
                }
            }
            _ = ticker.tick(), if console.is_rolling() => console.on_tick()?,
            () = tokio::time::sleep(cooldown.unwrap_or_default()), if cooldown.is_some() => {
                console.on_cooldown_elapsed()?;
            }
        }
    }

    console.status()
}
