//! Shared test helpers for console integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::TimeDelta;
use luckydraw_core::clock::{Clock, SystemClock};
use luckydraw_core::rng::DeterministicRng;
use luckydraw_draw::application::query_handlers::DrawStatusView;
use luckydraw_draw::domain::aggregates::DrawEngine;
use luckydraw_draw::domain::config::DrawConfig;
use luckydraw_test_support::MockRng;
use uuid::Uuid;

use luckydraw_console::config::ConsoleConfig;
use luckydraw_console::console;
use luckydraw_console::state::AppState;

/// Console settings with a fast roll interval and the given cooldown.
pub fn test_config(pool_size: u32, cooldown_ms: i64) -> ConsoleConfig {
    ConsoleConfig {
        draw: DrawConfig {
            pool_size,
            history_capacity: 5,
        },
        roll_interval: Duration::from_millis(5),
        cooldown: TimeDelta::milliseconds(cooldown_ms),
        seed: None,
    }
}

/// Build state with a `MockRng`, so every sample picks pool slot 0.
pub fn build_test_state(config: &ConsoleConfig) -> AppState {
    build_test_state_with_rng(config, MockRng)
}

/// Build state with a custom RNG and the system clock.
pub fn build_test_state_with_rng<R>(config: &ConsoleConfig, rng: R) -> AppState
where
    R: DeterministicRng + Send + 'static,
{
    let engine = DrawEngine::new(Uuid::new_v4(), config.draw).unwrap();
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(SystemClock);
    AppState::new(engine, rng, clock)
}

/// Run a scripted session and return the final status with everything the
/// console printed.
pub async fn run_script(
    state: AppState,
    config: &ConsoleConfig,
    script: &str,
) -> (DrawStatusView, String) {
    let mut out = Vec::new();
    let status = console::run(state, config, script.as_bytes(), &mut out)
        .await
        .unwrap();
    (status, String::from_utf8(out).unwrap())
}
