//! Lucky Draw — terminal front end.
//!
//! Plays the presentation-layer role around the draw engine: a periodic
//! rolling display, a stop control that commits the displayed number, the
//! remaining-count label, the winner history and a short cooldown between
//! draws.

pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod render;
pub mod state;
