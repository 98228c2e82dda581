//! Lucky Draw Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the draw
//! context and its front ends depend on. It contains no presentation code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod rng;
