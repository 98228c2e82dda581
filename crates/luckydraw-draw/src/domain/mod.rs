//! Domain model for the Draw Engine context.

pub mod aggregates;
pub mod commands;
pub mod config;
pub mod events;
