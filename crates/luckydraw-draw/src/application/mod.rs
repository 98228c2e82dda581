//! Application layer for the Draw Engine context.

pub mod command_handlers;
pub mod query_handlers;
