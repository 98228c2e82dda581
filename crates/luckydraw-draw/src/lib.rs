//! Lucky Draw — Draw Engine bounded context.
//!
//! Owns the pool of undrawn numbers, the set of drawn numbers and a
//! short newest-first history of winners. A draw rolls through random
//! candidates and commits exactly one of them; a committed number never
//! comes back.

pub mod application;
pub mod domain;
