//! CLI command implementations.

pub mod trigger;
