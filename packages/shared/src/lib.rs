//! Shared utilities for the Sketchpad workspace (logging and time).

pub mod logger;
pub mod time;
