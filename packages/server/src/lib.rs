//! Sketchpad game server library.
//!
//! Authoritative room/session server for a real-time drawing-and-guessing
//! party game. Clients talk JSON over a WebSocket at `/ws`; a small HTTP API
//! exposes health and room history.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
