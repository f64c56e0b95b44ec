//! Data Transfer Objects (DTOs) for the game server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs (client commands and server events)
//! - `http`: HTTP API response DTOs
//! - `conversion`: mapping between DTOs and domain types

pub mod conversion;
pub mod http;
pub mod websocket;
