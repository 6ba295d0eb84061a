//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion API (OpenAI-compatible HTTP, mock for offline runs)
//! - Session storage (in-memory)
//! - API key sources (secrets file, environment, terminal prompt)
//!
//! plus the front ends: CLI controllers and the web chat server.

pub mod adapter;
pub mod api;
pub mod web;

pub use adapter::*;
pub use web::WebServer;
