//! Browser chat front end served over HTTP with axum.

pub mod handlers;
mod page;
pub mod server;

pub use server::WebServer;
