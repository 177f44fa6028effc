//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server exposing the v1 credit cards operations.

mod handlers;
mod server;

pub use handlers::CORRELATION_ID_HEADER;
pub use server::HttpServer;
