//! HTTP API: session-scoped inventory over axum.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod session;
