//! # devicegate-api
//!
//! HTTP API layer for DeviceGate built on Axum.
//!
//! Provides the device endpoints, health check, bearer token extraction,
//! request validation, CORS and logging middleware, DTOs, error mapping,
//! and the server bootstrap that wires the session store, snapshot
//! persister and graceful shutdown together.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
