//! API Module
//!
//! Status and info DTOs shared with the HTTP server.

pub mod engine_status;

pub use engine_status::{CatalogStatus, EngineStatus, ModelInfo, ModelStatus};
