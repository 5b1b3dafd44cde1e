//! Shared types and prediction core for the Crop Advisor service
//!
//! This crate contains the domain model shared between the backend server
//! and the browser helpers (via WASM). It performs no I/O.

pub mod models;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use models::*;
pub use pipeline::*;
pub use types::*;
pub use validation::*;
