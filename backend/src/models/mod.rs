//! Domain models for the Crop Advisor server
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
