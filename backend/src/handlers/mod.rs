//! HTTP handlers for the Crop Advisor API

pub mod crops;
pub mod health;
pub mod prediction;

pub use crops::*;
pub use health::*;
pub use prediction::*;
