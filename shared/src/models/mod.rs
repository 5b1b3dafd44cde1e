//! Domain models for the Crop Advisor service

mod crop;
mod outcome;

pub use crop::*;
pub use outcome::*;
