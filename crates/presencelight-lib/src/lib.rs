//! Presencelight — mirror Microsoft Teams presence onto a WLED-style light.

pub mod color;
pub mod config;
pub mod error;
pub mod extractor;
pub mod light;
pub mod reconcile;
pub mod status;

pub use error::PresencelightError;
