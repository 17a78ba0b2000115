//! Core types shared by every layer: errors, options and engine naming.

pub mod config;
pub mod engine;
pub mod error;
pub mod utils;

pub use config::{GenerationOptions, TestFramework};
pub use engine::Engine;
pub use error::{Error, Result};
