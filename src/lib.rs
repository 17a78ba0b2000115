//! enginex scaffolds Rails engines together with one dummy app per
//! persistence backend and configuration variant.
#![deny(unsafe_code)]

pub mod core;
pub mod generation;
pub mod infrastructure;

pub use crate::core::{Engine, Error, GenerationOptions, Result, TestFramework};
pub use generation::{GenerationReport, Pipeline};
