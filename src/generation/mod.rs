//! Generation domain module - orchestrates the scaffolding workflow
//!
//! A run is an ordered plan of numbered steps: the engine skeleton first, then
//! one group of steps per dummy app variant. The plan is built once from the
//! immutable options and executed strictly in order.

pub mod pipeline;
pub mod steps;
pub mod traits;
pub mod variants;

pub use pipeline::*;
pub use steps::*;
pub use traits::*;
pub use variants::*;
