//! Host framework adapters

pub mod app_generator;

pub use app_generator::{DEFAULT_RAILS_COMMAND, RailsAppGenerator};
