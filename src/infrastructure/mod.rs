//! Infrastructure layer - concrete implementations of domain ports

pub mod backends;
pub mod output;
pub mod rails;
pub mod shell;
pub mod templates;

pub use backends::BackendRegistry;
pub use rails::RailsAppGenerator;
pub use shell::*;
pub use templates::*;
