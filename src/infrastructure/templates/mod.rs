//! Template infrastructure - repositories and the materializer

pub mod embedded_repository;
pub mod filesystem_loader;
pub mod materializer;
pub mod traits;
pub mod types;

pub use embedded_repository::EmbeddedTemplateRepository;
pub use filesystem_loader::FileSystemTemplateLoader;
pub use materializer::{TemplateMaterializer, WriteOutcome};
pub use traits::TemplateRepository;
pub use types::{RawTemplateFile, RenderContext, TemplateEntry};
