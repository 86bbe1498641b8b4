//! Content module - page model, content resolution and the page store

mod error;
pub mod loader;
mod page;
mod resolver;

pub use error::ContentError;
pub use page::{Page, ParsedContent, RawContent};
pub use resolver::{resolve, resolve_child, try_resolve};
