//! Helper functions for templates
//!
//! URL generation, HTML escaping and body sanitization shared by the
//! renderer, the generator and the template filters.

mod html;
mod url;

pub use html::*;
pub use url::*;
