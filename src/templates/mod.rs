//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary, so a site needs nothing beyond
//! its config and page files.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::html_escape;

/// Template renderer with the embedded page theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Page bodies are injected as HTML; text fields go through escape_html
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("studies/layout.html")),
            (
                "general_studies.html",
                include_str!("studies/general_studies.html"),
            ),
            (
                "search_results.html",
                include_str!("studies/search_results.html"),
            ),
            // Partials
            (
                "partials/macros.html",
                include_str!("studies/partials/macros.html"),
            ),
            (
                "partials/hero.html",
                include_str!("studies/partials/hero.html"),
            ),
            (
                "partials/related.html",
                include_str!("studies/partials/related.html"),
            ),
            (
                "partials/search.html",
                include_str!("studies/partials/search.html"),
            ),
        ])?;

        tera.register_filter("escape_html", escape_html_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape HTML special characters
fn escape_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::String(s) => s.clone(),
        tera::Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(html_escape(&s)))
}

/// Site-level values every template sees as `config`
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub related_heading: String,
    pub navigation_heading: String,
    pub version: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            related_heading: config.related_heading.clone(),
            navigation_heading: config.navigation_heading.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
