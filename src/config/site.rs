//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Images
    /// Hero image used when a page's content carries no image
    pub default_image: String,
    /// Card image used when a child page's content carries no image
    pub default_subtopic_image: String,

    // Layout variant
    pub show_search: bool,
    pub heading_style: HeadingStyle,
    pub search_path: String,
    pub related_heading: String,
    pub navigation_heading: String,

    /// Run page bodies through the HTML sanitizer before injection
    pub sanitize: bool,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "General Studies".to_string(),
            description: String::new(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),

            default_image: "/images/default-general-studies.jpg".to_string(),
            default_subtopic_image: "/images/default-subtopic.jpg".to_string(),

            show_search: false,
            heading_style: HeadingStyle::Plain,
            search_path: "/search".to_string(),
            related_heading: "Related Topics".to_string(),
            navigation_heading: "Navigation".to_string(),

            sanitize: true,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Styling applied to headings inside the page body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    #[default]
    Plain,
    /// Centered, bold, underlined headings
    Extended,
}
