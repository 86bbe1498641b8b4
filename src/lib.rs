//! general-studies: renders "General Studies" topic pages
//!
//! Pages come from a JSON page store. Each page's content field is resolved
//! into a title, an HTML body and a hero image, and the page is rendered with
//! embedded Tera templates: hero, related-topic cards, body and sidebar.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod navigation;
pub mod render;
pub mod search;
pub mod server;
pub mod templates;

#[cfg(test)]
mod test_util;

use anyhow::Result;
use std::path::Path;

/// A site on disk: configuration plus resolved directories
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Source directory holding page JSON files and assets
    pub source_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Open a site from a directory, using default config if `_config.yml` is missing
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        })
    }

    /// Load every page from the source directory
    pub fn load_pages(&self) -> Result<content::loader::PageStore> {
        content::loader::ContentLoader::new(self).load()
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
