//! Generator module - writes every page of the store as static HTML

use anyhow::Result;
use std::fs;
use walkdir::WalkDir;

use crate::content::loader::{is_page_file, PageStore};
use crate::navigation::SiteTree;
use crate::render::PageRenderer;
use crate::search::SearchIndex;
use crate::Site;

/// Static site generator
pub struct Generator {
    site: Site,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Self {
        Self { site: site.clone() }
    }

    /// Generate the entire site, returning the number of pages written
    pub fn generate(&self, store: &PageStore) -> Result<usize> {
        fs::create_dir_all(&self.site.public_dir)?;

        // Copy source assets (images, etc.)
        self.copy_source_assets()?;

        let config = &self.site.config;
        let renderer =
            PageRenderer::new(config)?.with_site_tree(SiteTree::from_pages(store.pages()));

        let pages = store.flatten();
        let mut index = SearchIndex::new();
        for page in &pages {
            let view = renderer.render(page);
            let html = renderer.render_view(&view)?;
            self.write_html(&page.slug, &html)?;
            index.push(config, page, &view);
        }

        if config.show_search {
            self.generate_search(&renderer, &index)?;
        }

        Ok(pages.len())
    }

    /// Write a document to `<public>/<slug>/index.html`
    fn write_html(&self, slug: &str, html: &str) -> Result<()> {
        let slug = slug.trim_matches('/');
        let output_path = if slug.is_empty() {
            self.site.public_dir.join("index.html")
        } else {
            self.site.public_dir.join(slug).join("index.html")
        };

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(())
    }

    /// Write `search.json` and the search page the widget's form submits to
    fn generate_search(&self, renderer: &PageRenderer, index: &SearchIndex) -> Result<()> {
        let output_path = self.site.public_dir.join("search.json");
        fs::write(&output_path, index.to_json()?)?;

        let html = renderer.render_search(index, "")?;
        self.write_html(&self.site.config.search_path, &html)?;
        tracing::info!("Generated search page with {} entries", index.entries().len());

        Ok(())
    }

    /// Copy source assets (images, etc.) to public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            // Page files are rendered, not copied
            if !path.is_file() || is_page_file(path) {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            let dest = self.site.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}
