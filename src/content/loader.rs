//! Content loader - loads the page store from JSON files in the source directory

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::Page;
use crate::Site;

/// All pages of a site, as top-level trees
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Vec<Page>,
}

impl PageStore {
    /// Build a store, reporting duplicate slugs once
    pub fn new(pages: Vec<Page>) -> Self {
        {
            let mut seen = HashSet::new();
            for page in pages.iter().flat_map(Page::descendants) {
                if !seen.insert(page.slug.as_str()) {
                    tracing::warn!(
                        "Duplicate slug {:?} (page {}), keeping the first",
                        page.slug,
                        page.id
                    );
                }
            }
        }
        Self { pages }
    }

    /// Top-level pages in load order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Every page and descendant, depth first, with duplicate slugs dropped
    pub fn flatten(&self) -> Vec<&Page> {
        let mut seen = HashSet::new();
        self.pages
            .iter()
            .flat_map(Page::descendants)
            .filter(|page| seen.insert(page.slug.as_str()))
            .collect()
    }

    /// Find a page anywhere in the store by slug
    pub fn find(&self, slug: &str) -> Option<&Page> {
        let slug = slug.trim_matches('/');
        self.pages
            .iter()
            .flat_map(Page::descendants)
            .find(|p| p.slug == slug)
    }
}

/// Loads pages from the source directory
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load every `*.json` page file under the source directory
    pub fn load(&self) -> Result<PageStore> {
        let pages = self.load_files()?.into_iter().map(|(_, page)| page).collect();
        Ok(PageStore::new(pages))
    }

    /// Load page trees together with the file each one came from
    pub fn load_files(&self) -> Result<Vec<(PathBuf, Page)>> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files: Vec<_> = WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && is_page_file(p))
            .collect();
        files.sort();

        let mut pages = Vec::new();
        for path in files {
            match load_page(&path) {
                Ok(page) => pages.push((path, page)),
                Err(e) => {
                    tracing::warn!("Failed to load page {:?}: {}", path, e);
                }
            }
        }

        Ok(pages)
    }
}

/// Load a single page tree from a file
fn load_page(path: &Path) -> Result<Page> {
    let content = fs::read_to_string(path)?;
    let page: Page = serde_json::from_str(&content)?;
    Ok(page)
}

/// Check if a file is a page file
pub fn is_page_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "json")
        .unwrap_or(false)
}
