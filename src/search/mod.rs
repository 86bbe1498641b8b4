//! Site search - the index behind the sidebar search widget
//!
//! Entries are built from already-rendered page views, so each page's
//! content is resolved once per build.

use anyhow::Result;
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Page;
use crate::helpers::{page_href, strip_html};
use crate::render::PageView;

/// One searchable page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub title: String,
    pub url: String,
    /// Body text with tags stripped
    pub content: String,
}

impl SearchEntry {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// Every page of the site, in store order; serialized as `search.json`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page using the body of its rendered view
    pub fn push(&mut self, config: &SiteConfig, page: &Page, view: &PageView) {
        self.entries.push(SearchEntry {
            title: page.title.clone(),
            url: page_href(config, &page.slug),
            content: strip_html(&view.body),
        });
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Case-insensitive match on title or body; a blank query matches everything
    pub fn matching(&self, query: &str) -> Vec<&SearchEntry> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| needle.is_empty() || entry.matches(&needle))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
