//! Sidebar navigation - the page tree shown next to a topic page
//!
//! Pages are nested by slug: `gs/economy/budget` sits under `gs/economy`.
//! The widget only shows pages sharing the current page's first slug segment.

use serde::Serialize;
use std::collections::HashSet;

use crate::config::SiteConfig;
use crate::content::Page;
use crate::helpers::page_href;

/// Parameters the sidebar passes to the navigation widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavWidget {
    pub current_page_id: String,
    pub base_path: String,
    pub hide_parent: bool,
}

impl NavWidget {
    /// Widget parameters for a page: rooted at its first slug segment, parent hidden
    pub fn for_page(page: &Page) -> Self {
        Self {
            current_page_id: page.id.clone(),
            base_path: page.base_path().to_string(),
            hide_parent: true,
        }
    }
}

/// One entry in the rendered navigation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: String,
    pub href: String,
    pub current: bool,
    pub children: Vec<NavItem>,
}

#[derive(Debug, Clone)]
struct NavNode {
    id: String,
    title: String,
    slug: String,
}

/// Flat index of every page in the site, in store order
#[derive(Debug, Clone, Default)]
pub struct SiteTree {
    nodes: Vec<NavNode>,
}

impl SiteTree {
    /// Index a set of top-level pages and all their descendants
    pub fn from_pages(pages: &[Page]) -> Self {
        let mut seen = HashSet::new();
        let nodes = pages
            .iter()
            .flat_map(Page::descendants)
            .filter(|p| seen.insert(p.slug.clone()))
            .map(|p| NavNode {
                id: p.id.clone(),
                title: p.title.clone(),
                slug: p.slug.trim_matches('/').to_string(),
            })
            .collect();
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build the navigation tree for a widget
    pub fn items(&self, config: &SiteConfig, widget: &NavWidget) -> Vec<NavItem> {
        let members: Vec<&NavNode> = self
            .nodes
            .iter()
            .filter(|n| first_segment(&n.slug) == widget.base_path)
            .collect();
        let member_slugs: HashSet<&str> = members.iter().map(|n| n.slug.as_str()).collect();

        let hidden = if widget.hide_parent {
            members
                .iter()
                .find(|n| n.id == widget.current_page_id)
                .and_then(|n| parent_slug(&n.slug))
        } else {
            None
        };

        // Nearest visible ancestor for every member; None puts it at the top level
        let parents: Vec<Option<&str>> = members
            .iter()
            .map(|n| {
                let mut parent = parent_slug(&n.slug);
                while let Some(p) = parent {
                    if Some(p) != hidden && member_slugs.contains(p) {
                        break;
                    }
                    parent = parent_slug(p);
                }
                parent
            })
            .collect();

        self.build(config, widget, &members, &parents, hidden, None)
    }

    fn build(
        &self,
        config: &SiteConfig,
        widget: &NavWidget,
        members: &[&NavNode],
        parents: &[Option<&str>],
        hidden: Option<&str>,
        parent: Option<&str>,
    ) -> Vec<NavItem> {
        members
            .iter()
            .zip(parents)
            .filter(|(node, p)| **p == parent && Some(node.slug.as_str()) != hidden)
            .map(|(node, _)| NavItem {
                title: node.title.clone(),
                href: page_href(config, &node.slug),
                current: node.id == widget.current_page_id,
                children: self.build(
                    config,
                    widget,
                    members,
                    parents,
                    hidden,
                    Some(node.slug.as_str()),
                ),
            })
            .collect()
    }
}

fn first_segment(slug: &str) -> &str {
    slug.split('/').next().unwrap_or_default()
}

fn parent_slug(slug: &str) -> Option<&str> {
    slug.rsplit_once('/').map(|(parent, _)| parent)
}
