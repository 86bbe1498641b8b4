//! Page renderer - turns a `Page` into a view model and then into HTML
//!
//! The view model is plain data. Content resolution happens here, once per
//! render, and never fails: malformed content only empties the body.

use anyhow::Result;
use serde::Serialize;
use tera::Context;

use crate::config::{HeadingStyle, SiteConfig};
use crate::content::{resolve, resolve_child, Page};
use crate::helpers::{body_sanitizer, full_url_for, page_href, sanitize_html, url_for};
use crate::navigation::{NavItem, NavWidget, SiteTree};
use crate::search::{SearchEntry, SearchIndex};
use crate::templates::{ConfigData, TemplateRenderer};

const BASE_PROSE_CLASS: &str = "prose prose-lg max-w-none";
const EXTENDED_HEADING_CLASS: &str = "prose-headings:text-center prose-headings:font-bold prose-headings:border-b-2 prose-headings:pb-2";

/// Layout variant switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateOptions {
    pub show_search: bool,
    pub heading_style: HeadingStyle,
}

impl From<&SiteConfig> for TemplateOptions {
    fn from(config: &SiteConfig) -> Self {
        Self {
            show_search: config.show_search,
            heading_style: config.heading_style,
        }
    }
}

/// Everything the page template needs
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub id: String,
    pub slug: String,
    pub canonical: String,
    pub hero: HeroView,
    /// Related-topic cards; empty means the section is omitted
    pub related: Vec<CardView>,
    /// HTML body, injected without escaping
    pub body: String,
    pub prose_class: String,
    pub sidebar: SidebarView,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeroView {
    pub title: String,
    pub image: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub title: String,
    pub image: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SidebarView {
    pub search: Option<SearchView>,
    pub navigation: NavigationView,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationView {
    pub widget: NavWidget,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Serialize)]
struct SearchPageView<'a> {
    query: &'a str,
    action: String,
    canonical: String,
    results: Vec<&'a SearchEntry>,
}

/// Renders General Studies pages
pub struct PageRenderer {
    config: SiteConfig,
    options: TemplateOptions,
    templates: TemplateRenderer,
    sanitizer: Option<ammonia::Builder<'static>>,
    tree: Option<SiteTree>,
}

impl PageRenderer {
    /// Create a renderer with the variant options taken from config
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Self::with_options(config, TemplateOptions::from(config))
    }

    pub fn with_options(config: &SiteConfig, options: TemplateOptions) -> Result<Self> {
        let sanitizer = config.sanitize.then(body_sanitizer);
        Ok(Self {
            config: config.clone(),
            options,
            templates: TemplateRenderer::new()?,
            sanitizer,
            tree: None,
        })
    }

    /// Populate the sidebar navigation from the whole site
    pub fn with_site_tree(mut self, tree: SiteTree) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Build the view model for a page
    pub fn render(&self, page: &Page) -> PageView {
        let parsed = resolve(&page.content, &page.title);
        let hero = HeroView {
            image: url_for(&self.config, parsed.image_or(&self.config.default_image)),
            alt: parsed.title.clone(),
            title: parsed.title.clone(),
        };

        let related = page
            .children
            .iter()
            .map(|child| self.card(child))
            .collect();

        let body = match &self.sanitizer {
            Some(sanitizer) => sanitize_html(sanitizer, &parsed.content),
            None => parsed.content,
        };

        PageView {
            id: page.id.clone(),
            slug: page.slug.clone(),
            canonical: full_url_for(&self.config, &page.slug),
            hero,
            related,
            body,
            prose_class: self.prose_class(),
            sidebar: self.sidebar(page),
        }
    }

    /// Render a page to a complete HTML document
    pub fn render_html(&self, page: &Page) -> Result<String> {
        self.render_view(&self.render(page))
    }

    /// Render an already-built view to a complete HTML document
    pub fn render_view(&self, view: &PageView) -> Result<String> {
        tracing::debug!(
            "Rendering {:?} with {} related topics",
            view.slug,
            view.related.len()
        );

        let mut context = Context::new();
        context.insert("config", &ConfigData::from(&self.config));
        context.insert("page", view);
        self.templates.render("general_studies.html", &context)
    }

    /// Render the search page at `search_path`, listing entries matching `query`
    pub fn render_search(&self, index: &SearchIndex, query: &str) -> Result<String> {
        let results = index.matching(query);
        let search = SearchPageView {
            query,
            action: url_for(&self.config, &self.config.search_path),
            canonical: full_url_for(&self.config, &self.config.search_path),
            results,
        };

        let mut context = Context::new();
        context.insert("config", &ConfigData::from(&self.config));
        context.insert("search", &search);
        self.templates.render("search_results.html", &context)
    }

    fn card(&self, child: &Page) -> CardView {
        let parsed = resolve_child(child);
        CardView {
            title: child.title.clone(),
            image: url_for(
                &self.config,
                parsed.image_or(&self.config.default_subtopic_image),
            ),
            href: page_href(&self.config, &child.slug),
        }
    }

    fn sidebar(&self, page: &Page) -> SidebarView {
        let widget = NavWidget::for_page(page);
        let items = self
            .tree
            .as_ref()
            .map(|tree| tree.items(&self.config, &widget))
            .unwrap_or_default();

        SidebarView {
            search: self.options.show_search.then(|| SearchView {
                action: url_for(&self.config, &self.config.search_path),
            }),
            navigation: NavigationView { widget, items },
        }
    }

    fn prose_class(&self) -> String {
        match self.options.heading_style {
            HeadingStyle::Plain => BASE_PROSE_CLASS.to_string(),
            HeadingStyle::Extended => format!("{} {}", BASE_PROSE_CLASS, EXTENDED_HEADING_CLASS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::RawContent;
    use serde_json::json;

    fn renderer() -> PageRenderer {
        let config = SiteConfig {
            sanitize: false,
            ..SiteConfig::default()
        };
        PageRenderer::new(&config).unwrap()
    }

    fn econ_page() -> Page {
        Page::new("12", "Economy", "general-studies/economy").with_content(RawContent::from(
            r#"{"title":"Econ","content":"<p>Hi</p>","image":"/a.jpg"}"#,
        ))
    }

    #[test]
    fn test_render_resolved_content() {
        let view = renderer().render(&econ_page());
        assert_eq!(view.hero.image, "/a.jpg");
        assert_eq!(view.hero.title, "Econ");
        assert_eq!(view.hero.alt, "Econ");
        assert_eq!(view.body, "<p>Hi</p>");
        assert_eq!(view.canonical, "http://example.com/general-studies/economy");

        let html = renderer().render_html(&econ_page()).unwrap();
        assert!(html.contains("<p>Hi</p>"));
        assert!(html.contains(r#"src="/a.jpg""#));
    }

    #[test]
    fn test_render_malformed_content() {
        let page = Page::new("1", "Economy", "gs").with_content(RawContent::from("not json"));
        let view = renderer().render(&page);
        assert_eq!(view.hero.image, "/images/default-general-studies.jpg");
        assert_eq!(view.hero.title, "Economy");
        assert_eq!(view.body, "");
        assert!(renderer().render_html(&page).is_ok());
    }

    #[test]
    fn test_render_without_children_omits_related() {
        let view = renderer().render(&econ_page());
        assert!(view.related.is_empty());
        let html = renderer().render_html(&econ_page()).unwrap();
        assert!(!html.contains("Related Topics"));
        assert!(!html.contains("gs-topic-card"));
    }

    #[test]
    fn test_render_cards_in_order() {
        let page = econ_page().with_children(vec![
            Page::new("2", "Budget", "general-studies/economy/budget")
                .with_content(RawContent::from(r#"{"image":"/budget.jpg","content":"<p>secret</p>"}"#)),
            Page::new("3", "Banking", "general-studies/economy/banking")
                .with_content(RawContent::from(json!({}))),
            Page::new("4", "Trade", "general-studies/economy/trade")
                .with_content(RawContent::from("{broken")),
        ]);
        let view = renderer().render(&page);

        let hrefs: Vec<_> = view.related.iter().map(|c| c.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "/general-studies/economy/budget",
                "/general-studies/economy/banking",
                "/general-studies/economy/trade",
            ]
        );
        assert_eq!(view.related[0].image, "/budget.jpg");
        assert_eq!(view.related[1].image, "/images/default-subtopic.jpg");
        assert_eq!(view.related[2].image, "/images/default-subtopic.jpg");

        let html = renderer().render_html(&page).unwrap();
        assert!(html.contains("Related Topics"));
        assert_eq!(html.matches("gs-topic-card").count(), 3);
        assert!(!html.contains("secret"));
        let budget = html.find(">Budget<").unwrap();
        let banking = html.find(">Banking<").unwrap();
        assert!(budget < banking);
    }

    #[test]
    fn test_render_sidebar_variants() {
        let config = SiteConfig {
            show_search: true,
            heading_style: HeadingStyle::Extended,
            ..SiteConfig::default()
        };
        let renderer = PageRenderer::new(&config).unwrap();
        let view = renderer.render(&econ_page());
        assert_eq!(view.sidebar.search.as_ref().map(|s| s.action.as_str()), Some("/search"));
        assert!(view.prose_class.contains("prose-headings:text-center"));
        assert_eq!(view.sidebar.navigation.widget.base_path, "general-studies");
        assert_eq!(view.sidebar.navigation.widget.current_page_id, "12");
        assert!(view.sidebar.navigation.widget.hide_parent);

        let html = renderer.render_html(&econ_page()).unwrap();
        assert!(html.contains(r#"action="/search""#));
        assert!(html.contains(r#"data-base-path="general-studies""#));

        let plain = Page::new("1", "x", "y");
        let html = PageRenderer::new(&SiteConfig::default())
            .unwrap()
            .render_html(&plain)
            .unwrap();
        assert!(!html.contains("gs-search"));
    }

    #[test]
    fn test_render_sanitizes_when_enabled() {
        let page = Page::new("1", "X", "x").with_content(RawContent::from(json!({
            "content": "<p>ok</p><script>alert(1)</script>"
        })));
        let view = PageRenderer::new(&SiteConfig::default()).unwrap().render(&page);
        assert_eq!(view.body, "<p>ok</p>");

        let view = renderer().render(&page);
        assert_eq!(view.body, "<p>ok</p><script>alert(1)</script>");
    }

    #[test]
    fn test_render_escapes_titles() {
        let page = Page::new("1", "<b>Bold</b>", "x");
        let html = renderer().render_html(&page).unwrap();
        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt;"));
        assert!(!html.contains("<h1 class=\"gs-hero-title\"><b>"));
    }

    #[test]
    fn test_render_with_site_tree() {
        let root = Page::new("1", "General Studies", "gs")
            .with_children(vec![Page::new("2", "Economy", "gs/economy")]);
        let tree = SiteTree::from_pages(std::slice::from_ref(&root));
        let renderer = renderer().with_site_tree(tree);

        let html = renderer.render_html(&root.children[0]).unwrap();
        assert!(html.contains(r#"aria-current="page""#));
        assert!(html.contains(r#"href="/gs/economy""#));
    }

    #[test]
    fn test_render_is_idempotent() {
        let r = renderer();
        assert_eq!(
            r.render_html(&econ_page()).unwrap(),
            r.render_html(&econ_page()).unwrap()
        );
    }

    #[test]
    fn test_render_search_page() {
        let config = SiteConfig {
            sanitize: false,
            show_search: true,
            ..SiteConfig::default()
        };
        let renderer = PageRenderer::new(&config).unwrap();
        let economy = econ_page();
        let polity = Page::new("5", "Polity", "general-studies/polity")
            .with_content(RawContent::from(json!({ "content": "<p>Constitution</p>" })));

        let mut index = SearchIndex::new();
        for page in [&economy, &polity] {
            index.push(&config, page, &renderer.render(page));
        }

        let html = renderer.render_search(&index, "constitution").unwrap();
        assert!(html.contains(r#"action="/search""#));
        assert!(html.contains(r#"href="/general-studies/polity""#));
        assert!(!html.contains(r#"href="/general-studies/economy""#));
        assert!(html.contains(r#"value="constitution""#));

        let all = renderer.render_search(&index, "").unwrap();
        assert_eq!(all.matches("gs-search-result\"").count(), 2);
    }
}
