//! Development server - renders pages on demand from the source directory
//!
//! The rendered site is kept in memory and rebuilt only when `_config.yml` or
//! a page file changes, so edits show up on refresh without a manual rebuild.
//! Paths that don't match a page slug are served as static assets from the
//! source directory; page JSON files are never served.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use walkdir::WalkDir;

use crate::content::loader::is_page_file;
use crate::navigation::SiteTree;
use crate::render::PageRenderer;
use crate::search::SearchIndex;
use crate::Site;

/// Modification time and size of every file a build reads
type Fingerprint = Vec<(PathBuf, Option<SystemTime>, u64)>;

/// Server state
struct ServerState {
    site: Site,
    snapshot: Mutex<Option<Arc<Snapshot>>>,
}

/// One in-memory build of the site
struct Snapshot {
    fingerprint: Fingerprint,
    site: Site,
    /// Rendered documents keyed by slug
    pages: HashMap<String, String>,
    index: SearchIndex,
}

/// What a request path resolved to
enum Rendered {
    Html(String),
    Json(String),
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Build the router serving a site
pub fn router(site: &Site) -> Router {
    let state = Arc::new(ServerState {
        site: site.clone(),
        snapshot: Mutex::new(None),
    });

    Router::new()
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = router(site);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Strip the site root from a request path, matching whole segments only
fn request_slug(root: &str, path: &str) -> Option<String> {
    let root = root.trim_matches('/');
    let path = path.trim_matches('/');
    if root.is_empty() {
        return Some(path.to_string());
    }

    let rest = path.strip_prefix(root)?;
    if rest.is_empty() {
        return Some(String::new());
    }
    rest.strip_prefix('/').map(|rest| rest.to_string())
}

fn fingerprint(site: &Site) -> Fingerprint {
    let config_path = site.base_dir.join("_config.yml");
    let pages = WalkDir::new(&site.source_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_page_file(p));

    let mut files: Vec<PathBuf> = std::iter::once(config_path).chain(pages).collect();
    files.sort();
    files
        .into_iter()
        .map(|path| {
            let meta = path.metadata().ok();
            let modified = meta.as_ref().and_then(|m| m.modified().ok());
            let len = meta.map(|m| m.len()).unwrap_or(0);
            (path, modified, len)
        })
        .collect()
}

impl Snapshot {
    /// Load and render every page, resolving each page's content once
    fn build(site: Site, fingerprint: Fingerprint) -> Result<Self> {
        let store = site.load_pages()?;
        let renderer =
            PageRenderer::new(&site.config)?.with_site_tree(SiteTree::from_pages(store.pages()));

        let mut pages = HashMap::new();
        let mut index = SearchIndex::new();
        for page in store.flatten() {
            let view = renderer.render(page);
            let html = renderer.render_view(&view)?;
            pages.insert(page.slug.trim_matches('/').to_string(), html);
            index.push(&site.config, page, &view);
        }
        tracing::info!("Rendered {} pages", pages.len());

        Ok(Self {
            fingerprint,
            site,
            pages,
            index,
        })
    }

    fn respond(&self, slug: &str, query: &str) -> Result<Option<Rendered>> {
        let config = &self.site.config;
        if config.show_search {
            if slug == config.search_path.trim_matches('/') {
                let renderer = PageRenderer::new(config)?;
                return Ok(Some(Rendered::Html(renderer.render_search(&self.index, query)?)));
            }
            if slug == "search.json" {
                return Ok(Some(Rendered::Json(self.index.to_json()?)));
            }
        }

        Ok(self.pages.get(slug).cloned().map(Rendered::Html))
    }
}

impl ServerState {
    /// The current build, rebuilt when config or page files have changed
    fn snapshot(&self) -> Result<Arc<Snapshot>> {
        // Pick up config edits without a restart
        let site = Site::new(&self.site.base_dir)?;
        let fingerprint = fingerprint(&site);

        let mut cached = self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(snapshot) = cached.as_ref() {
            if snapshot.fingerprint == fingerprint {
                return Ok(Arc::clone(snapshot));
            }
        }

        let snapshot = Arc::new(Snapshot::build(site, fingerprint)?);
        *cached = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

/// Fallback handler: pages and search first, then static assets
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    if let Some(slug) = request_slug(&state.site.config.root, request.uri().path()) {
        let query = Query::<SearchParams>::try_from_uri(request.uri())
            .map(|Query(params)| params.q)
            .unwrap_or_default();

        let task_state = Arc::clone(&state);
        let rendered = tokio::task::spawn_blocking(move || {
            task_state.snapshot()?.respond(&slug, &query)
        })
        .await;

        match rendered {
            Ok(Ok(Some(Rendered::Html(html)))) => return Html(html).into_response(),
            Ok(Ok(Some(Rendered::Json(json)))) => {
                return ([(header::CONTENT_TYPE, "application/json")], json).into_response()
            }
            Ok(Ok(None)) => {}
            Ok(Err(e)) => {
                tracing::error!("Render failed: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Render failed").into_response();
            }
            Err(e) => {
                tracing::error!("Render task failed: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
            }
        }
    }

    // Page files are rendered, not served
    if is_page_file(Path::new(request.uri().path())) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let mut service = ServeDir::new(&state.site.source_dir);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use crate::test_util::{capture_logs, warn_count};
    use axum::body::to_bytes;
    use tower::ServiceExt;

    async fn get(app: Router, path: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    fn test_site() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        std::fs::write(dir.path().join("source/images/logo.txt"), "logo").unwrap();
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[tokio::test]
    async fn test_serves_page_by_slug() {
        let (_dir, site) = test_site();
        let (status, body) = get(router(&site), "/general-studies/economy").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Indian Economy"));
        assert!(body.contains("<p>Budget, banking and trade.</p>"));
    }

    #[tokio::test]
    async fn test_serves_static_assets() {
        let (_dir, site) = test_site();
        let (status, body) = get(router(&site), "/images/logo.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "logo");
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let (_dir, site) = test_site();
        let (status, _) = get(router(&site), "/no-such-topic").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    fn search_site() -> (tempfile::TempDir, Site) {
        let (dir, _) = test_site();
        let config_path = dir.path().join("_config.yml");
        let config = std::fs::read_to_string(&config_path).unwrap();
        std::fs::write(
            &config_path,
            config.replace("show_search: false", "show_search: true"),
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[tokio::test]
    async fn test_search_form_target_resolves() {
        let (_dir, site) = search_site();
        let app = router(&site);

        let (status, page) = get(app.clone(), "/general-studies").await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains(r#"action="/search""#));

        let (status, body) = get(app.clone(), "/search?q=economy").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/general-studies/economy""#));
        assert!(!body.contains(r#"href="/general-studies/polity""#));
        assert!(body.contains(r#"value="economy""#));

        let (status, json) = get(app, "/search.json").await;
        assert_eq!(status, StatusCode::OK);
        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_search_disabled_is_not_found() {
        let (_dir, site) = test_site();
        let (status, _) = get(router(&site), "/search?q=economy").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_page_files_are_not_served() {
        let (_dir, site) = test_site();
        let (status, _) = get(router(&site), "/pages/general-studies.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_request_slug_matches_whole_segments() {
        assert_eq!(request_slug("/", "/gs/economy").as_deref(), Some("gs/economy"));
        assert_eq!(request_slug("/gs/", "/gs/economy/").as_deref(), Some("economy"));
        assert_eq!(request_slug("/gs/", "/gs").as_deref(), Some(""));
        assert_eq!(request_slug("/gs/", "/gsx/economy"), None);
        assert_eq!(request_slug("/gs/", "/other"), None);
    }

    #[test]
    fn test_snapshot_reused_between_requests() {
        let (dir, _) = test_site();
        std::fs::write(
            dir.path().join("source/pages/dup.json"),
            r#"{"id": 9, "title": "Dup", "slug": "general-studies/economy"}"#,
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        let state = ServerState {
            site,
            snapshot: Mutex::new(None),
        };

        let (first, logs) = capture_logs(|| state.snapshot().unwrap());
        assert_eq!(warn_count(&logs), 1, "{logs}");

        let (second, logs) = capture_logs(|| state.snapshot().unwrap());
        assert_eq!(warn_count(&logs), 0, "{logs}");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.pages.contains_key("general-studies/economy"));
    }
}
