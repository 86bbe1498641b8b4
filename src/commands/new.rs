//! Create a new page

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::content::loader::ContentLoader;
use crate::Site;

/// Create a new page.
///
/// A top-level page gets its own file under `pages/`. A page with a parent is
/// appended to the parent's `children` in the file that holds the parent, so
/// it shows up in the parent's related topics.
pub fn create_page(site: &Site, title: &str, parent: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let name = slug::slugify(title);
    if name.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    let parent = parent.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty());
    let slug = match parent {
        Some(parent) => format!("{}/{}", parent, name),
        None => name,
    };

    let files = ContentLoader::new(site).load_files()?;
    if files
        .iter()
        .flat_map(|(_, page)| page.descendants())
        .any(|page| page.slug.trim_matches('/') == slug)
    {
        anyhow::bail!("A page with slug {:?} already exists", slug);
    }

    let page = serde_json::json!({
        "id": now.timestamp_millis(),
        "title": title,
        "slug": slug,
        "content": {
            "title": title,
            "content": "",
        },
        "children": [],
    });

    let Some(parent) = parent else {
        return write_top_level(site, &slug, &page);
    };

    let (file_path, _) = files
        .iter()
        .find(|(_, tree)| {
            tree.descendants()
                .iter()
                .any(|p| p.slug.trim_matches('/') == parent)
        })
        .ok_or_else(|| anyhow!("Unknown parent page {:?}", parent))?;

    let mut tree: Value = serde_json::from_str(&fs::read_to_string(file_path)?)?;
    let node = find_node(&mut tree, parent)
        .ok_or_else(|| anyhow!("Parent {:?} not found in {:?}", parent, file_path))?;
    append_child(node, page)?;
    fs::write(file_path, serde_json::to_string_pretty(&tree)?)?;

    println!("Added {:?} to {:?}", slug, file_path);

    Ok(file_path.clone())
}

fn write_top_level(site: &Site, slug: &str, page: &Value) -> Result<PathBuf> {
    let target_dir = site.source_dir.join("pages");
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.json", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }
    fs::write(&file_path, serde_json::to_string_pretty(page)?)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// The page node with the given slug, searching depth first
fn find_node<'a>(node: &'a mut Value, slug: &str) -> Option<&'a mut Value> {
    if node.get("slug").and_then(Value::as_str).map(|s| s.trim_matches('/')) == Some(slug) {
        return Some(node);
    }
    node.get_mut("children")?
        .as_array_mut()?
        .iter_mut()
        .find_map(|child| find_node(child, slug))
}

fn append_child(node: &mut Value, child: Value) -> Result<()> {
    let fields = node
        .as_object_mut()
        .ok_or_else(|| anyhow!("Parent page is not a JSON object"))?;

    // `children` may be missing or null
    let children = fields.entry("children").or_insert(Value::Null);
    if !children.is_array() {
        *children = Value::Array(Vec::new());
    }
    if let Value::Array(children) = children {
        children.push(child);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use crate::render::PageRenderer;

    #[test]
    fn test_create_top_level_page() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_page(&site, "Indian Economy", None).unwrap();
        assert!(path.ends_with("pages/indian-economy.json"));

        let store = site.load_pages().unwrap();
        let page = &store.pages()[0];
        assert_eq!(page.slug, "indian-economy");
        assert_eq!(page.title, "Indian Economy");

        assert!(create_page(&site, "Indian Economy", None).is_err());
        assert!(create_page(&site, "!!!", None).is_err());
    }

    #[test]
    fn test_create_page_appends_to_parent() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_page(&site, "Geography", Some("/general-studies/")).unwrap();
        assert!(path.ends_with("pages/general-studies.json"));

        let store = site.load_pages().unwrap();
        assert_eq!(store.pages().len(), 1);
        let parent = store.find("general-studies").unwrap();
        // Numeric ids of existing pages survive the rewrite
        assert_eq!(parent.id, "1");

        let renderer = PageRenderer::new(&site.config).unwrap();
        let view = renderer.render(parent);
        let hrefs: Vec<_> = view.related.iter().map(|card| card.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "/general-studies/economy",
                "/general-studies/polity",
                "/general-studies/geography",
            ]
        );
        let html = renderer.render_html(parent).unwrap();
        assert!(html.contains(r#"href="/general-studies/geography""#));

        create_page(&site, "Fiscal Policy", Some("general-studies/economy")).unwrap();
        let store = site.load_pages().unwrap();
        let economy = store.find("general-studies/economy").unwrap();
        assert_eq!(economy.children[0].slug, "general-studies/economy/fiscal-policy");
    }

    #[test]
    fn test_create_page_rejects_unknown_parent_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        let site = Site::new(dir.path()).unwrap();

        let err = create_page(&site, "Geography", Some("no-such-topic")).unwrap_err();
        assert!(err.to_string().contains("Unknown parent"));
        assert!(create_page(&site, "Polity", Some("general-studies")).is_err());

        let store = site.load_pages().unwrap();
        assert_eq!(store.flatten().len(), 3);
    }
}
