//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join("_config.yml").exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("source/pages"))?;
    fs::create_dir_all(target_dir.join("source/images"))?;

    let config_content = r#"# Site
title: General Studies
description: ''
language: en

# URL
url: http://example.com
root: /

# Directory
source_dir: source
public_dir: public

# Images used when a page's content has none
default_image: /images/default-general-studies.jpg
default_subtopic_image: /images/default-subtopic.jpg

# Layout
show_search: false
heading_style: plain
search_path: /search
related_heading: Related Topics
navigation_heading: Navigation

# Clean page bodies before they are injected
sanitize: true
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    let sample_page = serde_json::json!({
        "id": 1,
        "title": "General Studies",
        "slug": "general-studies",
        "content": serde_json::json!({
            "title": "General Studies",
            "content": "<h2>Welcome</h2><p>Start writing your topic overview here.</p>",
        })
        .to_string(),
        "children": [
            {
                "id": 2,
                "title": "Indian Economy",
                "slug": "general-studies/economy",
                "content": { "content": "<p>Budget, banking and trade.</p>" }
            },
            {
                "id": 3,
                "title": "Polity",
                "slug": "general-studies/polity",
                "content": { "content": "<p>Constitution and governance.</p>" }
            }
        ]
    });

    fs::write(
        target_dir.join("source/pages/general-studies.json"),
        serde_json::to_string_pretty(&sample_page)?,
    )?;

    Ok(())
}
