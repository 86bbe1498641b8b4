//! List site content

use anyhow::Result;

use crate::content::Page;
use crate::Site;

/// Print the page tree
pub fn run(site: &Site) -> Result<()> {
    let store = site.load_pages()?;
    println!("Pages ({}):", store.flatten().len());
    for line in tree_lines(store.pages()) {
        println!("{}", line);
    }
    Ok(())
}

/// One indented line per page: `  title [/slug] (id)`
pub fn tree_lines(pages: &[Page]) -> Vec<String> {
    let mut lines = Vec::new();
    for page in pages {
        push_lines(page, 1, &mut lines);
    }
    lines
}

fn push_lines(page: &Page, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!(
        "{}{} [/{}] ({})",
        "  ".repeat(depth),
        page.title,
        page.slug,
        page.id
    ));
    for child in &page.children {
        push_lines(child, depth + 1, lines);
    }
}
