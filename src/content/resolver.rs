//! Content resolution: raw `content` field -> `ParsedContent`
//!
//! Decoding failures are recovered here and never reach the renderer. The
//! page still renders, just with an empty body.

use serde_json::Value;

use super::{ContentError, Page, ParsedContent, RawContent};

/// Resolve a raw content field, falling back to an empty body on decode failure
pub fn resolve(raw: &RawContent, fallback_title: &str) -> ParsedContent {
    match try_resolve(raw, fallback_title) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Error parsing content for {:?}: {}", fallback_title, e);
            ParsedContent::fallback(fallback_title)
        }
    }
}

/// Resolve a raw content field, reporting decode failures to the caller
pub fn try_resolve(raw: &RawContent, fallback_title: &str) -> Result<ParsedContent, ContentError> {
    match raw {
        RawContent::Text(text) => {
            let value: Value = serde_json::from_str(text)?;
            Ok(from_value(&value, fallback_title))
        }
        RawContent::Structured(value) => Ok(from_value(value, fallback_title)),
    }
}

/// Resolve a child entry for the related-topics grid
pub fn resolve_child(child: &Page) -> ParsedContent {
    match try_resolve(&child.content, &child.title) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Error parsing child content for {:?}: {}", child.slug, e);
            from_value(&Value::Object(Default::default()), &child.title)
        }
    }
}

/// Pick the known fields out of a decoded value; anything missing or mistyped is absent
fn from_value(value: &Value, fallback_title: &str) -> ParsedContent {
    let field = |name: &str| value.get(name).and_then(Value::as_str);

    ParsedContent {
        title: field("title").unwrap_or(fallback_title).to_string(),
        content: field("content").unwrap_or_default().to_string(),
        // An empty image path means "no image", same as a missing one
        image: field("image")
            .filter(|image| !image.is_empty())
            .map(str::to_string),
    }
}
