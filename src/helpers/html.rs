//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Sanitizer for CMS page bodies: prose markup, media and inline styles, no scripts
pub fn body_sanitizer() -> ammonia::Builder<'static> {
    let mut builder = ammonia::Builder::default();

    builder.add_tags(&[
        "figure",
        "figcaption",
        "section",
        "video",
        "audio",
        "source",
        "picture",
    ]);
    builder.add_generic_attributes(&["class", "id"]);
    builder.add_generic_attribute_prefixes(&["data-"]);
    builder.add_tag_attributes("img", &["loading", "srcset", "sizes"]);
    builder.add_tag_attributes("source", &["src", "srcset", "type"]);
    builder.add_tag_attributes("video", &["src", "controls", "poster"]);
    builder.add_tag_attributes("audio", &["src", "controls"]);

    builder
}

/// Clean a page body with the given sanitizer
pub fn sanitize_html(sanitizer: &ammonia::Builder<'static>, html: &str) -> String {
    sanitizer.clean(html).to_string()
}
