//! Page and content models

use serde::{Deserialize, Deserializer, Serialize};

/// Custom deserializer that accepts a page id as either a string or a number
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct StringOrNumber;

    impl<'de> Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

/// `children: null` is treated the same as a missing field
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Page>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Page>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A content node supplied by the page store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Store identifier, stringified when numeric
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Page title
    pub title: String,

    /// URL path without the leading slash, e.g. `general-studies/economy`
    pub slug: String,

    /// Raw content field, either a JSON-encoded string or an object
    #[serde(default)]
    pub content: RawContent,

    /// Sub-topic pages, in display order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<Page>,
}

impl Page {
    /// Create a page with structured content and no children
    pub fn new(id: impl Into<String>, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            content: RawContent::default(),
            children: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: RawContent) -> Self {
        self.content = content;
        self
    }

    pub fn with_children(mut self, children: Vec<Page>) -> Self {
        self.children = children;
        self
    }

    /// First `/`-separated segment of the slug
    pub fn base_path(&self) -> &str {
        self.slug.split('/').next().unwrap_or_default()
    }

    /// This page followed by all of its descendants, depth first
    pub fn descendants(&self) -> Vec<&Page> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }
}

/// The raw `content` field as stored: text to be decoded, or already structured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawContent {
    Text(String),
    Structured(serde_json::Value),
}

impl Default for RawContent {
    fn default() -> Self {
        RawContent::Structured(serde_json::Value::Object(Default::default()))
    }
}

impl From<&str> for RawContent {
    fn from(s: &str) -> Self {
        RawContent::Text(s.to_string())
    }
}

impl From<serde_json::Value> for RawContent {
    fn from(value: serde_json::Value) -> Self {
        RawContent::Structured(value)
    }
}

/// Normalized `{ title, content, image }` view of a page's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedContent {
    pub title: String,
    /// HTML body
    pub content: String,
    pub image: Option<String>,
}

impl ParsedContent {
    /// Fallback used when the content field can't be decoded
    pub fn fallback(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: String::new(),
            image: None,
        }
    }

    /// The content image, or `default` when none is set
    pub fn image_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.image.as_deref().unwrap_or(default)
    }
}
