//! Wire types shared between the content-loading layer and the content
//! pipeline.

use derive_more::Display;
use serde::{Deserialize, Serialize};

pub mod responses;

pub use responses::PreparedArticle;

/// Article identifier as used by the content API, e.g. `SCP-173`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ArticleSlug(pub String);

impl ArticleSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the slug is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The form used inside per-article file URLs: trimmed and lower-cased.
    pub fn file_segment(&self) -> String {
        self.0.trim().to_lowercase()
    }
}

impl From<&str> for ArticleSlug {
    fn from(slug: &str) -> Self {
        Self(slug.to_string())
    }
}

/// Raw article data as returned by the content API.
///
/// `content` is the partially rendered HTML produced upstream and `source` is
/// the original wiki markup it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArticle {
    pub slug: ArticleSlug,
    #[serde(rename = "raw_content", default)]
    pub content: String,
    #[serde(rename = "raw_source", default)]
    pub source: String,
}

impl RawArticle {
    pub fn new(
        slug: impl Into<ArticleSlug>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            content: content.into(),
            source: source.into(),
        }
    }
}
