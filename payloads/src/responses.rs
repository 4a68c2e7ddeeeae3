use serde::{Deserialize, Serialize};

use crate::ArticleSlug;

/// A fully prepared article, safe to hand to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedArticle {
    pub slug: ArticleSlug,
    /// Sanitized, legibility-corrected HTML.
    pub html: String,
    /// Number of images that were missing upstream and got re-inserted.
    pub recovered_images: usize,
}
