//! Article content pipeline.
//!
//! Turns the raw data returned by the content API into HTML that is safe to
//! render in the reader:
//!
//! 1. [`recover_images`] puts back images the upstream renderer dropped,
//! 2. [`sanitize`] strips everything outside the tag/attribute allow-list,
//! 3. [`correct_legibility`] fixes inline colors written for a light theme.
//!
//! [`prepare_article`] runs all three, with steps 2 and 3 fused into a
//! single sanitizer pass.
//!
//! ```rust
//! use content::{ContentConfig, prepare_article};
//! use payloads::RawArticle;
//!
//! let article = RawArticle::new(
//!     "SCP-173",
//!     "<p>Item #: SCP-173</p><script>alert(1)</script>",
//!     "Item #: SCP-173\n[[=image 173.jpg]]",
//! );
//! let html = prepare_article(&article, &ContentConfig::default()).unwrap();
//! assert!(html.contains("local--files/scp-173/173.jpg"));
//! assert!(!html.contains("<script"));
//! ```

pub mod color;
pub mod config;
pub mod legibility;
pub mod recover;
pub mod sanitize;
pub mod telemetry;

use payloads::{PreparedArticle, RawArticle};

pub use color::{ParsedColor, contrast_ratio, parse_color, relative_luminance};
pub use config::ContentConfig;
pub use legibility::{correct_legibility, correct_style};
pub use recover::{RecoveredImageRef, recover_images};
pub use sanitize::{SanitizeError, sanitize, sanitize_and_correct};

#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("Article is {size} bytes, above the {limit} byte limit")]
    DocumentTooLarge { size: usize, limit: usize },
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),
}

/// Run the whole pipeline and report what was done.
///
/// On error the caller must withhold the article rather than render the raw
/// content.
#[tracing::instrument(
    name = "Prepare article",
    skip(article, config),
    fields(slug = %article.slug)
)]
pub fn prepare_article_report(
    article: &RawArticle,
    config: &ContentConfig,
) -> Result<PreparedArticle, ContentError> {
    let size = article.content.len() + article.source.len();
    if size > config.max_document_bytes {
        return Err(ContentError::DocumentTooLarge {
            size,
            limit: config.max_document_bytes,
        });
    }

    let images = recover::find_missing_images(
        &article.content,
        &article.source,
        article.slug.as_str(),
        config,
    );
    if !images.is_empty() {
        tracing::debug!(count = images.len(), "recovered dropped images");
    }
    let recovered = recover::insert_images(&article.content, &images);
    let html = sanitize_and_correct(&recovered)?;

    Ok(PreparedArticle {
        slug: article.slug.clone(),
        html,
        recovered_images: images.len(),
    })
}

/// Recover, sanitize and legibility-correct an article, returning the HTML.
pub fn prepare_article(
    article: &RawArticle,
    config: &ContentConfig,
) -> Result<String, ContentError> {
    prepare_article_report(article, config).map(|prepared| prepared.html)
}
