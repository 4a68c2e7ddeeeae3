use std::sync::LazyLock;

use content::telemetry;
use payloads::RawArticle;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub mod mock;

/// Rendered licensing boilerplate as the upstream converter emits it.
pub const LICENSE_BOX_HTML: &str = r#"<div class="licensebox"><div class="collapsible-block"><p>Cite this page as: <a href="https://scp-wiki.wikidot.com/">SCP Wiki</a></p><img src="https://scp-wiki.wdfiles.com/local--files/component:license-box/cc-by-sa.png" alt="" /></div></div>"#;

/// Licensing include as it appears at the end of article source.
pub const LICENSE_BOX_SOURCE: &str = "[[include :scp-wiki:component:license-box]]\n=====\n> **Filename:** license-image.png\n[[image license-image.png]]\n[[include :scp-wiki:component:license-box-end]]";

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let subscriber =
        telemetry::get_subscriber("error".into(), std::io::stderr);
    let _ = LogTracer::init();
    let _ = subscriber.try_init();
});

/// Install an error-level subscriber once per test binary. `RUST_LOG`
/// overrides the level when debugging a failing test.
pub fn init_test_tracing() {
    LazyLock::force(&TRACING);
}

pub fn article(slug: &str, content: &str, source: &str) -> RawArticle {
    RawArticle::new(slug, content, source)
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
