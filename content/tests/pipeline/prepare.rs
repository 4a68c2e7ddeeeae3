use content::{
    ContentConfig, ContentError, prepare_article, prepare_article_report,
    sanitize_and_correct,
};
use test_helpers::{
    article, count_occurrences, init_test_tracing,
    mock::{MOCK_SLUG, mock_article},
};

#[test]
fn mock_article_is_recovered_sanitized_and_corrected() -> anyhow::Result<()> {
    init_test_tracing();
    let prepared = prepare_article_report(&mock_article(), &ContentConfig::default())?;

    assert_eq!(prepared.slug.as_str(), MOCK_SLUG);
    assert_eq!(prepared.recovered_images, 3);

    let html = &prepared.html;
    for name in ["173.jpg", "statue-side.jpg", "cell.jpg", "addendum.png"] {
        assert_eq!(count_occurrences(html, &format!("scp-173/{name}")), 1, "{name}");
    }
    assert!(html.contains(
        r#"src="https://scp-wiki.wdfiles.com/local--files/scp-173/addendum.png""#
    ));
    assert!(!html.contains("tracker.png"));
    assert!(!html.contains("footer-arrow.png"));
    assert!(!html.contains("license"));
    assert!(!html.contains("Cite this page"));
    assert!(!html.contains("onclick"));
    assert!(!html.contains("loading="));
    assert!(!html.to_ascii_lowercase().contains("javascript"));
    assert!(html.contains("color: #333; background-color: #f5f5f5;"));
    assert!(html.contains(
        "background-color: #fff; border: 1px solid #ccc; color: #1a1a1a;"
    ));
    Ok(())
}

#[test]
fn recovered_images_are_placed_by_section() -> anyhow::Result<()> {
    init_test_tracing();
    let html = prepare_article(&mock_article(), &ContentConfig::default())?;

    let position = |needle: &str| {
        html.find(needle)
            .unwrap_or_else(|| panic!("{needle} missing from output"))
    };
    let statue = position("statue-side.jpg");
    let first_rule = position("<hr");
    let cell = position("cell.jpg");
    let addendum = position("addendum.png");
    let second_rule = first_rule + 1 + html[first_rule + 1..].find("<hr").unwrap();

    assert!(statue < position("173.jpg"));
    assert!(first_rule < cell);
    assert!(cell < addendum);
    assert!(addendum < second_rule);
    Ok(())
}

#[test]
fn prepared_html_is_stable_under_another_pass() -> anyhow::Result<()> {
    init_test_tracing();
    let html = prepare_article(&mock_article(), &ContentConfig::default())?;
    assert_eq!(sanitize_and_correct(&html)?, html);
    Ok(())
}

#[test]
fn article_without_source_is_only_sanitized() -> anyhow::Result<()> {
    init_test_tracing();
    let raw = article("SCP-002", r#"<p style="color:red">hi</p><script>x</script>"#, "");
    let prepared = prepare_article_report(&raw, &ContentConfig::default())?;
    assert_eq!(prepared.recovered_images, 0);
    assert_eq!(
        prepared.html,
        r#"<p style="color:red; background-color: #f5f5f5;">hi</p>"#
    );
    Ok(())
}

#[test]
fn oversized_articles_are_rejected() {
    init_test_tracing();
    let config = ContentConfig {
        max_document_bytes: 16,
        ..ContentConfig::default()
    };
    let raw = article("SCP-173", "<p>far more than sixteen bytes</p>", "");
    match prepare_article(&raw, &config) {
        Err(ContentError::DocumentTooLarge { size, limit }) => {
            assert_eq!(size, 34);
            assert_eq!(limit, 16);
        }
        other => panic!("expected DocumentTooLarge, got {other:?}"),
    }
}
