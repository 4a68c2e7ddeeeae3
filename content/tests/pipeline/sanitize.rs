use content::{sanitize, sanitize_and_correct};
use test_helpers::{LICENSE_BOX_HTML, init_test_tracing, mock::mock_content};

fn clean(html: &str) -> String {
    init_test_tracing();
    sanitize(html).expect("Sanitizer failed")
}

#[test]
fn scripts_are_removed_with_their_content() {
    let cleaned =
        clean(r#"<script>alert(1)</script><p style="color:red">hi</p>"#);
    assert!(cleaned.contains(r#"<p style="color:red">hi</p>"#));
    assert!(!cleaned.to_ascii_lowercase().contains("<script"));
    assert!(!cleaned.contains("alert(1)"));
}

#[test]
fn style_elements_and_comments_are_removed() {
    let cleaned = clean("<style>p { color: red }</style><!-- note --><p>ok</p>");
    assert_eq!(cleaned, "<p>ok</p>");
}

#[test]
fn disallowed_tags_are_dropped() {
    let cleaned = clean(
        r#"<iframe src="https://x.example"></iframe><form><input value="a"></form><object data="x"></object><p>ok</p>"#,
    );
    assert_eq!(cleaned, "<p>ok</p>");
}

#[test]
fn disallowed_attributes_are_dropped() {
    let cleaned = clean(
        r#"<p onclick="steal()" data-foo="1" lang="en" title="t">a</p>"#,
    );
    assert_eq!(cleaned, r#"<p title="t">a</p>"#);
}

#[test]
fn allowed_markup_survives() {
    let html = r#"<h2 id="desc">Description</h2><blockquote><p>x<sup>1</sup><sub>2</sub></p></blockquote><table class="wiki"><tbody><tr><th>a</th><td><code>b</code></td></tr></tbody></table><ul><li><em>c</em></li></ul><pre>d</pre>"#;
    assert_eq!(clean(html), html);
}

#[test]
fn links_keep_href_without_added_rel() {
    assert_eq!(
        clean(r#"<a href="https://scp-wiki.wikidot.com/">wiki</a>"#),
        r#"<a href="https://scp-wiki.wikidot.com/">wiki</a>"#
    );
}

#[test]
fn images_keep_src_and_alt_only() {
    let cleaned = clean(
        r#"<img src="https://scp-wiki.wdfiles.com/a.png" alt="a" width="10" loading="lazy">"#,
    );
    assert_eq!(cleaned, r#"<img src="https://scp-wiki.wdfiles.com/a.png" alt="a">"#);
}

#[test]
fn javascript_links_are_neutralized() {
    let cleaned = clean(
        r#"<a href="javascript:alert(1)">x</a><a href="  JaVaScRiPt:void(0)">y</a>"#,
    );
    assert!(!cleaned.to_ascii_lowercase().contains("javascript"));
    assert!(cleaned.contains(">x</a>"));
    assert!(cleaned.contains(">y</a>"));
}

#[test]
fn license_boxes_are_removed_at_any_depth() {
    let cleaned = clean(&format!(
        r#"<div><section><div class="note licensebox"><p>cc</p><div class="licensebox">inner</div></div></section></div><p>keep</p>{LICENSE_BOX_HTML}"#
    ));
    assert!(cleaned.contains("<p>keep</p>"));
    assert!(!cleaned.contains("licensebox"));
    assert!(!cleaned.contains("cc"));
    assert!(!cleaned.contains("inner"));
    assert!(!cleaned.contains("Cite this page"));
}

#[test]
fn empty_input_is_empty_output() {
    assert_eq!(clean(""), "");
}

#[test]
fn plain_sanitize_does_not_touch_styles() {
    let html = r#"<div style="background-color: white">x</div>"#;
    assert_eq!(clean(html), html);
}

#[test]
fn fused_pass_is_idempotent() {
    init_test_tracing();
    let once = sanitize_and_correct(&mock_content()).expect("Sanitizer failed");
    let twice = sanitize_and_correct(&once).expect("Sanitizer failed");
    assert_eq!(once, twice);
}
