use content::{correct_legibility, sanitize, sanitize_and_correct};
use test_helpers::init_test_tracing;

fn correct(html: &str) -> String {
    init_test_tracing();
    correct_legibility(html)
}

#[test]
fn light_background_gets_dark_text() {
    let corrected = correct(r#"<div style="background-color: white">x</div>"#);
    assert!(corrected.contains("color: #1a1a1a"));
    assert_eq!(
        corrected,
        r#"<div style="background-color: white; color: #1a1a1a;">x</div>"#
    );
}

#[test]
fn dark_text_gets_light_background() {
    let corrected = correct(r#"<span style="color: black">x</span>"#);
    assert!(corrected.contains("background-color: #f5f5f5"));
}

#[test]
fn explicit_pair_is_unchanged() {
    let html = r#"<p style="color: black; background-color: white">x</p>"#;
    assert_eq!(correct(html), html);
}

#[test]
fn unstyled_and_light_text_elements_are_unchanged() {
    let html = r#"<p class="a">x</p><p style="color: #ddd">y</p><p style="color: oklch(0.2 0 0)">z</p>"#;
    assert_eq!(correct(html), html);
}

#[test]
fn nested_elements_are_corrected_independently() {
    let corrected = correct(
        r#"<div style="background: #ffffee"><span style="color: navy">x</span></div>"#,
    );
    assert_eq!(
        corrected,
        r#"<div style="background: #ffffee; color: #1a1a1a;"><span style="color: navy; background-color: #f5f5f5;">x</span></div>"#
    );
}

#[test]
fn correction_is_idempotent() {
    let html = r#"<div style="background-color: hsl(0, 0%, 100%)"><p style="color: rgb(20, 20, 20);">x</p></div>"#;
    let once = correct(html);
    assert_ne!(once, html);
    assert_eq!(correct(&once), once);
}

#[test]
fn fused_sanitizer_applies_the_same_correction() {
    init_test_tracing();
    let html = r#"<div style="background-color: white" onclick="x()">a</div><span style="color: black">b</span>"#;
    let fused = sanitize_and_correct(html).expect("Sanitizer failed");
    assert_eq!(
        fused,
        r#"<div style="background-color: white; color: #1a1a1a;">a</div><span style="color: black; background-color: #f5f5f5;">b</span>"#
    );
}

#[test]
fn empty_or_invalid_color_does_not_block_dark_text() {
    let corrected = correct(
        r#"<div style="background-color: white; color: ">a</div><div style="background-color: white; color: notacolor">b</div>"#,
    );
    assert_eq!(
        corrected,
        r#"<div style="background-color: white; color:; color: #1a1a1a;">a</div><div style="background-color: white; color: notacolor; color: #1a1a1a;">b</div>"#
    );
}

#[test]
fn important_dark_text_gets_light_background() {
    let corrected = correct(
        r#"<p style="color: #222 !important">a</p><p style="color: BLACK!important;">b</p>"#,
    );
    assert_eq!(
        corrected,
        r#"<p style="color: #222 !important; background-color: #f5f5f5;">a</p><p style="color: BLACK!important; background-color: #f5f5f5;">b</p>"#
    );
}

#[test]
fn important_background_without_color_gets_dark_text() {
    let corrected =
        correct(r#"<table><tbody><tr><td style="background: #eee !important">a</td></tr></tbody></table>"#);
    assert!(corrected.contains(
        r#"style="background: #eee !important; color: #1a1a1a;""#
    ));
}

#[test]
fn fused_and_standalone_correctors_agree() -> anyhow::Result<()> {
    init_test_tracing();
    let inputs = [
        r#"<div style="background-color: #fffff0"><p style="color: rgb(10 10 10 / 80%)">a</p></div>"#,
        r#"<span style="color: hsl(240, 100%, 20%)">b</span><span style="color: #eee">c</span>"#,
        r#"<table><tbody><tr><td style="background: white; color: ">d</td></tr></tbody></table>"#,
        r#"<p style="color: black; background-color: white">e</p><p>f</p>"#,
    ];
    for html in inputs {
        let standalone = correct_legibility(&sanitize(html)?);
        assert_eq!(sanitize_and_correct(html)?, standalone, "{html}");
    }
    Ok(())
}

#[test]
fn fused_pass_is_idempotent_on_hostile_markup() -> anyhow::Result<()> {
    init_test_tracing();
    let html = format!(
        r#"<div style="background: #fff"><a href="javascript:alert(1)" style="color: navy">x</a><script>steal()</script></div><p style="color: ;background-color:#fafafa" onmouseover="y()">z</p>{}"#,
        test_helpers::LICENSE_BOX_HTML
    );
    let once = sanitize_and_correct(&html)?;
    assert!(!once.contains("licensebox"));
    assert!(!once.to_ascii_lowercase().contains("javascript"));
    assert!(once.contains("color: #1a1a1a;"));
    assert_eq!(sanitize_and_correct(&once)?, once);
    Ok(())
}
