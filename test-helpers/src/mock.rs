//! Realistic article data for tests and the content-preview tool.
//!
//! The fixtures mirror what the content API returns for a typical legacy
//! article: several sections separated by horizontal rules, images in the
//! dialects the upstream renderer drops, inline styles written for a light
//! theme, and the licensing boilerplate at the end.

use payloads::RawArticle;

use crate::{LICENSE_BOX_HTML, LICENSE_BOX_SOURCE};

pub const MOCK_SLUG: &str = "SCP-173";

/// Source markup with one rendered image and three dropped ones.
pub fn mock_source() -> String {
    format!(
        "[[image 173.jpg]]\n\
         **Item #:** SCP-173\n\
         \n\
         [[>image statue-side.jpg style=\"border: 1px solid #000\"]]\n\
         **Object Class:** Euclid\n\
         ----\n\
         **Special Containment Procedures:** Item SCP-173 is to be kept in a locked container.\n\
         [[div style=\"background-color: #fff; border: 1px solid #ccc\"]]\n\
         Personnel must maintain eye contact.\n\
         [[/div]]\n\
         ----\n\
         **Description:** Moved to Site-19 in 1993.\n\
         [[include :scp-wiki:component:image-block\n\
         \x20 name=cell.jpg|\n\
         \x20 caption=Containment cell|\n\
         \x20 width=300px\n\
         ]]\n\
         [[=image http://scp-wiki.wdfiles.com/local--files/scp-173/addendum.png]]\n\
         [[<image https://evil.example.com/tracker.png]]\n\
         {LICENSE_BOX_SOURCE}\n\
         [[div class=\"footer-wikiwalk-nav\"]]\n\
         [[=image footer-arrow.png]]\n\
         [[/div]]"
    )
}

/// Rendered HTML as the upstream converter produces it from
/// [`mock_source`]: only the plain `[[image]]` survives.
pub fn mock_content() -> String {
    format!(
        "<div class=\"scp-image-block block-right\"><img src=\"https://scp-wiki.wdfiles.com/local--files/scp-173/173.jpg\" alt=\"173.jpg\" class=\"image\" /></div>\
         <p><strong>Item #:</strong> SCP-173</p>\
         <p><strong>Object Class:</strong> Euclid</p>\
         <hr />\
         <p><strong>Special Containment Procedures:</strong> Item SCP-173 is to be kept in a locked container.</p>\
         <div style=\"background-color: #fff; border: 1px solid #ccc\"><p>Personnel must maintain eye contact.</p></div>\
         <hr />\
         <p><strong>Description:</strong> Moved to Site-19 in 1993.</p>\
         <p style=\"color: #333\" onclick=\"alert(1)\">Note from Dr. Gears.</p>\
         <a href=\"javascript:alert(document.cookie)\">archive</a>\
         {LICENSE_BOX_HTML}"
    )
}

pub fn mock_article() -> RawArticle {
    RawArticle::new(MOCK_SLUG, mock_content(), mock_source())
}
