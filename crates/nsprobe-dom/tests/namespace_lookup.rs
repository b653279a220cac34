//! ---
//! nsp_section: "04-document-model"
//! nsp_subsection: "integration-tests"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Namespace-aware versus plain lookups on parsed documents."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use nsprobe_common::XHTML_NAMESPACE;
use nsprobe_dom::{parse_document, DocumentKind};

fn counts(markup: &str, content_type: &str) -> (usize, usize) {
    let doc = parse_document(markup, content_type).expect("markup parses");
    (
        doc.get_elements_by_tag_name("html").len(),
        doc.get_elements_by_tag_name_ns(Some(XHTML_NAMESPACE), "html")
            .len(),
    )
}

#[test]
fn xhtml_page_matches_both_lookups() {
    let markup = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en">
<head><title>Test Page</title></head>
<body><h1>Test Page</h1></body>
</html>"#;
    assert_eq!(counts(markup, "application/xhtml+xml"), (1, 1));
}

#[test]
fn document_without_matches_counts_zero() {
    let markup = r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#;
    assert_eq!(counts(markup, "image/svg+xml"), (0, 0));
}

#[test]
fn same_name_in_other_namespace_only_matches_plain_lookup() {
    let markup = r#"<html xmlns="urn:example:not-xhtml"><body/></html>"#;
    assert_eq!(counts(markup, "application/xml"), (1, 0));
}

#[test]
fn unqualified_xml_element_is_in_no_namespace() {
    let doc = parse_document("<html/>", "application/xml").expect("markup parses");
    assert_eq!(doc.kind(), DocumentKind::Xml);
    assert_eq!(doc.get_elements_by_tag_name_ns(None, "html").len(), 1);
    assert_eq!(
        doc.get_elements_by_tag_name_ns(Some(XHTML_NAMESPACE), "html")
            .len(),
        0
    );
}

#[test]
fn prefixed_element_in_other_namespace_only_matches_plain_lookup() {
    let markup = r#"<root xmlns:o="urn:example:other"><o:html/></root>"#;
    assert_eq!(counts(markup, "application/xml"), (1, 0));
}
