//! Recovery behaviour on documents caught mid-edit.

use xslt_tester_xml::{
    ParseOptions, SerializeOptions, XmlDocument, parse_recover, parse_with_options, serialize,
};

fn element_names(doc: &XmlDocument) -> Vec<String> {
    doc.descendants(doc.root())
        .filter_map(|id| doc.element(id))
        .map(|e| e.name.qualified())
        .collect()
}

#[test]
fn half_typed_start_tag_keeps_earlier_content() {
    let doc = parse_recover("<root>\n  <a/>\n  <b").unwrap();
    assert!(element_names(&doc).starts_with(&["root".to_string(), "a".to_string()]));
    assert!(!doc.diagnostics().is_empty());
}

#[test]
fn malformed_attribute_keeps_previous_attributes() {
    let doc = parse_recover("<root>\n  <a first=\"1\" second=>\n</root>").unwrap();
    let a = doc.element_children(doc.root()).next().unwrap();
    assert_eq!(doc.element(a).unwrap().get_attribute("first"), Some("1"));
}

#[test]
fn missing_close_in_the_middle() {
    let input = "<stylesheet>\n  <template>\n    <value-of/>\n  <template name=\"x\"/>\n</stylesheet>";
    let doc = parse_recover(input).unwrap();
    assert_eq!(
        element_names(&doc),
        vec!["stylesheet", "template", "value-of", "template"]
    );
    // The unclosed first template is closed by </stylesheet>
    let lines: Vec<Option<usize>> = doc
        .descendants(doc.root())
        .filter(|id| doc.element(*id).is_some())
        .map(|id| doc.source_line(id))
        .collect();
    assert_eq!(lines, vec![Some(1), Some(2), Some(3), Some(4)]);
}

#[test]
fn diagnostics_carry_lines() {
    let doc = parse_recover("<root>\n  <a>\n</root>").unwrap();
    let rendered: Vec<String> = doc.diagnostics().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["line 3: element <a> closed implicitly by </root>"]);
}

#[test]
fn recovered_tree_serializes() {
    let options = ParseOptions::default().recover(true).no_blanks(true);
    let doc = parse_with_options("<doc><p>one<p>two</doc>", &options).unwrap();
    insta::assert_snapshot!(
        serialize(&doc, &SerializeOptions::default()),
        @r"
    <doc>
      <p>one<p>two</p></p>
    </doc>
    "
    );
}

#[test]
fn unescaped_lt_does_not_hide_following_tag() {
    let doc = parse_recover("<root>\n  a < b\n  <c/>\n</root>").unwrap();
    assert_eq!(element_names(&doc), vec!["root", "c"]);
    let rendered: Vec<String> = doc.diagnostics().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["line 2: unescaped '<' kept as text"]);
}

#[test]
fn unescaped_lt_serializes_escaped() {
    let options = ParseOptions::default().recover(true).no_blanks(true);
    let doc = parse_with_options("<root>\n  a < b\n</root>", &options).unwrap();
    let once = serialize(&doc, &SerializeOptions::default());
    assert_eq!(once, "<root>\n  a &lt; b\n</root>\n");

    let again = parse_with_options(&once, &options).unwrap();
    assert_eq!(serialize(&again, &SerializeOptions::default()), once);
}
