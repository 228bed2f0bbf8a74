/*
 * locate.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Mapping a cursor line to the element it sits in.
 */

use xslt_tester_xml::{NodeId, XmlDocument};

/// Find the element the cursor line belongs to.
///
/// Walks elements in document order and keeps the last one starting on or
/// before `line`; the walk stops at the first element that starts after it.
/// Elements without a known line are passed over but their subtrees are
/// still visited. Returns `None` when every element starts after `line`.
pub fn locate(document: &XmlDocument, line: usize) -> Option<NodeId> {
    let mut candidate = None;

    for id in document.descendants(document.root()) {
        let Some(node) = document.node(id) else {
            continue;
        };
        if !node.is_element() {
            continue;
        }
        match node.source_line {
            Some(start) if start <= line => candidate = Some(id),
            Some(_) => break,
            None => {}
        }
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use xslt_tester_xml::parse;

    fn name_at(doc: &XmlDocument, line: usize) -> Option<String> {
        locate(doc, line).map(|id| doc.element(id).unwrap().name.local.clone())
    }

    #[test]
    fn test_one_element_per_line() {
        let doc = parse("<a>\n  <b/>\n  <c>\n    <d/>\n  </c>\n</a>").unwrap();
        assert_eq!(name_at(&doc, 0), None);
        assert_eq!(name_at(&doc, 1).as_deref(), Some("a"));
        assert_eq!(name_at(&doc, 2).as_deref(), Some("b"));
        assert_eq!(name_at(&doc, 3).as_deref(), Some("c"));
        assert_eq!(name_at(&doc, 4).as_deref(), Some("d"));
        // Closing lines belong to the last element started before them
        assert_eq!(name_at(&doc, 5).as_deref(), Some("d"));
        assert_eq!(name_at(&doc, 100).as_deref(), Some("d"));
    }

    #[test]
    fn test_same_line_picks_last_started() {
        let doc = parse("<a>\n  <b/><c/>\n</a>").unwrap();
        assert_eq!(name_at(&doc, 2).as_deref(), Some("c"));
    }

    #[test]
    fn test_comments_are_not_candidates() {
        let doc = parse("<a>\n  <b/>\n  <!-- note -->\n</a>").unwrap();
        assert_eq!(name_at(&doc, 3).as_deref(), Some("b"));
    }

    #[test]
    fn test_root_on_later_line() {
        let doc = parse("<?xml version=\"1.0\"?>\n\n<root/>").unwrap();
        assert_eq!(name_at(&doc, 1), None);
        assert_eq!(name_at(&doc, 3).as_deref(), Some("root"));
    }
}
