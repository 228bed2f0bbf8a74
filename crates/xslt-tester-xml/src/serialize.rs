//! Serialization of [`XmlDocument`] trees back to markup.

use std::borrow::Cow;

use crate::{NodeId, XmlDocument, XmlElement, XmlNodeKind};

/// Controls how a document is written.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Put element-only content on indented lines.
    pub pretty: bool,

    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
        }
    }
}

/// Write the document (XML declaration, if any, and the root element).
///
/// Elements whose children are all markup are broken onto indented lines;
/// anything holding text is written inline so that text content is never
/// altered. Parsing the output with blank-text removal and serializing it
/// again yields the same string.
///
/// ```rust
/// use xslt_tester_xml::{parse, serialize, SerializeOptions};
///
/// let doc = parse("<a><b>text</b><c/></a>").unwrap();
/// let out = serialize(&doc, &SerializeOptions::default());
/// assert_eq!(out, "<a>\n  <b>text</b>\n  <c/>\n</a>\n");
/// ```
pub fn serialize(document: &XmlDocument, options: &SerializeOptions) -> String {
    let mut out = String::new();
    if let Some(declaration) = document.declaration() {
        out.push_str(declaration);
        if options.pretty {
            out.push('\n');
        }
    }
    write_node(document, document.root(), 0, options, options.pretty, &mut out);
    out
}

fn write_node(
    document: &XmlDocument,
    id: NodeId,
    depth: usize,
    options: &SerializeOptions,
    pretty: bool,
    out: &mut String,
) {
    let Some(node) = document.node(id) else {
        return;
    };

    match &node.kind {
        XmlNodeKind::Element(element) => {
            write_element(document, id, element, depth, options, pretty, out);
        }
        XmlNodeKind::Text(text) => out.push_str(&escape_text(text)),
        XmlNodeKind::CData(content) => {
            out.push_str("<![CDATA[");
            out.push_str(content);
            out.push_str("]]>");
        }
        XmlNodeKind::Comment(content) => {
            write_indent(depth, options, pretty, out);
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
            if pretty {
                out.push('\n');
            }
        }
        XmlNodeKind::ProcessingInstruction(content) => {
            write_indent(depth, options, pretty, out);
            out.push_str("<?");
            out.push_str(content);
            out.push_str("?>");
            if pretty {
                out.push('\n');
            }
        }
    }
}

fn write_element(
    document: &XmlDocument,
    id: NodeId,
    element: &XmlElement,
    depth: usize,
    options: &SerializeOptions,
    pretty: bool,
    out: &mut String,
) {
    write_indent(depth, options, pretty, out);

    let name = element.name.qualified();
    out.push('<');
    out.push_str(&name);
    for decl in &element.namespaces {
        match &decl.prefix {
            Some(prefix) => {
                out.push_str(" xmlns:");
                out.push_str(prefix);
            }
            None => out.push_str(" xmlns"),
        }
        out.push_str("=\"");
        out.push_str(&escape_attribute(&decl.uri));
        out.push('"');
    }
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name.qualified());
        out.push_str("=\"");
        out.push_str(&escape_attribute(&attr.value));
        out.push('"');
    }

    let children = document.children(id);
    if children.is_empty() {
        out.push_str("/>");
        if pretty {
            out.push('\n');
        }
        return;
    }

    out.push('>');

    // Text anywhere among the children switches the whole subtree to inline
    let has_text = children.iter().any(|child| {
        document.node(*child).is_some_and(|n| {
            matches!(n.kind, XmlNodeKind::Text(_) | XmlNodeKind::CData(_))
        })
    });
    let block = pretty && !has_text;

    if block {
        out.push('\n');
    }
    for child in children {
        write_node(document, *child, depth + 1, options, block, out);
    }
    if block {
        write_indent(depth, options, true, out);
    }

    out.push_str("</");
    out.push_str(&name);
    out.push('>');
    if pretty {
        out.push('\n');
    }
}

fn write_indent(depth: usize, options: &SerializeOptions, pretty: bool, out: &mut String) {
    if pretty {
        for _ in 0..depth * options.indent {
            out.push(' ');
        }
    }
}

/// Escape XML text content.
fn escape_text(s: &str) -> Cow<'_, str> {
    if s.bytes().any(|b| matches!(b, b'&' | b'<' | b'>')) {
        let mut out = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                _ => out.push(c),
            }
        }
        Cow::Owned(out)
    } else {
        Cow::Borrowed(s)
    }
}

/// Escape an attribute value for double quotes. Whitespace control
/// characters become character references so they survive reparsing.
fn escape_attribute(s: &str) -> Cow<'_, str> {
    if s.bytes()
        .any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\n' | b'\r' | b'\t'))
    {
        let mut out = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\n' => out.push_str("&#10;"),
                '\r' => out.push_str("&#13;"),
                '\t' => out.push_str("&#9;"),
                _ => out.push(c),
            }
        }
        Cow::Owned(out)
    } else {
        Cow::Borrowed(s)
    }
}
