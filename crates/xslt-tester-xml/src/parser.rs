//! Tolerant XML parser that builds line-tracked [`XmlDocument`] arenas.

use crate::lines::LineIndex;
use crate::{
    Error, NamespaceDeclaration, NodeId, ParseDiagnostic, QName, Result, XML_NAMESPACE,
    XmlAttribute, XmlDocument, XmlElement, XmlNode, XmlNodeKind,
};
use quick_xml::Reader;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

/// Options controlling parser behavior.
///
/// ```rust
/// use xslt_tester_xml::ParseOptions;
///
/// let opts = ParseOptions::default().recover(true).no_blanks(true);
/// assert!(opts.recover);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Recover from malformed markup and return a best-effort tree.
    pub recover: bool,

    /// Drop whitespace-only text nodes.
    pub no_blanks: bool,
}

impl ParseOptions {
    /// Enables or disables error recovery mode.
    #[must_use]
    pub fn recover(mut self, yes: bool) -> Self {
        self.recover = yes;
        self
    }

    /// Enables or disables stripping of blank text nodes.
    #[must_use]
    pub fn no_blanks(mut self, yes: bool) -> Self {
        self.no_blanks = yes;
        self
    }
}

/// Parse well-formed XML, failing on the first defect.
///
/// ```rust
/// use xslt_tester_xml::parse;
///
/// let doc = parse("<root><child/></root>").unwrap();
/// let root = doc.element(doc.root()).unwrap();
/// assert_eq!(root.name.local, "root");
/// ```
pub fn parse(content: &str) -> Result<XmlDocument> {
    parse_with_options(content, &ParseOptions::default())
}

/// Parse XML that may be malformed (e.g., mid-edit), recovering wherever a
/// root element can still be built.
///
/// ```rust
/// use xslt_tester_xml::parse_recover;
///
/// let doc = parse_recover("<root>\n  <child>").unwrap();
/// assert_eq!(doc.len(), 3);
/// assert!(!doc.diagnostics().is_empty());
/// ```
pub fn parse_recover(content: &str) -> Result<XmlDocument> {
    parse_with_options(content, &ParseOptions::default().recover(true))
}

/// Parse XML with explicit options.
///
/// # Errors
///
/// In strict mode, any defect. In recover mode, only inputs from which no
/// root element could be built.
pub fn parse_with_options(content: &str, options: &ParseOptions) -> Result<XmlDocument> {
    XmlParser::new(content, options).parse()
}

/// Whether `name` can open an element: non-empty, starting with a letter,
/// `_` or `:`, and free of whitespace and markup characters.
fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| {
            !c.is_whitespace() && !matches!(c, '<' | '>' | '/' | '=' | '"' | '\'' | '&')
        })
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The source content being parsed.
    source: &'a str,

    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Offset in `source` where the current reader's input begins.
    base: usize,

    options: &'a ParseOptions,

    lines: LineIndex,

    /// The arena being filled, in document order.
    nodes: Vec<XmlNode>,

    /// Elements whose end tag has not been seen yet.
    stack: Vec<OpenElement>,

    root: Option<NodeId>,

    /// Set once the root element is closed; anything after it is extra content.
    root_closed: bool,

    declaration: Option<String>,

    diagnostics: Vec<ParseDiagnostic>,
}

/// An element still waiting for its end tag.
struct OpenElement {
    id: NodeId,

    /// The name as written, for matching end tags.
    qualified: String,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            source,
            reader: Self::reader_for(source),
            base: 0,
            options,
            lines: LineIndex::new(source),
            nodes: Vec::new(),
            stack: Vec::new(),
            root: None,
            root_closed: false,
            declaration: None,
            diagnostics: Vec::new(),
        }
    }

    fn reader_for(input: &'a str) -> Reader<&'a [u8]> {
        let mut reader = Reader::from_str(input);
        let config = reader.config_mut();
        config.trim_text_start = false;
        config.trim_text_end = false;
        // End tags are matched against the open-element stack here, so
        // recovery can decide what to close.
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        reader
    }

    /// Restarts tokenizing at `offset` in the source.
    fn rescan_from(&mut self, offset: usize) {
        if let Some(rest) = self.source.get(offset..) {
            self.reader = Self::reader_for(rest);
            self.base = offset;
        }
    }

    /// Absolute source offset just past the last event read.
    fn position(&self) -> usize {
        self.base + self.reader.buffer_position() as usize
    }

    fn parse(mut self) -> Result<XmlDocument> {
        loop {
            // Capture position before reading the event
            let event_start = self.position();

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    if !self.handle_start(&e, event_start, false)? {
                        break;
                    }
                }
                Ok(Event::Empty(e)) => {
                    if !self.handle_start(&e, event_start, true)? {
                        break;
                    }
                }
                Ok(Event::End(e)) => {
                    self.handle_end(&e, event_start)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(&e, event_start)?;
                }
                Ok(Event::CData(e)) => {
                    let content = String::from_utf8_lossy(&e).into_owned();
                    self.push_leaf(XmlNodeKind::CData(content), event_start);
                }
                Ok(Event::Comment(e)) => {
                    let content = String::from_utf8_lossy(&e).into_owned();
                    self.push_leaf(XmlNodeKind::Comment(content), event_start);
                }
                Ok(Event::PI(e)) => {
                    let content = String::from_utf8_lossy(&e).into_owned();
                    self.push_leaf(XmlNodeKind::ProcessingInstruction(content), event_start);
                }
                Ok(Event::Decl(_)) => {
                    if self.root.is_none() && self.declaration.is_none() {
                        let end = self.position();
                        let start = self.tag_start(event_start);
                        self.declaration = self.source.get(start..end).map(str::to_string);
                    }
                }
                Ok(Event::DocType(_)) => {
                    // DOCTYPE declarations carry nothing the tree needs
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    let offset = self.base + self.reader.error_position() as usize;
                    let line = self.lines.line_of(offset);
                    if self.options.recover && self.root.is_some() {
                        self.diagnose(format!("parsing stopped: {}", e), Some(line));
                        break;
                    }
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        line: Some(line),
                    });
                }
            }
        }

        self.finish()
    }

    /// Opens an element. Returns `false` when parsing should stop.
    fn handle_start(
        &mut self,
        e: &BytesStart<'_>,
        event_start: usize,
        empty: bool,
    ) -> Result<bool> {
        let tag_start = self.tag_start(event_start);
        let line = self.lines.line_of(tag_start);
        let qualified = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        if !is_element_name(&qualified) {
            if !self.options.recover {
                return Err(Error::XmlSyntax {
                    message: format!("invalid element name {:?}", qualified),
                    line: Some(line),
                });
            }
            return Ok(self.keep_stray_lt(tag_start, line));
        }

        if self.root_closed {
            if self.options.recover {
                self.diagnose("extra content after the document element", Some(line));
                return Ok(false);
            }
            return Err(Error::MultipleRoots { line: Some(line) });
        }

        let (raw_attributes, namespaces) = self.parse_attributes(e, line)?;

        let name = self.resolve_name(&qualified, &namespaces, true, line);
        let attributes = raw_attributes
            .into_iter()
            .map(|(attr_name, value)| XmlAttribute {
                name: self.resolve_name(&attr_name, &namespaces, false, line),
                value,
            })
            .collect();

        let element = XmlElement {
            name,
            attributes,
            namespaces,
        };
        let parent = self.stack.last().map(|open| open.id);
        let id = self.push_node(XmlNodeKind::Element(element), parent, Some(line));

        if parent.is_none() {
            self.root = Some(id);
        }

        if empty {
            if parent.is_none() {
                self.root_closed = true;
            }
        } else {
            self.stack.push(OpenElement { id, qualified });
        }

        Ok(true)
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>, event_start: usize) -> Result<()> {
        let end_name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let line = self.lines.line_of(self.tag_start(event_start));

        match self.stack.iter().rposition(|open| open.qualified == end_name) {
            Some(pos) => {
                if pos + 1 != self.stack.len() {
                    if !self.options.recover {
                        let expected = self
                            .stack
                            .last()
                            .map(|open| open.qualified.clone())
                            .unwrap_or_default();
                        return Err(Error::MismatchedEndTag {
                            expected,
                            found: end_name,
                            line: Some(line),
                        });
                    }
                    let unclosed: Vec<String> = self.stack[pos + 1..]
                        .iter()
                        .map(|open| open.qualified.clone())
                        .collect();
                    for name in unclosed {
                        self.diagnose(
                            format!("element <{}> closed implicitly by </{}>", name, end_name),
                            Some(line),
                        );
                    }
                }
                self.stack.truncate(pos);
                if self.stack.is_empty() {
                    self.root_closed = true;
                }
            }
            None => {
                if !self.options.recover {
                    return Err(match self.stack.last() {
                        Some(open) => Error::MismatchedEndTag {
                            expected: open.qualified.clone(),
                            found: end_name,
                            line: Some(line),
                        },
                        None => Error::InvalidStructure {
                            message: format!("Unexpected closing tag </{}>", end_name),
                            line: Some(line),
                        },
                    });
                }
                self.diagnose(format!("stray end tag </{}> ignored", end_name), Some(line));
            }
        }

        Ok(())
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: usize) -> Result<()> {
        let line = self.lines.line_of(event_start);
        let text = match e.unescape() {
            Ok(text) => text.into_owned(),
            Err(err) => {
                if !self.options.recover {
                    return Err(Error::XmlSyntax {
                        message: format!("Invalid text content: {}", err),
                        line: Some(line),
                    });
                }
                self.diagnose(format!("kept raw text: {}", err), Some(line));
                String::from_utf8_lossy(e).into_owned()
            }
        };

        if self.stack.is_empty() {
            if !text.trim().is_empty() {
                if !self.options.recover {
                    return Err(Error::InvalidStructure {
                        message: "text outside the document element".to_string(),
                        line: Some(line),
                    });
                }
                self.diagnose("text outside the document element ignored", Some(line));
            }
            return Ok(());
        }

        if self.options.no_blanks && text.trim().is_empty() {
            return Ok(());
        }

        self.push_text(text, event_start);
        Ok(())
    }

    /// A `<` that does not open a tag is kept as text up to the next `<`,
    /// where tokenizing resumes. Returns `false` when parsing should stop.
    fn keep_stray_lt(&mut self, tag_start: usize, line: usize) -> bool {
        self.diagnose("unescaped '<' kept as text", Some(line));
        let end = self.position();
        let resume = self
            .source
            .get(tag_start + 1..end)
            .and_then(|raw| raw.find('<'))
            .map(|rel| tag_start + 1 + rel);
        let text_end = resume.unwrap_or(end);

        if self.stack.is_empty() {
            if self.root_closed {
                return false;
            }
        } else if let Some(text) = self.source.get(tag_start..text_end) {
            self.push_text(text.to_string(), tag_start);
        }

        if let Some(offset) = resume {
            self.rescan_from(offset);
        }
        true
    }

    /// Reads attributes, separating namespace declarations from the rest.
    fn parse_attributes(
        &mut self,
        e: &BytesStart<'_>,
        line: usize,
    ) -> Result<(Vec<(String, String)>, Vec<NamespaceDeclaration>)> {
        let mut attributes = Vec::new();
        let mut namespaces = Vec::new();

        let mut iter = e.attributes();
        iter.with_checks(!self.options.recover);

        for attr_result in iter {
            let attr = match attr_result {
                Ok(attr) => attr,
                Err(err) => {
                    if !self.options.recover {
                        return Err(Error::XmlSyntax {
                            message: format!("Attribute error: {}", err),
                            line: Some(line),
                        });
                    }
                    self.diagnose(format!("attribute dropped: {}", err), Some(line));
                    break;
                }
            };

            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(err) => {
                    if !self.options.recover {
                        return Err(Error::XmlSyntax {
                            message: format!("Invalid attribute value: {}", err),
                            line: Some(line),
                        });
                    }
                    self.diagnose(format!("kept raw value of {}: {}", key, err), Some(line));
                    String::from_utf8_lossy(&attr.value).into_owned()
                }
            };

            if key == "xmlns" {
                namespaces.push(NamespaceDeclaration {
                    prefix: None,
                    uri: value,
                });
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                namespaces.push(NamespaceDeclaration {
                    prefix: Some(prefix.to_string()),
                    uri: value,
                });
            } else {
                attributes.push((key, value));
            }
        }

        Ok((attributes, namespaces))
    }

    /// Splits a written name into prefix and local part and resolves its
    /// namespace against the in-scope declarations.
    ///
    /// Unprefixed attributes never take the default namespace.
    fn resolve_name(
        &mut self,
        qualified: &str,
        own: &[NamespaceDeclaration],
        is_element: bool,
        line: usize,
    ) -> QName {
        match qualified.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
                match self.lookup_namespace(Some(prefix), own) {
                    Some(uri) => QName {
                        prefix: Some(prefix.to_string()),
                        local: local.to_string(),
                        namespace: Some(uri),
                    },
                    None => {
                        self.diagnose(
                            format!("namespace prefix {} is not declared", prefix),
                            Some(line),
                        );
                        QName::local(qualified)
                    }
                }
            }
            _ => QName {
                prefix: None,
                local: qualified.to_string(),
                namespace: if is_element {
                    self.lookup_namespace(None, own)
                } else {
                    None
                },
            },
        }
    }

    /// Innermost declaration for `prefix`, starting with the element's own.
    fn lookup_namespace(
        &self,
        prefix: Option<&str>,
        own: &[NamespaceDeclaration],
    ) -> Option<String> {
        if prefix == Some("xml") {
            return Some(XML_NAMESPACE.to_string());
        }

        let in_scope = own.iter().rev().chain(
            self.stack
                .iter()
                .rev()
                .filter_map(|open| self.nodes.get(open.id.index()))
                .filter_map(XmlNode::as_element)
                .flat_map(|element| element.namespaces.iter().rev()),
        );

        for decl in in_scope {
            if decl.prefix.as_deref() == prefix {
                // xmlns="" undeclares the default namespace
                return if decl.uri.is_empty() {
                    None
                } else {
                    Some(decl.uri.clone())
                };
            }
        }
        None
    }

    fn push_node(
        &mut self,
        kind: XmlNodeKind,
        parent: Option<NodeId>,
        line: Option<usize>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(XmlNode {
            kind,
            parent,
            children: Vec::new(),
            source_line: line,
        });
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(parent.index()) {
                node.children.push(id);
            }
        }
        id
    }

    /// Appends a non-element node to the open element. Outside the root
    /// element such nodes are not kept.
    fn push_leaf(&mut self, kind: XmlNodeKind, event_start: usize) {
        if let Some(parent) = self.stack.last().map(|open| open.id) {
            let line = self.lines.line_of(event_start);
            self.push_node(kind, Some(parent), Some(line));
        }
    }

    /// Appends text to the open element, joining it to a directly preceding
    /// text child.
    fn push_text(&mut self, text: String, event_start: usize) {
        let Some(parent) = self.stack.last().map(|open| open.id) else {
            return;
        };
        let last = self
            .nodes
            .get(parent.index())
            .and_then(|node| node.children.last().copied());
        if let Some(XmlNodeKind::Text(previous)) = last
            .and_then(|id| self.nodes.get_mut(id.index()))
            .map(|node| &mut node.kind)
        {
            previous.push_str(&text);
            return;
        }
        self.push_leaf(XmlNodeKind::Text(text), event_start);
    }

    /// Offset of the `<` that opens the markup event starting at `event_start`.
    fn tag_start(&self, event_start: usize) -> usize {
        self.source
            .get(event_start..)
            .and_then(|rest| rest.find('<'))
            .map_or(event_start, |rel| event_start + rel)
    }

    fn diagnose(&mut self, message: impl Into<String>, line: Option<usize>) {
        let diagnostic = ParseDiagnostic {
            message: message.into(),
            line,
        };
        debug!(%diagnostic, "recovered from malformed XML");
        self.diagnostics.push(diagnostic);
    }

    fn finish(mut self) -> Result<XmlDocument> {
        if let Some(open) = self.stack.last() {
            if !self.options.recover {
                let line = self.nodes.get(open.id.index()).and_then(|n| n.source_line);
                return Err(Error::UnexpectedEof {
                    expected: format!("closing tag </{}>", open.qualified),
                    line,
                });
            }
            let unclosed: Vec<(String, Option<usize>)> = self
                .stack
                .iter()
                .rev()
                .map(|open| {
                    let line = self.nodes.get(open.id.index()).and_then(|n| n.source_line);
                    (open.qualified.clone(), line)
                })
                .collect();
            for (name, line) in unclosed {
                self.diagnose(format!("element <{}> was never closed", name), line);
            }
        }

        let root = self.root.ok_or(Error::EmptyDocument)?;
        Ok(XmlDocument::new(
            self.nodes,
            root,
            self.declaration,
            self.diagnostics,
        ))
    }
}
