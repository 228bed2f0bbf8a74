//! Tolerant, line-tracked XML parsing for the XSLT tester.
//!
//! This crate wraps [`quick-xml`] to build an arena-backed [`XmlDocument`]
//! in which every node remembers the 1-based line it starts on. Documents
//! that are being edited are rarely well formed, so the parser can run in a
//! recovering mode that closes dangling elements, skips stray end tags and
//! keeps whatever it managed to build, recording a [`ParseDiagnostic`] for
//! each repair.
//!
//! # Example
//!
//! ```rust
//! use xslt_tester_xml::parse_recover;
//!
//! let doc = parse_recover("<catalog>\n  <book id=\"1\">\n    <title>").unwrap();
//!
//! let book = doc.element_children(doc.root()).next().unwrap();
//! assert_eq!(doc.element(book).unwrap().get_attribute("id"), Some("1"));
//! assert_eq!(doc.source_line(book), Some(2));
//! assert_eq!(doc.diagnostics().len(), 3);
//! ```
//!
//! # Serialization
//!
//! [`serialize`] writes a document back out, indenting element-only content:
//!
//! ```rust
//! use xslt_tester_xml::{parse, serialize, SerializeOptions};
//!
//! let doc = parse("<a><b/></a>").unwrap();
//! assert_eq!(serialize(&doc, &SerializeOptions::default()), "<a>\n  <b/>\n</a>\n");
//! ```

pub mod error;
pub mod lines;
pub mod parser;
pub mod serialize;
pub mod types;

// Re-export main types
pub use error::{Error, ParseDiagnostic, Result};
pub use lines::LineIndex;
pub use parser::{ParseOptions, parse, parse_recover, parse_with_options};
pub use serialize::{SerializeOptions, serialize};
pub use types::{
    Descendants, NamespaceDeclaration, NodeId, QName, XML_NAMESPACE, XmlAttribute, XmlDocument,
    XmlElement, XmlNode, XmlNodeKind,
};
