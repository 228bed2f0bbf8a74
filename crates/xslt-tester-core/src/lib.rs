//! Cursor-to-XPath resolution for the XSLT tester
//!
//! Given the raw text of an XML document, possibly half-edited, and a
//! cursor position, this crate finds the element (or attribute) the cursor
//! is in and writes a short path that identifies it among its siblings.
//!
//! # Pipeline
//!
//! - [`placeholder`] - protects literal `&#10;` references from the parser
//! - [`locate`] - maps the cursor line to an element of the recovered tree
//! - [`NamespaceResolver`] - chooses the prefix each step is written with
//! - [`synthesize`] - builds the steps and their predicates
//! - [`match_attribute`] - extends the path when the cursor is on an attribute
//! - [`Resolver`] - runs the pipeline and maps failures to [`ResolvedPath`]
//!
//! [`CursorSession`] debounces cursor movements in front of a [`Resolver`],
//! and [`format_document`] pretty-prints a document with the same parser.
//!
//! ```rust
//! use xslt_tester_core::{CursorPosition, resolve};
//!
//! let text = r#"<catalog>
//!   <book id="b1"><title>One</title></book>
//!   <book id="b2">
//!     <title>Two</title>
//!   </book>
//! </catalog>"#;
//!
//! let result = resolve(text, CursorPosition::new(4, 6));
//! assert_eq!(result.to_string(), "/catalog/book[@id='b2']/title");
//! assert_eq!(result.label(), "XPath: /catalog/book[@id='b2']/title");
//! ```

pub mod attribute;
pub mod config;
pub mod error;
pub mod format;
pub mod locate;
pub mod namespace;
pub mod placeholder;
pub mod resolve;
pub mod session;
pub mod synthesize;

pub use attribute::match_attribute;
pub use config::{FormatConfig, ResolverConfig, XsltTesterConfig};
pub use error::{ConfigError, FormatError, ResolveError};
pub use format::{FormatOutcome, format_document};
pub use locate::locate;
pub use namespace::NamespaceResolver;
pub use resolve::{CursorPosition, ResolvedPath, Resolver, resolve};
pub use session::{CursorSession, Debouncer};
pub use synthesize::{Predicate, Step, XPath, synthesize};
