/*
 * namespace.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * URI to prefix lookup for rendering element and attribute names.
 */

//! Namespace prefix lookup.
//!
//! Paths are written with the prefixes declared on the document element.
//! Declarations made deeper in the tree are not consulted.

use std::collections::HashMap;

use xslt_tester_xml::{QName, XML_NAMESPACE, XmlDocument};

/// Inverted namespace table: URI to prefix.
///
/// An empty prefix stands for the default namespace.
#[derive(Debug, Clone, Default)]
pub struct NamespaceResolver {
    prefixes: HashMap<String, String>,
}

impl NamespaceResolver {
    /// Build the table from the root element's declarations.
    ///
    /// When several prefixes are bound to one URI the first declared wins.
    pub fn from_document(document: &XmlDocument) -> Self {
        let mut prefixes = HashMap::new();
        prefixes.insert(XML_NAMESPACE.to_string(), "xml".to_string());

        for decl in document.root_namespaces() {
            if decl.uri.is_empty() {
                continue;
            }
            prefixes
                .entry(decl.uri.clone())
                .or_insert_with(|| decl.prefix.clone().unwrap_or_default());
        }

        Self { prefixes }
    }

    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.prefixes.get(uri).map(String::as_str)
    }

    /// Render `name` as `prefix:local`, or just `local` when it has no
    /// namespace, the namespace has no root-level prefix, or that prefix is
    /// the default one.
    pub fn prefixed_name(&self, name: &QName) -> String {
        match name.namespace.as_deref().and_then(|uri| self.prefix_for(uri)) {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, name.local),
            _ => name.local.clone(),
        }
    }
}
