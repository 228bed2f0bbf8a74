/*
 * synthesize.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Building a readable, sibling-unique path for an element.
 */

//! Path synthesis.
//!
//! Each step names the element with its root-level namespace prefix and,
//! when needed, a predicate that singles it out among siblings of the same
//! name. An identifying attribute is preferred over a position, so paths
//! read like `/catalog/book[@id='b2']/title` rather than
//! `/catalog/book[2]/title`.

use std::fmt;

use tracing::trace;
use xslt_tester_xml::{NodeId, XmlDocument, XmlElement};

use crate::error::ResolveError;
use crate::namespace::NamespaceResolver;

/// Attributes (by local name) that identify an element, in priority order.
pub const IDENTIFYING_ATTRIBUTES: [&str; 5] = ["id", "ID", "type", "name", "key"];

/// Disambiguation applied to one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// 1-based position among same-name siblings.
    Position(usize),

    /// `[@name='value']`
    Attribute { name: String, value: String },
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Position(index) => write!(f, "[{}]", index),
            Predicate::Attribute { name, value } => {
                if value.contains('\'') {
                    write!(f, "[@{}=\"{}\"]", name, value)
                } else {
                    write!(f, "[@{}='{}']", name, value)
                }
            }
        }
    }
}

/// One element step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Tag as written in the path (`prefix:local` or `local`).
    pub name: String,
    pub predicate: Option<Predicate>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(predicate) = &self.predicate {
            write!(f, "{}", predicate)?;
        }
        Ok(())
    }
}

/// An absolute path: element steps from the root, optionally ending in an
/// attribute step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPath {
    pub steps: Vec<Step>,
    pub attribute: Option<String>,
}

impl XPath {
    /// Append an `/@name` step.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "/{}", step)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, "/@{}", attribute)?;
        }
        Ok(())
    }
}

/// Build the path from the document element down to `node`.
///
/// # Errors
///
/// [`ResolveError::Unexpected`] if `node` or one of its ancestors is not an
/// element of `document`.
pub fn synthesize(
    document: &XmlDocument,
    resolver: &NamespaceResolver,
    node: NodeId,
) -> Result<XPath, ResolveError> {
    let mut steps = Vec::new();
    let mut current = node;

    loop {
        let element = document.element(current).ok_or_else(|| {
            ResolveError::Unexpected(format!("node {} is not an element", current.index()))
        })?;
        let name = resolver.prefixed_name(&element.name);

        let Some(parent) = document.parent(current) else {
            steps.push(Step {
                name,
                predicate: None,
            });
            break;
        };
        if document.element(parent).is_none() {
            return Err(ResolveError::Unexpected(format!(
                "parent {} of node {} is not an element",
                parent.index(),
                current.index()
            )));
        }

        let siblings: Vec<NodeId> = document
            .element_children(parent)
            .filter(|sibling| {
                document
                    .element(*sibling)
                    .is_some_and(|e| resolver.prefixed_name(&e.name) == name)
            })
            .collect();

        let predicate = identifying_predicate(document, resolver, element, &siblings)
            .or_else(|| positional_predicate(current, &siblings));
        trace!(step = %name, ?predicate, "synthesized step");

        steps.push(Step { name, predicate });
        current = parent;
    }

    steps.reverse();
    Ok(XPath {
        steps,
        attribute: None,
    })
}

/// First attribute from [`IDENTIFYING_ATTRIBUTES`] whose value no other
/// same-name sibling shares.
fn identifying_predicate(
    document: &XmlDocument,
    resolver: &NamespaceResolver,
    element: &XmlElement,
    siblings: &[NodeId],
) -> Option<Predicate> {
    for local in IDENTIFYING_ATTRIBUTES {
        let Some(attr) = element.attribute_by_local_name(local) else {
            continue;
        };

        let sharing = siblings
            .iter()
            .filter_map(|sibling| document.element(*sibling))
            .filter_map(|sibling| sibling.attribute_by_local_name(local))
            .filter(|other| other.value == attr.value)
            .count();

        if siblings.len() <= 1 || sharing <= 1 {
            return Some(Predicate::Attribute {
                name: resolver.prefixed_name(&attr.name),
                value: attr.value.clone(),
            });
        }
    }
    None
}

fn positional_predicate(node: NodeId, siblings: &[NodeId]) -> Option<Predicate> {
    if siblings.len() <= 1 {
        return None;
    }
    siblings
        .iter()
        .position(|sibling| *sibling == node)
        .map(|index| Predicate::Position(index + 1))
}
