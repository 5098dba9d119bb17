//! Point lookups over nested option catalogs.
//!
//! A catalog is a small tree such as framework → variant → library. Some
//! branches skip the middle level (framework → library). Missing or unknown
//! selections fall back to the first child at every level.

use crate::types::{FieldOption, State};
use serde::Serialize;

/// One entry of a nested catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogNode {
    pub key: &'static str,
    pub label: &'static str,
    pub children: &'static [CatalogNode],
}

impl CatalogNode {
    pub const fn leaf(key: &'static str, label: &'static str) -> Self {
        CatalogNode {
            key,
            label,
            children: &[],
        }
    }

    pub const fn with_children(
        key: &'static str,
        label: &'static str,
        children: &'static [CatalogNode],
    ) -> Self {
        CatalogNode {
            key,
            label,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node's children are themselves grouping nodes.
    pub fn has_variants(&self) -> bool {
        self.children.iter().any(|child| !child.is_leaf())
    }

    pub fn child(&self, key: &str) -> Option<&CatalogNode> {
        self.children.iter().find(|child| child.key == key)
    }

    /// The child named `key`, or the first child.
    pub fn child_or_first(&self, key: Option<&str>) -> Option<&CatalogNode> {
        key.and_then(|k| self.child(k))
            .or_else(|| self.children.first())
    }

    pub fn to_option(&self) -> FieldOption {
        FieldOption::new(self.key, self.label)
    }
}

/// Keys selected in a catalog for one framework.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogSelection {
    pub parent: &'static str,
    pub variant: Option<&'static str>,
    pub library: Option<&'static str>,
}

/// Walks `tree` using the `framework`, `frameworkVariant`, and `library`
/// state keys, falling back to the first child at each level.
///
/// Returns `None` when the tree is empty.
pub fn resolve_selection(tree: &'static [CatalogNode], state: &State) -> Option<CatalogSelection> {
    let framework = state.key_of("framework");
    let parent = framework
        .as_deref()
        .and_then(|key| tree.iter().find(|node| node.key == key))
        .or_else(|| tree.first())?;

    let variant_key = state.key_of("frameworkVariant");
    let library_key = state.key_of("library");

    let (variant, libraries) = if parent.has_variants() {
        let variant = parent.child_or_first(variant_key.as_deref());
        (variant, variant.map(|v| v.children).unwrap_or_default())
    } else {
        (None, parent.children)
    };

    let library = library_key
        .as_deref()
        .and_then(|key| libraries.iter().find(|node| node.key == key))
        .or_else(|| libraries.first());

    Some(CatalogSelection {
        parent: parent.key,
        variant: variant.map(|v| v.key),
        library: library.map(|l| l.key),
    })
}

/// The library key selected for the current framework, if any.
pub fn resolve_library_key(tree: &'static [CatalogNode], state: &State) -> Option<&'static str> {
    resolve_selection(tree, state).and_then(|selection| selection.library)
}
