//! Host element abstraction and change records.
//!
//! The engine never owns elements. It holds cheap handles (`Clone`) whose
//! equality and hash follow element identity, so two handles to the same
//! element always map to the same tracked item.

use std::hash::Hash;

use crate::geometry::{Coords, Rect};

/// A visual element the engine can measure and style.
pub trait Element: Clone + Eq + Hash {
    /// Viewport-relative layout box, including any transform currently
    /// applied. `None` for nodes without a layout box.
    fn bounding_rect(&self) -> Option<Rect>;

    /// Direct child elements in document order.
    fn children(&self) -> Vec<Self>;

    /// Sets the element's 2D transform, or clears it with `None`.
    fn set_transform(&self, transform: Option<Coords>);

    /// Pins the transform origin to the element's top-left corner.
    fn set_transform_origin_top_left(&self);

    /// Whether the element is still attached to the document.
    fn is_connected(&self) -> bool { true }
}

/// Kind of a single observed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// An attribute changed.
    Attribute {
        /// Attribute name.
        name: String,
    },
    /// Children were added to or removed from a node.
    ChildList {
        /// Number of added nodes.
        added: usize,
        /// Number of removed nodes.
        removed: usize,
    },
    /// Text content changed.
    CharacterData,
}

/// One change delivered by the host's change observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// What changed.
    pub kind: ChangeKind,
}

impl ChangeRecord {
    /// An attribute change.
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self { kind: ChangeKind::Attribute { name: name.into() } }
    }

    /// A `class` attribute change.
    #[must_use]
    pub fn class_change() -> Self { Self::attribute("class") }

    /// A child list change.
    #[must_use]
    pub const fn child_list(added: usize, removed: usize) -> Self {
        Self { kind: ChangeKind::ChildList { added, removed } }
    }

    /// A text content change.
    #[must_use]
    pub const fn character_data() -> Self { Self { kind: ChangeKind::CharacterData } }

    /// Whether this change can move items: a class change or a node
    /// addition or removal.
    #[must_use]
    pub fn affects_layout(&self) -> bool {
        match &self.kind {
            ChangeKind::Attribute { name } => name == "class",
            ChangeKind::ChildList { added, removed } => *added > 0 || *removed > 0,
            ChangeKind::CharacterData => false,
        }
    }
}

/// Returns whether a batch contains at least one layout-relevant change.
#[must_use]
pub fn batch_affects_layout(records: &[ChangeRecord]) -> bool {
    records.iter().any(ChangeRecord::affects_layout)
}
