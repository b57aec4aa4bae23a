//! In-memory elements for tests, simulations and non-visual hosts.
//!
//! [`HeadlessElement`] keeps a layout box set by its owner, renders the
//! transform the engine writes on top of it, and logs every style write so
//! callers can inspect what the engine did and in which order.

use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::element::Element;
use crate::geometry::{Coords, Rect};

/// A style write performed by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleWrite {
    /// `transform` set (`Some`) or cleared (`None`).
    Transform(Option<Coords>),
    /// `transform-origin` pinned to the top-left corner.
    OriginTopLeft,
}

#[derive(Debug)]
struct Node {
    name: String,
    layout: Option<Rect>,
    children: Vec<HeadlessElement>,
    transform: Option<Coords>,
    origin_top_left: bool,
    connected: bool,
    writes: Vec<StyleWrite>,
}

/// Shared handle to an in-memory element. Clones refer to the same element.
#[derive(Debug, Clone)]
pub struct HeadlessElement(Rc<RefCell<Node>>);

impl PartialEq for HeadlessElement {
    fn eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl Eq for HeadlessElement {}

impl Hash for HeadlessElement {
    fn hash<H: Hasher>(&self, state: &mut H) { Rc::as_ptr(&self.0).hash(state); }
}

impl HeadlessElement {
    /// Creates an element with the given viewport layout box.
    #[must_use]
    pub fn new(name: impl Into<String>, layout: Rect) -> Self {
        Self::with_layout(name.into(), Some(layout))
    }

    /// Creates a node without a layout box.
    #[must_use]
    pub fn unmeasurable(name: impl Into<String>) -> Self { Self::with_layout(name.into(), None) }

    fn with_layout(name: String, layout: Option<Rect>) -> Self {
        Self(Rc::new(RefCell::new(Node {
            name,
            layout,
            children: Vec::new(),
            transform: None,
            origin_top_left: false,
            connected: true,
            writes: Vec::new(),
        })))
    }

    /// Debug name.
    #[must_use]
    pub fn name(&self) -> String { self.0.borrow().name.clone() }

    /// Appends a child and returns it.
    pub fn append_child(&self, child: Self) -> Self {
        self.0.borrow_mut().children.push(child.clone());
        child
    }

    /// Removes a child. Returns whether it was present.
    pub fn remove_child(&self, child: &Self) -> bool {
        let mut node = self.0.borrow_mut();
        let before = node.children.len();
        node.children.retain(|c| c != child);
        node.children.len() != before
    }

    /// Replaces the child list order.
    pub fn set_children(&self, children: Vec<Self>) { self.0.borrow_mut().children = children; }

    /// Moves the untransformed layout box, as a layout engine would.
    pub fn set_layout(&self, layout: Rect) { self.0.borrow_mut().layout = Some(layout); }

    /// The untransformed layout box.
    #[must_use]
    pub fn layout(&self) -> Option<Rect> { self.0.borrow().layout }

    /// The transform currently applied.
    #[must_use]
    pub fn transform(&self) -> Option<Coords> { self.0.borrow().transform }

    /// Whether the transform origin was pinned to the top-left corner.
    #[must_use]
    pub fn has_top_left_origin(&self) -> bool { self.0.borrow().origin_top_left }

    /// Every style write so far, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<StyleWrite> { self.0.borrow().writes.clone() }

    /// Forgets the write log.
    pub fn clear_writes(&self) { self.0.borrow_mut().writes.clear(); }

    /// Marks the element as removed from the document.
    pub fn detach(&self) { self.0.borrow_mut().connected = false; }
}

impl Element for HeadlessElement {
    fn bounding_rect(&self) -> Option<Rect> {
        let node = self.0.borrow();
        let layout = node.layout?;
        let Some(t) = node.transform else {
            return Some(layout);
        };

        let width = layout.width * t.scale_x;
        let height = layout.height * t.scale_y;
        // Default origin is the centre of the box.
        let (dx, dy) = if node.origin_top_left {
            (0.0, 0.0)
        } else {
            ((layout.width - width) / 2.0, (layout.height - height) / 2.0)
        };
        Some(Rect::new(layout.x + t.translate_x + dx, layout.y + t.translate_y + dy, width, height))
    }

    fn children(&self) -> Vec<Self> { self.0.borrow().children.clone() }

    fn set_transform(&self, transform: Option<Coords>) {
        let mut node = self.0.borrow_mut();
        node.transform = transform;
        node.writes.push(StyleWrite::Transform(transform));
    }

    fn set_transform_origin_top_left(&self) {
        let mut node = self.0.borrow_mut();
        node.origin_top_left = true;
        node.writes.push(StyleWrite::OriginTopLeft);
    }

    fn is_connected(&self) -> bool { self.0.borrow().connected }
}

// ============================================================================
// HeadlessGrid
// ============================================================================

/// A fixed-cell grid layout over headless elements.
///
/// Each item wraps its content in one child so the engine's counter-scaling
/// path is exercised.
#[derive(Debug, Clone)]
pub struct HeadlessGrid {
    container: HeadlessElement,
    columns: usize,
    cell: f64,
    gap: f64,
}

impl HeadlessGrid {
    /// Creates a grid container at the viewport origin with `count` items.
    #[must_use]
    pub fn new(count: usize, columns: usize, cell: f64, gap: f64) -> Self {
        let columns = columns.max(1);
        #[allow(clippy::cast_precision_loss)]
        let width = (columns as f64).mul_add(cell + gap, -gap).max(0.0);
        let container = HeadlessElement::new("grid", Rect::new(0.0, 0.0, width, 0.0));
        let grid = Self { container, columns, cell, gap };

        for index in 0..count {
            let item = grid.container.append_child(HeadlessElement::new(
                format!("item-{index}"),
                Rect::zero(),
            ));
            item.append_child(HeadlessElement::new(format!("item-{index}/content"), Rect::zero()));
        }
        grid.reflow();
        grid
    }

    /// The container element.
    #[must_use]
    pub const fn container(&self) -> &HeadlessElement { &self.container }

    /// Items in layout order.
    #[must_use]
    pub fn items(&self) -> Vec<HeadlessElement> { self.container.children() }

    /// Lays every item out in its cell, row by row.
    #[allow(clippy::cast_precision_loss)]
    pub fn reflow(&self) {
        let items = self.items();
        for (index, item) in items.iter().enumerate() {
            let column = (index % self.columns) as f64;
            let row = (index / self.columns) as f64;
            let cell = Rect::new(
                column * (self.cell + self.gap),
                row * (self.cell + self.gap),
                self.cell,
                self.cell,
            );
            item.set_layout(cell);
            for child in item.children() {
                child.set_layout(cell);
            }
        }

        let rows = items.len().div_ceil(self.columns) as f64;
        if let Some(frame) = self.container.layout() {
            let height = rows.mul_add(self.cell + self.gap, -self.gap).max(0.0);
            self.container.set_layout(Rect::new(frame.x, frame.y, frame.width, height));
        }
    }

    /// Reverses item order and reflows.
    pub fn reverse(&self) {
        let mut items = self.items();
        items.reverse();
        self.container.set_children(items);
        self.reflow();
    }

    /// Removes the item at `index` and reflows.
    pub fn remove(&self, index: usize) -> Option<HeadlessElement> {
        let item = self.items().get(index).cloned()?;
        self.container.remove_child(&item);
        self.reflow();
        Some(item)
    }
}
