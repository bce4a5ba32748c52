//! Positioned, parented view over green elements.
//!
//! A positioned tree is owned top-down: every node owns the cells holding its
//! lazily created children, and a child refers back to its parent with a raw
//! pointer. Handles ([`SyntaxNode`], [`SyntaxToken`]) keep the root allocation
//! alive, so the whole materialized tree lives exactly as long as some handle
//! into it does, and there are no reference cycles.

mod element;
mod iter;
mod node;
mod token;

use std::ptr;

use once_cell::race::OnceBox;
use text_size::TextSize;

pub use element::SyntaxElement;
pub use iter::{Descendants, Preorder, SyntaxElementChildren, WalkEvent};
pub use node::SyntaxNode;
pub use token::SyntaxToken;

use crate::{GreenElement, NodeOrToken};

pub(crate) struct NodeData {
    green: GreenElement,
    /// Null for the root.
    parent: *const NodeData,
    index: u32,
    offset: TextSize,
    children: Box<[OnceBox<NodeData>]>,
}

// SAFETY: `parent` points into the same tree, which is immutable apart from the
// `OnceBox` cells, and those are synchronized. A `NodeData` is only reachable
// through a handle that keeps the root allocation, and thus the parent, alive.
unsafe impl Send for NodeData {}
unsafe impl Sync for NodeData {}

impl NodeData {
    fn new(green: GreenElement, parent: *const Self, index: u32, offset: TextSize) -> Self {
        let children = (0..green.slot_count()).map(|_| OnceBox::new()).collect();
        Self { green, parent, index, offset, children }
    }

    fn new_root(green: GreenElement) -> Self {
        Self::new(green, ptr::null(), 0, TextSize::new(0))
    }

    fn end(&self) -> TextSize {
        self.offset + self.green.full_width()
    }

    fn parent(&self) -> Option<&Self> {
        // SAFETY: see the `Send`/`Sync` impls above.
        unsafe { self.parent.as_ref() }
    }

    /// Returns the memoized child for `slot`, materializing it on first access.
    ///
    /// Racing threads may each build a candidate, but only the first one to
    /// be installed is ever observed; the others are dropped unseen. Building
    /// a candidate has no side effects, so dropping it is always fine.
    fn child(&self, slot: usize) -> Option<&Self> {
        let cell = self.children.get(slot)?;
        if let Some(child) = cell.get() {
            return Some(child);
        }

        let NodeOrToken::Node(green) = &self.green else { return None };
        let green_child = green.slot(slot)?;
        Some(cell.get_or_init(|| {
            let offset = self.child_offset(slot);
            Box::new(Self::new(green_child.clone(), self, slot as u32, offset))
        }))
    }

    /// Already materialized child for `slot`, if any.
    fn cached_child(&self, slot: usize) -> Option<&Self> {
        self.children.get(slot)?.get()
    }

    /// Offset of the child in `slot`.
    ///
    /// The nearest materialized earlier sibling anchors the computation;
    /// without one, the widths of the earlier slots are summed from this
    /// node's own offset.
    fn child_offset(&self, slot: usize) -> TextSize {
        if slot == 0 {
            return self.offset;
        }

        let NodeOrToken::Node(green) = &self.green else { return self.offset };
        let mut width = TextSize::new(0);
        for index in (0..slot).rev() {
            if let Some(sibling) = self.cached_child(index) {
                return sibling.end() + width;
            }
            if let Some(sibling) = green.slot(index) {
                width += sibling.full_width();
            }
        }
        self.offset + width
    }

    /// Slot indices from the root down to this node.
    fn slot_path(&self) -> Vec<u32> {
        let mut path = Vec::new();
        let mut current = self;
        while let Some(parent) = current.parent() {
            path.push(current.index);
            current = parent;
        }
        path.reverse();
        path
    }
}
