//! Staging buffer for sibling sequences.

use crate::pool::{Pool, Pooled, Recycle};
use crate::{GreenElement, GreenNode, NodeOrToken, SyntaxKind};

const DEFAULT_CHILDREN_LEN: usize = 8;

static LIST_BUILDERS: Pool<SyntaxListBuilder> = Pool::new(SyntaxListBuilder::new);

/// Collects children of a `LIST` node during construction.
///
/// Builders are single-owner scratch space: borrow one with
/// [`SyntaxListBuilder::pooled`], fill it, call [`SyntaxListBuilder::to_list`],
/// and let the guard hand it back.
#[derive(Debug, Default)]
pub struct SyntaxListBuilder {
    items: Vec<GreenElement>,
}

impl SyntaxListBuilder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHILDREN_LEN)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    /// Borrows a cleared builder from the shared pool.
    pub fn pooled() -> Pooled<'static, Self> {
        LIST_BUILDERS.acquire()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn add(&mut self, item: impl Into<GreenElement>) {
        self.items.push(item.into());
    }

    /// Adds a slot value, which must be present.
    #[track_caller]
    pub fn add_slot(&mut self, item: Option<&GreenElement>) {
        match item {
            Some(item) => self.items.push(item.clone()),
            None => panic!("attempted to add an absent child to a list"),
        }
    }

    pub fn add_range(&mut self, items: &[GreenElement]) {
        self.items.extend_from_slice(items);
    }

    #[track_caller]
    pub fn add_range_of(&mut self, items: &[GreenElement], offset: usize, count: usize) {
        self.items.extend_from_slice(&items[offset..offset + count]);
    }

    /// Adds `element`, splicing in the children of a `LIST` node instead of
    /// nesting it.
    pub fn add_list(&mut self, element: &GreenElement) {
        match element {
            NodeOrToken::Node(list) if list.kind().is_list() => {
                self.add_list_range(list, 0, list.slot_count());
            }
            _ => self.items.push(element.clone()),
        }
    }

    /// Adds `count` children of `list` starting at `offset`.
    #[track_caller]
    pub fn add_list_range(&mut self, list: &GreenNode, offset: usize, count: usize) {
        self.items.reserve(count);
        for slot in &list.slots()[offset..offset + count] {
            self.add_slot(slot.as_ref());
        }
    }

    pub fn any(&self, kind: SyntaxKind) -> bool {
        self.items.iter().any(|item| item.kind() == kind)
    }

    /// Builds the cheapest representation of the collected children: nothing
    /// for an empty builder, the child itself for a single element, and a
    /// `LIST` node otherwise.
    pub fn to_list(&self) -> Option<GreenElement> {
        match self.items.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            items => Some(GreenNode::list(items.to_vec()).into()),
        }
    }
}

impl Recycle for SyntaxListBuilder {
    fn recycle(&mut self, max_retained_capacity: usize) {
        Recycle::recycle(&mut self.items, max_retained_capacity);
    }
}
