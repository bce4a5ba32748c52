use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

use stencil_errors::Diagnostic;
use text_size::{TextRange, TextSize};
use triomphe::Arc;

use super::{
    Descendants, NodeData, Preorder, SyntaxElement, SyntaxElementChildren, SyntaxToken, WalkEvent,
};
use crate::{Annotation, GreenElement, GreenNode, NodeOrToken, SyntaxKind};

/// A positioned node.
///
/// Handles are cheap to clone and compare by identity: two handles are equal
/// when they present the same materialized node of the same tree.
#[derive(Clone)]
pub struct SyntaxNode {
    pub(super) root: Arc<NodeData>,
    pub(super) ptr: NonNull<NodeData>,
}

// SAFETY: `NodeData` is `Send + Sync`, and `ptr` is kept valid by `root`.
unsafe impl Send for SyntaxNode {}
unsafe impl Sync for SyntaxNode {}

impl SyntaxNode {
    /// Wraps `green` as the root of a new positioned tree at offset zero.
    pub fn new_root(green: GreenNode) -> Self {
        let root = Arc::new(NodeData::new_root(green.into()));
        let ptr = NonNull::from(&*root);
        Self { root, ptr }
    }

    #[inline]
    pub(super) fn data(&self) -> &NodeData {
        // SAFETY: `self.root` keeps every node of the tree alive.
        unsafe { self.ptr.as_ref() }
    }

    pub(super) fn element(root: &Arc<NodeData>, data: &NodeData) -> SyntaxElement {
        let ptr = NonNull::from(data);
        match data.green {
            NodeOrToken::Node(_) => SyntaxElement::Node(Self { root: root.clone(), ptr }),
            NodeOrToken::Token(_) => SyntaxElement::Token(SyntaxToken { root: root.clone(), ptr }),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.green().kind()
    }

    pub fn green(&self) -> &GreenNode {
        match &self.data().green {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(_) => unreachable!("syntax node over a green token"),
        }
    }

    /// Absolute offset of the first character, leading trivia included.
    pub fn offset(&self) -> TextSize {
        self.data().offset
    }

    pub fn end(&self) -> TextSize {
        self.data().end()
    }

    pub fn full_width(&self) -> TextSize {
        self.green().full_width()
    }

    /// Range including all trivia.
    pub fn full_span(&self) -> TextRange {
        TextRange::new(self.offset(), self.end())
    }

    /// Range without the leading trivia of the first token and the trailing
    /// trivia of the last token.
    pub fn span(&self) -> TextRange {
        let green = self.green();
        TextRange::new(
            self.offset() + green.leading_trivia_width(),
            self.end() - green.trailing_trivia_width(),
        )
    }

    pub fn parent(&self) -> Option<Self> {
        let parent = NonNull::from(self.data().parent()?);
        Some(Self { root: self.root.clone(), ptr: parent })
    }

    /// Slot of this node within its parent; zero for the root.
    pub fn index(&self) -> usize {
        self.data().index as usize
    }

    pub fn is_root(&self) -> bool {
        self.data().parent().is_none()
    }

    pub fn root(&self) -> Self {
        Self { root: self.root.clone(), ptr: NonNull::from(&*self.root) }
    }

    /// Whether `self` and `other` are handles into the same positioned tree.
    pub fn same_tree(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    pub fn slot_count(&self) -> usize {
        self.green().slot_count()
    }

    /// Returns the positioned child in `slot`, or `None` for an absent slot.
    pub fn child(&self, slot: usize) -> Option<SyntaxElement> {
        let child = self.data().child(slot)?;
        Some(Self::element(&self.root, child))
    }

    pub fn child_node(&self, slot: usize) -> Option<Self> {
        self.child(slot)?.into_node()
    }

    pub fn child_token(&self, slot: usize) -> Option<SyntaxToken> {
        self.child(slot)?.into_token()
    }

    /// Iterates over present children, nodes and tokens alike.
    pub fn children(&self) -> SyntaxElementChildren {
        SyntaxElementChildren::new(self.clone(), 0)
    }

    pub fn child_nodes(&self) -> impl DoubleEndedIterator<Item = Self> + Clone {
        self.children().filter_map(NodeOrToken::into_node)
    }

    pub fn first_child_or_token(&self) -> Option<SyntaxElement> {
        self.children().next()
    }

    pub fn last_child_or_token(&self) -> Option<SyntaxElement> {
        self.children().next_back()
    }

    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement> {
        SyntaxElement::Node(self.clone()).next_sibling_or_token()
    }

    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement> {
        SyntaxElement::Node(self.clone()).prev_sibling_or_token()
    }

    /// Ancestors starting from the parent.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + Clone {
        std::iter::successors(self.parent(), Self::parent)
    }

    /// Ancestors starting from this node.
    pub fn ancestors_and_self(&self) -> impl Iterator<Item = Self> + Clone {
        std::iter::successors(Some(self.clone()), Self::parent)
    }

    /// Preorder walk over all elements below this node. A node's children are
    /// visited only if `descend_into` returns `true` for it; the predicate is
    /// also consulted for `self`.
    pub fn descendants<F>(&self, descend_into: F) -> Descendants<F>
    where
        F: FnMut(&Self) -> bool,
    {
        Descendants::new(self.clone(), false, descend_into)
    }

    /// Like [`SyntaxNode::descendants`], but yields `self` first.
    pub fn descendants_and_self<F>(&self, descend_into: F) -> Descendants<F>
    where
        F: FnMut(&Self) -> bool,
    {
        Descendants::new(self.clone(), true, descend_into)
    }

    pub fn descendant_nodes(&self) -> impl Iterator<Item = Self> + Clone {
        self.descendants(|_: &Self| true).filter_map(NodeOrToken::into_node)
    }

    pub fn descendant_tokens(&self) -> impl Iterator<Item = SyntaxToken> + Clone {
        self.descendants(|_: &Self| true).filter_map(NodeOrToken::into_token)
    }

    pub fn preorder(&self) -> Preorder {
        Preorder::new(self.clone())
    }

    /// Exact source text of this node, trivia included.
    pub fn full_text(&self) -> String {
        self.green().to_string()
    }

    /// Diagnostics of this node and all descendants, with absolute ranges.
    ///
    /// Subtrees without diagnostics are skipped without materializing them.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        collect_diagnostics(&self.data().green, self.offset(), &mut diagnostics);
        diagnostics
    }

    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        self.green().annotation(key)
    }

    pub fn annotation_value<T: std::any::Any>(&self, key: &str) -> Option<&T> {
        self.green().annotation_value(key)
    }

    /// Structural, position-independent comparison of the underlying green nodes.
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        self.green().is_equivalent_to(other.green())
    }

    pub(crate) fn slot_path(&self) -> Vec<u32> {
        self.data().slot_path()
    }

    /// Follows `path` from this node, materializing the nodes along the way.
    pub(crate) fn descend_path(&self, path: &[u32]) -> Option<SyntaxElement> {
        let mut current = SyntaxElement::Node(self.clone());
        for &slot in path {
            current = current.into_node()?.child(slot as usize)?;
        }
        Some(current)
    }

    pub(crate) fn green_element(&self) -> &GreenElement {
        &self.data().green
    }

    /// Renders the tree as an indented list of kinds, ranges, and token texts.
    pub fn debug_dump(&self) -> String {
        use std::fmt::Write as _;

        let mut out = String::new();
        let mut depth = 0usize;
        for event in self.preorder() {
            let indent = depth * 2;
            match event {
                WalkEvent::EnterNode(node) => {
                    _ = writeln!(out, "{:indent$}{node:?}", "");
                    depth += 1;
                }
                WalkEvent::LeaveNode(_) => depth -= 1,
                WalkEvent::Token(token) if token.is_missing() => {
                    _ = writeln!(out, "{:indent$}{token:?} (missing)", "");
                }
                WalkEvent::Token(token) => {
                    _ = writeln!(out, "{:indent$}{token:?} {:?}", "", token.text());
                }
            }
        }
        out
    }
}

fn collect_diagnostics(green: &GreenElement, offset: TextSize, out: &mut Vec<Diagnostic>) {
    if !green.contains_diagnostics() {
        return;
    }
    out.extend(green.diagnostics().iter().map(|diagnostic| diagnostic.shifted(offset)));
    if let NodeOrToken::Node(node) = green {
        let mut child_offset = offset;
        for child in node.children() {
            collect_diagnostics(child, child_offset, out);
            child_offset += child.full_width();
        }
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.hash(state);
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.full_span())
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.green().write_text(f)
    }
}
