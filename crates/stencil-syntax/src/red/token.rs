use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

use stencil_errors::Diagnostic;
use text_size::{TextRange, TextSize};
use triomphe::Arc;

use super::{NodeData, SyntaxElement, SyntaxNode};
use crate::navigation::{self, TokenPredicate};
use crate::{Annotation, GreenElement, GreenToken, GreenTrivia, NodeOrToken, SyntaxKind};

/// A positioned token.
#[derive(Clone)]
pub struct SyntaxToken {
    pub(super) root: Arc<NodeData>,
    pub(super) ptr: NonNull<NodeData>,
}

// SAFETY: same reasoning as for `SyntaxNode`.
unsafe impl Send for SyntaxToken {}
unsafe impl Sync for SyntaxToken {}

impl SyntaxToken {
    #[inline]
    fn data(&self) -> &NodeData {
        // SAFETY: `self.root` keeps every node of the tree alive.
        unsafe { self.ptr.as_ref() }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.green().kind()
    }

    pub fn green(&self) -> &GreenToken {
        match &self.data().green {
            NodeOrToken::Token(token) => token,
            NodeOrToken::Node(_) => unreachable!("syntax token over a green node"),
        }
    }

    pub(crate) fn green_element(&self) -> &GreenElement {
        &self.data().green
    }

    /// Absolute offset of the first character, leading trivia included.
    pub fn offset(&self) -> TextSize {
        self.data().offset
    }

    pub fn end(&self) -> TextSize {
        self.data().end()
    }

    pub fn full_span(&self) -> TextRange {
        TextRange::new(self.offset(), self.end())
    }

    /// Range of the token without its trivia.
    pub fn span(&self) -> TextRange {
        let green = self.green();
        TextRange::new(self.offset() + green.leading().len(), self.end() - green.trailing().len())
    }

    /// Full text including trivia.
    pub fn text(&self) -> &str {
        self.green().text()
    }

    pub fn text_trimmed(&self) -> &str {
        self.green().text_trimmed()
    }

    pub fn leading_trivia(&self) -> &GreenTrivia {
        self.green().leading()
    }

    pub fn trailing_trivia(&self) -> &GreenTrivia {
        self.green().trailing()
    }

    pub fn is_missing(&self) -> bool {
        self.green().is_missing()
    }

    /// Every token lives inside some node, so there is always a parent.
    pub fn parent(&self) -> SyntaxNode {
        match self.data().parent() {
            Some(parent) => SyntaxNode { root: self.root.clone(), ptr: NonNull::from(parent) },
            None => unreachable!("token without a parent"),
        }
    }

    pub fn index(&self) -> usize {
        self.data().index as usize
    }

    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + Clone {
        std::iter::successors(Some(self.parent()), SyntaxNode::parent)
    }

    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement> {
        SyntaxElement::Token(self.clone()).next_sibling_or_token()
    }

    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement> {
        SyntaxElement::Token(self.clone()).prev_sibling_or_token()
    }

    /// The closest token after this one, in text order, matching `predicate`.
    pub fn next_token(&self, predicate: &impl TokenPredicate) -> Option<Self> {
        navigation::next_token(&SyntaxElement::Token(self.clone()), predicate)
    }

    /// The closest token before this one, in text order, matching `predicate`.
    pub fn prev_token(&self, predicate: &impl TokenPredicate) -> Option<Self> {
        navigation::prev_token(&SyntaxElement::Token(self.clone()), predicate)
    }

    /// Diagnostics of this token with absolute ranges.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let offset = self.offset();
        self.green().diagnostics().iter().map(|diagnostic| diagnostic.shifted(offset)).collect()
    }

    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        self.green().annotation(key)
    }

    pub fn annotation_value<T: std::any::Any>(&self, key: &str) -> Option<&T> {
        self.green().annotation_value(key)
    }

    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        self.green().is_equivalent_to(other.green())
    }

    pub(crate) fn slot_path(&self) -> Vec<u32> {
        self.data().slot_path()
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl Eq for SyntaxToken {}

impl Hash for SyntaxToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.hash(state);
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.full_span())
    }
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
