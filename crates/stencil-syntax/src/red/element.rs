use stencil_errors::Diagnostic;
use text_size::{TextRange, TextSize};

use super::{SyntaxNode, SyntaxToken};
use crate::{GreenElement, NodeOrToken, SyntaxKind};

pub type SyntaxElement = NodeOrToken<SyntaxNode, SyntaxToken>;

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn offset(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.offset(),
            NodeOrToken::Token(token) => token.offset(),
        }
    }

    pub fn end(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.end(),
            NodeOrToken::Token(token) => token.end(),
        }
    }

    pub fn full_span(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.full_span(),
            NodeOrToken::Token(token) => token.full_span(),
        }
    }

    pub fn span(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.span(),
            NodeOrToken::Token(token) => token.span(),
        }
    }

    pub fn parent(&self) -> Option<SyntaxNode> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent()),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            NodeOrToken::Node(node) => node.index(),
            NodeOrToken::Token(token) => token.index(),
        }
    }

    pub fn green(&self) -> &GreenElement {
        match self {
            NodeOrToken::Node(node) => node.green_element(),
            NodeOrToken::Token(token) => token.green_element(),
        }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            NodeOrToken::Node(node) => node.diagnostics(),
            NodeOrToken::Token(token) => token.diagnostics(),
        }
    }

    /// Next present sibling in the parent's slots.
    pub fn next_sibling_or_token(&self) -> Option<Self> {
        let parent = self.parent()?;
        (self.index() + 1..parent.slot_count()).find_map(|slot| parent.child(slot))
    }

    /// Previous present sibling in the parent's slots.
    pub fn prev_sibling_or_token(&self) -> Option<Self> {
        let parent = self.parent()?;
        (0..self.index()).rev().find_map(|slot| parent.child(slot))
    }

    pub(crate) fn slot_path(&self) -> Vec<u32> {
        match self {
            NodeOrToken::Node(node) => node.slot_path(),
            NodeOrToken::Token(token) => token.slot_path(),
        }
    }

    pub(crate) fn same_tree(&self, root: &SyntaxNode) -> bool {
        match self {
            NodeOrToken::Node(node) => node.same_tree(root),
            NodeOrToken::Token(token) => token.parent().same_tree(root),
        }
    }
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        NodeOrToken::Node(node)
    }
}

impl From<SyntaxToken> for SyntaxElement {
    fn from(token: SyntaxToken) -> Self {
        NodeOrToken::Token(token)
    }
}
