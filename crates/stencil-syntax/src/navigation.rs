//! Token-level navigation over positioned trees.
//!
//! Searches consult the green slots before materializing anything, so a
//! predicate that can rule out whole subtrees keeps them unmaterialized.

use text_size::TextSize;

use crate::pool::Pool;
use crate::{GreenElement, NodeOrToken, SyntaxElement, SyntaxNode, SyntaxToken};

/// Selects tokens during navigation.
pub trait TokenPredicate {
    fn matches(&self, token: &SyntaxToken) -> bool;

    /// Returns `false` when no token inside `green` can match, letting the
    /// search skip it without building positioned nodes.
    fn may_contain(&self, green: &GreenElement) -> bool {
        let _ = green;
        true
    }
}

impl<F> TokenPredicate for F
where
    F: Fn(&SyntaxToken) -> bool,
{
    fn matches(&self, token: &SyntaxToken) -> bool {
        self(token)
    }
}

/// Every token, including missing ones.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyToken;

impl TokenPredicate for AnyToken {
    fn matches(&self, _: &SyntaxToken) -> bool {
        true
    }
}

/// Tokens that occupy source text.
#[derive(Clone, Copy, Debug, Default)]
pub struct NonZeroWidth;

impl TokenPredicate for NonZeroWidth {
    fn matches(&self, token: &SyntaxToken) -> bool {
        token.green().full_width() > TextSize::new(0)
    }

    fn may_contain(&self, green: &GreenElement) -> bool {
        green.full_width() > TextSize::new(0)
    }
}

/// Tokens other than `WHITESPACE` and `NEWLINE`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NonWhitespace;

impl TokenPredicate for NonWhitespace {
    fn matches(&self, token: &SyntaxToken) -> bool {
        !token.kind().is_whitespace_like()
    }
}

struct Frame {
    node: SyntaxNode,
    /// Forward walks: the next slot to visit. Backward walks: the number of
    /// slots still to visit.
    next: usize,
}

static STACKS: Pool<Vec<Frame>> = Pool::new(Vec::new);

impl SyntaxNode {
    /// The first token of this subtree, in text order, matching `predicate`.
    pub fn first_token(&self, predicate: &impl TokenPredicate) -> Option<SyntaxToken> {
        let mut stack = STACKS.acquire();
        stack.push(Frame { node: self.clone(), next: 0 });

        while let Some(frame) = stack.last_mut() {
            let slot = frame.next;
            if slot >= frame.node.slot_count() {
                stack.pop();
                continue;
            }
            frame.next += 1;

            let Some(child) = visit(&frame.node, slot, predicate) else { continue };
            match child {
                NodeOrToken::Token(token) if predicate.matches(&token) => return Some(token),
                NodeOrToken::Token(_) => {}
                NodeOrToken::Node(node) => stack.push(Frame { node, next: 0 }),
            }
        }
        None
    }

    /// The last token of this subtree, in text order, matching `predicate`.
    pub fn last_token(&self, predicate: &impl TokenPredicate) -> Option<SyntaxToken> {
        let mut stack = STACKS.acquire();
        stack.push(Frame { node: self.clone(), next: self.slot_count() });

        while let Some(frame) = stack.last_mut() {
            if frame.next == 0 {
                stack.pop();
                continue;
            }
            frame.next -= 1;
            let slot = frame.next;

            let Some(child) = visit(&frame.node, slot, predicate) else { continue };
            match child {
                NodeOrToken::Token(token) if predicate.matches(&token) => return Some(token),
                NodeOrToken::Token(_) => {}
                NodeOrToken::Node(node) => {
                    let next = node.slot_count();
                    stack.push(Frame { node, next });
                }
            }
        }
        None
    }
}

/// Materializes the child in `slot` unless it is absent or ruled out.
fn visit(
    parent: &SyntaxNode,
    slot: usize,
    predicate: &impl TokenPredicate,
) -> Option<SyntaxElement> {
    let green = parent.green().slot(slot)?;
    if !predicate.may_contain(green) {
        return None;
    }
    parent.child(slot)
}

fn first_in(element: SyntaxElement, predicate: &impl TokenPredicate) -> Option<SyntaxToken> {
    match element {
        NodeOrToken::Token(token) => predicate.matches(&token).then_some(token),
        NodeOrToken::Node(node) => node.first_token(predicate),
    }
}

fn last_in(element: SyntaxElement, predicate: &impl TokenPredicate) -> Option<SyntaxToken> {
    match element {
        NodeOrToken::Token(token) => predicate.matches(&token).then_some(token),
        NodeOrToken::Node(node) => node.last_token(predicate),
    }
}

/// The first matching token after `element`, searching outward through its
/// ancestors. `None` once the root is exhausted.
pub(crate) fn next_token(
    element: &SyntaxElement,
    predicate: &impl TokenPredicate,
) -> Option<SyntaxToken> {
    let mut current = element.clone();
    loop {
        let parent = current.parent()?;
        for slot in current.index() + 1..parent.slot_count() {
            let found = visit(&parent, slot, predicate).and_then(|child| first_in(child, predicate));
            if found.is_some() {
                return found;
            }
        }
        current = SyntaxElement::Node(parent);
    }
}

/// The last matching token before `element`, searching outward through its
/// ancestors.
pub(crate) fn prev_token(
    element: &SyntaxElement,
    predicate: &impl TokenPredicate,
) -> Option<SyntaxToken> {
    let mut current = element.clone();
    loop {
        let parent = current.parent()?;
        for slot in (0..current.index()).rev() {
            let found = visit(&parent, slot, predicate).and_then(|child| last_in(child, predicate));
            if found.is_some() {
                return found;
            }
        }
        current = SyntaxElement::Node(parent);
    }
}
