use super::{SyntaxElement, SyntaxNode, SyntaxToken};

/// Present children of a node, in slot order.
#[derive(Clone)]
pub struct SyntaxElementChildren {
    parent: SyntaxNode,
    front: usize,
    back: usize,
}

impl SyntaxElementChildren {
    pub(super) fn new(parent: SyntaxNode, front: usize) -> Self {
        let back = parent.slot_count();
        Self { parent, front, back }
    }
}

impl Iterator for SyntaxElementChildren {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let slot = self.front;
            self.front += 1;
            if let Some(child) = self.parent.child(slot) {
                return Some(child);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back - self.front))
    }
}

impl DoubleEndedIterator for SyntaxElementChildren {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            self.back -= 1;
            if let Some(child) = self.parent.child(self.back) {
                return Some(child);
            }
        }
        None
    }
}

/// Preorder walk over the elements below a node, pruned by a predicate.
#[derive(Clone)]
pub struct Descendants<F> {
    stack: Vec<SyntaxElementChildren>,
    pending: Option<SyntaxNode>,
    yield_start: bool,
    descend_into: F,
}

impl<F> Descendants<F>
where
    F: FnMut(&SyntaxNode) -> bool,
{
    pub(super) fn new(start: SyntaxNode, yield_start: bool, descend_into: F) -> Self {
        Self { stack: Vec::new(), pending: Some(start), yield_start, descend_into }
    }

    fn enter(&mut self, node: &SyntaxNode) {
        if (self.descend_into)(node) {
            self.stack.push(node.children());
        }
    }
}

impl<F> Iterator for Descendants<F>
where
    F: FnMut(&SyntaxNode) -> bool,
{
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.pending.take() {
            self.enter(&start);
            if self.yield_start {
                return Some(SyntaxElement::Node(start));
            }
        }

        loop {
            let children = self.stack.last_mut()?;
            match children.next() {
                Some(SyntaxElement::Node(node)) => {
                    self.enter(&node);
                    return Some(SyntaxElement::Node(node));
                }
                Some(token @ SyntaxElement::Token(_)) => return Some(token),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Event produced by [`Preorder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalkEvent {
    EnterNode(SyntaxNode),
    LeaveNode(SyntaxNode),
    Token(SyntaxToken),
}

/// Preorder traversal over nodes and tokens with explicit enter and leave events.
#[derive(Clone)]
pub struct Preorder {
    stack: Vec<(SyntaxNode, SyntaxElementChildren)>,
    root: Option<SyntaxNode>,
}

impl Preorder {
    pub(super) fn new(start: SyntaxNode) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the children of the node that was just entered; its
    /// `LeaveNode` event is still produced.
    pub fn skip_subtree(&mut self) {
        if let Some((_, children)) = self.stack.last_mut() {
            children.front = children.back;
        }
    }
}

impl Iterator for Preorder {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.stack.push((root.clone(), root.children()));
            return Some(WalkEvent::EnterNode(root));
        }

        let (_, children) = self.stack.last_mut()?;
        match children.next() {
            Some(SyntaxElement::Node(child)) => {
                self.stack.push((child.clone(), child.children()));
                Some(WalkEvent::EnterNode(child))
            }
            Some(SyntaxElement::Token(token)) => Some(WalkEvent::Token(token)),
            None => {
                let (exited, _) = self.stack.pop()?;
                Some(WalkEvent::LeaveNode(exited))
            }
        }
    }
}
