//! Immutable, position-independent syntax elements.
//!
//! Green elements know their kind, their width and their children, but never
//! their parent or absolute offset, so one subtree can be shared by any number
//! of trees. They are cheap to clone (a refcount bump) and are never mutated
//! after construction: every `with_*` method returns a new element.

use std::fmt;

use stencil_errors::Diagnostic;
use text_size::TextSize;
use triomphe::Arc;

use crate::annotation::{self, Annotation};
use crate::{GreenTrivia, NodeOrToken, SyntaxKind};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

#[derive(Clone)]
pub struct GreenNode {
    data: Arc<GreenNodeData>,
}

struct GreenNodeData {
    kind: SyntaxKind,
    full_width: TextSize,
    slots: Slots,
    contains_diagnostics: bool,
    diagnostics: Box<[Diagnostic]>,
    annotations: Box<[Annotation]>,
}

/// Slot storage. Two and three children are stored inline, which covers most
/// lists and small nodes without a second allocation.
enum Slots {
    Two([Option<GreenElement>; 2]),
    Three([Option<GreenElement>; 3]),
    Many(Box<[Option<GreenElement>]>),
}

impl Slots {
    fn from_vec(slots: Vec<Option<GreenElement>>) -> Self {
        match slots.len() {
            2 => {
                let mut slots = slots.into_iter();
                Slots::Two([slots.next().flatten(), slots.next().flatten()])
            }
            3 => {
                let mut slots = slots.into_iter();
                Slots::Three([slots.next().flatten(), slots.next().flatten(), slots.next().flatten()])
            }
            _ => Slots::Many(slots.into_boxed_slice()),
        }
    }

    fn as_slice(&self) -> &[Option<GreenElement>] {
        match self {
            Slots::Two(slots) => slots,
            Slots::Three(slots) => slots,
            Slots::Many(slots) => slots,
        }
    }
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, slots: impl IntoIterator<Item = Option<GreenElement>>) -> Self {
        Self::new_with_diagnostics(kind, slots, Vec::new())
    }

    pub fn new_with_diagnostics(
        kind: SyntaxKind,
        slots: impl IntoIterator<Item = Option<GreenElement>>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        debug_assert!(!kind.is_token(), "{kind:?} is a token kind");
        Self::from_parts(kind, slots.into_iter().collect(), diagnostics.into(), Box::default())
    }

    /// Creates a `LIST` node. Prefer [`crate::SyntaxListBuilder::to_list`],
    /// which avoids creating lists of zero or one element.
    pub(crate) fn list(children: Vec<GreenElement>) -> Self {
        let slots = children.into_iter().map(Some).collect();
        Self::from_parts(SyntaxKind::LIST, slots, Box::default(), Box::default())
    }

    fn from_parts(
        kind: SyntaxKind,
        slots: Vec<Option<GreenElement>>,
        diagnostics: Box<[Diagnostic]>,
        annotations: Box<[Annotation]>,
    ) -> Self {
        let full_width = slots.iter().flatten().map(GreenElement::full_width).sum();
        let contains_diagnostics = !diagnostics.is_empty()
            || slots.iter().flatten().any(GreenElement::contains_diagnostics);
        let data = GreenNodeData {
            kind,
            full_width,
            slots: Slots::from_vec(slots),
            contains_diagnostics,
            diagnostics,
            annotations,
        };
        Self { data: Arc::new(data) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn full_width(&self) -> TextSize {
        self.data.full_width
    }

    /// Width without the leading trivia of the first token and the trailing
    /// trivia of the last token.
    pub fn width(&self) -> TextSize {
        self.full_width() - self.leading_trivia_width() - self.trailing_trivia_width()
    }

    pub fn leading_trivia_width(&self) -> TextSize {
        self.first_token().map_or(TextSize::new(0), |token| token.leading().len())
    }

    pub fn trailing_trivia_width(&self) -> TextSize {
        self.last_token().map_or(TextSize::new(0), |token| token.trailing().len())
    }

    pub fn slot_count(&self) -> usize {
        self.data.slots.as_slice().len()
    }

    pub fn slot(&self, index: usize) -> Option<&GreenElement> {
        self.data.slots.as_slice().get(index)?.as_ref()
    }

    pub fn slots(&self) -> &[Option<GreenElement>] {
        self.data.slots.as_slice()
    }

    /// Iterates over present slots, skipping absent optional syntax.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &GreenElement> + '_ {
        self.slots().iter().flatten()
    }

    /// The first token in text order, zero-width tokens included.
    pub fn first_token(&self) -> Option<&GreenToken> {
        let mut node = self;
        loop {
            match node.children().next()? {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    pub fn last_token(&self) -> Option<&GreenToken> {
        let mut node = self;
        loop {
            match node.children().next_back()? {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    /// Diagnostics attached to this node only, relative to its start.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.data.diagnostics
    }

    /// Whether this node or any descendant carries diagnostics.
    pub fn contains_diagnostics(&self) -> bool {
        self.data.contains_diagnostics
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.data.annotations
    }

    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        annotation::find(self.annotations(), key)
    }

    pub fn annotation_value<T: std::any::Any>(&self, key: &str) -> Option<&T> {
        self.annotation(key)?.value()
    }

    #[must_use]
    pub fn with_annotation(&self, annotation: Annotation) -> Self {
        let annotations = annotation::insert(self.annotations(), annotation);
        self.with_metadata(self.data.diagnostics.clone(), annotations)
    }

    #[must_use]
    pub fn without_annotation(&self, key: &str) -> Self {
        let annotations = annotation::remove(self.annotations(), key);
        self.with_metadata(self.data.diagnostics.clone(), annotations)
    }

    #[must_use]
    pub fn with_diagnostics(&self, diagnostics: Vec<Diagnostic>) -> Self {
        self.with_metadata(diagnostics.into(), self.data.annotations.clone())
    }

    fn with_metadata(&self, diagnostics: Box<[Diagnostic]>, annotations: Box<[Annotation]>) -> Self {
        let contains_diagnostics =
            !diagnostics.is_empty() || self.children().any(GreenElement::contains_diagnostics);
        let slots = match &self.data.slots {
            Slots::Two(slots) => Slots::Two(slots.clone()),
            Slots::Three(slots) => Slots::Three(slots.clone()),
            Slots::Many(slots) => Slots::Many(slots.clone()),
        };
        let data = GreenNodeData {
            kind: self.data.kind,
            full_width: self.data.full_width,
            slots,
            contains_diagnostics,
            diagnostics,
            annotations,
        };
        Self { data: Arc::new(data) }
    }

    /// A node of the same kind, diagnostics, and annotations over new slots.
    #[must_use]
    pub fn with_slots(&self, slots: Vec<Option<GreenElement>>) -> Self {
        Self::from_parts(
            self.kind(),
            slots,
            self.data.diagnostics.clone(),
            self.data.annotations.clone(),
        )
    }

    /// Position-independent structural comparison.
    ///
    /// Diagnostics and annotations are not compared.
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.kind() == other.kind()
            && self.full_width() == other.full_width()
            && self.slot_count() == other.slot_count()
            && self.slots().iter().zip(other.slots()).all(|pair| match pair {
                (None, None) => true,
                (Some(left), Some(right)) => left.is_equivalent_to(right),
                _ => false,
            })
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn write_text(&self, out: &mut impl fmt::Write) -> fmt::Result {
        for child in self.children() {
            match child {
                NodeOrToken::Node(node) => node.write_text(out)?,
                NodeOrToken::Token(token) => out.write_str(token.text())?,
            }
        }
        Ok(())
    }
}

impl PartialEq for GreenNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.is_equivalent_to(other)
                && self.diagnostics() == other.diagnostics()
                && self.annotations() == other.annotations()
                && self.children().zip(other.children()).all(|(left, right)| left == right))
    }
}

impl Eq for GreenNode {}

impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f)
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("kind", &self.kind())
            .field("full_width", &self.full_width())
            .field("slots", &self.slot_count())
            .finish()
    }
}

#[derive(Clone)]
pub struct GreenToken {
    data: Arc<GreenTokenData>,
}

struct GreenTokenData {
    kind: SyntaxKind,
    /// Full text, trivia included.
    text: Box<str>,
    leading: GreenTrivia,
    trailing: GreenTrivia,
    is_missing: bool,
    diagnostics: Box<[Diagnostic]>,
    annotations: Box<[Annotation]>,
}

impl GreenToken {
    pub fn new(kind: SyntaxKind, text: &str) -> Self {
        Self::new_with_trivia(GreenTrivia::empty(), kind, text, GreenTrivia::empty())
    }

    /// Creates a token whose `text` spans the leading trivia, the token
    /// itself, and the trailing trivia.
    #[track_caller]
    pub fn new_with_trivia(
        leading: GreenTrivia,
        kind: SyntaxKind,
        text: &str,
        trailing: GreenTrivia,
    ) -> Self {
        let trivia_len = usize::from(leading.len() + trailing.len());
        assert!(trivia_len <= text.len(), "trivia is longer than the token text {text:?}");
        Self::from_parts(kind, text.into(), leading, trailing, false, Box::default())
    }

    /// A zero-width placeholder for syntax that should have been there.
    pub fn missing(kind: SyntaxKind, diagnostic: Diagnostic) -> Self {
        Self::from_parts(
            kind,
            Box::default(),
            GreenTrivia::empty(),
            GreenTrivia::empty(),
            true,
            Box::new([diagnostic]),
        )
    }

    fn from_parts(
        kind: SyntaxKind,
        text: Box<str>,
        leading: GreenTrivia,
        trailing: GreenTrivia,
        is_missing: bool,
        diagnostics: Box<[Diagnostic]>,
    ) -> Self {
        let data = GreenTokenData {
            kind,
            text,
            leading,
            trailing,
            is_missing,
            diagnostics,
            annotations: Box::default(),
        };
        Self { data: Arc::new(data) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    /// Full text including trivia.
    pub fn text(&self) -> &str {
        &self.data.text
    }

    /// Text without leading and trailing trivia.
    pub fn text_trimmed(&self) -> &str {
        let start = usize::from(self.leading().len());
        let end = self.data.text.len() - usize::from(self.trailing().len());
        &self.data.text[start..end]
    }

    pub fn full_width(&self) -> TextSize {
        TextSize::new(self.data.text.len() as u32)
    }

    pub fn width(&self) -> TextSize {
        self.full_width() - self.leading().len() - self.trailing().len()
    }

    pub fn leading(&self) -> &GreenTrivia {
        &self.data.leading
    }

    pub fn trailing(&self) -> &GreenTrivia {
        &self.data.trailing
    }

    pub fn is_missing(&self) -> bool {
        self.data.is_missing
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.data.diagnostics
    }

    pub fn contains_diagnostics(&self) -> bool {
        !self.data.diagnostics.is_empty()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.data.annotations
    }

    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        annotation::find(self.annotations(), key)
    }

    pub fn annotation_value<T: std::any::Any>(&self, key: &str) -> Option<&T> {
        self.annotation(key)?.value()
    }

    #[must_use]
    pub fn with_annotation(&self, annotation: Annotation) -> Self {
        let annotations = annotation::insert(self.annotations(), annotation);
        self.with_metadata(self.data.diagnostics.clone(), annotations)
    }

    #[must_use]
    pub fn without_annotation(&self, key: &str) -> Self {
        let annotations = annotation::remove(self.annotations(), key);
        self.with_metadata(self.data.diagnostics.clone(), annotations)
    }

    #[must_use]
    pub fn with_diagnostics(&self, diagnostics: Vec<Diagnostic>) -> Self {
        self.with_metadata(diagnostics.into(), self.data.annotations.clone())
    }

    fn with_metadata(&self, diagnostics: Box<[Diagnostic]>, annotations: Box<[Annotation]>) -> Self {
        let data = GreenTokenData {
            kind: self.data.kind,
            text: self.data.text.clone(),
            leading: self.data.leading.clone(),
            trailing: self.data.trailing.clone(),
            is_missing: self.data.is_missing,
            diagnostics,
            annotations,
        };
        Self { data: Arc::new(data) }
    }

    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.kind() == other.kind()
                && self.is_missing() == other.is_missing()
                && self.text() == other.text()
                && self.leading() == other.leading()
                && self.trailing() == other.trailing())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl PartialEq for GreenToken {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent_to(other)
            && self.diagnostics() == other.diagnostics()
            && self.annotations() == other.annotations()
    }
}

impl Eq for GreenToken {}

impl fmt::Display for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenToken")
            .field("kind", &self.kind())
            .field("text", &self.text())
            .field("is_missing", &self.is_missing())
            .finish()
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        NodeOrToken::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        NodeOrToken::Token(token)
    }
}

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn full_width(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.full_width(),
            NodeOrToken::Token(token) => token.full_width(),
        }
    }

    pub fn width(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.width(),
            NodeOrToken::Token(token) => token.width(),
        }
    }

    pub fn leading_trivia_width(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.leading_trivia_width(),
            NodeOrToken::Token(token) => token.leading().len(),
        }
    }

    pub fn trailing_trivia_width(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.trailing_trivia_width(),
            NodeOrToken::Token(token) => token.trailing().len(),
        }
    }

    pub fn slot_count(&self) -> usize {
        match self {
            NodeOrToken::Node(node) => node.slot_count(),
            NodeOrToken::Token(_) => 0,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            NodeOrToken::Node(node) => node.diagnostics(),
            NodeOrToken::Token(token) => token.diagnostics(),
        }
    }

    pub fn contains_diagnostics(&self) -> bool {
        match self {
            NodeOrToken::Node(node) => node.contains_diagnostics(),
            NodeOrToken::Token(token) => token.contains_diagnostics(),
        }
    }

    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        match self {
            NodeOrToken::Node(node) => node.annotation(key),
            NodeOrToken::Token(token) => token.annotation(key),
        }
    }

    #[must_use]
    pub fn with_annotation(&self, annotation: Annotation) -> Self {
        match self {
            NodeOrToken::Node(node) => node.with_annotation(annotation).into(),
            NodeOrToken::Token(token) => token.with_annotation(annotation).into(),
        }
    }

    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeOrToken::Node(left), NodeOrToken::Node(right)) => left.is_equivalent_to(right),
            (NodeOrToken::Token(left), NodeOrToken::Token(right)) => left.is_equivalent_to(right),
            _ => false,
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeOrToken::Node(left), NodeOrToken::Node(right)) => left.ptr_eq(right),
            (NodeOrToken::Token(left), NodeOrToken::Token(right)) => left.ptr_eq(right),
            _ => false,
        }
    }

    pub fn write_text(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => node.write_text(out),
            NodeOrToken::Token(token) => out.write_str(token.text()),
        }
    }
}
