//! Lossless syntax trees for stencil templates.
//!
//! Trees have two layers. The green layer is immutable, position independent
//! and shared between tree versions. The red layer wraps it with absolute
//! offsets and parent links, materialized lazily as it is walked.

mod annotation;
mod edit;
mod error;
mod find_token;
#[cfg(test)]
mod fixtures;
mod green;
mod list;
mod navigation;
mod node_or_token;
/// Pooling of scratch buffers.
pub mod pool;
mod red;
mod syntax_kind;
mod trivia;

/// Keyed metadata attached to elements.
pub use annotation::Annotation;
/// Batched, structure-sharing tree rewriting.
pub use edit::TreeEditor;
pub use error::SyntaxError;
/// Immutable, position-independent elements.
pub use green::{GreenElement, GreenNode, GreenToken};
pub use list::SyntaxListBuilder;
/// Token predicates used by navigation.
pub use navigation::{AnyToken, NonWhitespace, NonZeroWidth, TokenPredicate};
pub use node_or_token::NodeOrToken;
/// Positioned handles and their iterators.
pub use red::{
    Descendants, Preorder, SyntaxElement, SyntaxElementChildren, SyntaxNode, SyntaxToken,
    WalkEvent,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Trivia pieces attached to tokens.
pub use trivia::{GreenTrivia, TriviaPiece, TriviaPieceKind};
