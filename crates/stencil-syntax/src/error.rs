//! Errors returned at the boundary of the syntax tree API.
use text_size::{TextRange, TextSize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("position {position:?} is outside of {range:?}")]
    PositionOutOfRange { position: TextSize, range: TextRange },

    #[error("no token found at position {position:?}")]
    NoTokenAtPosition { position: TextSize },

    #[error("element does not belong to the edited tree")]
    ForeignElement,

    #[error("overlapping edits at slot path {path:?}")]
    OverlappingEdits { path: Vec<u32> },

    #[error("the root can only be replaced, not removed or extended")]
    RootEdit,

    #[error("rewritten root is not a node")]
    InvalidRoot,
}
