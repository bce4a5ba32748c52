//! Hand-built trees shared by the unit tests.

use stencil_errors::{Diagnostic, TextRange};

use crate::SyntaxKind::{self, *};
use crate::{GreenElement, GreenNode, GreenToken, SyntaxNode};

pub(crate) fn token(kind: SyntaxKind, text: &str) -> Option<GreenElement> {
    Some(GreenToken::new(kind, text).into())
}

pub(crate) fn node(
    kind: SyntaxKind,
    slots: impl IntoIterator<Item = Option<GreenElement>>,
) -> Option<GreenElement> {
    Some(GreenNode::new(kind, slots).into())
}

pub(crate) fn list(items: impl IntoIterator<Item = Option<GreenElement>>) -> Option<GreenElement> {
    Some(GreenNode::list(items.into_iter().flatten().collect()).into())
}

/// Start tag without attributes: `<`, name, attributes, whitespace, `/`, `>`.
pub(crate) fn start_tag(name: &str) -> Option<GreenElement> {
    node(
        START_TAG,
        [token(OPEN_ANGLE, "<"), token(NAME, name), None, None, None, token(CLOSE_ANGLE, ">")],
    )
}

pub(crate) fn end_tag(name: &str) -> Option<GreenElement> {
    node(
        END_TAG,
        [
            token(OPEN_ANGLE, "<"),
            token(FORWARD_SLASH, "/"),
            token(NAME, name),
            None,
            token(CLOSE_ANGLE, ">"),
        ],
    )
}

fn document(slots: impl IntoIterator<Item = Option<GreenElement>>) -> SyntaxNode {
    let slots: Vec<_> = slots.into_iter().chain([token(EOF, "")]).collect();
    SyntaxNode::new_root(GreenNode::new(DOCUMENT, slots))
}

/// `<div>Hi</div>`
pub(crate) fn div_hi() -> SyntaxNode {
    document([node(
        MARKUP_ELEMENT,
        [start_tag("div"), node(TEXT_LITERAL, [token(TEXT, "Hi")]), end_tag("div")],
    )])
}

/// `<divx` where the `>` of the start tag is missing.
pub(crate) fn missing_close() -> SyntaxNode {
    let missing = GreenToken::missing(
        CLOSE_ANGLE,
        Diagnostic::error("expected `>`", TextRange::empty(0.into())),
    );
    document([
        node(
            START_TAG,
            [token(OPEN_ANGLE, "<"), token(NAME, "div"), None, None, None, Some(missing.into())],
        ),
        node(TEXT_LITERAL, [token(TEXT, "x")]),
    ])
}

/// `<p>a \n b</p>`
pub(crate) fn lines() -> SyntaxNode {
    document([node(
        MARKUP_ELEMENT,
        [
            start_tag("p"),
            node(
                TEXT_LITERAL,
                [list([
                    token(TEXT, "a"),
                    token(WHITESPACE, " "),
                    token(NEWLINE, "\n"),
                    token(WHITESPACE, " "),
                    token(TEXT, "b"),
                ])],
            ),
            end_tag("p"),
        ],
    )])
}

/// `<p>a  </p>\n   ` with no end-of-file token.
pub(crate) fn trailing_blank() -> SyntaxNode {
    let slots = [
        node(
            MARKUP_ELEMENT,
            [
                start_tag("p"),
                node(TEXT_LITERAL, [list([token(TEXT, "a"), token(WHITESPACE, "  ")])]),
                end_tag("p"),
            ],
        ),
        node(TEXT_LITERAL, [list([token(NEWLINE, "\n"), token(WHITESPACE, "   ")])]),
    ];
    SyntaxNode::new_root(GreenNode::new(DOCUMENT, slots))
}
