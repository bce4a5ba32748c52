//! Resolving a text offset to the token under it.

use text_size::TextSize;

use crate::navigation::{AnyToken, NonWhitespace};
use crate::{NodeOrToken, SyntaxError, SyntaxKind, SyntaxNode, SyntaxToken};

impl SyntaxNode {
    /// Returns the token whose full span contains `position`.
    ///
    /// `position` must lie within this node's full span. The end offset is
    /// accepted only on the root, where it stands for the last token.
    ///
    /// When `include_whitespace` is `false` and the position lands on
    /// whitespace, the token before it on the same line wins. Failing that,
    /// the next token that is neither whitespace nor a newline is returned.
    pub fn find_token(
        &self,
        position: TextSize,
        include_whitespace: bool,
    ) -> Result<SyntaxToken, SyntaxError> {
        let range = self.full_span();
        let token = if position == range.end() && self.is_root() {
            self.last_token(&AnyToken)
        } else if range.contains(position) {
            self.token_at(position)
        } else {
            return Err(SyntaxError::PositionOutOfRange { position, range });
        };

        let token = token.ok_or(SyntaxError::NoTokenAtPosition { position })?;
        if include_whitespace || !token.kind().is_whitespace_like() {
            return Ok(token);
        }

        let mut candidate = token.clone();
        loop {
            match candidate.kind() {
                SyntaxKind::NEWLINE => break,
                SyntaxKind::WHITESPACE => match candidate.prev_token(&AnyToken) {
                    Some(prev) => candidate = prev,
                    None => break,
                },
                _ => return Ok(candidate),
            }
        }

        token.next_token(&NonWhitespace).ok_or(SyntaxError::NoTokenAtPosition { position })
    }

    /// Descends towards `position`, choosing the child by green widths so
    /// that siblings off the path stay unmaterialized.
    fn token_at(&self, position: TextSize) -> Option<SyntaxToken> {
        let mut node = self.clone();
        loop {
            let mut offset = node.offset();
            let slot = node.green().slots().iter().position(|slot| {
                let Some(green) = slot else { return false };
                let end = offset + green.full_width();
                let contains = offset <= position && position < end;
                offset = end;
                contains
            })?;
            match node.child(slot)? {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::fixtures;

    fn find(root: &SyntaxNode, position: u32, include_whitespace: bool) -> SyntaxToken {
        root.find_token(position.into(), include_whitespace).unwrap()
    }

    #[test]
    fn finds_text_inside_element() {
        let root = fixtures::div_hi();

        for position in [5, 6] {
            let token = find(&root, position, false);
            assert_eq!((token.kind(), token.text()), (TEXT, "Hi"));
        }

        let token = find(&root, 7, false);
        assert_eq!((token.kind(), token.offset()), (OPEN_ANGLE, TextSize::new(7)));
    }

    #[test]
    fn end_of_root_resolves_to_last_token() {
        let root = fixtures::div_hi();
        assert_eq!(find(&root, 13, false).kind(), EOF);
    }

    #[test]
    fn end_of_inner_node_is_out_of_range() {
        let root = fixtures::div_hi();
        let element = root.child_node(0).unwrap();

        let error = element.find_token(13.into(), true).unwrap_err();
        assert!(matches!(error, SyntaxError::PositionOutOfRange { .. }));
        assert!(matches!(
            root.find_token(14.into(), true),
            Err(SyntaxError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn whitespace_prefers_token_on_same_line() {
        let root = fixtures::lines();

        assert_eq!(find(&root, 4, true).kind(), WHITESPACE);
        assert_eq!(find(&root, 4, false).text(), "a");
    }

    #[test]
    fn whitespace_after_newline_looks_forward() {
        let root = fixtures::lines();

        assert_eq!(find(&root, 5, true).kind(), NEWLINE);
        assert_eq!(find(&root, 5, false).text(), "b");
        assert_eq!(find(&root, 6, false).text(), "b");
    }

    #[test]
    fn blank_tail_without_tokens_is_an_error() {
        let root = fixtures::trailing_blank();

        assert_eq!(find(&root, 5, false).text(), "a");
        assert_eq!(
            root.find_token(12.into(), false),
            Err(SyntaxError::NoTokenAtPosition { position: 12.into() })
        );
        assert_eq!(find(&root, 14, true).kind(), WHITESPACE);
        assert_eq!(
            root.find_token(14.into(), false),
            Err(SyntaxError::NoTokenAtPosition { position: 14.into() })
        );
    }

    #[test]
    fn end_of_root_on_trailing_whitespace_looks_back() {
        let text = fixtures::list([fixtures::token(TEXT, "a"), fixtures::token(WHITESPACE, "  ")]);
        let slots = [fixtures::node(TEXT_LITERAL, [text])];
        let root = SyntaxNode::new_root(crate::GreenNode::new(DOCUMENT, slots));

        assert_eq!(find(&root, 3, true).kind(), WHITESPACE);
        assert_eq!(find(&root, 3, false).text(), "a");
    }
}
