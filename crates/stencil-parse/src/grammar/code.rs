use stencil_syntax::SyntaxKind::{self, *};
use stencil_syntax::{GreenElement, GreenNode, SyntaxListBuilder};
use stencil_tokenizer::Mode;

use crate::parser::Parser;

/// Parses `@` and what follows it. `mode` is the mode the `@` was lexed in.
pub(super) fn transition(p: &mut Parser<'_>, mode: Mode) -> GreenNode {
    let at = Some(p.bump(mode).into());
    match p.peek(Mode::Transition) {
        LEFT_BRACE => {
            let open = p.bump(Mode::Transition);
            let (body, close) = delimited(p, LEFT_BRACE, RIGHT_BRACE, "expected `}`");
            GreenNode::new(CODE_BLOCK, [at, Some(open.into()), body, Some(close)])
        }
        LEFT_PAREN => {
            let open = p.bump(Mode::Transition);
            let (body, close) = delimited(p, LEFT_PAREN, RIGHT_PAREN, "expected `)`");
            GreenNode::new(EXPLICIT_EXPRESSION, [at, Some(open.into()), body, Some(close)])
        }
        IDENT => implicit_expression(p, at),
        _ => {
            let missing = p.missing(IDENT, "expected identifier, `{` or `(` after `@`");
            GreenNode::new(IMPLICIT_EXPRESSION, [at, Some(missing.into()), None])
        }
    }
}

fn implicit_expression(p: &mut Parser<'_>, at: Option<GreenElement>) -> GreenNode {
    let mut path = SyntaxListBuilder::pooled();
    path.add(p.bump(Mode::Transition));
    while p.at(Mode::Implicit, DOT) && p.nth(&[Mode::Implicit], Mode::Implicit) == IDENT {
        path.add(p.bump(Mode::Implicit));
        path.add(p.bump(Mode::Implicit));
    }

    let arguments = p.at(Mode::Implicit, LEFT_PAREN).then(|| {
        let open = p.bump(Mode::Implicit);
        let (body, close) = delimited(p, LEFT_PAREN, RIGHT_PAREN, "expected `)`");
        GreenNode::new(CALL_ARGUMENTS, [Some(open.into()), body, Some(close)]).into()
    });

    GreenNode::new(IMPLICIT_EXPRESSION, [at, path.to_list(), arguments])
}

/// Collects code tokens up to the `close` that balances the already consumed
/// `open`.
fn delimited(
    p: &mut Parser<'_>,
    open: SyntaxKind,
    close: SyntaxKind,
    message: &str,
) -> (Option<GreenElement>, GreenElement) {
    let mut tokens = SyntaxListBuilder::pooled();
    let mut depth = 0u32;
    let closing: GreenElement = loop {
        let kind = p.peek(Mode::Code);
        if kind == EOF {
            break p.missing(close, message).into();
        }
        if kind == close {
            if depth == 0 {
                break p.bump(Mode::CodeClose).into();
            }
            depth -= 1;
        } else if kind == open {
            depth += 1;
        }
        tokens.add(p.bump(Mode::Code));
    };
    (tokens.to_list(), closing)
}
