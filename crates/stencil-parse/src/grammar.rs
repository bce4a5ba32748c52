use stencil_syntax::SyntaxKind::*;
use stencil_syntax::{GreenNode, SyntaxListBuilder};
use stencil_tokenizer::Mode;

use crate::parser::Parser;

mod code;
mod markup;

pub(crate) fn document(p: &mut Parser<'_>) -> GreenNode {
    let mut content = SyntaxListBuilder::pooled();
    while !p.at(Mode::Text, EOF) {
        markup::content(p, &mut content);
    }

    let eof = p.bump(Mode::Text);
    GreenNode::new(DOCUMENT, [content.to_list(), Some(eof.into())])
}
