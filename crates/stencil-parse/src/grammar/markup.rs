use stencil_errors::Diagnostic;
use stencil_syntax::SyntaxKind::*;
use stencil_syntax::pool::Pooled;
use stencil_syntax::{GreenElement, GreenNode, SyntaxListBuilder};
use stencil_tokenizer::Mode;
use text_size::TextRange;

use super::code;
use crate::parser::Parser;

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements opened below this many ancestors get no body, so that trees stay
/// shallow enough to walk recursively.
const MAX_DEPTH: usize = 512;

/// What the markup at the cursor starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Start {
    Text,
    Element,
    EndTag,
    Transition,
    Comment,
    Eof,
}

fn start(p: &Parser<'_>) -> Start {
    match p.peek(Mode::Text) {
        EOF => Start::Eof,
        OPEN_ANGLE => match p.nth(&[Mode::Text], Mode::Tag) {
            NAME => Start::Element,
            FORWARD_SLASH => Start::EndTag,
            _ => Start::Text,
        },
        TRANSITION if p.follows_word() => Start::Text,
        TRANSITION => Start::Transition,
        COMMENT_START => Start::Comment,
        _ => Start::Text,
    }
}

pub(super) fn content(p: &mut Parser<'_>, out: &mut SyntaxListBuilder) {
    match start(p) {
        Start::Text => out.add(text_literal(p)),
        Start::Element => out.add(element(p)),
        Start::EndTag => out.add(stray_end_tag(p)),
        Start::Transition => out.add(code::transition(p, Mode::Text)),
        Start::Comment => out.add(comment(p)),
        Start::Eof => {}
    }
}

fn text_literal(p: &mut Parser<'_>) -> GreenNode {
    let mut tokens = SyntaxListBuilder::pooled();
    while start(p) == Start::Text {
        let token = if matches!(p.peek(Mode::Text), OPEN_ANGLE | TRANSITION) {
            p.bump_as(Mode::Text, TEXT)
        } else {
            p.bump(Mode::Text)
        };
        tokens.add(token);
    }
    GreenNode::new(TEXT_LITERAL, [tokens.to_list()])
}

/// An element whose end tag has not been seen yet.
struct OpenElement<'db> {
    start_tag: GreenNode,
    name: &'db str,
    body: Pooled<'static, SyntaxListBuilder>,
}

impl OpenElement<'_> {
    fn finish(self, close: GreenElement) -> GreenNode {
        GreenNode::new(
            MARKUP_ELEMENT,
            [Some(self.start_tag.into()), self.body.to_list(), Some(close)],
        )
    }
}

enum Opened<'db> {
    Complete(GreenNode),
    Open(OpenElement<'db>),
}

/// Parses an element with everything nested in it. Open ancestors are kept on
/// an explicit stack rather than the call stack.
fn element(p: &mut Parser<'_>) -> GreenNode {
    let mut current = match open_element(p, 0) {
        Opened::Complete(element) => return element,
        Opened::Open(element) => element,
    };
    let mut ancestors: Vec<OpenElement<'_>> = Vec::new();

    loop {
        let close = match start(p) {
            Start::Eof => Some(missing_end_tag(p, current.name)),
            Start::EndTag => {
                let closing = match p.nth_text(&[Mode::Text, Mode::Tag], Mode::Tag) {
                    (NAME, closing) => closing,
                    _ => "",
                };
                if current.name.eq_ignore_ascii_case(closing) {
                    Some(end_tag(p).into())
                } else if ancestors.iter().any(|open| open.name.eq_ignore_ascii_case(closing)) {
                    Some(missing_end_tag(p, current.name))
                } else {
                    current.body.add(stray_end_tag(p));
                    None
                }
            }
            Start::Element => {
                match open_element(p, ancestors.len() + 1) {
                    Opened::Complete(child) => current.body.add(child),
                    Opened::Open(child) => ancestors.push(std::mem::replace(&mut current, child)),
                }
                None
            }
            _ => {
                content(p, &mut current.body);
                None
            }
        };

        if let Some(close) = close {
            let finished = current.finish(close);
            match ancestors.pop() {
                Some(parent) => {
                    current = parent;
                    current.body.add(finished);
                }
                None => return finished,
            }
        }
    }
}

fn open_element<'db>(p: &mut Parser<'db>, depth: usize) -> Opened<'db> {
    let (start_tag, name, self_closing) = start_tag(p);
    let void = self_closing || VOID_ELEMENTS.iter().any(|tag| tag.eq_ignore_ascii_case(name));
    if !void && depth < MAX_DEPTH {
        return Opened::Open(OpenElement { start_tag, name, body: SyntaxListBuilder::pooled() });
    }

    let mut diagnostics = Vec::new();
    if !void {
        tracing::debug!(depth, name, "element nested too deeply");
        let range = TextRange::up_to(start_tag.full_width());
        diagnostics.push(Diagnostic::error("elements nested too deeply", range));
    }
    let slots: [Option<GreenElement>; 3] = [Some(start_tag.into()), None, None];
    Opened::Complete(GreenNode::new_with_diagnostics(MARKUP_ELEMENT, slots, diagnostics))
}

fn start_tag<'db>(p: &mut Parser<'db>) -> (GreenNode, &'db str, bool) {
    let open = p.bump(Mode::Text);
    let (name_token, name) = p.bump_text(Mode::Tag);

    let mut attributes = SyntaxListBuilder::pooled();
    loop {
        let whitespace = match p.peek(Mode::Tag) {
            NAME => None,
            WHITESPACE if p.nth(&[Mode::Tag], Mode::Tag) == NAME => p.eat(Mode::Tag, WHITESPACE),
            _ => break,
        };
        attributes.add(attribute(p, whitespace));
    }

    let whitespace = p.eat(Mode::Tag, WHITESPACE);
    let slash = p.eat(Mode::Tag, FORWARD_SLASH);
    let self_closing = slash.is_some();
    let close = p.expect(Mode::Tag, CLOSE_ANGLE, "expected `>`");

    let node = GreenNode::new(
        START_TAG,
        [
            Some(open.into()),
            Some(name_token.into()),
            attributes.to_list(),
            whitespace,
            slash,
            Some(close),
        ],
    );
    (node, name, self_closing)
}

fn attribute(p: &mut Parser<'_>, whitespace: Option<GreenElement>) -> GreenNode {
    let name = p.bump(Mode::Tag);
    let (equals, value) = match p.eat(Mode::Tag, EQUALS) {
        Some(equals) => (Some(equals), Some(attribute_value(p).into())),
        None => (None, None),
    };
    GreenNode::new(ATTRIBUTE, [whitespace, Some(name.into()), equals, value])
}

fn attribute_value(p: &mut Parser<'_>) -> GreenNode {
    let (quote, kind) = match p.peek(Mode::Tag) {
        DOUBLE_QUOTE => ('"', DOUBLE_QUOTE),
        SINGLE_QUOTE => ('\'', SINGLE_QUOTE),
        NAME => {
            let value = p.bump(Mode::Tag);
            return GreenNode::new(ATTRIBUTE_VALUE, [None, Some(value.into()), None]);
        }
        _ => {
            let missing = p.missing(NAME, "expected attribute value");
            return GreenNode::new(ATTRIBUTE_VALUE, [None, Some(missing.into()), None]);
        }
    };

    let mode = Mode::AttributeValue(quote);
    let open = p.bump(Mode::Tag);
    let mut content = SyntaxListBuilder::pooled();
    loop {
        match p.peek(mode) {
            EOF => break,
            found if found == kind => break,
            TRANSITION if p.follows_word() => content.add(p.bump_as(mode, TEXT)),
            TRANSITION => content.add(code::transition(p, mode)),
            _ => content.add(p.bump(mode)),
        }
    }
    let close = p.expect(mode, kind, "unterminated attribute value");

    GreenNode::new(ATTRIBUTE_VALUE, [Some(open.into()), content.to_list(), Some(close)])
}

fn end_tag(p: &mut Parser<'_>) -> GreenNode {
    let open = p.bump(Mode::Text);
    let slash = p.bump(Mode::Tag);
    let name = p.expect(Mode::Tag, NAME, "expected tag name");
    let whitespace = p.eat(Mode::Tag, WHITESPACE);
    let close = p.expect(Mode::Tag, CLOSE_ANGLE, "expected `>`");
    GreenNode::new(
        END_TAG,
        [Some(open.into()), Some(slash.into()), Some(name), whitespace, Some(close)],
    )
}

fn missing_end_tag(p: &Parser<'_>, name: &str) -> GreenElement {
    let open = p.missing(OPEN_ANGLE, &format!("missing end tag for `<{name}>`"));
    GreenNode::new(END_TAG, [Some(open.into()), None, None, None, None]).into()
}

fn stray_end_tag(p: &mut Parser<'_>) -> GreenNode {
    let offset = p.offset();
    let tag = end_tag(p);
    tracing::debug!(?offset, "end tag without a matching start tag");

    let diagnostic =
        Diagnostic::error("end tag has no matching start tag", TextRange::up_to(tag.full_width()));
    GreenNode::new_with_diagnostics(ERROR, [Some(tag.into())], vec![diagnostic])
}

fn comment(p: &mut Parser<'_>) -> GreenNode {
    let start = p.bump(Mode::Text);
    let text = p.eat(Mode::Comment, COMMENT_TEXT);
    let end = p.expect(Mode::Comment, COMMENT_END, "unterminated comment");
    GreenNode::new(COMMENT, [Some(start.into()), text, Some(end)])
}
