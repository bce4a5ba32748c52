#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // Markup tokens.
    TEXT,
    WHITESPACE,
    NEWLINE,
    OPEN_ANGLE,
    CLOSE_ANGLE,
    FORWARD_SLASH,
    EQUALS,
    DOUBLE_QUOTE,
    SINGLE_QUOTE,
    NAME,

    // Transitions and code tokens.
    TRANSITION,
    LEFT_BRACE,
    RIGHT_BRACE,
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    DOT,
    IDENT,
    NUMBER,
    STRING,
    PUNCT,
    COMMENT_START,
    COMMENT_TEXT,
    COMMENT_END,

    UNKNOWN,
    EOF,

    // Nodes.
    DOCUMENT,
    MARKUP_ELEMENT,
    START_TAG,
    END_TAG,
    ATTRIBUTE,
    ATTRIBUTE_VALUE,
    TEXT_LITERAL,
    CODE_BLOCK,
    EXPLICIT_EXPRESSION,
    IMPLICIT_EXPRESSION,
    CALL_ARGUMENTS,
    COMMENT,
    LIST,
    ERROR,
}

impl SyntaxKind {
    /// Returns `true` for kinds that are only ever used by leaf tokens.
    pub const fn is_token(self) -> bool {
        (self as u16) <= (SyntaxKind::EOF as u16)
    }

    /// Whitespace and line breaks that markup keeps as real tokens.
    pub const fn is_whitespace_like(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE)
    }

    pub const fn is_list(self) -> bool {
        matches!(self, SyntaxKind::LIST)
    }
}
