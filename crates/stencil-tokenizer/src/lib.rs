mod cursor;

use cursor::Cursor;
pub use stencil_syntax::SyntaxKind;
use stencil_syntax::SyntaxKind::*;
use stencil_syntax::{GreenTrivia, TriviaPiece, TriviaPieceKind};
use text_size::{TextRange, TextSize};

/// Lexing context. Markup and code have different token sets, and only code
/// attaches trivia, so the parser picks the mode for every token it asks for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Markup text between tags.
    Text,
    /// Inside `<...>`.
    Tag,
    /// Inside a quoted attribute value delimited by the given quote.
    AttributeValue(char),
    /// Right after `@`.
    Transition,
    /// An implicit expression such as `@user.Name`.
    Implicit,
    /// Inside `@{ ... }` or `@( ... )`.
    Code,
    /// The delimiter closing a code block, without trailing trivia.
    CodeClose,
    /// Inside `@* ... *@`.
    Comment,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub leading: GreenTrivia,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: GreenTrivia,
}

impl Token {
    /// Range including leading and trailing trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(
            self.kind_range.start() - self.leading.len(),
            self.kind_range.end() + self.trailing.len(),
        )
    }
}

#[derive(Clone)]
pub struct Tokenizer<'db> {
    text: &'db str,
    cursor: Cursor<'db>,
}

impl<'db> Tokenizer<'db> {
    pub fn new(text: &'db str) -> Self {
        Self { text, cursor: Cursor::new(text) }
    }

    pub fn text(&self) -> &'db str {
        self.text
    }

    /// Offset of the next unconsumed character.
    pub fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    /// Lexes the next token in `mode` without consuming it.
    pub fn peek(&self, mode: Mode) -> Token {
        Lexer { text: self.text, cursor: self.cursor.clone(), trivia: Vec::new() }.token(mode)
    }

    pub fn next_token(&mut self, mode: Mode) -> Token {
        let mut lexer = Lexer { text: self.text, cursor: self.cursor.clone(), trivia: Vec::new() };
        let token = lexer.token(mode);
        self.cursor = lexer.cursor;
        token
    }
}

struct Lexer<'db> {
    text: &'db str,
    cursor: Cursor<'db>,
    trivia: Vec<TriviaPiece>,
}

impl Lexer<'_> {
    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn token(&mut self, mode: Mode) -> Token {
        self.cursor.reset_pos_within_token();
        let with_trivia = matches!(mode, Mode::Code | Mode::CodeClose);
        if with_trivia {
            self.trivia(true);
        }
        let trailing_start = self.trivia.len();

        let kind = match mode {
            Mode::Text => self.markup_text(),
            Mode::Tag => self.tag(),
            Mode::AttributeValue(quote) => self.attribute_value(quote),
            Mode::Transition => self.transition(),
            Mode::Implicit => self.implicit(),
            Mode::Code => self.code(),
            Mode::CodeClose => self.code_close(),
            Mode::Comment => self.comment(),
        };
        let kind_range = self.range();
        self.cursor.reset_pos_within_token();

        if mode == Mode::Code && kind != EOF {
            self.trivia(false);
        }

        let (leading, trailing) = self.trivia.split_at(trailing_start);
        Token {
            leading: GreenTrivia::new(leading),
            kind,
            kind_range,
            trailing: GreenTrivia::new(trailing),
        }
    }

    /// Collects trivia. Trailing trivia stops before the end of the line.
    fn trivia(&mut self, leading: bool) {
        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    TriviaPieceKind::SingleLineComment
                }
                '\n' if leading => {
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '\r' if leading && self.cursor.second() == '\n' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                c if is_blank(c) => {
                    self.cursor.advance_while(is_blank);
                    TriviaPieceKind::Whitespace
                }
                _ => break,
            };

            self.trivia.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
        }
    }

    fn newline(&mut self, first: char) -> Option<SyntaxKind> {
        match first {
            '\n' => Some(NEWLINE),
            '\r' if self.cursor.matches('\n') => {
                self.cursor.advance();
                Some(NEWLINE)
            }
            _ => None,
        }
    }

    fn markup_text(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        let first = self.cursor.advance();
        if let Some(newline) = self.newline(first) {
            return newline;
        }
        match first {
            '<' => OPEN_ANGLE,
            '@' if self.cursor.matches('@') => {
                self.cursor.advance();
                TEXT
            }
            '@' if self.cursor.matches('*') => {
                self.cursor.advance();
                COMMENT_START
            }
            '@' => TRANSITION,
            c if is_blank(c) => {
                self.cursor.advance_while(is_blank);
                WHITESPACE
            }
            _ => {
                self.cursor.advance_while(|c| !matches!(c, '<' | '@') && !c.is_whitespace());
                TEXT
            }
        }
    }

    fn tag(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        match self.cursor.advance() {
            '<' => OPEN_ANGLE,
            '>' => CLOSE_ANGLE,
            '/' => FORWARD_SLASH,
            '=' => EQUALS,
            '"' => DOUBLE_QUOTE,
            '\'' => SINGLE_QUOTE,
            c if c.is_whitespace() => {
                self.cursor.advance_while(char::is_whitespace);
                WHITESPACE
            }
            _ => {
                self.cursor.advance_while(is_name_char);
                NAME
            }
        }
    }

    fn attribute_value(&mut self, quote: char) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        match self.cursor.advance() {
            '"' if quote == '"' => DOUBLE_QUOTE,
            '\'' if quote == '\'' => SINGLE_QUOTE,
            '@' if self.cursor.matches('@') => {
                self.cursor.advance();
                TEXT
            }
            '@' => TRANSITION,
            c if c.is_whitespace() => {
                self.cursor.advance_while(char::is_whitespace);
                WHITESPACE
            }
            _ => {
                self.cursor.advance_while(|c| c != quote && c != '@' && !c.is_whitespace());
                TEXT
            }
        }
    }

    fn transition(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        match self.cursor.advance() {
            '{' => LEFT_BRACE,
            '(' => LEFT_PAREN,
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                IDENT
            }
            _ => UNKNOWN,
        }
    }

    fn implicit(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        match self.cursor.advance() {
            '.' => DOT,
            '(' => LEFT_PAREN,
            '[' => LEFT_BRACKET,
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                IDENT
            }
            _ => UNKNOWN,
        }
    }

    fn code(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        match self.cursor.advance() {
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '.' => DOT,
            '@' => TRANSITION,
            quote @ ('"' | '\'') => {
                self.string(quote);
                STRING
            }
            '0'..='9' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                NUMBER
            }
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                IDENT
            }
            c if is_punct(c) => {
                self.cursor.advance_while(is_punct);
                PUNCT
            }
            _ => UNKNOWN,
        }
    }

    /// Consumes a string literal body and its closing quote, stopping at the
    /// end of the line when the literal is unterminated.
    fn string(&mut self, quote: char) {
        while !self.cursor.is_eof() {
            match self.cursor.peek() {
                '\\' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                '\n' => return,
                c => {
                    self.cursor.advance();
                    if c == quote {
                        return;
                    }
                }
            }
        }
    }

    fn code_close(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        match self.cursor.advance() {
            '}' => RIGHT_BRACE,
            ')' => RIGHT_PAREN,
            _ => UNKNOWN,
        }
    }

    fn comment(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        if self.cursor.starts_with("*@") {
            self.cursor.advance();
            self.cursor.advance();
            return COMMENT_END;
        }
        while !self.cursor.is_eof() && !self.cursor.starts_with("*@") {
            self.cursor.advance();
        }
        COMMENT_TEXT
    }
}

/// Whitespace that does not end a line.
fn is_blank(c: char) -> bool {
    c.is_whitespace() && c != '\n' && c != '\r'
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '<' | '>' | '/' | '=' | '"' | '\'')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_punct(c: char) -> bool {
    matches!(
        c,
        '=' | '-' | '+' | '*' | '%' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '?' | ':' | ';'
            | ',' | '/'
    )
}
