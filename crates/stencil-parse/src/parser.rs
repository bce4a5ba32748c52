use stencil_errors::{Diagnostic, TextRange};
use stencil_syntax::{GreenElement, GreenToken, SyntaxKind};
use stencil_tokenizer::{Mode, Token, Tokenizer};
use text_size::TextSize;

pub(crate) struct Parser<'db> {
    tokenizer: Tokenizer<'db>,
}

impl<'db> Parser<'db> {
    pub(crate) fn new(text: &'db str) -> Self {
        Self { tokenizer: Tokenizer::new(text) }
    }

    pub(crate) fn offset(&self) -> TextSize {
        self.tokenizer.offset()
    }

    pub(crate) fn peek(&self, mode: Mode) -> SyntaxKind {
        self.tokenizer.peek(mode).kind
    }

    /// Kind of the token that follows the tokens lexed in `skip` modes.
    pub(crate) fn nth(&self, skip: &[Mode], mode: Mode) -> SyntaxKind {
        self.lookahead(skip, mode).kind
    }

    /// Like [`Parser::nth`], also returning the token text without trivia.
    pub(crate) fn nth_text(&self, skip: &[Mode], mode: Mode) -> (SyntaxKind, &'db str) {
        let token = self.lookahead(skip, mode);
        (token.kind, &self.tokenizer.text()[token.kind_range])
    }

    fn lookahead(&self, skip: &[Mode], mode: Mode) -> Token {
        let mut ahead = self.tokenizer.clone();
        for &mode in skip {
            ahead.next_token(mode);
        }
        ahead.peek(mode)
    }

    pub(crate) fn at(&self, mode: Mode, kind: SyntaxKind) -> bool {
        self.peek(mode) == kind
    }

    /// Whether the character right before the cursor continues a word, as in
    /// the `@` of an e-mail address.
    pub(crate) fn follows_word(&self) -> bool {
        let before = &self.tokenizer.text()[..usize::from(self.offset())];
        before.chars().next_back().is_some_and(char::is_alphanumeric)
    }

    pub(crate) fn bump(&mut self, mode: Mode) -> GreenToken {
        let token = self.tokenizer.next_token(mode);
        self.green_token(token.kind, token)
    }

    /// Consumes the next token under a different kind.
    pub(crate) fn bump_as(&mut self, mode: Mode, kind: SyntaxKind) -> GreenToken {
        let token = self.tokenizer.next_token(mode);
        self.green_token(kind, token)
    }

    /// Consumes the next token and returns its text without trivia.
    pub(crate) fn bump_text(&mut self, mode: Mode) -> (GreenToken, &'db str) {
        let token = self.tokenizer.next_token(mode);
        let text = &self.tokenizer.text()[token.kind_range];
        (self.green_token(token.kind, token), text)
    }

    pub(crate) fn eat(&mut self, mode: Mode, kind: SyntaxKind) -> Option<GreenElement> {
        self.at(mode, kind).then(|| self.bump(mode).into())
    }

    /// Consumes a `kind` token, or stands in a missing one carrying `message`.
    pub(crate) fn expect(&mut self, mode: Mode, kind: SyntaxKind, message: &str) -> GreenElement {
        if self.at(mode, kind) {
            self.bump(mode).into()
        } else {
            self.missing(kind, message).into()
        }
    }

    pub(crate) fn missing(&self, kind: SyntaxKind, message: &str) -> GreenToken {
        tracing::debug!(?kind, offset = ?self.offset(), reason = message, "inserted missing token");
        GreenToken::missing(kind, Diagnostic::error(message, TextRange::empty(0.into())))
    }

    fn green_token(&self, kind: SyntaxKind, token: Token) -> GreenToken {
        let text = &self.tokenizer.text()[token.full_range()];
        GreenToken::new_with_trivia(token.leading, kind, text, token.trailing)
    }
}
