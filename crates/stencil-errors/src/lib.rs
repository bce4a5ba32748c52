use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;
use text_size::TextSize;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    fn level(self) -> Level {
        match self {
            Severity::Warning => Level::Warning,
            Severity::Error => Level::Error,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A problem found in source text.
///
/// Ranges are relative to whatever the diagnostic is attached to: syntax
/// nodes store them relative to their own start, and the positioned tree
/// hands them out with absolute ranges via [`Diagnostic::shifted`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Diagnostic {
    message: String,
    severity: Severity,
    range: TextRange,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), severity: Severity::Error, range }
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), severity: Severity::Warning, range }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Moves the range forward by `offset`.
    #[must_use]
    pub fn shifted(&self, offset: TextSize) -> Self {
        Self { range: self.range + offset, ..self.clone() }
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = self.severity.level();
        let message = level.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}: {}", self.severity, self.range, self.message)
    }
}
