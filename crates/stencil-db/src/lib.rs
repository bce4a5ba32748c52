//! Incremental queries over template files.

use camino::Utf8PathBuf;
pub use line_index::LineIndex;
use salsa::{Accumulator, Database};
pub use stencil_errors::Diagnostic;
use stencil_syntax::{GreenNode, SyntaxNode};

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl Database for RootDatabase {}

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

/// A parsed file. Trees compare structurally, so a text change that parses
/// to an identical tree does not invalidate dependent queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
}

impl Parse {
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// A fresh positioned root over the parsed tree.
    pub fn tree(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref))]
    pub fn parse(self, db: &dyn Database) -> Parse {
        let green = stencil_parse::parse(self.text(db));
        tracing::debug!(path = %self.path(db), width = ?green.full_width(), "parsed file");
        Parse { green }
    }

    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }
}

/// Diagnostics reported while checking a file.
#[salsa::accumulator]
pub struct Reported(pub Diagnostic);

#[salsa::tracked]
pub fn check_file(db: &dyn Database, file: File) {
    for diagnostic in file.parse(db).tree().diagnostics() {
        Reported(diagnostic).accumulate(db);
    }
}

pub trait FileParse {
    /// The positioned root of the file's syntax tree.
    fn parse_tree(self, db: &dyn Database) -> SyntaxNode;
}

impl FileParse for File {
    fn parse_tree(self, db: &dyn Database) -> SyntaxNode {
        self.parse(db).tree()
    }
}
