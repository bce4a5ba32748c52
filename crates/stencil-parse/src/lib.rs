//! Parser for stencil templates, markup with embedded code.
//!
//! Parsing never fails. Malformed input yields missing tokens and `ERROR`
//! nodes carrying diagnostics, and the tree always covers the whole text.

use stencil_syntax::GreenNode;

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

pub fn parse(text: &str) -> GreenNode {
    let mut parser = parser::Parser::new(text);
    grammar::document(&mut parser)
}
