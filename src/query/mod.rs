//! # Fetch Query Language
//!
//! GraphQL-subset parser producing a small AST.
//! Pure functions with no I/O and no gateway dependency.

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::Result;
use ast::Document;

/// Parse a query string into a `Document`.
pub fn parse(query: &str) -> Result<Document> {
    let tokens = lexer::tokenize(query)?;
    parser::parse_document(&tokens)
}
