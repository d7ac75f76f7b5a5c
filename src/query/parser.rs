//! Query recursive descent parser.
//!
//! Parses token streams into a `Document`. Supports:
//! - anonymous operations, optionally prefixed with `query [Name]`
//! - aliases, arguments and nested selection sets
//! - literal input values: scalars, enums, lists, objects
//!
//! Variables, fragments and directives are rejected. Nesting of selection
//! sets, lists and objects is capped at `MAX_DEPTH`.

use crate::{Error, Result};
use super::ast::*;
use super::lexer::{Token, TokenKind};

/// Deepest nesting of selection sets, lists and objects a document may use.
pub const MAX_DEPTH: usize = 64;

/// Parser state: wraps a token slice with cursor.
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    /// Enter one nesting level; call before consuming the opening token.
    fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("Nesting deeper than {MAX_DEPTH} levels")));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        let tok = self.peek();
        if tok.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(format!("Expected {:?}, got {:?} '{}'", kind, tok.kind, tok.text)))
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, msg: String) -> Error {
        Error::SyntaxError {
            position: self.peek().span.start,
            message: msg,
        }
    }
}

/// Parse a complete document from tokens.
pub fn parse_document(tokens: &[Token]) -> Result<Document> {
    if tokens.is_empty() {
        return Err(Error::SyntaxError { position: 0, message: "Empty token stream".into() });
    }
    let mut p = Parser::new(tokens);

    if p.at(TokenKind::Name) {
        let keyword = p.advance().text.clone();
        if keyword != "query" {
            return Err(Error::SyntaxError {
                position: p.tokens[p.pos - 1].span.start,
                message: format!("Unsupported operation type '{keyword}'"),
            });
        }
        // Optional operation name.
        p.eat(TokenKind::Name);
        if p.at(TokenKind::LParen) {
            return Err(p.error("Variable definitions are not supported".into()));
        }
    }

    let selections = parse_selection_set(&mut p)?;
    if !p.at(TokenKind::Eof) {
        return Err(p.error(format!("Unexpected token after document: {:?}", p.peek_kind())));
    }

    Ok(Document { selections })
}

// ============================================================================
// Selections
// ============================================================================

fn parse_selection_set(p: &mut Parser) -> Result<Vec<Field>> {
    p.enter()?;
    p.expect(TokenKind::LBrace)?;
    let mut fields = Vec::new();
    while !p.eat(TokenKind::RBrace) {
        if p.at(TokenKind::Eof) {
            return Err(p.error("Unterminated selection set".into()));
        }
        fields.push(parse_field(p)?);
    }
    if fields.is_empty() {
        return Err(p.error("Selection set must not be empty".into()));
    }
    p.leave();
    Ok(fields)
}

fn parse_field(p: &mut Parser) -> Result<Field> {
    let first = p.expect(TokenKind::Name)?;
    let mut position = first.span.start;
    let mut name = first.text.clone();
    let mut alias = None;

    if p.eat(TokenKind::Colon) {
        let real = p.expect(TokenKind::Name)?;
        position = real.span.start;
        alias = Some(std::mem::replace(&mut name, real.text.clone()));
    }

    let arguments = if p.at(TokenKind::LParen) { parse_arguments(p)? } else { Vec::new() };
    let selections = if p.at(TokenKind::LBrace) { parse_selection_set(p)? } else { Vec::new() };

    Ok(Field { alias, name, arguments, selections, position })
}

fn parse_arguments(p: &mut Parser) -> Result<Vec<Argument>> {
    p.expect(TokenKind::LParen)?;
    let mut args: Vec<Argument> = Vec::new();
    while !p.eat(TokenKind::RParen) {
        let name_tok = p.expect(TokenKind::Name)?;
        let (name, at) = (name_tok.text.clone(), name_tok.span.start);
        if args.iter().any(|a| a.name == name) {
            return Err(Error::SyntaxError {
                position: at,
                message: format!("Duplicate argument '{name}'"),
            });
        }
        p.expect(TokenKind::Colon)?;
        let value = parse_value(p)?;
        args.push(Argument { name, value });
    }
    if args.is_empty() {
        return Err(p.error("Argument list must not be empty".into()));
    }
    Ok(args)
}

// ============================================================================
// Values
// ============================================================================

fn parse_value(p: &mut Parser) -> Result<InputValue> {
    let tok = p.peek().clone();
    match tok.kind {
        TokenKind::Integer => {
            p.advance();
            tok.text.parse::<i64>().map(InputValue::Int).map_err(|_| Error::SyntaxError {
                position: tok.span.start,
                message: format!("Integer out of range: {}", tok.text),
            })
        }
        TokenKind::Float => {
            p.advance();
            tok.text.parse::<f64>().map(InputValue::Float).map_err(|_| Error::SyntaxError {
                position: tok.span.start,
                message: format!("Invalid float: {}", tok.text),
            })
        }
        TokenKind::StringLiteral => {
            p.advance();
            Ok(InputValue::String(tok.text))
        }
        TokenKind::Name => {
            p.advance();
            Ok(match tok.text.as_str() {
                "true" => InputValue::Boolean(true),
                "false" => InputValue::Boolean(false),
                "null" => InputValue::Null,
                _ => InputValue::Enum(tok.text),
            })
        }
        TokenKind::LBracket => {
            p.enter()?;
            p.advance();
            let mut items = Vec::new();
            while !p.eat(TokenKind::RBracket) {
                if p.at(TokenKind::Eof) {
                    return Err(p.error("Unterminated list".into()));
                }
                items.push(parse_value(p)?);
            }
            p.leave();
            Ok(InputValue::List(items))
        }
        TokenKind::LBrace => {
            p.enter()?;
            p.advance();
            let mut fields: Vec<(String, InputValue)> = Vec::new();
            while !p.eat(TokenKind::RBrace) {
                let key_tok = p.expect(TokenKind::Name)?;
                let (key, at) = (key_tok.text.clone(), key_tok.span.start);
                if fields.iter().any(|(k, _)| *k == key) {
                    return Err(Error::SyntaxError {
                        position: at,
                        message: format!("Duplicate object field '{key}'"),
                    });
                }
                p.expect(TokenKind::Colon)?;
                let value = parse_value(p)?;
                fields.push((key, value));
            }
            p.leave();
            Ok(InputValue::Object(fields))
        }
        _ => Err(p.error(format!("Expected a value, got {:?} '{}'", tok.kind, tok.text))),
    }
}
