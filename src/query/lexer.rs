//! Query lexer. Tokenizes a GraphQL Fetch document.
//!
//! Commas are insignificant in GraphQL and are dropped here together with
//! whitespace and `#` line comments.

use crate::{Error, Result};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

/// Source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Integer, Float, StringLiteral,

    // Names (identifiers, keywords, enum values, true/false/null)
    Name,

    // Punctuation
    LParen, RParen, LBracket, RBracket, LBrace, RBrace,
    Colon,

    Eof,
}

/// Tokenize a query document.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() || c == ',' || c == '\u{feff}' => { chars.next(); }

            '#' => {
                while chars.peek().is_some_and(|&(_, c)| c != '\n' && c != '\r') {
                    chars.next();
                }
            }

            '"' => {
                chars.next();
                let start = pos;
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\\')) => match chars.next() {
                            Some((_, 'n')) => s.push('\n'),
                            Some((_, 't')) => s.push('\t'),
                            Some((_, 'r')) => s.push('\r'),
                            Some((_, '\\')) => s.push('\\'),
                            Some((_, '/')) => s.push('/'),
                            Some((_, '"')) => s.push('"'),
                            Some((at, c)) => return Err(Error::SyntaxError {
                                position: at,
                                message: format!("Invalid escape sequence: '\\{c}'"),
                            }),
                            None => return Err(unterminated(start)),
                        },
                        Some((end, '"')) => {
                            tokens.push(Token {
                                kind: TokenKind::StringLiteral,
                                span: Span { start, end: end + 1 },
                                text: s,
                            });
                            break;
                        }
                        Some((_, '\n')) | None => return Err(unterminated(start)),
                        Some((_, c)) => s.push(c),
                    }
                }
            }

            c if c.is_ascii_digit() || c == '-' => {
                let start = pos;
                let mut num = String::new();
                num.push(c);
                chars.next();
                if c == '-' && !chars.peek().is_some_and(|&(_, d)| d.is_ascii_digit()) {
                    return Err(Error::SyntaxError {
                        position: start,
                        message: "Expected digit after '-'".into(),
                    });
                }
                let mut is_float = false;
                let mut seen_exp = false;
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() {
                        num.push(c);
                    } else if c == '.' && !is_float && !seen_exp {
                        is_float = true;
                        num.push(c);
                    } else if (c == 'e' || c == 'E') && !seen_exp {
                        is_float = true;
                        seen_exp = true;
                        num.push(c);
                        chars.next();
                        if let Some(&(_, sign)) = chars.peek() {
                            if sign == '+' || sign == '-' {
                                num.push(sign);
                                chars.next();
                            }
                        }
                        continue;
                    } else {
                        break;
                    }
                    chars.next();
                }
                if num.ends_with(['.', 'e', 'E', '+', '-']) {
                    return Err(Error::SyntaxError {
                        position: start,
                        message: format!("Malformed number: '{num}'"),
                    });
                }
                tokens.push(Token {
                    kind: if is_float { TokenKind::Float } else { TokenKind::Integer },
                    span: Span { start, end: start + num.len() },
                    text: num,
                });
            }

            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = pos;
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Name,
                    span: Span { start, end: start + ident.len() },
                    text: ident,
                });
            }

            '(' => { chars.next(); tokens.push(punct(TokenKind::LParen, pos, "(")); }
            ')' => { chars.next(); tokens.push(punct(TokenKind::RParen, pos, ")")); }
            '[' => { chars.next(); tokens.push(punct(TokenKind::LBracket, pos, "[")); }
            ']' => { chars.next(); tokens.push(punct(TokenKind::RBracket, pos, "]")); }
            '{' => { chars.next(); tokens.push(punct(TokenKind::LBrace, pos, "{")); }
            '}' => { chars.next(); tokens.push(punct(TokenKind::RBrace, pos, "}")); }
            ':' => { chars.next(); tokens.push(punct(TokenKind::Colon, pos, ":")); }

            other => {
                return Err(Error::SyntaxError {
                    position: pos,
                    message: format!("Unexpected character: '{other}'"),
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span { start: input.len(), end: input.len() },
        text: String::new(),
    });

    Ok(tokens)
}

fn punct(kind: TokenKind, pos: usize, text: &str) -> Token {
    Token {
        kind,
        span: Span { start: pos, end: pos + text.len() },
        text: text.to_string(),
    }
}

fn unterminated(start: usize) -> Error {
    Error::SyntaxError {
        position: start,
        message: "Unterminated string literal".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_field_with_arguments() {
        assert_eq!(kinds("{ Things(where: {name: \"x\"}) }"), vec![
            TokenKind::LBrace,
            TokenKind::Name,        // Things
            TokenKind::LParen,
            TokenKind::Name,        // where
            TokenKind::Colon,
            TokenKind::LBrace,
            TokenKind::Name,        // name
            TokenKind::Colon,
            TokenKind::StringLiteral,
            TokenKind::RBrace,
            TokenKind::RParen,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_commas_and_comments_are_ignored() {
        assert_eq!(
            kinds("beacon, # the reference\ncertainty"),
            vec![TokenKind::Name, TokenKind::Name, TokenKind::Eof]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("0.8 42 -7 1e3 -2.5E-1").unwrap();
        let got: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(got, vec![
            (TokenKind::Float, "0.8"),
            (TokenKind::Integer, "42"),
            (TokenKind::Integer, "-7"),
            (TokenKind::Float, "1e3"),
            (TokenKind::Float, "-2.5E-1"),
            (TokenKind::Eof, ""),
        ]);
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(tokenize("1.").is_err());
        assert!(tokenize("-").is_err());
        assert!(tokenize("3e").is_err());
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""say \"hi\"\n""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "say \"hi\"\n");
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("{ name: \"open").unwrap_err();
        assert!(matches!(err, Error::SyntaxError { position: 8, .. }));
    }

    #[test]
    fn test_unexpected_character() {
        assert!(matches!(tokenize("$var"), Err(Error::SyntaxError { position: 0, .. })));
    }
}
