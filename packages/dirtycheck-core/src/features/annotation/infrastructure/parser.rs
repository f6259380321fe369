//! Parser for effect annotations
//!
//! Grammar:
//!
//! ```text
//! set        := '{' ( primary ( '|' primary )* )? '}'
//! union-expr := primary ( '|' primary )*
//! primary    := identifier ( '[' identifier ']' )?
//!             | '(' union-expr ')'
//! ```
//!
//! Two prefixes are accepted on annotation lines: `// dirty:` followed by a
//! set expression (preferred) and `//dirty:` followed by the legacy
//! comma-separated label list. Fix suggestions emit only the set form.
//!
//! Inside a set or parenthesized expression a bare identifier is a
//! *reference* to a named effect set; in the legacy list it is a
//! target-less label.

use thiserror::Error;
use tracing::debug;

use super::{Lexer, Token, TokenKind};
use crate::features::annotation::domain::{EffectExpr, EffectLabel, EffectSet};

/// Preferred annotation prefix, payload in set form
pub const PREFIX_SET: &str = "// dirty:";

/// Legacy annotation prefix, payload as a comma-separated label list
pub const PREFIX_LEGACY: &str = "//dirty:";

/// Annotation parse error, with a byte offset into the payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Parse a strict set-form payload: empty, `{…}`, or `(…)`
pub fn parse_effect_expr(payload: &str) -> Result<EffectExpr, ParseError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(EffectExpr::empty());
    }

    let mut parser = Parser::new(trimmed);
    let expr = match parser.cur.kind {
        TokenKind::LParen => parser.parse_primary()?,
        _ => parser.parse_set_expr()?,
    };
    parser.expect_eof()?;
    Ok(expr)
}

/// Parse a payload in whichever form it uses: set form when it opens with
/// `{` or `(`, the legacy comma list otherwise
pub fn parse_payload(payload: &str) -> Result<EffectExpr, ParseError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') || trimmed.starts_with('(') {
        parse_effect_expr(trimmed)
    } else {
        parse_legacy_list(trimmed)
    }
}

/// Lenient outer entry used on documentation-comment lines
///
/// Returns `None` when the line carries no recognized prefix. When a
/// prefix is present, parse or evaluation failures (including unresolved
/// references) degrade to the empty set; the line still counts as an
/// annotation.
pub fn parse_annotation(line: &str) -> Option<EffectSet> {
    let trimmed = line.trim();
    let payload = trimmed
        .strip_prefix(PREFIX_SET)
        .or_else(|| trimmed.strip_prefix(PREFIX_LEGACY))?;

    match parse_payload(payload).and_then(|expr| {
        expr.eval(None)
            .map_err(|err| ParseError::new(0, err.to_string()))
    }) {
        Ok(set) => Some(set),
        Err(err) => {
            debug!(error = %err, line = trimmed, "malformed effect annotation, treating as empty set");
            Some(EffectSet::new())
        }
    }
}

/// Legacy comma-separated label list: `select[user], insert[log], transform`
fn parse_legacy_list(payload: &str) -> Result<EffectExpr, ParseError> {
    let mut elements = Vec::new();
    let mut offset = 0usize;

    for item in payload.split(',') {
        let trimmed = item.trim();
        if !trimmed.is_empty() {
            let item_offset = offset + (item.len() - item.trim_start().len());
            elements.push(parse_single_label(trimmed, item_offset)?);
        }
        offset += item.len() + 1; // past the comma
    }

    Ok(EffectExpr::Union(elements))
}

/// One legacy item: `ident` or `ident[ident]`, nothing else
fn parse_single_label(item: &str, base_offset: usize) -> Result<EffectExpr, ParseError> {
    let mut parser = Parser::new(item);
    let at = |parser: &Parser<'_>| base_offset + parser.cur.offset;

    if parser.cur.kind != TokenKind::Ident {
        return Err(ParseError::new(
            at(&parser),
            format!("expected effect label, got {}", parser.cur),
        ));
    }
    let operation = parser.cur.text.clone();
    parser.advance();

    let label = if parser.cur.kind == TokenKind::LBracket {
        parser.advance();
        if parser.cur.kind != TokenKind::Ident {
            return Err(ParseError::new(
                at(&parser),
                format!("expected identifier after '[', got {}", parser.cur),
            ));
        }
        let target = parser.cur.text.clone();
        parser.advance();
        if parser.cur.kind != TokenKind::RBracket {
            return Err(ParseError::new(
                at(&parser),
                format!("expected ']', got {}", parser.cur),
            ));
        }
        parser.advance();
        EffectLabel::new(operation, target)
    } else {
        EffectLabel::bare(operation)
    };

    if parser.cur.kind != TokenKind::Eof {
        return Err(ParseError::new(
            at(&parser),
            format!("unexpected {} after effect label", parser.cur),
        ));
    }
    Ok(EffectExpr::Label(label))
}

/// Recursive-descent parser over the token stream
struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self { lexer, cur, peek }
    }

    fn advance(&mut self) {
        self.cur = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.cur.offset, message.into())
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.cur.kind != TokenKind::Eof {
            return Err(self.error(format!("unexpected {} after expression", self.cur)));
        }
        Ok(())
    }

    /// `set := '{' ( primary ( '|' primary )* )? '}'`
    fn parse_set_expr(&mut self) -> Result<EffectExpr, ParseError> {
        if self.cur.kind != TokenKind::LBrace {
            return Err(self.error(format!("expected '{{', got {}", self.cur)));
        }
        self.advance();

        if self.cur.kind == TokenKind::RBrace {
            self.advance();
            return Ok(EffectExpr::empty());
        }

        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_primary()?);

            match self.cur.kind {
                TokenKind::Pipe => self.advance(),
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                _ => {
                    return Err(self.error(format!("expected '|' or '}}', got {}", self.cur)));
                }
            }
        }

        Ok(EffectExpr::Union(elements))
    }

    /// `primary := identifier ( '[' identifier ']' )? | '(' union-expr ')'`
    fn parse_primary(&mut self) -> Result<EffectExpr, ParseError> {
        match self.cur.kind {
            TokenKind::Ident => {
                let ident = self.cur.text.clone();
                self.advance();

                if self.cur.kind == TokenKind::LBracket {
                    self.advance();
                    if self.cur.kind != TokenKind::Ident {
                        return Err(
                            self.error(format!("expected identifier after '[', got {}", self.cur))
                        );
                    }
                    let target = self.cur.text.clone();
                    self.advance();
                    if self.cur.kind != TokenKind::RBracket {
                        return Err(self.error(format!("expected ']', got {}", self.cur)));
                    }
                    self.advance();
                    return Ok(EffectExpr::Label(EffectLabel::new(ident, target)));
                }

                // Bare identifier in expression context: named-set reference
                Ok(EffectExpr::Reference(ident))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_union_expr()?;
                if self.cur.kind != TokenKind::RParen {
                    return Err(self.error(format!("expected ')', got {}", self.cur)));
                }
                self.advance();
                Ok(expr)
            }
            _ => Err(self.error(format!("unexpected token {}", self.cur))),
        }
    }

    /// `union-expr := primary ( '|' primary )*`
    fn parse_union_expr(&mut self) -> Result<EffectExpr, ParseError> {
        let mut elements = vec![self.parse_primary()?];

        while self.cur.kind == TokenKind::Pipe {
            self.advance();
            elements.push(self.parse_primary()?);
        }

        if elements.len() == 1 {
            Ok(elements.swap_remove(0))
        } else {
            Ok(EffectExpr::Union(elements))
        }
    }
}
