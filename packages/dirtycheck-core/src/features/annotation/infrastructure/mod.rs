mod lexer;
mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{
    parse_annotation, parse_effect_expr, parse_payload, ParseError, PREFIX_LEGACY, PREFIX_SET,
};
