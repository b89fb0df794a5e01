//! Parser for the markup language
//!
//! Markup text goes through the [`lexer`] into a token stream and the
//! grammar builds an element tree from it. Directives are kept as
//! unevaluated grouping nodes for the template expander.

mod grammar;
pub mod lexer;

pub use grammar::{parse, parse_fragment, Fragment, ParseResult, MAX_DEPTH};
pub use lexer::{tokenize, DirectiveKeyword, Token, TokenKind};
