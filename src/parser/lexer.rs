//! Lexer for the markup language using logos
//!
//! The token set is deliberately coarse: a tag is everything between `<` and
//! `>`, left unparsed; text is a maximal run that does not start with `<` or
//! `@`; a directive is `@` followed by an identifier run. `<!-- ... -->`
//! comments produce no token. Tokenizing never fails and always ends with
//! [`TokenKind::Eof`].

use logos::Logos;

use crate::error::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // An unterminated tag runs to the end of input
    #[regex(r"<[^>]*>?")]
    Tag,

    #[regex(r"@[A-Za-z0-9_\-]*")]
    At,

    #[regex(r"[^<@ \t\r\n\f][^<@]*")]
    Text,
}

/// Keywords recognised after `@`, case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKeyword {
    If,
    ElseIf,
    Else,
    Switch,
    Foreach,
}

impl DirectiveKeyword {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "if" => Some(DirectiveKeyword::If),
            "else-if" | "elseif" => Some(DirectiveKeyword::ElseIf),
            "else" => Some(DirectiveKeyword::Else),
            "switch" => Some(DirectiveKeyword::Switch),
            "foreach" => Some(DirectiveKeyword::Foreach),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Raw content between `<` and `>`
    Tag { raw: String, terminated: bool },
    /// Literal text, untrimmed
    Text(String),
    Directive(DirectiveKeyword),
    /// `@word` that is not a keyword; the word is lowercased
    At(String),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based column of the first character, counted in chars
    pub column: usize,
}

/// Scanning position, advanced monotonically through the source
#[derive(Debug, Clone, Copy)]
struct Cursor {
    offset: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn advance_to(&mut self, source: &str, offset: usize) {
        let Some(skipped) = source.get(self.offset..offset) else {
            return;
        };
        for c in skipped.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = offset;
    }
}

/// Streaming tokenizer; one instance per input
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::SpannedIter<'a, RawToken>,
    cursor: Cursor,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: RawToken::lexer(source).spanned(),
            cursor: Cursor::start(),
            finished: false,
        }
    }

    fn token(&mut self, kind: TokenKind, span: Span) -> Token {
        self.cursor.advance_to(self.source, span.start);
        Token {
            kind,
            span,
            line: self.cursor.line,
            column: self.cursor.column,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        loop {
            let Some((raw, span)) = self.inner.next() else {
                self.finished = true;
                let end = self.source.len();
                return Some(self.token(TokenKind::Eof, end..end));
            };
            let slice = &self.source[span.clone()];
            let kind = match raw {
                Ok(RawToken::Tag) if slice.starts_with("<!--") => {
                    // A comment may hold `>`; it runs on to the closing `-->`
                    match self.source[span.start + 4..].find("-->") {
                        Some(i) => {
                            let end = span.start + 4 + i + 3;
                            self.inner.bump(end.saturating_sub(span.end));
                            continue;
                        }
                        None => {
                            let end = self.source.len();
                            self.inner.bump(end - span.end);
                            let kind = TokenKind::Tag {
                                raw: "!--".to_string(),
                                terminated: false,
                            };
                            return Some(self.token(kind, span.start..end));
                        }
                    }
                }
                Ok(RawToken::Tag) => {
                    let terminated = slice.len() > 1 && slice.ends_with('>');
                    let end = if terminated { slice.len() - 1 } else { slice.len() };
                    TokenKind::Tag {
                        raw: slice[1..end].to_string(),
                        terminated,
                    }
                }
                Ok(RawToken::At) => {
                    let word = slice[1..].to_ascii_lowercase();
                    match DirectiveKeyword::from_word(&word) {
                        Some(keyword) => TokenKind::Directive(keyword),
                        None => TokenKind::At(word),
                    }
                }
                Ok(RawToken::Text) | Err(_) => TokenKind::Text(slice.to_string()),
            };
            return Some(self.token(kind, span));
        }
    }
}

/// Tokenize markup text; the last token is always [`TokenKind::Eof`]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn tag(raw: &str) -> TokenKind {
        TokenKind::Tag {
            raw: raw.to_string(),
            terminated: true,
        }
    }

    #[test]
    fn test_empty_input_is_single_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    }

    #[test]
    fn test_whitespace_only_is_single_eof() {
        assert_eq!(kinds(" \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_tags_and_text() {
        assert_eq!(
            kinds("<div><button>Click me</button></div>"),
            vec![
                tag("div"),
                tag("button"),
                TokenKind::Text("Click me".to_string()),
                tag("/button"),
                tag("/div"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tag_content_is_raw() {
        assert_eq!(
            kinds("<input type=password value=\"a b\">"),
            vec![tag("input type=password value=\"a b\""), TokenKind::Eof]
        );
    }

    #[test]
    fn test_directive_keywords_case_insensitive() {
        assert_eq!(
            kinds("@IF @Else @else-if @foreach @switch"),
            vec![
                TokenKind::Directive(DirectiveKeyword::If),
                TokenKind::Directive(DirectiveKeyword::Else),
                TokenKind::Directive(DirectiveKeyword::ElseIf),
                TokenKind::Directive(DirectiveKeyword::Foreach),
                TokenKind::Directive(DirectiveKeyword::Switch),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_if_followed_by_condition_text() {
        let tokens = kinds("@if (condition) { }");
        assert_eq!(tokens[0], TokenKind::Directive(DirectiveKeyword::If));
        assert_eq!(tokens[1], TokenKind::Text("(condition) { }".to_string()));
    }

    #[test]
    fn test_unknown_word_is_generic_at() {
        assert_eq!(
            kinds("@End @model"),
            vec![
                TokenKind::At("end".to_string()),
                TokenKind::At("model".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_produce_no_tokens() {
        let tokens = tokenize("<!-- a > b -->\n<p>x</p>");
        assert_eq!(tokens[0].kind, tag("p"));
        assert_eq!((tokens[0].line, tokens[0].column), (2, 1));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        assert_eq!(
            kinds("<p><!-- open <b>"),
            vec![
                tag("p"),
                TokenKind::Tag {
                    raw: "!--".to_string(),
                    terminated: false
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_runs_to_end() {
        assert_eq!(
            kinds("<div><p class=x"),
            vec![
                tag("div"),
                TokenKind::Tag {
                    raw: "p class=x".to_string(),
                    terminated: false
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_open_bracket() {
        assert_eq!(
            kinds("<"),
            vec![
                TokenKind::Tag {
                    raw: String::new(),
                    terminated: false
                },
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = tokenize("<div>\n  <p>Hi</p>\n</div>");
        let positions: Vec<(usize, usize)> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (2, 3), (2, 6), (2, 8), (3, 1), (3, 7)]
        );
    }

    #[test]
    fn test_spans_cover_source() {
        let source = "<a>text</a>";
        let tokens = tokenize(source);
        assert_eq!(&source[tokens[0].span.clone()], "<a>");
        assert_eq!(&source[tokens[1].span.clone()], "text");
        assert_eq!(tokens[3].span, 11..11);
    }
}
