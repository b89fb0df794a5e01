//! Recursive-descent parser from tokens to an element tree
//!
//! The parser is a purely structural pass. Directives become grouping nodes
//! holding their raw condition or loop header; nothing is evaluated here.
//!
//! Children of an element are collected until a tag whose raw content is
//! exactly `/name`. There is no stack of open tag names, so a mismatched or
//! overlapping closing tag is skipped with a warning rather than reported as
//! an error, and the element it was meant to close ends up unclosed.

use tracing::debug;

use crate::error::{ParseError, ParseWarning, Span};
use crate::tree::{Directive, Element, ElementKind};

use super::lexer::{tokenize, DirectiveKeyword, Token, TokenKind};

/// Nesting beyond this depth aborts the parse
pub const MAX_DEPTH: usize = 256;

/// Outcome of parsing a whole document
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// `true` when no errors were recorded
    pub success: bool,
    /// `None` for an empty document or after a fatal error
    pub root: Option<Element>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

/// Outcome of parsing a sequence of sibling nodes
#[derive(Debug, Clone)]
pub struct Fragment {
    pub nodes: Vec<Element>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse a markup document into a single-rooted tree.
///
/// Several top-level nodes are wrapped in an implicit `div`.
pub fn parse(source: &str) -> ParseResult {
    let Fragment {
        mut nodes,
        errors,
        mut warnings,
    } = parse_fragment(source);

    let root = if nodes.len() > 1 {
        warnings.push(ParseWarning {
            message: format!("{} top-level nodes wrapped in an implicit <div>", nodes.len()),
            line: 1,
            column: 1,
        });
        let mut root = Element::new("div");
        root.span = 0..source.len();
        root.children = nodes;
        Some(root)
    } else {
        nodes.pop()
    };

    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "parsed document"
    );
    ParseResult {
        success: errors.is_empty(),
        root,
        errors,
        warnings,
    }
}

/// Parse markup into a list of sibling nodes, as used for component bodies
pub fn parse_fragment(source: &str) -> Fragment {
    let tokens = tokenize(source);
    debug!(tokens = tokens.len(), "tokenized markup");

    let mut parser = Parser::new(source, tokens);
    let nodes = match parser.parse_nodes(Scope::Document) {
        Ok((nodes, _)) => nodes,
        Err(fatal) => {
            parser.errors.push(fatal);
            Vec::new()
        }
    };

    Fragment {
        nodes,
        errors: parser.errors,
        warnings: parser.warnings,
    }
}

/// What terminates the sibling run being parsed
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scope<'n> {
    Document,
    Element(&'n str),
    Directive,
}

/// How a sibling run ended
#[derive(Debug, Clone, Copy, PartialEq)]
enum Ending {
    Eof,
    /// Matching closing tag consumed
    Closed,
    /// `@end` consumed
    End,
    /// Next token is `@else` or `@else-if` for the enclosing chain
    Branch,
    /// Next token is a closing tag for an enclosing element
    Parent,
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    errors: Vec<ParseError>,
    warnings: Vec<ParseWarning>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Current token; the lexer guarantees a trailing EOF
    fn peek(&self) -> Token {
        match self.tokens.get(self.pos).or_else(|| self.tokens.last()) {
            Some(token) => token.clone(),
            None => Token {
                kind: TokenKind::Eof,
                span: self.source.len()..self.source.len(),
                line: 1,
                column: 1,
            },
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error(&mut self, token: &Token, message: impl Into<String>) {
        self.errors.push(ParseError::Structural {
            span: token.span.clone(),
            line: token.line,
            column: token.column,
            message: message.into(),
        });
    }

    fn warn(&mut self, token: &Token, message: impl Into<String>) {
        self.warnings.push(ParseWarning {
            message: message.into(),
            line: token.line,
            column: token.column,
        });
    }

    fn enter(&mut self, token: &Token) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::Fatal {
                span: token.span.clone(),
                line: token.line,
                column: token.column,
                message: format!("nesting deeper than {} levels", MAX_DEPTH),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn parse_nodes(&mut self, scope: Scope<'_>) -> Result<(Vec<Element>, Ending), ParseError> {
        let mut nodes = Vec::new();
        // Set right after an if/else-if branch stopped at the next branch keyword
        let mut chain_open = false;

        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::Eof => return Ok((nodes, Ending::Eof)),

                TokenKind::Text(text) => {
                    chain_open = false;
                    self.advance();
                    if let Some(node) = text_node(text, token.span.clone()) {
                        nodes.push(node);
                    }
                }

                TokenKind::Tag { raw, terminated } => {
                    chain_open = false;
                    if let Some(name) = raw.trim().strip_prefix('/') {
                        match scope {
                            Scope::Element(open) if name == open => {
                                self.advance();
                                return Ok((nodes, Ending::Closed));
                            }
                            Scope::Directive => {
                                self.error(&token, format!("missing @end before </{}>", name));
                                return Ok((nodes, Ending::Parent));
                            }
                            _ => {
                                self.warn(&token, format!("unexpected closing tag </{}>", name));
                                self.advance();
                            }
                        }
                    } else if *terminated && raw.starts_with('!') {
                        self.warn(&token, format!("markup declaration <{}> skipped", raw.trim()));
                        self.advance();
                    } else if !terminated {
                        self.error(&token, format!("unterminated tag <{}", raw.trim()));
                        self.advance();
                    } else {
                        self.advance();
                        if let Some(element) = self.parse_element(&token, raw)? {
                            nodes.push(element);
                        }
                    }
                }

                TokenKind::Directive(keyword) => match keyword {
                    DirectiveKeyword::If | DirectiveKeyword::Foreach => {
                        self.advance();
                        let (node, ending) = self.parse_directive(&token, *keyword)?;
                        chain_open = *keyword == DirectiveKeyword::If && ending == Ending::Branch;
                        nodes.push(node);
                    }
                    DirectiveKeyword::ElseIf | DirectiveKeyword::Else => {
                        if !chain_open && scope == Scope::Directive {
                            return Ok((nodes, Ending::Branch));
                        }
                        self.advance();
                        let (node, ending) = self.parse_directive(&token, *keyword)?;
                        chain_open =
                            *keyword == DirectiveKeyword::ElseIf && ending == Ending::Branch;
                        nodes.push(node);
                    }
                    DirectiveKeyword::Switch => {
                        chain_open = false;
                        self.warn(&token, "@switch is not supported and was skipped");
                        self.advance();
                    }
                },

                TokenKind::At(word) => {
                    chain_open = false;
                    self.advance();
                    if word == "end" {
                        if scope == Scope::Directive {
                            return Ok((nodes, Ending::End));
                        }
                        self.warn(&token, "@end without an open directive");
                    } else {
                        // Not a directive: part of the prose around it
                        let span = self.join_prose(&mut nodes, token.span.clone());
                        let source = self.source;
                        nodes.push(literal_text(source[span.clone()].trim(), span));
                    }
                }
            }
        }
    }

    fn parse_element(&mut self, token: &Token, raw: &str) -> Result<Option<Element>, ParseError> {
        let raw = raw.trim();
        let (raw, self_closing) = match raw.strip_suffix('/') {
            Some(inner) => (inner, true),
            None => (raw, false),
        };

        let segments = split_segments(raw);
        let Some((name, attributes)) = segments.split_first() else {
            self.error(token, "tag without a name");
            return Ok(None);
        };

        let mut element = Element::new(*name);
        element.span = token.span.clone();
        for segment in attributes {
            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key.trim(), unquote(value.trim())),
                None => (*segment, "true"),
            };
            if key.is_empty() {
                self.warn(token, format!("attribute without a name in <{}>", name));
                continue;
            }
            if let Err(err) = element.set_attribute(key, value) {
                self.warn(token, err.to_string());
            }
        }

        if self_closing {
            return Ok(Some(element));
        }

        self.enter(token)?;
        let (children, ending) = self.parse_nodes(Scope::Element(*name))?;
        self.leave();

        element.children = children;
        if ending == Ending::Eof {
            self.error(token, format!("unclosed element <{}>", name));
        }
        Ok(Some(element))
    }

    fn parse_directive(
        &mut self,
        token: &Token,
        keyword: DirectiveKeyword,
    ) -> Result<(Element, Ending), ParseError> {
        let (header, remainder) = match keyword {
            DirectiveKeyword::Else => (String::new(), None),
            _ => self.directive_header(token),
        };

        let directive = match keyword {
            DirectiveKeyword::If => Directive::If {
                condition: header.clone(),
            },
            DirectiveKeyword::ElseIf => Directive::ElseIf {
                condition: header.clone(),
            },
            DirectiveKeyword::Foreach => match foreach_header(&header) {
                Some((variable, source)) => Directive::Foreach { source, variable },
                None => {
                    self.error(token, format!("malformed @foreach header '{}'", header));
                    Directive::Foreach {
                        source: String::new(),
                        variable: "item".to_string(),
                    }
                }
            },
            DirectiveKeyword::Else | DirectiveKeyword::Switch => Directive::Else,
        };
        if header.is_empty()
            && matches!(keyword, DirectiveKeyword::If | DirectiveKeyword::ElseIf)
        {
            self.error(token, format!("@{} requires a condition", directive.keyword()));
        }

        let mut node = Element::directive(directive);
        node.span = token.span.clone();
        node.children.extend(remainder);

        self.enter(token)?;
        let (children, ending) = self.parse_nodes(Scope::Directive)?;
        self.leave();

        node.children.extend(children);
        if ending == Ending::Eof {
            self.error(token, format!("missing @end for @{}", node.tag.trim_start_matches('@')));
        }
        Ok((node, ending))
    }

    /// Widen the span of a literal `@word` over the text touching it.
    ///
    /// A text node just before it is popped and the text token just after it
    /// is consumed, when only whitespace separates them.
    fn join_prose(&mut self, nodes: &mut Vec<Element>, mut span: Span) -> Span {
        if let Some(previous) = nodes.last() {
            if matches!(previous.kind, ElementKind::Text { .. })
                && self.blank(previous.span.end..span.start)
            {
                span.start = previous.span.start;
                nodes.pop();
            }
        }

        let next = self.peek();
        if matches!(next.kind, TokenKind::Text(_)) && self.blank(span.end..next.span.start) {
            span.end = next.span.end;
            self.advance();
        }
        span
    }

    fn blank(&self, range: Span) -> bool {
        self.source.get(range).map_or(false, |gap| gap.trim().is_empty())
    }

    /// Take the condition or loop header from the text on the directive's line.
    ///
    /// Anything after the first line break is returned as body text.
    fn directive_header(&mut self, directive: &Token) -> (String, Option<Element>) {
        let next = self.peek();
        let TokenKind::Text(text) = &next.kind else {
            return (String::new(), None);
        };
        let gap = self
            .source
            .get(directive.span.end..next.span.start)
            .unwrap_or("");
        if gap.contains('\n') {
            return (String::new(), None);
        }

        self.advance();
        match text.split_once('\n') {
            Some((line, rest)) => {
                let start = next.span.start + line.len() + 1;
                let remainder = text_node(rest, start..next.span.end);
                (line.trim().to_string(), remainder)
            }
            None => (text.trim().to_string(), None),
        }
    }
}

fn text_node(text: &str, span: Span) -> Option<Element> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(literal_text(trimmed, span))
}

fn literal_text(text: &str, span: Span) -> Element {
    let mut node = Element::text(text);
    node.span = span;
    node
}

/// `item in Items` or just `Items`, which binds `item`
fn foreach_header(header: &str) -> Option<(String, String)> {
    let words: Vec<&str> = header.split_whitespace().collect();
    match words.as_slice() {
        [variable, "in", source] => Some((variable.to_string(), source.to_string())),
        [source] => Some(("item".to_string(), source.to_string())),
        _ => None,
    }
}

/// Split tag content on whitespace outside of quotes
fn split_segments(raw: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;

    for (i, c) in raw.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    segments.push(&raw[s..i]);
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s) = start {
        segments.push(&raw[s..]);
    }
    segments
}

/// Strip one layer of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ElementKind;
    use pretty_assertions::assert_eq;

    fn root_of(source: &str) -> Element {
        let result = parse(source);
        assert!(result.success, "unexpected errors: {:?}", result.errors);
        result.root.expect("document should have a root")
    }

    #[test]
    fn test_div_with_button() {
        let root = root_of("<div><button>Click</button></div>");
        assert_eq!(root.kind, ElementKind::Div);
        assert_eq!(root.children.len(), 1);
        assert!(matches!(root.children[0].kind, ElementKind::Button { .. }));
        assert_eq!(root.children[0].text_content(), "Click");
    }

    #[test]
    fn test_empty_document() {
        let result = parse("");
        assert!(result.success);
        assert!(result.root.is_none());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_attributes_are_raw_strings() {
        let root = root_of("<vstack id=main spacing=4 width=\"50%\" data-x='a b'></vstack>");
        assert_eq!(root.id.as_deref(), Some("main"));
        assert_eq!(root.attribute("width"), Some("50%"));
        assert_eq!(root.attribute("data-x"), Some("a b"));
        assert_eq!(root.attribute("spacing"), Some("4"));
    }

    #[test]
    fn test_self_closing_and_boolean_attribute() {
        let root = root_of("<div><input disabled/><Widget attr=\"X\" /></div>");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].attribute("disabled"), Some("true"));
        assert_eq!(root.children[1].tag, "Widget");
        assert_eq!(root.children[1].kind, ElementKind::Custom);
        assert_eq!(root.children[1].attribute("attr"), Some("X"));
    }

    #[test]
    fn test_unknown_tag_is_generic() {
        let root = root_of("<card title=Hi></card>");
        assert_eq!(root.kind, ElementKind::Custom);
        assert_eq!(root.tag, "card");
    }

    #[test]
    fn test_multiple_top_level_nodes_are_wrapped() {
        let result = parse("<p>a</p><p>b</p>");
        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        let root = result.root.expect("root");
        assert_eq!(root.tag, "div");
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_unclosed_element_is_structural_error() {
        let result = parse("<div>\n  <p>text");
        assert!(!result.success);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().all(|e| !e.is_fatal()));
        assert_eq!(result.errors[0].message(), "unclosed element <p>");
        assert_eq!((result.errors[0].line(), result.errors[0].column()), (2, 3));
        // partial tree is still returned
        let root = result.root.expect("partial root");
        assert_eq!(root.children[0].text_content(), "text");
    }

    #[test]
    fn test_unterminated_tag() {
        let result = parse("<div></div><p class=x");
        assert!(!result.success);
        assert!(result.errors[0].message().starts_with("unterminated tag"));
    }

    #[test]
    fn test_mismatched_close_is_only_a_warning() {
        let result = parse("<div><p>x</span></p></div>");
        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].message, "unexpected closing tag </span>");
    }

    #[test]
    fn test_invalid_attribute_value_is_warning() {
        let result = parse("<grid columns=0></grid>");
        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.root.expect("root").attribute("columns"), Some("0"));
    }

    #[test]
    fn test_if_chain_is_structural() {
        let root = root_of(
            "<div>\n@if Status == \"Active\"\n<p>A</p>\n@else-if Status == \"Pending\"\n<p>P</p>\n@else\n<p>E</p>\n@end\n</div>",
        );
        let tags: Vec<&str> = root.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["@if", "@else-if", "@else"]);
        assert_eq!(
            root.children[0].kind,
            ElementKind::Directive(Directive::If {
                condition: "Status == \"Active\"".to_string()
            })
        );
        assert_eq!(
            root.children[1].kind,
            ElementKind::Directive(Directive::ElseIf {
                condition: "Status == \"Pending\"".to_string()
            })
        );
        assert_eq!(root.children[2].text_content(), "E");
    }

    #[test]
    fn test_condition_on_same_line_as_text() {
        let root = root_of("<div>@if Ready\nGo\n@end</div>");
        let branch = &root.children[0];
        assert_eq!(
            branch.kind,
            ElementKind::Directive(Directive::If {
                condition: "Ready".to_string()
            })
        );
        assert_eq!(branch.text_content(), "Go");
    }

    #[test]
    fn test_nested_if_else_pairs_with_inner_chain() {
        let root = root_of("<div>@if A\n@if B\nx\n@else\ny\n@end\n@else\nz\n@end</div>");
        assert_eq!(root.children.len(), 2);
        let outer_if = &root.children[0];
        let inner_tags: Vec<&str> = outer_if.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(inner_tags, vec!["@if", "@else"]);
        assert_eq!(outer_if.children[1].text_content(), "y");
        assert_eq!(root.children[1].text_content(), "z");
    }

    #[test]
    fn test_foreach_headers() {
        let root = root_of("<div>@foreach row in Rows\n<p>{row}</p>\n@end\n@foreach Items\nx\n@end</div>");
        assert_eq!(
            root.children[0].kind,
            ElementKind::Directive(Directive::Foreach {
                source: "Rows".to_string(),
                variable: "row".to_string()
            })
        );
        assert_eq!(
            root.children[1].kind,
            ElementKind::Directive(Directive::Foreach {
                source: "Items".to_string(),
                variable: "item".to_string()
            })
        );
    }

    #[test]
    fn test_missing_end_is_error() {
        let result = parse("<div>@if A\n<p>x</p></div>");
        assert!(!result.success);
        assert_eq!(result.errors[0].message(), "missing @end before </div>");
        // the div still closes
        assert_eq!(result.root.expect("root").children.len(), 1);
    }

    #[test]
    fn test_switch_is_skipped_with_warning() {
        let result = parse("<div>@switch</div>");
        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.root.expect("root").children.is_empty());
    }

    #[test]
    fn test_unknown_at_word_is_text() {
        let root = root_of("<p>mail me @home</p>");
        assert_eq!(root.text_content(), "mail me @home");
    }

    #[test]
    fn test_at_inside_a_word_stays_one_text_node() {
        let root = root_of("<p>Mail ada@example.com today</p>");
        assert_eq!(root.children.len(), 1);
        assert_eq!(
            root.children[0].kind,
            ElementKind::Text {
                content: "Mail ada@example.com today".to_string()
            }
        );
        assert_eq!(root.children[0].span, 3..29);

        let root = root_of("<p>ping @ada and @bob</p><p>@end</p>");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text_content(), "ping @ada and @bob");
        assert_eq!(root.children[0].children.len(), 1);
    }

    #[test]
    fn test_comments_are_skipped() {
        let root = root_of("<div><!-- note: a > b --><p>x</p><!--\n<p>gone</p>\n--></div>");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].tag, "p");
        assert_eq!(root.text_content(), "x");
    }

    #[test]
    fn test_declarations_are_skipped_with_warning() {
        let result = parse("<!DOCTYPE html><div><p>x</p></div>");
        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.root.expect("root").tag, "div");
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        let result = parse("<div><p>x</p><!-- never closed <p>y</p></div>");
        assert!(!result.success);
        assert!(result.errors.iter().any(|e| e.to_string().contains("unterminated tag <!--")));
        assert_eq!(result.root.expect("root").text_content(), "x");
    }

    #[test]
    fn test_excessive_nesting_is_fatal() {
        let source = format!("{}{}", "<div>".repeat(MAX_DEPTH + 1), "</div>".repeat(MAX_DEPTH + 1));
        let result = parse(&source);
        assert!(!result.success);
        assert!(result.root.is_none());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].is_fatal());
    }

    #[test]
    fn test_fragment_keeps_siblings() {
        let fragment = parse_fragment("<model>{ a: 1 }</model>\n<p>x</p>");
        assert_eq!(fragment.nodes.len(), 2);
        assert_eq!(fragment.nodes[0].tag, "model");
    }

    #[test]
    fn test_split_segments_respects_quotes() {
        assert_eq!(
            split_segments("a b=\"c d\" e='f g' h"),
            vec!["a", "b=\"c d\"", "e='f g'", "h"]
        );
    }
}
