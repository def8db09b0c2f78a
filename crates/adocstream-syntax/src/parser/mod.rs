//! # Structural Parser
//!
//! The second pass. A recursive descent over the [`Token`] slice that emits
//! a flat list of [`Code`]s describing the document outline:
//!
//! ```text
//! "= T\n\n== A\n\nx\n"
//!   → DOCUMENT_START
//!     HEADING_START(1) TOKENS HEADING_END(1)
//!     SECTION_START(1)
//!       HEADING_START(2) TOKENS HEADING_END(2)
//!       PARAGRAPH_START TOKENS PARAGRAPH_END
//!     SECTION_END
//!     DOCUMENT_END
//! ```
//!
//! Inline text is not looked at here. A [`Code::Tokens`] only records which
//! tokens make up a run; the [inline formatter](crate::inline) resolves
//! emphasis later, when the driver replays the codes.
//!
//! ## Sections
//!
//! Open sections live on a stack of depths. A heading of level `n` opens a
//! section of depth `n - 1` after closing every open section at the same or
//! a deeper depth, so skipping levels (`==` then `====`) still nests and a
//! shallower heading closes everything below it.
//!
//! ## Lists
//!
//! A list is identified by its marker: the symbol (`*` or `-`) and, for
//! asterisks, the repeat count. An item whose marker equals the current
//! list's continues it; a different marker that is not already open higher
//! up starts a nested list inside the current item.
//!
//! ## Header attributes
//!
//! `:name: value` lines directly under the document title are collected into
//! [`DocumentAttributes`] rather than emitted as codes.

pub mod code;

mod grammar;

use log::{debug, trace};

use crate::document::DocumentAttributes;
use crate::error::Error;
use crate::lexer::Token;
use crate::options::ParseOptions;
pub use code::{Code, TokenRange};

/// Parse a token stream scanned from `source` into codes.
///
/// The header's document attributes are returned alongside the codes.
pub fn parse_tokens(
    source: &str,
    tokens: &[Token],
    options: &ParseOptions,
) -> Result<(Vec<Code>, DocumentAttributes), Error> {
    let mut parser = Parser::new(source, tokens, options);
    grammar::document(&mut parser)?;
    debug!(
        "parsed {} tokens into {} codes",
        tokens.len(),
        parser.codes.len()
    );
    Ok((parser.codes, parser.attributes))
}

/// The parser state.
///
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at_end()`
/// - Consume tokens: `bump()`, `eat_lf()`
/// - Emit structure: `emit()`, `emit_tokens()`
pub(crate) struct Parser<'t> {
    source: &'t str,
    tokens: &'t [Token],
    options: &'t ParseOptions,
    pos: usize,
    codes: Vec<Code>,
    /// Depths of the open sections, innermost last.
    sections: Vec<u32>,
    /// Markers of the open lists, innermost last.
    lists: Vec<ListMarker>,
    attributes: DocumentAttributes,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(source: &'t str, tokens: &'t [Token], options: &'t ParseOptions) -> Self {
        Self {
            source,
            tokens,
            options,
            pos: 0,
            codes: Vec::new(),
            sections: Vec::new(),
            lists: Vec::new(),
            attributes: DocumentAttributes::default(),
        }
    }

    /// Current token, or EOF if past end.
    pub(crate) fn current(&self) -> Token {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub(crate) fn nth(&self, n: usize) -> Token {
        self.tokens.get(self.pos + n).copied().unwrap_or(Token::Eof)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.current() == Token::Eof
    }

    pub(crate) fn bump(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume a line feed if there is one.
    pub(crate) fn eat_lf(&mut self) -> bool {
        if matches!(self.current(), Token::Lf(_)) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn skip_lfs(&mut self) {
        while self.eat_lf() {}
    }

    /// The first token after any run of line feeds, without consuming them.
    pub(crate) fn after_lfs(&self) -> Token {
        let mut n = 0;
        while matches!(self.nth(n), Token::Lf(_)) {
            n += 1;
        }
        self.nth(n)
    }

    pub(crate) fn emit(&mut self, code: Code) {
        trace!("emit {code}");
        self.codes.push(code);
    }

    /// Emit a [`Code::Tokens`] for `first..last`, unless it is empty.
    pub(crate) fn emit_tokens(&mut self, first: usize, last: usize) {
        let range = TokenRange::new(first, last);
        if !range.is_empty() {
            self.emit(Code::Tokens(range));
        }
    }

    pub(crate) fn text(&self, span: crate::span::Span) -> &'t str {
        span.text(self.source)
    }

    /// If the current token opens an attribute list that sits alone on the
    /// line right above a heading, the level of that heading.
    pub(crate) fn heading_after_attr_list(&self) -> Option<u32> {
        if !matches!(self.current(), Token::AttrListStart(_)) {
            return None;
        }
        let rest = self.tokens.get(self.pos..)?;
        let close = rest
            .iter()
            .position(|t| matches!(t, Token::AttrListEnd(_) | Token::Lf(_) | Token::Eof))?;
        match (rest.get(close), rest.get(close + 1), rest.get(close + 2)) {
            (Some(Token::AttrListEnd(_)), Some(Token::Lf(_)), Some(Token::Heading { level, .. })) => {
                Some(*level)
            }
            _ => None,
        }
    }

    pub(crate) fn unexpected(&self, production: &'static str) -> Error {
        Error::UnexpectedToken {
            production,
            found: self.current(),
            index: self.pos,
        }
    }
}

/// The identity of an unordered list: its marker symbol and repeat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListMarker {
    symbol: char,
    count: u32,
}

impl ListMarker {
    pub(crate) fn of(token: Token) -> Option<Self> {
        match token {
            Token::UlistAsterisk { count, .. } => Some(Self { symbol: '*', count }),
            Token::UlistHyphen(_) => Some(Self { symbol: '-', count: 1 }),
            _ => None,
        }
    }

    /// Whether an item marked `other` continues the list marked `self`.
    pub(crate) fn same_list(self, other: Self) -> bool {
        self == other
    }

    /// Whether an item marked `other` opens a list nested under `self`.
    pub(crate) fn should_nest(self, other: Self) -> bool {
        other.symbol != self.symbol || other.count > self.count
    }
}
