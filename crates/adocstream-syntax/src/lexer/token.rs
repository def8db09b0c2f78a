//! Tokens produced by the tokenizer and the append-only stream holding them.

use std::fmt;

use crate::span::Span;

/// One lexical event.
///
/// Positions are byte offsets into the source. A delimiter token such as
/// [`Token::BoldStart`] records the offset of its single delimiter character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A run of ordinary text.
    Blob(Span),
    /// A line feed at the given offset.
    Lf(usize),
    /// End of input.
    Eof,
    BoldStart(usize),
    BoldEnd(usize),
    ItalicStart(usize),
    ItalicEnd(usize),
    MonoStart(usize),
    MonoEnd(usize),
    /// A `'` between two word characters.
    Apostrophe(usize),
    /// The `[` opening an attribute list.
    AttrListStart(usize),
    /// The `]` closing an attribute list.
    AttrListEnd(usize),
    /// The name of a `name=value` entry, without the `=`.
    AttrName(Span),
    AttrValueStart,
    AttrValueEnd,
    /// The content of a double-quoted value, without the quotes.
    DQuote(Span),
    /// A `,` and the whitespace after it.
    Separator(Span),
    /// A list marker made of `count` asterisks.
    UlistAsterisk { count: u32, marker: Span },
    /// A `-` list marker.
    UlistHyphen(Span),
    /// A section or title heading marker of `level` equals signs.
    Heading { level: u32, marker: Span },
    /// A listing block fence of `count` dashes; the next token is its terminator.
    ListingBlockDelim { count: u32, marker: Span },
    /// An inline macro name, without the `:`.
    InlineMacro(Span),
    /// A document attribute name, without the surrounding colons.
    DocAttr(Span),
    /// Leading whitespace of a literal line.
    LiteralIndent(Span),
}

impl Token {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Token::Blob(_) => "BLOB",
            Token::Lf(_) => "LF",
            Token::Eof => "EOF",
            Token::BoldStart(_) => "BOLD_START",
            Token::BoldEnd(_) => "BOLD_END",
            Token::ItalicStart(_) => "ITALIC_START",
            Token::ItalicEnd(_) => "ITALIC_END",
            Token::MonoStart(_) => "MONO_START",
            Token::MonoEnd(_) => "MONO_END",
            Token::Apostrophe(_) => "APOSTROPHE",
            Token::AttrListStart(_) => "ATTR_LIST_START",
            Token::AttrListEnd(_) => "ATTR_LIST_END",
            Token::AttrName(_) => "ATTR_NAME",
            Token::AttrValueStart => "ATTR_VALUE_START",
            Token::AttrValueEnd => "ATTR_VALUE_END",
            Token::DQuote(_) => "DQUOTE",
            Token::Separator(_) => "SEPARATOR",
            Token::UlistAsterisk { .. } => "ULIST_ASTERISK",
            Token::UlistHyphen(_) => "ULIST_HYPHEN",
            Token::Heading { .. } => "HEADING",
            Token::ListingBlockDelim { .. } => "LISTING_BLOCK_DELIM",
            Token::InlineMacro(_) => "INLINE_MACRO",
            Token::DocAttr(_) => "DOCATTR",
            Token::LiteralIndent(_) => "LITERALI",
        }
    }

    /// The first source offset this token covers, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Token::Blob(s)
            | Token::AttrName(s)
            | Token::DQuote(s)
            | Token::Separator(s)
            | Token::UlistHyphen(s)
            | Token::InlineMacro(s)
            | Token::DocAttr(s)
            | Token::LiteralIndent(s)
            | Token::UlistAsterisk { marker: s, .. }
            | Token::Heading { marker: s, .. }
            | Token::ListingBlockDelim { marker: s, .. } => Some(s.start),
            Token::Lf(p)
            | Token::BoldStart(p)
            | Token::BoldEnd(p)
            | Token::ItalicStart(p)
            | Token::ItalicEnd(p)
            | Token::MonoStart(p)
            | Token::MonoEnd(p)
            | Token::Apostrophe(p)
            | Token::AttrListStart(p)
            | Token::AttrListEnd(p) => Some(p),
            Token::Eof | Token::AttrValueStart | Token::AttrValueEnd => None,
        }
    }

    /// The source range this token was scanned from, used when content is
    /// reproduced verbatim.
    ///
    /// Markers that carry a trailing delimiter (`name:` of a macro, `name=`
    /// of an attribute) include it.
    pub fn source_span(&self) -> Option<Span> {
        match *self {
            Token::Blob(s)
            | Token::Separator(s)
            | Token::LiteralIndent(s)
            | Token::UlistHyphen(s)
            | Token::UlistAsterisk { marker: s, .. }
            | Token::Heading { marker: s, .. }
            | Token::ListingBlockDelim { marker: s, .. } => Some(s),
            Token::InlineMacro(s) | Token::AttrName(s) => Some(Span::new(s.start, s.end + 1)),
            Token::DocAttr(s) => Some(Span::new(s.start.saturating_sub(1), s.end + 1)),
            Token::DQuote(s) => Some(Span::new(s.start.saturating_sub(1), s.end + 1)),
            Token::Lf(p)
            | Token::BoldStart(p)
            | Token::BoldEnd(p)
            | Token::ItalicStart(p)
            | Token::ItalicEnd(p)
            | Token::MonoStart(p)
            | Token::MonoEnd(p)
            | Token::Apostrophe(p)
            | Token::AttrListStart(p)
            | Token::AttrListEnd(p) => Some(Span::new(p, p + 1)),
            Token::Eof | Token::AttrValueStart | Token::AttrValueEnd => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Token::Blob(s)
            | Token::AttrName(s)
            | Token::DQuote(s)
            | Token::Separator(s)
            | Token::UlistHyphen(s)
            | Token::InlineMacro(s)
            | Token::DocAttr(s)
            | Token::LiteralIndent(s) => write!(f, "{}({}, {})", self.name(), s.start, s.end),
            Token::UlistAsterisk { count, marker } | Token::ListingBlockDelim { count, marker } => {
                write!(f, "{}({count}, {}, {})", self.name(), marker.start, marker.end)
            }
            Token::Heading { level, marker } => {
                write!(f, "{}({level}, {}, {})", self.name(), marker.start, marker.end)
            }
            Token::Lf(p)
            | Token::BoldStart(p)
            | Token::BoldEnd(p)
            | Token::ItalicStart(p)
            | Token::ItalicEnd(p)
            | Token::MonoStart(p)
            | Token::MonoEnd(p)
            | Token::Apostrophe(p)
            | Token::AttrListStart(p)
            | Token::AttrListEnd(p) => write!(f, "{}({p})", self.name()),
            Token::Eof | Token::AttrValueStart | Token::AttrValueEnd => f.write_str(self.name()),
        }
    }
}

/// A checkpoint into a [`TokenStream`], returned by [`TokenStream::mark`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mark(usize);

/// The append-only token buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Appends a blob unless `span` is empty.
    pub fn push_blob(&mut self, span: Span) {
        if !span.is_empty() {
            self.tokens.push(Token::Blob(span));
        }
    }

    /// Records the current length so tentatively pushed tokens can be
    /// discarded with [`TokenStream::reset`].
    pub fn mark(&self) -> Mark {
        Mark(self.tokens.len())
    }

    /// Truncates the stream back to `mark`.
    pub fn reset(&mut self, mark: Mark) {
        self.tokens.truncate(mark.0);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl std::ops::Deref for TokenStream {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
