//! The structural instruction stream.

use std::fmt;

use crate::span::Span;

/// A half-open range `first..last` of token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenRange {
    pub first: usize,
    pub last: usize,
}

impl TokenRange {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn len(self) -> usize {
        self.last.saturating_sub(self.first)
    }

    pub fn is_empty(self) -> bool {
        self.last <= self.first
    }

    pub fn indices(self) -> std::ops::Range<usize> {
        self.first..self.last
    }
}

/// One structural instruction.
///
/// Start/end pairs are always balanced. Codes carrying a [`TokenRange`]
/// refer back into the token stream they were parsed from; inline text is
/// not formatted until the driver replays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    DocumentStart,
    DocumentEnd,
    HeadingStart(u32),
    HeadingEnd(u32),
    PreambleStart,
    PreambleEnd,
    /// Opens a section; the value is the heading level minus one.
    SectionStart(u32),
    SectionEnd,
    ParagraphStart,
    ParagraphEnd,
    /// Inline text to be formatted.
    Tokens(TokenRange),
    AttrPositional { position: u32, value: TokenRange },
    AttrNamed { name: Span, value: TokenRange },
    ListingBlockStart,
    ListingBlockEnd,
    LiteralBlockStart,
    LiteralBlockEnd,
    /// Block content reproduced as-is.
    Verbatim(TokenRange),
    UlistStart,
    UlistEnd,
    ListItemStart,
    ListItemEnd,
    /// A non-URL inline macro; followed by [`Code::MacroTarget`] and its
    /// attribute codes.
    InlineMacro { name: Span },
    MacroTarget(Span),
    /// A URL macro; `href` covers the scheme, colon and target.
    UrlMacro { href: Span },
    UrlTargetStart,
    UrlTargetEnd,
}

impl Code {
    pub fn name(&self) -> &'static str {
        match self {
            Code::DocumentStart => "DOCUMENT_START",
            Code::DocumentEnd => "DOCUMENT_END",
            Code::HeadingStart(_) => "HEADING_START",
            Code::HeadingEnd(_) => "HEADING_END",
            Code::PreambleStart => "PREAMBLE_START",
            Code::PreambleEnd => "PREAMBLE_END",
            Code::SectionStart(_) => "SECTION_START",
            Code::SectionEnd => "SECTION_END",
            Code::ParagraphStart => "PARAGRAPH_START",
            Code::ParagraphEnd => "PARAGRAPH_END",
            Code::Tokens(_) => "TOKENS",
            Code::AttrPositional { .. } => "ATTR_POSITIONAL",
            Code::AttrNamed { .. } => "ATTR_NAMED",
            Code::ListingBlockStart => "LISTING_BLOCK_START",
            Code::ListingBlockEnd => "LISTING_BLOCK_END",
            Code::LiteralBlockStart => "LITERAL_BLOCK_START",
            Code::LiteralBlockEnd => "LITERAL_BLOCK_END",
            Code::Verbatim(_) => "VERBATIM",
            Code::UlistStart => "ULIST_START",
            Code::UlistEnd => "ULIST_END",
            Code::ListItemStart => "LIST_ITEM_START",
            Code::ListItemEnd => "LIST_ITEM_END",
            Code::InlineMacro { .. } => "INLINE_MACRO",
            Code::MacroTarget(_) => "MACRO_TARGET",
            Code::UrlMacro { .. } => "URL_MACRO",
            Code::UrlTargetStart => "URL_TARGET_START",
            Code::UrlTargetEnd => "URL_TARGET_END",
        }
    }

    /// True for codes that close a block-level construct.
    pub fn closes_block(&self) -> bool {
        matches!(
            self,
            Code::ParagraphEnd
                | Code::ListingBlockEnd
                | Code::LiteralBlockEnd
                | Code::UlistEnd
                | Code::ListItemEnd
                | Code::PreambleEnd
                | Code::SectionEnd
        )
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match *self {
            Code::HeadingStart(level) | Code::HeadingEnd(level) | Code::SectionStart(level) => {
                write!(f, "{name}({level})")
            }
            Code::Tokens(r) | Code::Verbatim(r) => write!(f, "{name}({}..{})", r.first, r.last),
            Code::AttrPositional { position, value } => {
                write!(f, "{name}({position}, {}..{})", value.first, value.last)
            }
            Code::AttrNamed { name: n, value } => write!(
                f,
                "{name}({}, {}, {}..{})",
                n.start, n.end, value.first, value.last
            ),
            Code::InlineMacro { name: s } | Code::MacroTarget(s) | Code::UrlMacro { href: s } => {
                write!(f, "{name}({}, {})", s.start, s.end)
            }
            _ => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_ranges() {
        assert_eq!(Code::Tokens(TokenRange::new(2, 5)).to_string(), "TOKENS(2..5)");
        assert_eq!(Code::SectionStart(1).to_string(), "SECTION_START(1)");
        assert_eq!(
            Code::AttrPositional {
                position: 2,
                value: TokenRange::new(4, 5)
            }
            .to_string(),
            "ATTR_POSITIONAL(2, 4..5)"
        );
        assert_eq!(Code::UlistEnd.to_string(), "ULIST_END");
    }

    #[test]
    fn empty_ranges() {
        assert!(TokenRange::new(3, 3).is_empty());
        assert_eq!(TokenRange::new(3, 7).len(), 4);
        assert_eq!(TokenRange::new(3, 7).indices().count(), 4);
    }
}
