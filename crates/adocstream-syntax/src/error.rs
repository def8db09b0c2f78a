use thiserror::Error;

use crate::lexer::Token;
use crate::parser::Code;

/// Everything that can go wrong while compiling a document.
///
/// The tokenizer never fails; inputs outside the supported subset become
/// text. The parser and the inline formatter report the construct they
/// could not handle together with its position in the token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unexpected {found} in {production} at token {index}")]
    UnexpectedToken {
        production: &'static str,
        found: Token,
        index: usize,
    },

    #[error(
        "listing block opened with {open} dashes at offset {open_offset} \
         is closed with {close} dashes at offset {close_offset}"
    )]
    ListingDelimiterMismatch {
        open: u32,
        close: u32,
        open_offset: usize,
        close_offset: usize,
    },

    #[error("unsupported {found} in inline text at token {index}")]
    UnsupportedInline { found: Token, index: usize },

    /// A code out of sequence, e.g. link text codes without their macro.
    #[error("unexpected {found} in {context}")]
    UnexpectedCode { context: &'static str, found: Code },
}

impl Error {
    /// Byte offset into the source the error points at, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::UnexpectedToken { found, .. } | Error::UnsupportedInline { found, .. } => {
                found.offset()
            }
            Error::ListingDelimiterMismatch { close_offset, .. } => Some(*close_offset),
            Error::UnexpectedCode { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn messages_name_the_offending_token() {
        let err = Error::UnexpectedToken {
            production: "block",
            found: Token::AttrName(Span::new(3, 7)),
            index: 4,
        };
        assert_eq!(err.to_string(), "unexpected ATTR_NAME(3, 7) in block at token 4");
        assert_eq!(err.offset(), Some(3));
    }

    #[test]
    fn mismatch_points_at_closing_fence() {
        let err = Error::ListingDelimiterMismatch {
            open: 4,
            close: 5,
            open_offset: 0,
            close_offset: 10,
        };
        assert_eq!(err.offset(), Some(10));
        assert!(err.to_string().contains("closed with 5 dashes"));
    }
}
