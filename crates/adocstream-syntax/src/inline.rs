//! # Inline Formatter
//!
//! The third pass, run lazily by the driver for every [`Code::Tokens`]
//! range. It pairs the emphasis delimiters the tokenizer found and turns the
//! run into [`TextOp`]s:
//!
//! ```text
//! BLOB("a ") BOLD_START BLOB("b") BOLD_END
//!   → Regular("a ") BoldStart Regular("b") BoldEnd
//! ```
//!
//! Open emphasis is tracked on a stack. A closing delimiter only closes the
//! innermost open emphasis of the same kind; anything else is text. Starts
//! still open when the run ends are demoted after the fact to the single
//! delimiter character they came from, and adjacent text is merged, so
//! `*a` yields one `Regular("*a")`.
//!
//! [`Code::Tokens`]: crate::parser::Code::Tokens

use log::warn;

use crate::error::Error;
use crate::lexer::Token;
use crate::parser::TokenRange;
use crate::span::Span;

/// One formatted inline operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    /// Literal source text.
    Regular(Span),
    BoldStart,
    BoldEnd,
    ItalicStart,
    ItalicEnd,
    MonospaceStart,
    MonospaceEnd,
    /// A typographic apostrophe replacing `'`.
    CurvedApostrophe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Bold,
    Italic,
    Monospace,
}

impl Emphasis {
    fn start(self) -> TextOp {
        match self {
            Emphasis::Bold => TextOp::BoldStart,
            Emphasis::Italic => TextOp::ItalicStart,
            Emphasis::Monospace => TextOp::MonospaceStart,
        }
    }

    fn end(self) -> TextOp {
        match self {
            Emphasis::Bold => TextOp::BoldEnd,
            Emphasis::Italic => TextOp::ItalicEnd,
            Emphasis::Monospace => TextOp::MonospaceEnd,
        }
    }
}

/// An emphasis start still waiting for its end.
#[derive(Debug)]
struct Open {
    kind: Emphasis,
    /// Index of the start op in the output.
    op: usize,
    /// Source offset of the delimiter.
    delimiter: usize,
}

/// Format the tokens in `range` into a fresh op list.
pub fn format(tokens: &[Token], range: TokenRange) -> Result<Vec<TextOp>, Error> {
    let mut ops = Vec::new();
    format_into(tokens, range, &mut ops)?;
    Ok(ops)
}

/// Format the tokens in `range` and append the result to `ops`, merging
/// text across the seam.
pub fn format_into(tokens: &[Token], range: TokenRange, ops: &mut Vec<TextOp>) -> Result<(), Error> {
    let base = ops.len();
    let mut open: Vec<Open> = Vec::new();

    for index in range.indices() {
        let token = tokens.get(index).copied().unwrap_or(Token::Eof);
        match token {
            Token::Blob(span)
            | Token::DQuote(span)
            | Token::Separator(span)
            | Token::LiteralIndent(span) => push_regular(ops, span),
            Token::Lf(at) => push_regular(ops, Span::new(at, at + 1)),
            Token::Apostrophe(_) => ops.push(TextOp::CurvedApostrophe),
            Token::AttrValueStart | Token::AttrValueEnd => {}
            Token::BoldStart(at) => start(ops, &mut open, Emphasis::Bold, at),
            Token::ItalicStart(at) => start(ops, &mut open, Emphasis::Italic, at),
            Token::MonoStart(at) => start(ops, &mut open, Emphasis::Monospace, at),
            Token::BoldEnd(at) => end(ops, &mut open, Emphasis::Bold, at),
            Token::ItalicEnd(at) => end(ops, &mut open, Emphasis::Italic, at),
            Token::MonoEnd(at) => end(ops, &mut open, Emphasis::Monospace, at),
            found => return Err(Error::UnsupportedInline { found, index }),
        }
    }

    for unterminated in open {
        warn!(
            "unterminated {:?} at offset {} kept as text",
            unterminated.kind, unterminated.delimiter
        );
        if let Some(op) = ops.get_mut(unterminated.op) {
            *op = TextOp::Regular(Span::new(
                unterminated.delimiter,
                unterminated.delimiter + 1,
            ));
        }
    }
    coalesce(ops, base.saturating_sub(1));
    Ok(())
}

fn start(ops: &mut Vec<TextOp>, open: &mut Vec<Open>, kind: Emphasis, delimiter: usize) {
    open.push(Open {
        kind,
        op: ops.len(),
        delimiter,
    });
    ops.push(kind.start());
}

fn end(ops: &mut Vec<TextOp>, open: &mut Vec<Open>, kind: Emphasis, delimiter: usize) {
    if open.last().is_some_and(|o| o.kind == kind) {
        open.pop();
        ops.push(kind.end());
    } else {
        push_regular(ops, Span::new(delimiter, delimiter + 1));
    }
}

fn push_regular(ops: &mut Vec<TextOp>, span: Span) {
    if !span.is_empty() {
        ops.push(TextOp::Regular(span));
    }
}

/// Merge runs of contiguous `Regular` spans from `from` onwards.
fn coalesce(ops: &mut Vec<TextOp>, from: usize) {
    if ops.len() <= from {
        return;
    }
    let mut merged: Vec<TextOp> = Vec::with_capacity(ops.len() - from);
    for op in ops.drain(from..) {
        match (merged.last_mut(), op) {
            (Some(TextOp::Regular(prev)), TextOp::Regular(next)) if prev.end == next.start => {
                prev.end = next.end;
            }
            _ => merged.push(op),
        }
    }
    ops.extend(merged);
}
