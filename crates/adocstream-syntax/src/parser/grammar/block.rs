//! Block-level productions.

use super::inline;
use crate::error::Error;
use crate::lexer::Token;
use crate::parser::{Code, ListMarker, Parser, TokenRange};

/// Blocks up to the next section heading or the end of input.
pub(super) fn blocks(p: &mut Parser<'_>) -> Result<(), Error> {
    loop {
        match p.current() {
            Token::Eof => return Ok(()),
            Token::Lf(_) => p.bump(),
            Token::Heading { .. } => return Ok(()),
            Token::AttrListStart(_) => {
                if p.heading_after_attr_list().is_some() {
                    return Ok(());
                }
                inline::attribute_list(p)?;
                p.eat_lf();
            }
            Token::ListingBlockDelim { .. } => listing_block(p)?,
            Token::LiteralIndent(_) => literal_block(p)?,
            Token::UlistAsterisk { .. } | Token::UlistHyphen(_) => unordered_list(p)?,
            Token::Blob(_)
            | Token::BoldStart(_)
            | Token::BoldEnd(_)
            | Token::ItalicStart(_)
            | Token::ItalicEnd(_)
            | Token::MonoStart(_)
            | Token::MonoEnd(_)
            | Token::Apostrophe(_)
            | Token::InlineMacro(_) => paragraph(p)?,
            _ => return Err(p.unexpected("block")),
        }
    }
}

/// Tokens that begin a new block when they start a line.
///
/// An indented line is not among them: inside a paragraph or list item it
/// continues the text, and only opens a literal block after a blank line.
fn starts_block(token: Token) -> bool {
    matches!(
        token,
        Token::Heading { .. }
            | Token::AttrListStart(_)
            | Token::ListingBlockDelim { .. }
            | Token::UlistAsterisk { .. }
            | Token::UlistHyphen(_)
            | Token::DocAttr(_)
    )
}

/// Where paragraph-like text ends: a blank line, the end of input, or a
/// line that starts another block.
fn at_text_end(p: &Parser<'_>) -> bool {
    match p.current() {
        Token::Eof => true,
        Token::Lf(_) => match p.nth(1) {
            Token::Lf(_) | Token::Eof => true,
            next => starts_block(next),
        },
        _ => false,
    }
}

fn paragraph(p: &mut Parser<'_>) -> Result<(), Error> {
    p.emit(Code::ParagraphStart);
    inline::inline_run(p, at_text_end)?;
    p.emit(Code::ParagraphEnd);
    Ok(())
}

/// A fenced block; its body is kept verbatim. An unclosed fence runs to the
/// end of input.
fn listing_block(p: &mut Parser<'_>) -> Result<(), Error> {
    let Token::ListingBlockDelim { count: open, marker } = p.current() else {
        return Err(p.unexpected("listing block"));
    };
    p.bump();
    p.eat_lf();
    p.emit(Code::ListingBlockStart);

    let first = p.pos;
    loop {
        match p.current() {
            Token::ListingBlockDelim { count, marker: close } => {
                if count != open {
                    return Err(Error::ListingDelimiterMismatch {
                        open,
                        close: count,
                        open_offset: marker.start,
                        close_offset: close.start,
                    });
                }
                p.emit(Code::Verbatim(TokenRange::new(first, p.pos)));
                p.bump();
                p.eat_lf();
                break;
            }
            Token::Eof => {
                p.emit(Code::Verbatim(TokenRange::new(first, p.pos)));
                break;
            }
            _ => p.bump(),
        }
    }

    p.emit(Code::ListingBlockEnd);
    Ok(())
}

/// Consecutive indented lines.
fn literal_block(p: &mut Parser<'_>) -> Result<(), Error> {
    p.emit(Code::LiteralBlockStart);
    let first = p.pos;
    loop {
        while !matches!(p.current(), Token::Lf(_) | Token::Eof) {
            p.bump();
        }
        if matches!(p.current(), Token::Lf(_)) && matches!(p.nth(1), Token::LiteralIndent(_)) {
            p.bump();
        } else {
            break;
        }
    }
    p.emit(Code::Verbatim(TokenRange::new(first, p.pos)));
    p.emit(Code::LiteralBlockEnd);
    Ok(())
}

fn unordered_list(p: &mut Parser<'_>) -> Result<(), Error> {
    let Some(marker) = ListMarker::of(p.current()) else {
        return Err(p.unexpected("list"));
    };
    p.lists.push(marker);
    p.emit(Code::UlistStart);

    loop {
        list_item(p)?;
        match ListMarker::of(p.after_lfs()) {
            Some(next) if marker.same_list(next) => p.skip_lfs(),
            _ => break,
        }
    }

    p.emit(Code::UlistEnd);
    p.lists.pop();
    Ok(())
}

fn list_item(p: &mut Parser<'_>) -> Result<(), Error> {
    p.bump();
    p.emit(Code::ListItemStart);
    inline::inline_run(p, at_text_end)?;

    while let Some(next) = ListMarker::of(p.after_lfs()) {
        if !nests_in_current_item(p, next) {
            break;
        }
        p.skip_lfs();
        unordered_list(p)?;
    }

    p.emit(Code::ListItemEnd);
    Ok(())
}

/// A marker nests under the current item unless it belongs to a list that
/// is already open.
fn nests_in_current_item(p: &Parser<'_>, next: ListMarker) -> bool {
    let Some(&current) = p.lists.last() else {
        return false;
    };
    !p.lists.contains(&next) && current.should_nest(next)
}
