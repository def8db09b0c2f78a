//! # Grammar Rules
//!
//! Each function takes a `&mut Parser`, consumes the tokens of one
//! production and emits its codes. Unlike the tokenizer, the grammar can
//! fail: a token that no production accepts becomes an [`Error`].
//!
//! ## Module Structure
//!
//! - `mod.rs` - document outline: header, preamble, sections
//! - `block` - paragraphs, listing and literal blocks, lists
//! - `inline` - inline runs, macros and attribute lists
//!
//! ## Document shape
//!
//! ```text
//! document := header? preamble? section*
//! header   := HEADING(1) text LF? (DOCATTR value LF?)*
//! preamble := block*                 (wrapped only if a section follows)
//! section  := attr_list? HEADING(n) text block*
//! ```

mod block;
mod inline;

use log::trace;

use crate::error::Error;
use crate::lexer::Token;
use crate::parser::{Code, Parser};

pub(crate) fn document(p: &mut Parser<'_>) -> Result<(), Error> {
    p.emit(Code::DocumentStart);
    header(p)?;
    preamble(p)?;
    sections(p)?;
    p.emit(Code::DocumentEnd);
    Ok(())
}

/// The document title and the attribute entries directly under it.
fn header(p: &mut Parser<'_>) -> Result<(), Error> {
    if !matches!(p.current(), Token::Heading { level: 1, .. }) {
        return Ok(());
    }
    heading(p, 1)?;

    while let Token::DocAttr(name) = p.current() {
        p.bump();
        let mut value = String::new();
        while let Token::Blob(span) = p.current() {
            value.push_str(p.text(span));
            p.bump();
        }
        p.eat_lf();
        let name = p.text(name);
        trace!("document attribute {name}={value}");
        p.attributes.insert(name, value);
    }
    Ok(())
}

fn preamble(p: &mut Parser<'_>) -> Result<(), Error> {
    p.skip_lfs();
    if p.at_end()
        || matches!(p.current(), Token::Heading { .. })
        || p.heading_after_attr_list().is_some()
    {
        return Ok(());
    }

    let sections_follow = p
        .tokens
        .get(p.pos..)
        .is_some_and(|rest| rest.iter().any(|t| matches!(t, Token::Heading { .. })));
    if sections_follow {
        p.emit(Code::PreambleStart);
    }
    block::blocks(p)?;
    if sections_follow {
        p.emit(Code::PreambleEnd);
    }
    Ok(())
}

fn sections(p: &mut Parser<'_>) -> Result<(), Error> {
    loop {
        p.skip_lfs();
        if p.at_end() {
            break;
        }
        section(p)?;
    }
    while p.sections.pop().is_some() {
        p.emit(Code::SectionEnd);
    }
    Ok(())
}

/// One section heading, optionally preceded by its attribute list line, and
/// the blocks up to the next heading.
fn section(p: &mut Parser<'_>) -> Result<(), Error> {
    let level = match p.current() {
        Token::Heading { level, .. } => level,
        Token::AttrListStart(_) => match p.heading_after_attr_list() {
            Some(level) => level,
            None => return Err(p.unexpected("section")),
        },
        _ => return Err(p.unexpected("section")),
    };
    let depth = level.saturating_sub(1);

    while p.sections.last().is_some_and(|&open| open >= depth) {
        p.sections.pop();
        p.emit(Code::SectionEnd);
    }
    if matches!(p.current(), Token::AttrListStart(_)) {
        inline::attribute_list(p)?;
        p.eat_lf();
    }

    p.sections.push(depth);
    p.emit(Code::SectionStart(depth));
    heading(p, level)?;
    block::blocks(p)
}

/// A heading marker followed by its text up to the end of the line.
fn heading(p: &mut Parser<'_>, level: u32) -> Result<(), Error> {
    p.bump();
    p.emit(Code::HeadingStart(level));
    inline::inline_run(p, |p| matches!(p.current(), Token::Lf(_) | Token::Eof))?;
    p.emit(Code::HeadingEnd(level));
    p.eat_lf();
    Ok(())
}
