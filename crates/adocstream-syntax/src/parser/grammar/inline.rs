//! Inline runs, inline macros and attribute lists.

use crate::error::Error;
use crate::lexer::Token;
use crate::parser::{Code, Parser, TokenRange};

/// Emit `Tokens` codes for everything up to the point where `stop` holds,
/// splitting the run around inline macros.
pub(super) fn inline_run(
    p: &mut Parser<'_>,
    stop: impl Fn(&Parser<'_>) -> bool,
) -> Result<(), Error> {
    let mut first = p.pos;
    while !stop(p) && !p.at_end() {
        if let Token::InlineMacro(_) = p.current() {
            p.emit_tokens(first, p.pos);
            inline_macro(p)?;
            first = p.pos;
        } else {
            p.bump();
        }
    }
    p.emit_tokens(first, p.pos);
    Ok(())
}

/// `name:target[attributes]`. Names listed as URL schemes become links
/// whose attribute list is the link text.
fn inline_macro(p: &mut Parser<'_>) -> Result<(), Error> {
    let Token::InlineMacro(name) = p.current() else {
        return Err(p.unexpected("inline macro"));
    };
    p.bump();
    let Token::Blob(target) = p.current() else {
        return Err(p.unexpected("inline macro target"));
    };
    p.bump();

    if p.options.is_url_scheme(p.text(name)) {
        p.emit(Code::UrlMacro {
            href: crate::span::Span::new(name.start, target.end),
        });
        link_text(p)
    } else {
        p.emit(Code::InlineMacro { name });
        p.emit(Code::MacroTarget(target));
        attribute_list(p)
    }
}

/// `[a, b=c, "d"]`. Positional entries are numbered from 1 by the
/// separators before them, so named entries take up a position too.
pub(super) fn attribute_list(p: &mut Parser<'_>) -> Result<(), Error> {
    if !matches!(p.current(), Token::AttrListStart(_)) {
        return Err(p.unexpected("attribute list"));
    }
    p.bump();

    let mut position = 1;
    loop {
        match p.current() {
            Token::AttrListEnd(_) => {
                p.bump();
                return Ok(());
            }
            Token::Separator(_) => {
                position += 1;
                p.bump();
            }
            Token::AttrName(name) => {
                p.bump();
                let value = attribute_value(p)?;
                p.emit(Code::AttrNamed { name, value });
            }
            Token::AttrValueStart => {
                let value = attribute_value(p)?;
                p.emit(Code::AttrPositional { position, value });
            }
            _ => return Err(p.unexpected("attribute list")),
        }
    }
}

/// The tokens between `ATTR_VALUE_START` and `ATTR_VALUE_END`.
fn attribute_value(p: &mut Parser<'_>) -> Result<TokenRange, Error> {
    if p.current() != Token::AttrValueStart {
        return Err(p.unexpected("attribute value"));
    }
    p.bump();
    let first = p.pos;
    loop {
        match p.current() {
            Token::AttrValueEnd => break,
            Token::Eof | Token::AttrListEnd(_) => return Err(p.unexpected("attribute value")),
            _ => p.bump(),
        }
    }
    let range = TokenRange::new(first, p.pos);
    p.bump();
    Ok(range)
}

/// The attribute list of a URL macro, read as link text: positional
/// fragments joined by their separators. Named entries are skipped.
fn link_text(p: &mut Parser<'_>) -> Result<(), Error> {
    if !matches!(p.current(), Token::AttrListStart(_)) {
        return Err(p.unexpected("link text"));
    }
    p.bump();
    p.emit(Code::UrlTargetStart);

    let mut fragments = 0;
    loop {
        match p.current() {
            Token::AttrListEnd(_) => {
                p.bump();
                break;
            }
            Token::Separator(_) => {
                if fragments > 0 && p.nth(1) == Token::AttrValueStart {
                    p.emit_tokens(p.pos, p.pos + 1);
                }
                p.bump();
            }
            Token::AttrName(_) => {
                p.bump();
                attribute_value(p)?;
            }
            Token::AttrValueStart => {
                let value = attribute_value(p)?;
                p.emit(Code::Tokens(value));
                fragments += 1;
            }
            _ => return Err(p.unexpected("link text")),
        }
    }

    p.emit(Code::UrlTargetEnd);
    Ok(())
}
