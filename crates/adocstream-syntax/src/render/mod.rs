//! # Driver
//!
//! Walks the code stream and turns it into [`Visitor`] calls. Inline runs
//! are formatted on the fly, one [`Code::Tokens`] at a time.
//!
//! Block attribute lists are collected into an [`AttributeList`] as their
//! codes arrive and consumed by the next section heading or listing block,
//! which receive the resolved values as plain parameters:
//!
//! ```text
//! ATTR_POSITIONAL(1, "source") ATTR_POSITIONAL(2, "go") LISTING_BLOCK_START
//!   → source_code_block_start("go")
//! ```
//!
//! The list is cleared after every block-closing code. Inline macros read
//! the attribute codes that follow them into a list of their own.

mod value;
mod visitor;

use std::borrow::Cow;

use log::debug;

use crate::document::DocumentAttributes;
use crate::error::Error;
use crate::inline;
use crate::lexer::Token;
use crate::parser::{Code, TokenRange};
use crate::span::Span;
pub use value::{
    AttributeList, AttributeValue, CURVED_APOSTROPHE, FormattedText, LinkText, MacroAttributes,
};
pub use visitor::Visitor;

/// Drive `visitor` through `codes` parsed from `tokens` and `source`.
pub fn render<V: Visitor + ?Sized>(
    source: &str,
    tokens: &[Token],
    codes: &[Code],
    attributes: &DocumentAttributes,
    visitor: &mut V,
) -> Result<(), Error> {
    let mut driver = Driver {
        source,
        tokens,
        codes,
        attributes,
        visitor,
        pos: 0,
        block: AttributeList::default(),
        listing: Listing::Generic,
        literal: false,
    };
    driver.run()?;
    debug!("rendered {} codes", codes.len());
    Ok(())
}

/// Which end event the open listing block gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listing {
    Generic,
    SourceCode,
}

struct Driver<'a, 's, V: ?Sized> {
    source: &'s str,
    tokens: &'a [Token],
    codes: &'a [Code],
    attributes: &'a DocumentAttributes,
    visitor: &'a mut V,
    pos: usize,
    block: AttributeList<'s>,
    listing: Listing,
    literal: bool,
}

impl<'a, 's, V: Visitor + ?Sized> Driver<'a, 's, V> {
    fn run(&mut self) -> Result<(), Error> {
        while let Some(&code) = self.codes.get(self.pos) {
            self.pos += 1;
            self.dispatch(code)?;
            if code.closes_block() {
                self.block.clear();
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, code: Code) -> Result<(), Error> {
        match code {
            Code::DocumentStart => self.visitor.document_start(self.attributes),
            Code::DocumentEnd => self.visitor.document_end(),
            Code::HeadingStart(level) => self.visitor.heading_start(level),
            Code::HeadingEnd(level) => self.visitor.heading_end(level),
            Code::PreambleStart => self.visitor.preamble_start(),
            Code::PreambleEnd => self.visitor.preamble_end(),
            Code::SectionStart(level) => {
                let style = self.block.string_or_positional("style", 1);
                self.visitor.section_start(level, style.as_deref());
                self.block.clear();
            }
            Code::SectionEnd => self.visitor.section_end(),
            Code::ParagraphStart => self.visitor.paragraph_start(),
            Code::ParagraphEnd => self.visitor.paragraph_end(),
            Code::Tokens(range) => {
                let ops = inline::format(self.tokens, range)?;
                value::replay(self.source, &ops, self.visitor);
            }
            Code::AttrPositional { position, value } => {
                let value = self.resolve(value)?;
                self.block.insert(Cow::Owned(position.to_string()), value);
            }
            Code::AttrNamed { name, value } => {
                let value = self.resolve(value)?;
                self.block.insert(Cow::Borrowed(name.text(self.source)), value);
            }
            Code::ListingBlockStart => self.listing_block_start(),
            Code::ListingBlockEnd => {
                match self.listing {
                    Listing::Generic => self.visitor.listing_block_end(),
                    Listing::SourceCode => self.visitor.source_code_block_end(),
                }
                self.listing = Listing::Generic;
            }
            Code::LiteralBlockStart => {
                self.literal = true;
                self.visitor.literal_block_start();
            }
            Code::LiteralBlockEnd => {
                self.literal = false;
                self.visitor.literal_block_end();
            }
            Code::Verbatim(range) if self.literal => self.literal_lines(range),
            Code::Verbatim(range) => self.verbatim(range),
            Code::UlistStart => self.visitor.unordered_list_start(),
            Code::UlistEnd => self.visitor.unordered_list_end(),
            Code::ListItemStart => self.visitor.list_item_start(),
            Code::ListItemEnd => self.visitor.list_item_end(),
            Code::InlineMacro { name } => self.inline_macro(name.text(self.source))?,
            Code::UrlMacro { href } => self.link(href.text(self.source))?,
            // Consumed together with the macro that owns them.
            Code::MacroTarget(_) | Code::UrlTargetStart | Code::UrlTargetEnd => {}
        }
        Ok(())
    }

    fn resolve(&self, range: TokenRange) -> Result<AttributeValue<'s>, Error> {
        let ops = inline::format(self.tokens, range)?;
        Ok(AttributeValue::from_text(FormattedText::new(self.source, ops)))
    }

    fn listing_block_start(&mut self) {
        match self.source_language() {
            Some(language) => {
                self.listing = Listing::SourceCode;
                self.visitor.source_code_block_start(&language);
            }
            None => {
                self.listing = Listing::Generic;
                self.visitor.listing_block_start();
            }
        }
    }

    /// The language of a listing block that should be rendered as source
    /// code: `[source,lang]`, `[source]` with a `source-language` document
    /// attribute, or a bare `[,lang]` / `[language=lang]`.
    fn source_language(&self) -> Option<String> {
        if self.block.is_empty() {
            return None;
        }
        let language = self
            .block
            .string_or_positional("language", 2)
            .filter(|l| !l.is_empty());
        let style = self.block.string_or_positional("style", 1);
        match style.as_deref() {
            Some("source") => language
                .map(Cow::into_owned)
                .or_else(|| self.attributes.get("source-language").map(str::to_string)),
            None | Some("") => language.map(Cow::into_owned),
            Some(_) => None,
        }
    }

    /// Listing content: every token's source text, line feeds as events.
    fn verbatim(&mut self, range: TokenRange) {
        for token in self.tokens_in(range) {
            match token {
                Token::Lf(_) => self.visitor.line_feed(),
                token => {
                    if let Some(span) = token.source_span() {
                        let text = span.text(self.source);
                        if !text.is_empty() {
                            self.visitor.text(text);
                        }
                    }
                }
            }
        }
    }

    /// Indented lines with their common indentation removed.
    fn literal_lines(&mut self, range: TokenRange) {
        let tokens = self.tokens_in(range);
        let lines: Vec<&[Token]> = tokens.split(|t| matches!(t, Token::Lf(_))).collect();
        let indent = lines
            .iter()
            .filter_map(|line| match line.first() {
                Some(Token::LiteralIndent(span)) => Some(span.len()),
                _ => None,
            })
            .min()
            .unwrap_or(0);

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.visitor.line_feed();
            }
            let (Some(first), Some(last)) = (line.first(), line.last()) else {
                continue;
            };
            let (Some(start), Some(end)) = (first.source_span(), last.source_span()) else {
                continue;
            };
            let text = Span::new(start.start + indent, end.end).text(self.source);
            if !text.is_empty() {
                self.visitor.text(text);
            }
        }
    }

    fn tokens_in(&self, range: TokenRange) -> &'a [Token] {
        self.tokens.get(range.indices()).unwrap_or(&[])
    }

    /// A generic inline macro with its target and the attribute codes that
    /// follow it.
    fn inline_macro(&mut self, name: &str) -> Result<(), Error> {
        let target = match self.codes.get(self.pos) {
            Some(Code::MacroTarget(span)) => {
                self.pos += 1;
                span.text(self.source)
            }
            _ => "",
        };

        let mut attributes = MacroAttributes::default();
        while let Some(&code) = self.codes.get(self.pos) {
            match code {
                Code::AttrPositional { position, value } => {
                    attributes.insert(Cow::Owned(position.to_string()), self.resolve(value)?);
                }
                Code::AttrNamed { name: key, value } => {
                    attributes.insert(Cow::Borrowed(key.text(self.source)), self.resolve(value)?);
                }
                _ => break,
            }
            self.pos += 1;
        }

        self.visitor.inline_macro(name, target, &attributes);
        Ok(())
    }

    /// A URL macro. Its link text is handed over as token ranges and only
    /// formatted if the visitor renders it.
    fn link(&mut self, href: &str) -> Result<(), Error> {
        let mut text = LinkText::new(self.source, self.tokens);
        if let Some(Code::UrlTargetStart) = self.codes.get(self.pos) {
            self.pos += 1;
            while let Some(&code) = self.codes.get(self.pos) {
                self.pos += 1;
                match code {
                    Code::Tokens(range) => text.push(range),
                    Code::UrlTargetEnd => break,
                    other => {
                        return Err(Error::UnexpectedCode {
                            context: "link text",
                            found: other,
                        });
                    }
                }
            }
        }
        self.visitor.link(href, &text);
        match text.into_failure() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRecorder;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    /// Ignores link text.
    struct HrefOnly(Vec<String>);

    impl Visitor for HrefOnly {
        fn link(&mut self, href: &str, _text: &LinkText<'_>) {
            self.0.push(href.to_string());
        }
    }

    fn drive<V: Visitor>(source: &str, codes: &[Code], visitor: &mut V) -> Result<(), Error> {
        let tokens = tokenize(source);
        render(source, &tokens, codes, &DocumentAttributes::default(), visitor)
    }

    #[test]
    fn stray_code_in_link_text_is_an_error() {
        let codes = [
            Code::UrlMacro {
                href: Span::new(0, 1),
            },
            Code::UrlTargetStart,
            Code::ParagraphStart,
        ];
        let result = drive("x", &codes, &mut EventRecorder::default());
        assert_eq!(
            result,
            Err(Error::UnexpectedCode {
                context: "link text",
                found: Code::ParagraphStart,
            })
        );
    }

    #[test]
    fn link_text_is_formatted_only_when_rendered() {
        // A heading token cannot be formatted as inline text.
        let source = "= T";
        let codes = [
            Code::UrlMacro {
                href: Span::new(2, 3),
            },
            Code::UrlTargetStart,
            Code::Tokens(TokenRange::new(0, 1)),
            Code::UrlTargetEnd,
        ];

        let mut hrefs = HrefOnly(Vec::new());
        assert_eq!(drive(source, &codes, &mut hrefs), Ok(()));
        assert_eq!(hrefs.0, vec!["T".to_string()]);

        let result = drive(source, &codes, &mut EventRecorder::default());
        assert!(matches!(
            result,
            Err(Error::UnsupportedInline { index: 0, .. })
        ));
    }
}
