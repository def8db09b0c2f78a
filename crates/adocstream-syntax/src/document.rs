//! Parsed documents and the two entry points.
//!
//! [`Document::parse`] keeps the token and code streams so a document can
//! be rendered any number of times. [`process`] parses and renders in one
//! go without keeping anything but the header attributes.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::error::Error;
use crate::lexer::{TokenStream, tokenize};
use crate::options::ParseOptions;
use crate::parser::{Code, parse_tokens};
use crate::render::{Visitor, render};

/// The `:name: value` entries of the document header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DocumentAttributes {
    entries: BTreeMap<String, String>,
}

impl DocumentAttributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// The value of `name`, or `default` when the header does not set it.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, name: &str, value: String) {
        self.entries.insert(name.to_string(), value);
    }
}

/// A parsed document.
///
/// Rendering borrows the document immutably, so the same document can be
/// processed against several visitors, one after the other, and each sees
/// the same events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
    tokens: TokenStream,
    codes: Vec<Code>,
    attributes: DocumentAttributes,
}

impl Document {
    pub fn parse(source: impl Into<String>) -> Result<Self, Error> {
        Self::parse_with(source, &ParseOptions::default())
    }

    pub fn parse_with(source: impl Into<String>, options: &ParseOptions) -> Result<Self, Error> {
        let source = source.into();
        let tokens = tokenize(&source);
        let (codes, attributes) = parse_tokens(&source, &tokens, options)?;
        Ok(Self {
            source,
            tokens,
            codes,
            attributes,
        })
    }

    /// Push the document's events into `visitor`.
    pub fn process<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), Error> {
        render(
            &self.source,
            &self.tokens,
            &self.codes,
            &self.attributes,
            visitor,
        )
    }

    pub fn attributes(&self) -> &DocumentAttributes {
        &self.attributes
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Parse `source` and push its events into `visitor` in one pass.
///
/// ```
/// use adocstream_syntax::{EventRecorder, process};
///
/// let mut recorder = EventRecorder::default();
/// process("Hello *world*", &mut recorder).unwrap();
/// assert_eq!(recorder.to_string().lines().count(), 8);
/// ```
pub fn process<V: Visitor + ?Sized>(
    source: &str,
    visitor: &mut V,
) -> Result<DocumentAttributes, Error> {
    process_with(source, &ParseOptions::default(), visitor)
}

pub fn process_with<V: Visitor + ?Sized>(
    source: &str,
    options: &ParseOptions,
    visitor: &mut V,
) -> Result<DocumentAttributes, Error> {
    let tokens = tokenize(source);
    let (codes, attributes) = parse_tokens(source, &tokens, options)?;
    render(source, &tokens, &codes, &attributes, visitor)?;
    debug!("processed {} bytes in one pass", source.len());
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventRecorder};
    use pretty_assertions::assert_eq;

    #[test]
    fn attributes_lookup_with_default() {
        let doc = Document::parse("= T\n:toc: left\n").unwrap();
        assert_eq!(doc.attributes().get_or("toc", "auto"), "left");
        assert_eq!(doc.attributes().get_or("icons", "none"), "none");
        assert!(doc.attributes().contains("toc"));
    }

    #[test]
    fn processing_twice_yields_same_events() {
        let doc = Document::parse("= T\n\n== S\n\n* a *b*\n").unwrap();
        let mut first = EventRecorder::default();
        let mut second = EventRecorder::default();
        doc.process(&mut first).unwrap();
        doc.process(&mut second).unwrap();
        assert_eq!(first, second);
        assert!(!first.events().is_empty());
    }

    #[test]
    fn one_pass_matches_parsed_document() {
        let source = "Intro\n\n[source,rust]\n----\nfn main() {}\n----\n";
        let mut one_pass = EventRecorder::default();
        process(source, &mut one_pass).unwrap();
        let mut parsed = EventRecorder::default();
        Document::parse(source).unwrap().process(&mut parsed).unwrap();
        assert_eq!(one_pass, parsed);
    }

    #[test]
    fn header_attributes_are_returned_from_one_pass() {
        let mut recorder = EventRecorder::default();
        let attributes = process("= T\n:a: b\n", &mut recorder).unwrap();
        assert_eq!(attributes.get("a"), Some("b"));
        assert_eq!(
            recorder.events().first(),
            Some(&Event::DocumentStart {
                attributes: vec![("a".to_string(), "b".to_string())]
            })
        );
    }

    #[test]
    fn custom_url_schemes() {
        let options = ParseOptions::default().with_url_schemes(["gopher"]);
        let doc = Document::parse_with("gopher://h[x] https://e[y]", &options).unwrap();
        let mut recorder = EventRecorder::default();
        doc.process(&mut recorder).unwrap();
        let links = recorder
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Link { .. }))
            .count();
        let macros = recorder
            .events()
            .iter()
            .filter(|e| matches!(e, Event::InlineMacro { .. }))
            .count();
        assert_eq!((links, macros), (1, 1));
    }

    #[test]
    fn parse_errors_surface() {
        let err = Document::parse("----\na\n------\n").unwrap_err();
        assert!(matches!(err, Error::ListingDelimiterMismatch { open: 4, close: 6, .. }));
    }
}
