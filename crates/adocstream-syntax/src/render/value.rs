//! Resolved attribute values and formatted text handed to visitors.

use std::borrow::Cow;
use std::cell::OnceCell;

use super::Visitor;
use crate::error::Error;
use crate::inline::{self, TextOp};
use crate::lexer::Token;
use crate::parser::TokenRange;

/// The typographic apostrophe substituted for `'` between word characters.
pub const CURVED_APOSTROPHE: &str = "\u{2019}";

/// Inline text that has been formatted but not yet replayed.
///
/// Borrowed spans point into the document source, so replaying is cheap
/// and can happen any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedText<'s> {
    source: &'s str,
    ops: Vec<TextOp>,
}

impl<'s> FormattedText<'s> {
    pub fn new(source: &'s str, ops: Vec<TextOp>) -> Self {
        Self { source, ops }
    }

    pub fn ops(&self) -> &[TextOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replay the text into `visitor` as text and emphasis events.
    pub fn render<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        replay(self.source, &self.ops, visitor);
    }

    /// The text with emphasis markers dropped.
    pub fn to_plain_string(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            match op {
                TextOp::Regular(span) => out.push_str(span.text(self.source)),
                TextOp::CurvedApostrophe => out.push_str(CURVED_APOSTROPHE),
                _ => {}
            }
        }
        out
    }

    /// The text as a single borrowed span, if it is exactly one plain run.
    fn as_single_span(&self) -> Option<&'s str> {
        match self.ops.as_slice() {
            [TextOp::Regular(span)] => Some(span.text(self.source)),
            _ => None,
        }
    }
}

/// Link text of a URL macro, kept as token ranges until a visitor asks for
/// it.
///
/// A formatting failure during [`LinkText::render`] replays nothing. It is
/// remembered and the driver reports it once the visitor returns.
#[derive(Debug)]
pub struct LinkText<'a> {
    source: &'a str,
    tokens: &'a [Token],
    ranges: Vec<TokenRange>,
    failure: OnceCell<Error>,
}

impl<'a> LinkText<'a> {
    pub(crate) fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            ranges: Vec::new(),
            failure: OnceCell::new(),
        }
    }

    pub(crate) fn push(&mut self, range: TokenRange) {
        self.ranges.push(range);
    }

    /// True for `https://host[]`.
    pub fn is_empty(&self) -> bool {
        self.ranges.iter().all(|range| range.is_empty())
    }

    /// Format the text without replaying it.
    pub fn format(&self) -> Result<FormattedText<'a>, Error> {
        let mut ops = Vec::new();
        for &range in &self.ranges {
            inline::format_into(self.tokens, range, &mut ops)?;
        }
        Ok(FormattedText::new(self.source, ops))
    }

    /// Replay the text into `visitor` as text and emphasis events.
    pub fn render<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self.format() {
            Ok(text) => text.render(visitor),
            Err(error) => {
                let _ = self.failure.set(error);
            }
        }
    }

    pub(crate) fn into_failure(self) -> Option<Error> {
        self.failure.into_inner()
    }
}

pub(crate) fn replay<V: Visitor + ?Sized>(source: &str, ops: &[TextOp], visitor: &mut V) {
    for op in ops {
        match *op {
            TextOp::Regular(span) => visitor.text(span.text(source)),
            TextOp::BoldStart => visitor.bold_start(),
            TextOp::BoldEnd => visitor.bold_end(),
            TextOp::ItalicStart => visitor.italic_start(),
            TextOp::ItalicEnd => visitor.italic_end(),
            TextOp::MonospaceStart => visitor.monospace_start(),
            TextOp::MonospaceEnd => visitor.monospace_end(),
            TextOp::CurvedApostrophe => visitor.text(CURVED_APOSTROPHE),
        }
    }
}

/// The value of one attribute list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue<'s> {
    /// `name=` with nothing after it.
    Empty,
    /// A value that is one plain run of text.
    String(&'s str),
    /// A value with inline formatting, such as `` role=`mono` ``.
    Formatted(FormattedText<'s>),
}

impl<'s> AttributeValue<'s> {
    /// Collapse formatted text to a plain string when it has no formatting.
    pub fn from_text(text: FormattedText<'s>) -> Self {
        if text.is_empty() {
            AttributeValue::Empty
        } else if let Some(s) = text.as_single_span() {
            AttributeValue::String(s)
        } else {
            AttributeValue::Formatted(text)
        }
    }

    pub fn as_str(&self) -> Cow<'s, str> {
        match self {
            AttributeValue::Empty => Cow::Borrowed(""),
            AttributeValue::String(s) => Cow::Borrowed(s),
            AttributeValue::Formatted(text) => Cow::Owned(text.to_plain_string()),
        }
    }

    pub fn render<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            AttributeValue::Empty => {}
            AttributeValue::String(s) => visitor.text(s),
            AttributeValue::Formatted(text) => text.render(visitor),
        }
    }
}

/// The entries of one attribute list, by name.
///
/// Positional entries are stored under their position, `"1"`, `"2"` and
/// so on. A later entry replaces an earlier one of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList<'s> {
    entries: Vec<(Cow<'s, str>, AttributeValue<'s>)>,
}

/// The attributes of an inline macro.
pub type MacroAttributes<'s> = AttributeList<'s>;

impl<'s> AttributeList<'s> {
    pub fn get(&self, name: &str) -> Option<&AttributeValue<'s>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// The named entry as plain text.
    pub fn string(&self, name: &str) -> Option<Cow<'s, str>> {
        self.get(name).map(AttributeValue::as_str)
    }

    /// The entry named `name`, falling back to the positional entry at
    /// `position`.
    pub fn string_or_positional(&self, name: &str, position: u32) -> Option<Cow<'s, str>> {
        self.string(name)
            .or_else(|| self.string(&position.to_string()))
    }

    /// Replay the named entry into `visitor`. Returns false if there is no
    /// such entry.
    pub fn render<V: Visitor + ?Sized>(&self, name: &str, visitor: &mut V) -> bool {
        match self.get(name) {
            Some(value) => {
                value.render(visitor);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue<'s>)> {
        self.entries.iter().map(|(n, v)| (n.as_ref(), v))
    }

    pub(crate) fn insert(&mut self, name: Cow<'s, str>, value: AttributeValue<'s>) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
