//! A [`Visitor`] that records what it is told.
//!
//! The recording prints as an indented trace, one event per line, and
//! serializes to JSON. Fixture tests and the CLI both use it.

use std::fmt;

use serde::Serialize;

use crate::document::DocumentAttributes;
use crate::render::{LinkText, MacroAttributes, Visitor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    DocumentStart { attributes: Vec<(String, String)> },
    DocumentEnd,
    HeadingStart { level: u32 },
    HeadingEnd { level: u32 },
    PreambleStart,
    PreambleEnd,
    SectionStart { level: u32, style: Option<String> },
    SectionEnd,
    ParagraphStart,
    ParagraphEnd,
    ListingBlockStart,
    ListingBlockEnd,
    SourceCodeBlockStart { language: String },
    SourceCodeBlockEnd,
    LiteralBlockStart,
    LiteralBlockEnd,
    UnorderedListStart,
    UnorderedListEnd,
    ListItemStart,
    ListItemEnd,
    BoldStart,
    BoldEnd,
    ItalicStart,
    ItalicEnd,
    MonospaceStart,
    MonospaceEnd,
    Text { text: String },
    LineFeed,
    Link { href: String, text: Vec<Event> },
    InlineMacro {
        name: String,
        target: String,
        attributes: Vec<(String, String)>,
    },
}

/// How an event nests: opening or closing a construct of some kind, or
/// neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open(&'static str),
    Close(&'static str),
    Leaf,
}

impl Event {
    pub fn nesting(&self) -> Nesting {
        use Nesting::{Close, Leaf, Open};
        match self {
            Event::DocumentStart { .. } => Open("document"),
            Event::DocumentEnd => Close("document"),
            Event::HeadingStart { .. } => Open("heading"),
            Event::HeadingEnd { .. } => Close("heading"),
            Event::PreambleStart => Open("preamble"),
            Event::PreambleEnd => Close("preamble"),
            Event::SectionStart { .. } => Open("section"),
            Event::SectionEnd => Close("section"),
            Event::ParagraphStart => Open("paragraph"),
            Event::ParagraphEnd => Close("paragraph"),
            Event::ListingBlockStart => Open("listing"),
            Event::ListingBlockEnd => Close("listing"),
            Event::SourceCodeBlockStart { .. } => Open("source"),
            Event::SourceCodeBlockEnd => Close("source"),
            Event::LiteralBlockStart => Open("literal"),
            Event::LiteralBlockEnd => Close("literal"),
            Event::UnorderedListStart => Open("list"),
            Event::UnorderedListEnd => Close("list"),
            Event::ListItemStart => Open("item"),
            Event::ListItemEnd => Close("item"),
            Event::BoldStart => Open("bold"),
            Event::BoldEnd => Close("bold"),
            Event::ItalicStart => Open("italic"),
            Event::ItalicEnd => Close("italic"),
            Event::MonospaceStart => Open("monospace"),
            Event::MonospaceEnd => Close("monospace"),
            Event::Text { .. } | Event::LineFeed | Event::Link { .. } | Event::InlineMacro { .. } => {
                Leaf
            }
        }
    }
}

fn write_pairs(f: &mut fmt::Formatter<'_>, pairs: &[(String, String)]) -> fmt::Result {
    for (i, (name, value)) in pairs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}={value:?}")?;
    }
    Ok(())
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::DocumentStart { attributes } if attributes.is_empty() => {
                f.write_str("documentStart")
            }
            Event::DocumentStart { attributes } => {
                f.write_str("documentStart(")?;
                write_pairs(f, attributes)?;
                f.write_str(")")
            }
            Event::DocumentEnd => f.write_str("documentEnd"),
            Event::HeadingStart { level } => write!(f, "headingStart({level})"),
            Event::HeadingEnd { level } => write!(f, "headingEnd({level})"),
            Event::PreambleStart => f.write_str("preambleStart"),
            Event::PreambleEnd => f.write_str("preambleEnd"),
            Event::SectionStart { level, style: None } => write!(f, "sectionStart({level})"),
            Event::SectionStart {
                level,
                style: Some(style),
            } => write!(f, "sectionStart({level}, {style:?})"),
            Event::SectionEnd => f.write_str("sectionEnd"),
            Event::ParagraphStart => f.write_str("paragraphStart"),
            Event::ParagraphEnd => f.write_str("paragraphEnd"),
            Event::ListingBlockStart => f.write_str("listingBlockStart"),
            Event::ListingBlockEnd => f.write_str("listingBlockEnd"),
            Event::SourceCodeBlockStart { language } => {
                write!(f, "sourceCodeBlockStart({language:?})")
            }
            Event::SourceCodeBlockEnd => f.write_str("sourceCodeBlockEnd"),
            Event::LiteralBlockStart => f.write_str("literalBlockStart"),
            Event::LiteralBlockEnd => f.write_str("literalBlockEnd"),
            Event::UnorderedListStart => f.write_str("unorderedListStart"),
            Event::UnorderedListEnd => f.write_str("unorderedListEnd"),
            Event::ListItemStart => f.write_str("listItemStart"),
            Event::ListItemEnd => f.write_str("listItemEnd"),
            Event::BoldStart => f.write_str("boldStart"),
            Event::BoldEnd => f.write_str("boldEnd"),
            Event::ItalicStart => f.write_str("italicStart"),
            Event::ItalicEnd => f.write_str("italicEnd"),
            Event::MonospaceStart => f.write_str("monospaceStart"),
            Event::MonospaceEnd => f.write_str("monospaceEnd"),
            Event::Text { text } => write!(f, "text({text:?})"),
            Event::LineFeed => f.write_str("lineFeed"),
            Event::Link { href, text } => {
                write!(f, "link({href:?}")?;
                for event in text {
                    write!(f, ", {event}")?;
                }
                f.write_str(")")
            }
            Event::InlineMacro {
                name,
                target,
                attributes,
            } => {
                write!(f, "inlineMacro({name:?}, {target:?}")?;
                if !attributes.is_empty() {
                    f.write_str(", ")?;
                    write_pairs(f, attributes)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Records every event it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventRecorder {
    events: Vec<Event>,
}

impl EventRecorder {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn push(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// One event per line, indented two spaces per open construct.
impl fmt::Display for EventRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0usize;
        for event in &self.events {
            if let Nesting::Close(_) = event.nesting() {
                depth = depth.saturating_sub(1);
            }
            writeln!(f, "{:indent$}{event}", "", indent = depth * 2)?;
            if let Nesting::Open(_) = event.nesting() {
                depth += 1;
            }
        }
        Ok(())
    }
}

impl Visitor for EventRecorder {
    fn document_start(&mut self, attributes: &DocumentAttributes) {
        let attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.push(Event::DocumentStart { attributes });
    }

    fn document_end(&mut self) {
        self.push(Event::DocumentEnd);
    }

    fn heading_start(&mut self, level: u32) {
        self.push(Event::HeadingStart { level });
    }

    fn heading_end(&mut self, level: u32) {
        self.push(Event::HeadingEnd { level });
    }

    fn preamble_start(&mut self) {
        self.push(Event::PreambleStart);
    }

    fn preamble_end(&mut self) {
        self.push(Event::PreambleEnd);
    }

    fn section_start(&mut self, level: u32, style: Option<&str>) {
        self.push(Event::SectionStart {
            level,
            style: style.map(str::to_string),
        });
    }

    fn section_end(&mut self) {
        self.push(Event::SectionEnd);
    }

    fn paragraph_start(&mut self) {
        self.push(Event::ParagraphStart);
    }

    fn paragraph_end(&mut self) {
        self.push(Event::ParagraphEnd);
    }

    fn listing_block_start(&mut self) {
        self.push(Event::ListingBlockStart);
    }

    fn listing_block_end(&mut self) {
        self.push(Event::ListingBlockEnd);
    }

    fn source_code_block_start(&mut self, language: &str) {
        self.push(Event::SourceCodeBlockStart {
            language: language.to_string(),
        });
    }

    fn source_code_block_end(&mut self) {
        self.push(Event::SourceCodeBlockEnd);
    }

    fn literal_block_start(&mut self) {
        self.push(Event::LiteralBlockStart);
    }

    fn literal_block_end(&mut self) {
        self.push(Event::LiteralBlockEnd);
    }

    fn unordered_list_start(&mut self) {
        self.push(Event::UnorderedListStart);
    }

    fn unordered_list_end(&mut self) {
        self.push(Event::UnorderedListEnd);
    }

    fn list_item_start(&mut self) {
        self.push(Event::ListItemStart);
    }

    fn list_item_end(&mut self) {
        self.push(Event::ListItemEnd);
    }

    fn bold_start(&mut self) {
        self.push(Event::BoldStart);
    }

    fn bold_end(&mut self) {
        self.push(Event::BoldEnd);
    }

    fn italic_start(&mut self) {
        self.push(Event::ItalicStart);
    }

    fn italic_end(&mut self) {
        self.push(Event::ItalicEnd);
    }

    fn monospace_start(&mut self) {
        self.push(Event::MonospaceStart);
    }

    fn monospace_end(&mut self) {
        self.push(Event::MonospaceEnd);
    }

    fn text(&mut self, text: &str) {
        self.push(Event::Text {
            text: text.to_string(),
        });
    }

    fn line_feed(&mut self) {
        self.push(Event::LineFeed);
    }

    fn link(&mut self, href: &str, text: &LinkText<'_>) {
        let mut inner = EventRecorder::default();
        text.render(&mut inner);
        self.push(Event::Link {
            href: href.to_string(),
            text: inner.events,
        });
    }

    fn inline_macro(&mut self, name: &str, target: &str, attributes: &MacroAttributes<'_>) {
        let attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_str().into_owned()))
            .collect();
        self.push(Event::InlineMacro {
            name: name.to_string(),
            target: target.to_string(),
            attributes,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trace_is_indented_by_nesting() {
        let recorder = EventRecorder {
            events: vec![
                Event::ParagraphStart,
                Event::BoldStart,
                Event::Text { text: "x".into() },
                Event::BoldEnd,
                Event::ParagraphEnd,
            ],
        };
        assert_eq!(
            recorder.to_string(),
            "paragraphStart\n  boldStart\n    text(\"x\")\n  boldEnd\nparagraphEnd\n"
        );
    }

    #[test]
    fn link_shows_its_text() {
        let event = Event::Link {
            href: "https://e.f".into(),
            text: vec![Event::Text { text: "g".into() }],
        };
        assert_eq!(event.to_string(), r#"link("https://e.f", text("g"))"#);
    }

    #[test]
    fn json_is_tagged_by_event() {
        let json = serde_json::to_string(&Event::HeadingStart { level: 2 }).unwrap();
        assert_eq!(json, r#"{"event":"heading_start","level":2}"#);
    }
}
