//! # adocstream-syntax
//!
//! A streaming compiler for a practical subset of AsciiDoc. Source text goes
//! in, and a sequence of document events comes out, pushed into a
//! caller-supplied [`Visitor`]. Rendering to any particular output format is
//! the visitor's business.
//!
//! ## Architecture Overview
//!
//! Three passes, each producing a typed stream for the next:
//!
//! ```text
//! Source Text → Tokenizer → Tokens → Parser → Codes → Driver → Visitor
//!               (FSM)                (descent)         (+ inline formatter)
//! ```
//!
//! ### 1. Tokenizer ([`lexer`] module)
//!
//! A character-level state machine. It recognises headings, list markers,
//! fences, attribute lists, macros and emphasis delimiters, and never fails:
//! anything it cannot place is text. Inline macros and attribute lists are
//! tentative until their closing `]`, and roll back to text otherwise.
//!
//! ```text
//! "* a _b_\n" → [ULIST_ASTERISK(1), BLOB("a "), ITALIC_START, BLOB("b"), ITALIC_END, LF, EOF]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! Recursive descent over the tokens, emitting a flat [`Code`] stream with
//! balanced start/end pairs. Inline content is kept as token ranges.
//!
//! ```text
//! → [DOCUMENT_START, ULIST_START, LIST_ITEM_START, TOKENS(1..5),
//!    LIST_ITEM_END, ULIST_END, DOCUMENT_END]
//! ```
//!
//! ### 3. Driver ([`render`] module)
//!
//! Replays codes as visitor calls. Each `TOKENS` range goes through the
//! [inline formatter](inline), which pairs emphasis delimiters and demotes
//! the ones that never close back to text.
//!
//! ## Module Structure
//!
//! ```text
//! adocstream-syntax/
//! ├── lib.rs          # This file - public API and scenario tests
//! ├── span.rs         # Byte ranges into the source
//! ├── error.rs        # Error
//! ├── options.rs      # ParseOptions (URL schemes)
//! ├── lexer/          # Tokenizer state machine, Token, TokenStream
//! ├── parser/
//! │   ├── mod.rs      # Parser state, parse_tokens()
//! │   ├── code.rs     # Code, TokenRange
//! │   └── grammar/    # Document outline, blocks, inline macros
//! ├── inline.rs       # Inline formatter, TextOp
//! ├── render/         # Driver, Visitor, attribute values
//! ├── document.rs     # Document, process(), DocumentAttributes
//! └── events.rs       # EventRecorder visitor
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use adocstream_syntax::{Document, Visitor};
//!
//! #[derive(Default)]
//! struct Html(String);
//!
//! impl Visitor for Html {
//!     fn paragraph_start(&mut self) { self.0.push_str("<p>"); }
//!     fn paragraph_end(&mut self) { self.0.push_str("</p>"); }
//!     fn bold_start(&mut self) { self.0.push_str("<b>"); }
//!     fn bold_end(&mut self) { self.0.push_str("</b>"); }
//!     fn text(&mut self, text: &str) { self.0.push_str(text); }
//! }
//!
//! let doc = Document::parse("Hello *world*.").unwrap();
//! let mut html = Html::default();
//! doc.process(&mut html).unwrap();
//! assert_eq!(html.0, "<p>Hello <b>world</b>.</p>");
//! ```
//!
//! ## Supported subset
//!
//! - document title `= Title` with `:name: value` lines under it
//! - section headings `==` to `======`
//! - paragraphs, literal (indented) paragraphs
//! - unordered lists with `*`, `**`, ... and `-` markers
//! - listing blocks fenced by four or more `-`, optionally `[source,lang]`
//! - constrained `*bold*`, `_italic_` and `` `monospace` ``
//! - block and inline attribute lists
//! - inline macros `name:target[attrs]` and URL macros `https://host[text]`

pub mod document;
pub mod error;
pub mod events;
pub mod inline;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod render;
pub mod span;

pub use document::{Document, DocumentAttributes, process, process_with};
pub use error::Error;
pub use events::{Event, EventRecorder};
pub use inline::TextOp;
pub use lexer::{Token, TokenStream, tokenize};
pub use options::ParseOptions;
pub use parser::{Code, TokenRange, parse_tokens};
pub use render::{AttributeValue, LinkText, MacroAttributes, Visitor};
pub use span::Span;

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn trace(source: &str) -> Vec<String> {
        let mut recorder = EventRecorder::default();
        process(source, &mut recorder).unwrap();
        recorder
            .into_events()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Run the fixture `name`.adoc and compare its trace with `name`.trace.
    /// Called by generated test functions (see build.rs).
    fn fixture_test(name: &str) {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("src/fixtures");
        let input = std::fs::read_to_string(dir.join(format!("{name}.adoc"))).unwrap();
        let expected = std::fs::read_to_string(dir.join(format!("{name}.trace"))).unwrap();

        let doc = Document::parse(input.as_str()).unwrap();
        let mut recorder = EventRecorder::default();
        doc.process(&mut recorder).unwrap();

        assert_eq!(recorder.to_string(), expected);
    }

    // Generated by build.rs - one test per .adoc file in fixtures/
    include!(concat!(env!("OUT_DIR"), "/fixture_tests.rs"));

    #[test]
    fn title_and_bold_paragraph() {
        assert_eq!(
            trace("= Title\n\nHello *world*.\n"),
            vec![
                "documentStart",
                "headingStart(1)",
                r#"text("Title")"#,
                "headingEnd(1)",
                "paragraphStart",
                r#"text("Hello ")"#,
                "boldStart",
                r#"text("world")"#,
                "boldEnd",
                r#"text(".")"#,
                "paragraphEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn nested_emphasis_trace() {
        let doc = Document::parse("*a _b_ c*").unwrap();
        let mut recorder = EventRecorder::default();
        doc.process(&mut recorder).unwrap();
        assert_snapshot!(recorder.to_string(), @r#"
        documentStart
          paragraphStart
            boldStart
              text("a ")
              italicStart
                text("b")
              italicEnd
              text(" c")
            boldEnd
          paragraphEnd
        documentEnd
        "#);
    }

    #[test]
    fn two_item_list() {
        assert_eq!(
            trace("* a\n* b\n"),
            vec![
                "documentStart",
                "unorderedListStart",
                "listItemStart",
                r#"text("a")"#,
                "listItemEnd",
                "listItemStart",
                r#"text("b")"#,
                "listItemEnd",
                "unorderedListEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn listing_block() {
        assert_eq!(
            trace("----\ncode\n----\n"),
            vec![
                "documentStart",
                "listingBlockStart",
                r#"text("code")"#,
                "lineFeed",
                "listingBlockEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn source_code_block() {
        assert_eq!(
            trace("[source,go]\n----\nfn\n----\n"),
            vec![
                "documentStart",
                r#"sourceCodeBlockStart("go")"#,
                r#"text("fn")"#,
                "lineFeed",
                "sourceCodeBlockEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn curved_apostrophe() {
        assert_eq!(
            trace("foo's bar"),
            vec![
                "documentStart",
                "paragraphStart",
                r#"text("foo")"#,
                "text(\"\u{2019}\")",
                r#"text("s bar")"#,
                "paragraphEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn unterminated_bold_is_text() {
        assert_eq!(
            trace("some *bold"),
            vec![
                "documentStart",
                "paragraphStart",
                r#"text("some *bold")"#,
                "paragraphEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn source_style_uses_document_language() {
        assert_eq!(
            trace("= T\n:source-language: rust\n\n[source]\n----\nx\n----\n")[3..5],
            [
                "headingEnd(1)".to_string(),
                r#"sourceCodeBlockStart("rust")"#.to_string(),
            ]
        );
    }

    #[test]
    fn source_without_language_stays_generic() {
        assert!(trace("[source]\n----\nx\n----\n").contains(&"listingBlockStart".to_string()));
    }

    #[test]
    fn named_language_implies_source() {
        assert!(
            trace("[language=c]\n----\nx\n----\n")
                .contains(&r#"sourceCodeBlockStart("c")"#.to_string())
        );
    }

    #[test]
    fn other_styles_are_generic_listings() {
        assert!(trace("[verse]\n----\nx\n----\n").contains(&"listingBlockStart".to_string()));
    }

    #[test]
    fn section_style_from_attribute_line() {
        let events = trace("== A\n\n[appendix]\n== B\n");
        assert!(events.contains(&r#"sectionStart(1, "appendix")"#.to_string()));
        assert!(events.contains(&"sectionStart(1)".to_string()));
    }

    #[test]
    fn block_attributes_do_not_leak_into_later_blocks() {
        let events = trace("[source,go]\n----\na\n----\n\n----\nb\n----\n");
        assert!(events.contains(&"listingBlockStart".to_string()));
    }

    #[test]
    fn link_text_is_rendered_by_default_visitor() {
        assert_eq!(
            trace("see https://example.org[the `site`] now"),
            vec![
                "documentStart",
                "paragraphStart",
                r#"text("see ")"#,
                r#"link("https://example.org", text("the "), monospaceStart, text("site"), monospaceEnd)"#,
                r#"text(" now")"#,
                "paragraphEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn link_with_empty_brackets_has_no_text() {
        assert_eq!(
            trace("see https://example.org[] now"),
            vec![
                "documentStart",
                "paragraphStart",
                r#"text("see ")"#,
                r#"link("https://example.org")"#,
                r#"text(" now")"#,
                "paragraphEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn inline_macro_attributes() {
        assert_eq!(
            trace("image:cat.png[Cat, width=200]")[2],
            r#"inlineMacro("image", "cat.png", 1="Cat", width="200")"#
        );
    }

    #[test]
    fn indented_continuation_stays_in_paragraph() {
        assert_eq!(
            trace("a\n  b\n"),
            vec![
                "documentStart",
                "paragraphStart",
                r#"text("a\n  b")"#,
                "paragraphEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn indented_continuation_stays_in_list_item() {
        assert_eq!(
            trace("* a\n  continued\n"),
            vec![
                "documentStart",
                "unorderedListStart",
                "listItemStart",
                r#"text("a\n  continued")"#,
                "listItemEnd",
                "unorderedListEnd",
                "documentEnd",
            ]
        );
    }

    #[test]
    fn literal_block_strips_common_indent() {
        assert_eq!(
            trace("  a\n    b\n"),
            vec![
                "documentStart",
                "literalBlockStart",
                r#"text("a")"#,
                "lineFeed",
                r#"text("  b")"#,
                "literalBlockEnd",
                "documentEnd",
            ]
        );
    }

    /// Visitors that only care about a few events need not implement the rest.
    #[test]
    fn partial_visitor() {
        #[derive(Default)]
        struct Headings(Vec<u32>);
        impl Visitor for Headings {
            fn heading_start(&mut self, level: u32) {
                self.0.push(level);
            }
        }

        let mut headings = Headings::default();
        process("= T\n\n== A\n\n=== B\n", &mut headings).unwrap();
        assert_eq!(headings.0, vec![1, 2, 3]);
    }

    #[test]
    fn link_text_is_only_replayed_on_request() {
        #[derive(Default)]
        struct Hrefs(Vec<String>, usize);
        impl Visitor for Hrefs {
            fn text(&mut self, _text: &str) {
                self.1 += 1;
            }
            fn link(&mut self, href: &str, _text: &LinkText<'_>) {
                self.0.push(href.to_string());
            }
        }

        let mut hrefs = Hrefs::default();
        process("https://a.b[x]", &mut hrefs).unwrap();
        assert_eq!(hrefs.0, vec!["https://a.b".to_string()]);
        assert_eq!(hrefs.1, 0);
    }
}
