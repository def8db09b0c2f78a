//! Property-based tests for the whole pipeline.
//!
//! Inputs are drawn from an alphabet heavy in markup characters so that
//! headings, lists, fences, attribute lists and macros show up often.

use adocstream_syntax::events::Nesting;
use adocstream_syntax::{Document, Error, Event, EventRecorder, process, tokenize};
use proptest::prelude::*;

/// Lines made of markup-ish characters, joined by line feeds.
fn markup() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        "[a-z *_`']{0,16}",
        "(=|==|===) [a-z *_]{1,8}",
        "(\\*|\\*\\*|-) [a-z *_`]{0,10}",
        "-{3,6}",
        "\\[[a-z ,=\"`]{0,10}\\]",
        "[a-z]{1,5}:[a-z/.]{0,6}\\[[a-z ,`]{0,8}\\]",
        ":[a-z]{1,4}: [a-z]{0,4}",
        "  [a-z *]{0,8}",
        Just(String::new()),
    ];
    prop::collection::vec(line, 0..12).prop_map(|lines| lines.join("\n"))
}

/// Checks that start and end events pair up like brackets.
fn assert_balanced(events: &[Event]) -> Result<(), TestCaseError> {
    let mut open: Vec<&'static str> = Vec::new();
    for event in events {
        match event.nesting() {
            Nesting::Open(kind) => open.push(kind),
            Nesting::Close(kind) => {
                prop_assert_eq!(open.pop(), Some(kind), "unbalanced {}", event);
            }
            Nesting::Leaf => {}
        }
    }
    prop_assert!(open.is_empty(), "left open: {:?}", open);
    Ok(())
}

/// The only markup the generated documents may be rejected for is a
/// listing fence closed with a different dash count.
fn assert_fence_mismatch(error: &Error, source: &str) -> Result<(), TestCaseError> {
    prop_assert!(
        matches!(error, Error::ListingDelimiterMismatch { .. }),
        "{:?} rejected: {}",
        source,
        error
    );
    Ok(())
}

proptest! {
    #[test]
    fn token_offsets_never_go_backwards(source in markup()) {
        let tokens = tokenize(&source);
        let mut last = 0;
        for token in &tokens {
            if let Some(offset) = token.offset() {
                prop_assert!(offset >= last, "{} went backwards", token);
                prop_assert!(offset <= source.len());
                last = offset;
            }
        }
    }

    #[test]
    fn arbitrary_text_tokenizes(source in "\\PC{0,64}") {
        let tokens = tokenize(&source);
        prop_assert!(matches!(tokens.last(), Some(adocstream_syntax::Token::Eof)));
    }

    #[test]
    fn accepted_documents_have_balanced_events(source in markup()) {
        let mut recorder = EventRecorder::default();
        match process(&source, &mut recorder) {
            Ok(_) => assert_balanced(recorder.events())?,
            Err(error) => assert_fence_mismatch(&error, &source)?,
        }
    }

    #[test]
    fn processing_a_document_is_repeatable(source in markup()) {
        match Document::parse(source.as_str()) {
            Ok(doc) => {
                let mut first = EventRecorder::default();
                let mut second = EventRecorder::default();
                doc.process(&mut first).unwrap();
                doc.process(&mut second).unwrap();
                prop_assert_eq!(first, second);
            }
            Err(error) => assert_fence_mismatch(&error, &source)?,
        }
    }

    #[test]
    fn listing_content_round_trips(lines in prop::collection::vec("(x[ -~]{0,20})?", 1..6)) {
        let body = lines.join("\n");
        let source = format!("----\n{body}\n----\n");

        let mut recorder = EventRecorder::default();
        process(&source, &mut recorder).unwrap();

        let mut replayed = String::new();
        for event in recorder.events() {
            match event {
                Event::Text { text } => replayed.push_str(text),
                Event::LineFeed => replayed.push('\n'),
                _ => {}
            }
        }
        prop_assert_eq!(replayed, format!("{body}\n"));
    }
}
