//! # Tokenizer
//!
//! The first pass. A character-level state machine turns source text into a
//! flat [`TokenStream`]:
//!
//! ```text
//! "= Title\n\nHello *world*.\n"
//!   → [HEADING(1), BLOB("Title"), LF, LF,
//!      BLOB("Hello "), BOLD_START, BLOB("world"), BOLD_END, BLOB("."), LF, EOF]
//! ```
//!
//! ## States
//!
//! The machine is a dispatch loop over a private `State` enum. Each step peeks at the
//! current character, optionally pushes tokens, and returns the next state.
//! Besides the cursor it carries a `counter` (heading level, list marker
//! repeat count, or fence dash count, depending on the state) and a few span
//! starts:
//!
//! - `line_start` - offset of the current line
//! - `blob_start` - start of the plain text run not yet pushed
//! - `boundary_start` - start of the current word, used for macro names
//! - `aux_start` - start of the attribute list entry being scanned
//!
//! ## Rollback
//!
//! Inline macros (`name:target[attrs]`) and block attribute lists (`[attrs]`
//! alone on a line) are only recognised once their closing `]` is seen. When
//! the scanner commits to such a hypothesis it records a checkpoint: the
//! source offset plus a [`Mark`] of the token stream. If the line ends first,
//! both are restored and scanning resumes as plain text just past the
//! triggering character. Nothing else in the pipeline backtracks.
//!
//! ## Constrained emphasis
//!
//! `*`, `_` and `` ` `` open emphasis only at line start or after whitespace,
//! and only when followed by a non-blank character. They close emphasis only
//! when the next character is not a [word character](chars::is_word). The
//! tokenizer does not pair delimiters; unmatched ones are demoted to text by
//! the [inline formatter](crate::inline).
//!
//! Inputs outside the supported subset never fail: they degrade to text.

pub mod chars;
mod cursor;
pub mod token;

use log::{debug, trace};

use crate::span::Span;
use chars::{is_attr_name, is_attr_name_start, is_blank, is_macro_name, is_word};
use cursor::Cursor;
pub use token::{Mark, Token, TokenStream};

/// Tokenize `source` into a fresh token stream.
///
/// ```
/// use adocstream_syntax::lexer::{Token, tokenize};
///
/// let tokens = tokenize("*bold*");
/// assert!(matches!(tokens[0], Token::BoldStart(0)));
/// assert!(matches!(tokens[2], Token::BoldEnd(5)));
/// ```
pub fn tokenize(source: &str) -> TokenStream {
    let tokens = Tokenizer::new(source).run();
    debug!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Bold,
    Italic,
    Mono,
}

impl Emphasis {
    fn from_delimiter(c: char) -> Option<Self> {
        match c {
            '*' => Some(Emphasis::Bold),
            '_' => Some(Emphasis::Italic),
            '`' => Some(Emphasis::Mono),
            _ => None,
        }
    }

    fn start(self, pos: usize) -> Token {
        match self {
            Emphasis::Bold => Token::BoldStart(pos),
            Emphasis::Italic => Token::ItalicStart(pos),
            Emphasis::Mono => Token::MonoStart(pos),
        }
    }

    fn end(self, pos: usize) -> Token {
        match self {
            Emphasis::Bold => Token::BoldEnd(pos),
            Emphasis::Italic => Token::ItalicEnd(pos),
            Emphasis::Mono => Token::MonoEnd(pos),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    LineStart,
    /// After a heading or list marker: leading blanks are skipped and
    /// emphasis may open.
    LineStartLike,
    HeadingStart,
    Heading,
    Blob,
    /// After whitespace, or any other point where a new word begins.
    SpaceLike,
    BoldOrList,
    EmphasisStart(Emphasis),
    EmphasisEnd(Emphasis),
    LiteralOrList,
    LiteralLine,
    ListingBlockOrList,
    ListingBlock,
    ListingBlockTrail,
    ListingBody,
    MacroTarget,
    AttrName,
    AttrValue,
    AttrValueMonoStart,
    AttrValueMonoEnd,
    AttrQuotes { named: bool },
    AttrAfterQuotes,
    AttrSeparator,
    AttrListEnd,
    DocAttrName,
    DocAttrNameNext,
    DocAttrValue,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum AttrListKind {
    /// `[...]` alone on its line, attached to the next block.
    #[default]
    Block,
    /// The `[...]` closing an inline macro.
    InlineMacro,
}

/// Where to resume when a macro or attribute list hypothesis fails.
#[derive(Debug, Clone, Copy, Default)]
struct Checkpoint {
    offset: usize,
    mark: Mark,
}

struct Tokenizer<'s> {
    source: &'s str,
    cursor: Cursor<'s>,
    tokens: TokenStream,
    counter: u32,
    attr_list: AttrListKind,
    checkpoint: Checkpoint,
    aux_start: usize,
    blob_start: usize,
    boundary_start: usize,
    line_start: usize,
    /// Set while the lines directly under the document title are scanned.
    in_header: bool,
}

impl<'s> Tokenizer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            tokens: TokenStream::new(),
            counter: 0,
            attr_list: AttrListKind::default(),
            checkpoint: Checkpoint::default(),
            aux_start: 0,
            blob_start: 0,
            boundary_start: 0,
            line_start: 0,
            in_header: false,
        }
    }

    fn run(mut self) -> TokenStream {
        let mut state = State::LineStart;
        while state != State::Done {
            state = self.step(state);
        }
        self.tokens
    }

    fn step(&mut self, state: State) -> State {
        match state {
            State::LineStart => self.line_start(),
            State::LineStartLike => self.line_start_like(),
            State::HeadingStart => self.heading_start(),
            State::Heading => self.heading(),
            State::Blob => self.blob(),
            State::SpaceLike => self.space_like(),
            State::BoldOrList => self.bold_or_list(),
            State::EmphasisStart(kind) => self.emphasis_start(kind),
            State::EmphasisEnd(kind) => self.emphasis_end(kind),
            State::LiteralOrList => self.literal_or_list(),
            State::LiteralLine => self.literal_line(),
            State::ListingBlockOrList => self.listing_block_or_list(),
            State::ListingBlock => self.listing_block(),
            State::ListingBlockTrail => self.listing_block_trail(),
            State::ListingBody => self.listing_body(),
            State::MacroTarget => self.macro_target(),
            State::AttrName => self.attr_name(),
            State::AttrValue => self.attr_value(),
            State::AttrValueMonoStart => self.attr_value_mono_start(),
            State::AttrValueMonoEnd => self.attr_value_mono_end(),
            State::AttrQuotes { named } => self.attr_quotes(named),
            State::AttrAfterQuotes => self.attr_after_quotes(),
            State::AttrSeparator => self.attr_separator(),
            State::AttrListEnd => self.attr_list_end(),
            State::DocAttrName => self.docattr_name(),
            State::DocAttrNameNext => self.docattr_name_next(),
            State::DocAttrValue => self.docattr_value(),
            State::Done => State::Done,
        }
    }

    // === Helpers ===

    fn pos(&self) -> usize {
        self.cursor.pos()
    }

    fn skip_blanks(&mut self) {
        while self.cursor.peek().is_some_and(is_blank) {
            self.cursor.bump();
        }
    }

    fn advance(&mut self, next: State) -> State {
        self.cursor.bump();
        next
    }

    fn push_blob(&mut self, start: usize, end: usize) {
        self.tokens.push_blob(Span::new(start, end));
    }

    fn finish(&mut self) -> State {
        self.tokens.push(Token::Eof);
        State::Done
    }

    /// Pushes the line feed under the cursor and moves to the next line.
    fn line_feed(&mut self) -> State {
        self.tokens.push(Token::Lf(self.pos()));
        self.cursor.bump();
        State::LineStart
    }

    /// End of `[start, end)` with trailing blanks removed.
    fn trim_end(&self, start: usize, end: usize) -> usize {
        start + Span::new(start, end).text(self.source).trim_end_matches(is_blank).len()
    }

    fn rollback(&mut self) -> State {
        let Checkpoint { offset, mark } = self.checkpoint;
        trace!("rollback {:?} hypothesis to offset {offset}", self.attr_list);
        self.tokens.reset(mark);
        self.cursor.reset(offset + 1);
        self.attr_list = AttrListKind::Block;
        State::Blob
    }

    // === Line start ===

    fn line_start(&mut self) -> State {
        let pos = self.pos();
        self.line_start = pos;
        self.blob_start = pos;
        self.boundary_start = pos;
        let header = std::mem::take(&mut self.in_header);

        let Some(c) = self.cursor.peek() else {
            return self.finish();
        };
        match c {
            '\n' => self.line_feed(),
            '=' => {
                self.counter = 1;
                self.advance(State::HeadingStart)
            }
            '*' => {
                self.counter = 1;
                self.advance(State::BoldOrList)
            }
            '-' => {
                self.counter = 1;
                self.advance(State::ListingBlockOrList)
            }
            '[' => self.open_attr_list(AttrListKind::Block, pos),
            ':' if header => self.advance(State::DocAttrName),
            '_' => self.advance(State::EmphasisStart(Emphasis::Italic)),
            '`' => self.advance(State::EmphasisStart(Emphasis::Mono)),
            c if is_blank(c) => {
                self.counter = 1;
                self.advance(State::LiteralOrList)
            }
            _ => State::Blob,
        }
    }

    fn line_start_like(&mut self) -> State {
        let pos = self.pos();
        self.blob_start = pos;
        self.boundary_start = pos;
        match self.cursor.peek() {
            None => self.finish(),
            Some('\n') => self.line_feed(),
            Some(c) if is_blank(c) => self.advance(State::LineStartLike),
            Some(c) => match Emphasis::from_delimiter(c) {
                Some(kind) => self.advance(State::EmphasisStart(kind)),
                None => State::Blob,
            },
        }
    }

    // === Headings ===

    fn heading_start(&mut self) -> State {
        match self.cursor.peek() {
            Some('=') => {
                self.counter += 1;
                self.advance(State::HeadingStart)
            }
            Some(c) if is_blank(c) && self.counter <= 6 => self.advance(State::Heading),
            _ => State::Blob,
        }
    }

    fn heading(&mut self) -> State {
        match self.cursor.peek() {
            Some(c) if is_blank(c) => self.advance(State::Heading),
            // A marker without a title is text.
            None | Some('\n') => State::Blob,
            Some(_) => {
                let level = self.counter;
                self.tokens.push(Token::Heading {
                    level,
                    marker: Span::new(self.line_start, self.pos()),
                });
                if level == 1 && self.line_start == 0 {
                    self.in_header = true;
                }
                State::LineStartLike
            }
        }
    }

    // === Plain text ===

    fn blob(&mut self) -> State {
        let pos = self.pos();
        let Some(c) = self.cursor.peek() else {
            self.push_blob(self.blob_start, pos);
            return self.finish();
        };
        match c {
            '\n' => {
                self.push_blob(self.blob_start, pos);
                self.line_feed()
            }
            c if is_blank(c) => {
                self.boundary_start = pos;
                self.advance(State::SpaceLike)
            }
            '\'' => {
                let curved = self.cursor.prev().is_some_and(is_word)
                    && self.cursor.peek_next().is_some_and(is_word);
                if curved {
                    self.push_blob(self.blob_start, pos);
                    self.tokens.push(Token::Apostrophe(pos));
                    self.blob_start = pos + 1;
                }
                self.advance(State::Blob)
            }
            ':' => self.macro_start(pos),
            c => match Emphasis::from_delimiter(c) {
                Some(kind) => self.advance(State::EmphasisEnd(kind)),
                None => self.advance(State::Blob),
            },
        }
    }

    fn space_like(&mut self) -> State {
        let pos = self.pos();
        self.boundary_start = pos;
        match self.cursor.peek() {
            None => {
                self.push_blob(self.blob_start, pos);
                self.finish()
            }
            Some('\n') => {
                self.push_blob(self.blob_start, pos);
                self.line_feed()
            }
            Some(c) if is_blank(c) => self.advance(State::SpaceLike),
            Some(c) => match Emphasis::from_delimiter(c) {
                Some(kind) => self.advance(State::EmphasisStart(kind)),
                None => State::Blob,
            },
        }
    }

    // === Emphasis ===

    /// The cursor sits just past an opening candidate delimiter.
    fn emphasis_start(&mut self, kind: Emphasis) -> State {
        let pos = self.pos();
        let delimiter = pos - 1;
        match self.cursor.peek() {
            None => {
                self.push_blob(self.blob_start, pos);
                self.finish()
            }
            Some('\n') => {
                self.push_blob(self.blob_start, pos);
                self.line_feed()
            }
            Some(c) if is_blank(c) => {
                self.boundary_start = pos;
                self.advance(State::SpaceLike)
            }
            // A doubled delimiter is not a constrained opening.
            Some(c) if Emphasis::from_delimiter(c) == Some(kind) => State::Blob,
            Some(c) => {
                self.push_blob(self.blob_start, delimiter);
                self.tokens.push(kind.start(delimiter));
                self.blob_start = pos;
                self.boundary_start = pos;
                match Emphasis::from_delimiter(c) {
                    Some(inner) => self.advance(State::EmphasisStart(inner)),
                    None => State::Blob,
                }
            }
        }
    }

    /// The cursor sits just past a closing candidate delimiter.
    fn emphasis_end(&mut self, kind: Emphasis) -> State {
        let pos = self.pos();
        let delimiter = pos - 1;
        let next = self.cursor.peek();
        if next.is_some_and(is_word) {
            return State::Blob;
        }

        self.push_blob(self.blob_start, delimiter);
        self.tokens.push(kind.end(delimiter));
        self.blob_start = pos;
        self.boundary_start = pos;
        match next {
            None => self.finish(),
            Some('\n') => self.line_feed(),
            Some(c) if is_blank(c) => self.advance(State::SpaceLike),
            Some(_) => State::Blob,
        }
    }

    // === Lists and literal lines ===

    fn bold_or_list(&mut self) -> State {
        let pos = self.pos();
        match self.cursor.peek() {
            Some('*') => {
                self.counter += 1;
                self.advance(State::BoldOrList)
            }
            Some(c) if is_blank(c) => {
                self.tokens.push(Token::UlistAsterisk {
                    count: self.counter,
                    marker: Span::new(self.line_start, pos),
                });
                self.advance(State::LineStartLike)
            }
            None | Some('\n') => State::Blob,
            Some(_) if self.counter == 1 => State::EmphasisStart(Emphasis::Bold),
            Some(_) => State::Blob,
        }
    }

    fn literal_or_list(&mut self) -> State {
        match self.cursor.peek() {
            // Whitespace-only lines are blank lines.
            None => self.finish(),
            Some('\n') => self.line_feed(),
            Some(c) if is_blank(c) => {
                self.counter += 1;
                self.advance(State::LiteralOrList)
            }
            Some('*') => {
                self.counter = 1;
                self.advance(State::BoldOrList)
            }
            Some(_) => {
                self.tokens
                    .push(Token::LiteralIndent(Span::new(self.line_start, self.pos())));
                State::LiteralLine
            }
        }
    }

    /// The rest of an indented line is taken as-is.
    fn literal_line(&mut self) -> State {
        let pos = self.pos();
        let end = pos + self.cursor.rest_of_line().len();
        self.push_blob(pos, end);
        self.cursor.reset(end);
        match self.cursor.peek() {
            Some('\n') => self.line_feed(),
            _ => self.finish(),
        }
    }

    // === Listing blocks ===

    fn listing_block_or_list(&mut self) -> State {
        match self.cursor.peek() {
            Some('-') => {
                self.counter += 1;
                self.advance(State::ListingBlock)
            }
            Some(c) if is_blank(c) => {
                self.tokens
                    .push(Token::UlistHyphen(Span::new(self.line_start, self.pos())));
                self.advance(State::LineStartLike)
            }
            _ => State::Blob,
        }
    }

    fn listing_block(&mut self) -> State {
        match self.cursor.peek() {
            Some('-') => {
                self.counter += 1;
                self.advance(State::ListingBlock)
            }
            None | Some('\n') if self.counter >= 4 => self.fence(State::ListingBody),
            Some(c) if is_blank(c) && self.counter >= 4 => self.advance(State::ListingBlockTrail),
            _ => State::Blob,
        }
    }

    /// Trailing whitespace after a fence.
    fn listing_block_trail(&mut self) -> State {
        match self.cursor.peek() {
            Some(c) if is_blank(c) => self.advance(State::ListingBlockTrail),
            None | Some('\n') => self.fence(State::ListingBody),
            Some(_) => State::Blob,
        }
    }

    /// Pushes a fence of `counter` dashes plus its terminator.
    fn fence(&mut self, next: State) -> State {
        self.tokens.push(Token::ListingBlockDelim {
            count: self.counter,
            marker: Span::new(self.line_start, self.line_start + self.counter as usize),
        });
        match self.cursor.peek() {
            Some('\n') => {
                self.line_feed();
                next
            }
            _ => self.finish(),
        }
    }

    /// Inside a listing block every line is raw text until a fence line.
    fn listing_body(&mut self) -> State {
        let pos = self.pos();
        self.line_start = pos;
        if self.cursor.eof() {
            return self.finish();
        }

        let line = self.cursor.rest_of_line();
        let end = pos + line.len();
        let dashes = line.bytes().take_while(|&b| b == b'-').count();
        let fence = dashes >= 4
            && line
                .get(dashes..)
                .is_some_and(|rest| rest.chars().all(is_blank));

        self.cursor.reset(end);
        if fence {
            self.counter = dashes as u32;
            return self.fence(State::LineStart);
        }

        self.push_blob(pos, end);
        match self.cursor.peek() {
            Some('\n') => {
                self.line_feed();
                State::ListingBody
            }
            _ => self.finish(),
        }
    }

    // === Inline macros ===

    /// The cursor sits on a `:` that may end an inline macro name.
    fn macro_start(&mut self, pos: usize) -> State {
        let name = Span::new(self.boundary_start, pos);
        let text = name.text(self.source);
        let valid_name = self.blob_start <= self.boundary_start
            && text.starts_with(|c: char| c.is_ascii_alphabetic())
            && text.chars().all(is_macro_name);
        let target_follows = self
            .cursor
            .peek_next()
            .is_some_and(|c| c != ':' && c != '\n' && !is_blank(c));

        if !valid_name || !target_follows {
            self.cursor.bump();
            // `name::` is a block macro or description list shape, both text here.
            if self.cursor.peek() == Some(':') {
                self.cursor.bump();
            }
            return State::Blob;
        }

        self.push_blob(self.blob_start, self.boundary_start);
        self.blob_start = self.boundary_start;
        self.checkpoint = Checkpoint {
            offset: pos,
            mark: self.tokens.mark(),
        };
        self.tokens.push(Token::InlineMacro(name));
        self.aux_start = pos + 1;
        self.advance(State::MacroTarget)
    }

    fn macro_target(&mut self) -> State {
        let pos = self.pos();
        match self.cursor.peek() {
            None | Some('\n') => self.rollback(),
            Some(c) if is_blank(c) => self.rollback(),
            Some('[') if pos == self.aux_start => self.rollback(),
            Some('[') => {
                self.push_blob(self.aux_start, pos);
                self.open_attr_list(AttrListKind::InlineMacro, pos)
            }
            Some(_) => self.advance(State::MacroTarget),
        }
    }

    // === Attribute lists ===

    fn open_attr_list(&mut self, kind: AttrListKind, pos: usize) -> State {
        self.attr_list = kind;
        if kind == AttrListKind::Block {
            self.checkpoint = Checkpoint {
                offset: pos,
                mark: self.tokens.mark(),
            };
        }
        self.tokens.push(Token::AttrListStart(pos));
        self.cursor.bump();
        self.skip_blanks();
        self.aux_start = self.pos();
        State::AttrName
    }

    /// Scanning an entry that is either a positional value or a name.
    fn attr_name(&mut self) -> State {
        let pos = self.pos();
        match self.cursor.peek() {
            None | Some('\n') => self.rollback(),
            Some('"') if pos == self.aux_start => self.advance(State::AttrQuotes { named: false }),
            Some(',') => {
                self.positional_value(pos);
                self.aux_start = pos;
                self.advance(State::AttrSeparator)
            }
            Some(']') => {
                if self.trim_end(self.aux_start, pos) > self.aux_start {
                    self.positional_value(pos);
                }
                self.close_attr_list(pos)
            }
            Some('=') if pos > self.aux_start => {
                let name_end = self.trim_end(self.aux_start, pos);
                self.tokens
                    .push(Token::AttrName(Span::new(self.aux_start, name_end)));
                self.tokens.push(Token::AttrValueStart);
                self.cursor.bump();
                self.skip_blanks();
                self.aux_start = self.pos();
                State::AttrValue
            }
            Some('`') => {
                self.tokens.push(Token::AttrValueStart);
                self.value_backtick(pos)
            }
            Some(_) => self.advance(State::AttrName),
        }
    }

    fn positional_value(&mut self, end: usize) {
        self.tokens.push(Token::AttrValueStart);
        let value_end = self.trim_end(self.aux_start, end);
        self.push_blob(self.aux_start, value_end);
        self.tokens.push(Token::AttrValueEnd);
    }

    /// Scanning a value whose `ATTR_VALUE_START` is already pushed.
    fn attr_value(&mut self) -> State {
        let pos = self.pos();
        match self.cursor.peek() {
            None | Some('\n') => self.rollback(),
            Some('"') if pos == self.aux_start => self.advance(State::AttrQuotes { named: true }),
            Some(',') => {
                self.close_value(pos);
                self.aux_start = pos;
                self.advance(State::AttrSeparator)
            }
            Some(']') => {
                self.close_value(pos);
                self.close_attr_list(pos)
            }
            Some('`') => self.value_backtick(pos),
            Some(_) => self.advance(State::AttrValue),
        }
    }

    fn close_value(&mut self, end: usize) {
        let value_end = self.trim_end(self.aux_start, end);
        self.push_blob(self.aux_start, value_end);
        self.tokens.push(Token::AttrValueEnd);
    }

    /// A backtick inside a value opens monospace at a word start and
    /// otherwise may close it.
    fn value_backtick(&mut self, pos: usize) -> State {
        let opening = pos == self.aux_start || self.cursor.prev().is_some_and(is_blank);
        self.cursor.bump();
        if opening {
            State::AttrValueMonoStart
        } else {
            State::AttrValueMonoEnd
        }
    }

    fn attr_value_mono_start(&mut self) -> State {
        let pos = self.pos();
        let delimiter = pos - 1;
        match self.cursor.peek() {
            None | Some('\n') => self.rollback(),
            Some(c) if is_blank(c) || matches!(c, '`' | ',' | ']') => State::AttrValue,
            Some(_) => {
                self.push_blob(self.aux_start, delimiter);
                self.tokens.push(Token::MonoStart(delimiter));
                self.aux_start = pos;
                State::AttrValue
            }
        }
    }

    fn attr_value_mono_end(&mut self) -> State {
        let pos = self.pos();
        let delimiter = pos - 1;
        if self.cursor.peek().is_some_and(is_word) {
            return State::AttrValue;
        }
        self.push_blob(self.aux_start, delimiter);
        self.tokens.push(Token::MonoEnd(delimiter));
        self.aux_start = pos;
        State::AttrValue
    }

    /// Inside `"..."`; `aux_start` is the opening quote.
    fn attr_quotes(&mut self, named: bool) -> State {
        let pos = self.pos();
        match self.cursor.peek() {
            None | Some('\n') => self.rollback(),
            Some('"') => {
                if !named {
                    self.tokens.push(Token::AttrValueStart);
                }
                self.tokens
                    .push(Token::DQuote(Span::new(self.aux_start + 1, pos)));
                self.tokens.push(Token::AttrValueEnd);
                self.advance(State::AttrAfterQuotes)
            }
            Some(_) => self.advance(State::AttrQuotes { named }),
        }
    }

    fn attr_after_quotes(&mut self) -> State {
        let pos = self.pos();
        match self.cursor.peek() {
            Some(c) if is_blank(c) => self.advance(State::AttrAfterQuotes),
            Some(',') => {
                self.aux_start = pos;
                self.advance(State::AttrSeparator)
            }
            Some(']') => self.close_attr_list(pos),
            _ => self.rollback(),
        }
    }

    /// After a `,`; `aux_start` is the comma.
    fn attr_separator(&mut self) -> State {
        let pos = self.pos();
        match self.cursor.peek() {
            None | Some('\n') => self.rollback(),
            Some(c) if is_blank(c) => self.advance(State::AttrSeparator),
            // A trailing comma adds no entry.
            Some(']') => self.close_attr_list(pos),
            Some(_) => {
                self.tokens
                    .push(Token::Separator(Span::new(self.aux_start, pos)));
                self.aux_start = pos;
                State::AttrName
            }
        }
    }

    /// Steps over the `]` at `pos`, remembering it in `aux_start`.
    fn close_attr_list(&mut self, pos: usize) -> State {
        self.aux_start = pos;
        self.advance(State::AttrListEnd)
    }

    fn attr_list_end(&mut self) -> State {
        let end = Token::AttrListEnd(self.aux_start);
        match self.attr_list {
            AttrListKind::Block => match self.cursor.peek() {
                Some(c) if is_blank(c) => self.advance(State::AttrListEnd),
                None => {
                    self.tokens.push(end);
                    self.finish()
                }
                Some('\n') => {
                    self.tokens.push(end);
                    self.line_feed()
                }
                // Block attribute lists own their whole line.
                Some(_) => self.rollback(),
            },
            AttrListKind::InlineMacro => {
                self.tokens.push(end);
                self.attr_list = AttrListKind::Block;
                self.blob_start = self.pos();
                State::SpaceLike
            }
        }
    }

    // === Document attributes ===

    fn docattr_name(&mut self) -> State {
        match self.cursor.peek() {
            Some(c) if is_attr_name_start(c) => self.advance(State::DocAttrNameNext),
            _ => State::Blob,
        }
    }

    fn docattr_name_next(&mut self) -> State {
        match self.cursor.peek() {
            Some(':') => {
                self.tokens
                    .push(Token::DocAttr(Span::new(self.line_start + 1, self.pos())));
                self.advance(State::DocAttrValue)
            }
            Some(c) if is_attr_name(c) => self.advance(State::DocAttrNameNext),
            _ => State::Blob,
        }
    }

    /// The value is the rest of the line, trimmed, without inline markup.
    fn docattr_value(&mut self) -> State {
        let pos = self.pos();
        let rest = self.cursor.rest_of_line();
        let start = pos + (rest.len() - rest.trim_start_matches(is_blank).len());
        let end = pos + rest.trim_end_matches(is_blank).len();
        self.push_blob(start, end);
        self.in_header = true;
        self.cursor.reset(pos + rest.len());
        match self.cursor.peek() {
            Some('\n') => self.line_feed(),
            _ => self.finish(),
        }
    }
}
