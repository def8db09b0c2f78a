/// A cursor for character-by-character scanning with position tracking.
///
/// Positions are byte offsets into the whole source, so every span the
/// tokenizer records can slice the source directly.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    s: &'a str,
    /// Current byte offset into `s`.
    i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s`.
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Returns the current byte offset.
    pub fn pos(&self) -> usize {
        self.i
    }

    /// Returns true if at end of input.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.s.get(self.i..)?.chars().next()
    }

    /// Peeks at the character after the current one.
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.s.get(self.i..)?.chars();
        chars.next()?;
        chars.next()
    }

    /// Returns the character just before the current offset.
    pub fn prev(&self) -> Option<char> {
        self.s.get(..self.i)?.chars().next_back()
    }

    /// Advances by one character, returning the consumed character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Moves the cursor to an absolute offset recorded earlier.
    pub fn reset(&mut self, pos: usize) {
        self.i = pos.min(self.s.len());
    }

    /// The rest of the current line, excluding the line feed.
    pub fn rest_of_line(&self) -> &'a str {
        let rest = self.s.get(self.i..).unwrap_or("");
        match rest.find('\n') {
            Some(n) => &rest[..n],
            None => rest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some('h'));
        assert_eq!(cur.peek_next(), Some('e'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.pos(), 1);
        assert_eq!(cur.prev(), Some('h'));
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.prev(), None);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn bump_steps_over_multibyte_chars() {
        let mut cur = Cursor::new("é*");
        assert_eq!(cur.bump(), Some('é'));
        assert_eq!(cur.pos(), 2);
        assert_eq!(cur.prev(), Some('é'));
        assert_eq!(cur.peek(), Some('*'));
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x");
        assert_eq!(cur.bump(), Some('x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.peek_next(), None);
    }

    #[test]
    fn reset_returns_to_checkpoint() {
        let mut cur = Cursor::new("abc");
        cur.bump();
        cur.bump();
        cur.reset(1);
        assert_eq!(cur.peek(), Some('b'));
        cur.reset(99);
        assert!(cur.eof());
    }

    #[test]
    fn rest_of_line_stops_at_line_feed() {
        let mut cur = Cursor::new("ab\ncd");
        cur.bump();
        assert_eq!(cur.rest_of_line(), "b");
        cur.reset(3);
        assert_eq!(cur.rest_of_line(), "cd");
    }
}
