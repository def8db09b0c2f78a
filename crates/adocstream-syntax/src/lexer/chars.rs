//! Character classes used by the tokenizer.

use unicode_general_category::{GeneralCategory, get_general_category};

/// Space-like characters: space, tab, vertical tab and form feed.
pub fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000B}' | '\u{000C}')
}

/// A word character is any letter, mark, number or connector punctuation.
///
/// Constrained emphasis never opens or closes next to one of these.
pub fn is_word(c: char) -> bool {
    use GeneralCategory::*;

    if c.is_ascii() {
        return c.is_ascii_alphanumeric() || c == '_';
    }

    matches!(
        get_general_category(c),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | NonspacingMark
            | SpacingMark
            | EnclosingMark
            | DecimalNumber
            | LetterNumber
            | OtherNumber
            | ConnectorPunctuation
    )
}

/// First character of a document attribute name.
pub fn is_attr_name_start(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Subsequent characters of a document attribute name.
pub fn is_attr_name(c: char) -> bool {
    is_attr_name_start(c) || c == '-'
}

/// Characters allowed in an inline macro name.
pub fn is_macro_name(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('a', true)]
    #[case('Z', true)]
    #[case('7', true)]
    #[case('_', true)]
    #[case('é', true)]
    #[case('ж', true)]
    #[case('\u{0301}', true)] // combining acute accent
    #[case('\u{2040}', true)] // character tie, connector punctuation
    #[case('٣', true)]
    #[case(' ', false)]
    #[case('*', false)]
    #[case('.', false)]
    #[case('\'', false)]
    #[case('\u{2019}', false)]
    fn word_characters(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_word(c), expected, "{c:?}");
    }

    #[rstest]
    #[case(' ', true)]
    #[case('\t', true)]
    #[case('\u{000B}', true)]
    #[case('\u{000C}', true)]
    #[case('\n', false)]
    #[case('\u{00A0}', false)]
    fn blank_characters(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_blank(c), expected);
    }

    #[test]
    fn attribute_names() {
        assert!(is_attr_name_start('t'));
        assert!(!is_attr_name_start('-'));
        assert!(is_attr_name('-'));
        assert!(!is_attr_name(':'));
    }
}
