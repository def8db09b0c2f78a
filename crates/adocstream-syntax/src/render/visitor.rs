use crate::document::DocumentAttributes;

use super::value::{LinkText, MacroAttributes};

/// Receives the events of a document, in document order.
///
/// Every method has an empty default body, so an implementation only
/// overrides the events it cares about. Start and end events are always
/// balanced and properly nested.
pub trait Visitor {
    fn document_start(&mut self, _attributes: &DocumentAttributes) {}
    fn document_end(&mut self) {}

    /// `level` is the number of `=` signs of the heading.
    fn heading_start(&mut self, _level: u32) {}
    fn heading_end(&mut self, _level: u32) {}

    fn preamble_start(&mut self) {}
    fn preamble_end(&mut self) {}

    /// `level` is the heading level minus one. `style` comes from the
    /// attribute list on the line above the heading, if any.
    fn section_start(&mut self, _level: u32, _style: Option<&str>) {}
    fn section_end(&mut self) {}

    fn paragraph_start(&mut self) {}
    fn paragraph_end(&mut self) {}

    fn listing_block_start(&mut self) {}
    fn listing_block_end(&mut self) {}

    fn source_code_block_start(&mut self, _language: &str) {}
    fn source_code_block_end(&mut self) {}

    fn literal_block_start(&mut self) {}
    fn literal_block_end(&mut self) {}

    fn unordered_list_start(&mut self) {}
    fn unordered_list_end(&mut self) {}

    fn list_item_start(&mut self) {}
    fn list_item_end(&mut self) {}

    fn bold_start(&mut self) {}
    fn bold_end(&mut self) {}
    fn italic_start(&mut self) {}
    fn italic_end(&mut self) {}
    fn monospace_start(&mut self) {}
    fn monospace_end(&mut self) {}

    fn text(&mut self, _text: &str) {}
    fn line_feed(&mut self) {}

    /// A URL macro. The default renders the link text in place.
    fn link(&mut self, _href: &str, text: &LinkText<'_>) {
        text.render(self);
    }

    fn inline_macro(&mut self, _name: &str, _target: &str, _attributes: &MacroAttributes<'_>) {}
}
