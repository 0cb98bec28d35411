//! Preview projection
//!
//! Maps (settings, active font, text) to the flat style handed to the
//! renderer. Pure: no state, callable with any settings and any text.

use crate::{Direction, Settings, TextAlign, TextTransform};

/// Generic family used when no uploaded font is active
pub const FALLBACK_FAMILY: &str = "sans-serif";

/// Source label shown when no uploaded font is active
pub const SYSTEM_FONT_LABEL: &str = "System Sans Serif";

/// Borrowed view of the active font, as much as the projection needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFont<'a> {
    /// Family handle registered with the font table
    pub family: &'a str,
    /// Original upload file name
    pub file_name: &'a str,
    /// Lowercase format ("ttf", "woff2", ...)
    pub format: &'a str,
}

/// Font family of the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFamily {
    /// An uploaded font, by family handle
    Named(String),
    /// The generic fallback family
    Fallback,
}

impl FontFamily {
    pub fn name(&self) -> &str {
        match self {
            FontFamily::Named(name) => name,
            FontFamily::Fallback => FALLBACK_FAMILY,
        }
    }

    /// Value for a CSS `font-family` declaration. Named families are quoted,
    /// the generic keyword is not.
    pub fn css_value(&self) -> String {
        match self {
            FontFamily::Named(name) => format!("\"{}\"", name.replace('"', "\\\"")),
            FontFamily::Fallback => FALLBACK_FAMILY.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FontFamily::Fallback)
    }
}

/// Everything the renderer needs to draw the preview
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub family: FontFamily,
    /// Pixels
    pub font_size: u16,
    pub weight: u16,
    pub line_height: f32,
    /// Pixels
    pub letter_spacing: f32,
    /// Pixels
    pub word_spacing: f32,
    pub text_transform: TextTransform,
    pub text_align: TextAlign,
    pub direction: Direction,
    pub char_count: usize,
    pub word_count: usize,
    /// File name of the active font, or the system font label
    pub source_label: String,
    /// Format badge of the active font
    pub format: Option<String>,
}

impl StyleDescriptor {
    /// Render as an inline CSS declaration block
    pub fn to_css(&self) -> String {
        format!(
            "font-family: {}; font-size: {}px; line-height: {}; letter-spacing: {}px; \
             word-spacing: {}px; font-weight: {}; text-transform: {}; text-align: {}; \
             direction: {};",
            self.family.css_value(),
            self.font_size,
            self.line_height,
            self.letter_spacing,
            self.word_spacing,
            self.weight,
            self.text_transform.as_css(),
            self.text_align.as_css(),
            self.direction.as_css(),
        )
    }

    /// Status line, e.g. "Glyphs: 19 | Words: 4 | LTR"
    pub fn footer(&self) -> String {
        format!(
            "Glyphs: {} | Words: {} | {}",
            self.char_count,
            self.word_count,
            self.direction.label()
        )
    }
}

/// Project settings, active font and text into a style descriptor
pub fn project(settings: &Settings, font: Option<ActiveFont<'_>>, text: &str) -> StyleDescriptor {
    let (family, source_label, format) = match font {
        Some(font) => (
            FontFamily::Named(font.family.to_string()),
            font.file_name.to_string(),
            Some(font.format.to_string()),
        ),
        None => (FontFamily::Fallback, SYSTEM_FONT_LABEL.to_string(), None),
    };

    StyleDescriptor {
        family,
        font_size: settings.font_size,
        weight: settings.weight,
        line_height: settings.line_height,
        letter_spacing: settings.letter_spacing,
        word_spacing: settings.word_spacing,
        text_transform: settings.transform,
        text_align: settings.align,
        direction: settings.direction,
        char_count: char_count(text),
        word_count: word_count(text),
        source_label,
        format,
    }
}

/// Number of characters as a browser text field counts them: UTF-16 code
/// units, so a character outside the BMP counts twice.
pub fn char_count(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Number of maximal non-whitespace runs
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \t\n"), 0);
        assert_eq!(word_count("  a   b  "), 2);
        assert_eq!(word_count("one\ttwo\nthree"), 3);
    }

    #[test]
    fn test_char_count_is_utf16_units() {
        assert_eq!(char_count("héllo"), 5);
        assert_eq!(char_count("مرحبا"), 5);
        assert_eq!(char_count("😀"), 2);
        assert_eq!(char_count("a😀b"), 4);
    }

    #[test]
    fn test_family_css_value() {
        assert_eq!(FontFamily::Fallback.css_value(), "sans-serif");
        assert_eq!(FontFamily::Named("Font_1".into()).css_value(), "\"Font_1\"");
    }
}
