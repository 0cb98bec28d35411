//! Built-in sample texts

use serde::{Deserialize, Serialize};

/// Preset preview texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleText {
    #[default]
    Default,
    Heading,
    Paragraph,
}

impl SampleText {
    pub const ALL: [SampleText; 3] = [SampleText::Default, SampleText::Heading, SampleText::Paragraph];

    pub fn text(&self) -> &'static str {
        match self {
            SampleText::Default => "The quick brown fox jumps over the lazy dog.",
            SampleText::Heading => "Sphinx of black quartz, judge my vow.",
            SampleText::Paragraph => {
                "Typography is the art and technique of arranging type to make written \
                 language legible, readable, and appealing when displayed. The arrangement \
                 of type involves selecting typefaces, point sizes, line lengths, \
                 line-spacing, and letter-spacing, and adjusting the space between pairs \
                 of letters."
            }
        }
    }
}
