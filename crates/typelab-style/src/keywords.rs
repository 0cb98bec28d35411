//! Keyword-valued typographic properties

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StyleError;

/// Case transform applied to the preview text (`text-transform`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextTransform {
    pub const ALL: [TextTransform; 4] = [
        TextTransform::None,
        TextTransform::Uppercase,
        TextTransform::Lowercase,
        TextTransform::Capitalize,
    ];

    /// CSS keyword
    pub fn as_css(&self) -> &'static str {
        match self {
            TextTransform::None => "none",
            TextTransform::Uppercase => "uppercase",
            TextTransform::Lowercase => "lowercase",
            TextTransform::Capitalize => "capitalize",
        }
    }

    /// Short label for option buttons
    pub fn label(&self) -> &'static str {
        match self {
            TextTransform::None => "None",
            TextTransform::Uppercase => "Upper",
            TextTransform::Lowercase => "Lower",
            TextTransform::Capitalize => "Cap",
        }
    }

    /// Two-glyph sample showing the effect of the transform
    pub fn preview(&self) -> &'static str {
        match self {
            TextTransform::None => "Ag",
            TextTransform::Uppercase => "AA",
            TextTransform::Lowercase => "aa",
            TextTransform::Capitalize => "Aa",
        }
    }

    /// Apply the transform to `text`.
    ///
    /// For renderers without native case transforms. `Capitalize` upper-cases
    /// the first character of every whitespace-delimited word and leaves the
    /// rest untouched.
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Capitalize => {
                let mut out = String::with_capacity(text.len());
                let mut word_start = true;
                for c in text.chars() {
                    if c.is_whitespace() {
                        word_start = true;
                        out.push(c);
                    } else if word_start {
                        word_start = false;
                        out.extend(c.to_uppercase());
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

/// Horizontal alignment (`text-align`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub const ALL: [TextAlign; 4] = [
        TextAlign::Left,
        TextAlign::Center,
        TextAlign::Right,
        TextAlign::Justify,
    ];

    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    /// Tooltip text, e.g. "Align Center"
    pub fn title(&self) -> &'static str {
        match self {
            TextAlign::Left => "Align Left",
            TextAlign::Center => "Align Center",
            TextAlign::Right => "Align Right",
            TextAlign::Justify => "Align Justify",
        }
    }
}

/// Inline base direction (`direction`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Ltr, Direction::Rtl];

    pub fn as_css(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    /// Upper-case label ("LTR" / "RTL")
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Ltr => "LTR",
            Direction::Rtl => "RTL",
        }
    }
}

macro_rules! keyword_traits {
    ($ty:ident, $kind:literal) => {
        impl FromStr for $ty {
            type Err = StyleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|kw| kw.as_css().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| StyleError::UnknownKeyword {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_css())
            }
        }
    };
}

keyword_traits!(TextTransform, "text-transform");
keyword_traits!(TextAlign, "text-align");
keyword_traits!(Direction, "direction");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!("uppercase".parse::<TextTransform>().unwrap(), TextTransform::Uppercase);
        assert_eq!(" Justify ".parse::<TextAlign>().unwrap(), TextAlign::Justify);
        assert_eq!("RTL".parse::<Direction>().unwrap(), Direction::Rtl);
    }

    #[test]
    fn test_unknown_keyword() {
        let err = "sideways".parse::<Direction>().unwrap_err();
        assert!(matches!(err, StyleError::UnknownKeyword { kind: "direction", .. }));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(TextTransform::Capitalize.apply("the quick  brown"), "The Quick  Brown");
        assert_eq!(TextTransform::Capitalize.apply("mIxed 42nd"), "MIxed 42nd");
    }

    #[test]
    fn test_upper_lower() {
        assert_eq!(TextTransform::Uppercase.apply("Straße"), "STRASSE");
        assert_eq!(TextTransform::Lowercase.apply("ABC"), "abc");
        assert_eq!(TextTransform::None.apply("AbC"), "AbC");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TextAlign::Center).unwrap();
        assert_eq!(json, "\"center\"");
        let dir: Direction = serde_json::from_str("\"rtl\"").unwrap();
        assert_eq!(dir, Direction::Rtl);
    }
}
