//! Typographic settings record
//!
//! `Settings` is a small `Copy` record. Every change goes through
//! [`Settings::update`], which returns a new snapshot with exactly one field
//! replaced after the value has been clamped into that field's domain.

use serde::{Deserialize, Serialize};

use crate::{Direction, Result, StyleError, TextAlign, TextTransform};

/// Inclusive numeric domain of a setting plus its slider step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f32,
    pub max: f32,
    /// Slider granularity. Not enforced on stored values.
    pub step: f32,
}

impl NumericRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp `value` into the range. NaN has no place in the domain and
    /// yields `None`; infinities clamp to the nearest bound.
    pub fn clamp(&self, value: f32) -> Option<f32> {
        if value.is_nan() {
            None
        } else {
            Some(value.clamp(self.min, self.max))
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The numeric settings, used to address a field generically from input
/// controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    FontSize,
    Weight,
    LineHeight,
    LetterSpacing,
    WordSpacing,
}

impl NumericField {
    pub const ALL: [NumericField; 5] = [
        NumericField::FontSize,
        NumericField::Weight,
        NumericField::LineHeight,
        NumericField::LetterSpacing,
        NumericField::WordSpacing,
    ];

    pub fn range(&self) -> NumericRange {
        match self {
            NumericField::FontSize => NumericRange::new(8.0, 200.0, 1.0),
            NumericField::Weight => NumericRange::new(100.0, 900.0, 100.0),
            NumericField::LineHeight => NumericRange::new(0.8, 3.0, 0.05),
            NumericField::LetterSpacing => NumericRange::new(-10.0, 20.0, 0.1),
            NumericField::WordSpacing => NumericRange::new(-5.0, 50.0, 1.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NumericField::FontSize => "Size",
            NumericField::Weight => "Weight",
            NumericField::LineHeight => "Line Height",
            NumericField::LetterSpacing => "Letter Spacing",
            NumericField::WordSpacing => "Word Spacing",
        }
    }

    /// Display unit appended to the value, empty for unitless fields
    pub fn unit(&self) -> &'static str {
        match self {
            NumericField::FontSize | NumericField::LetterSpacing | NumericField::WordSpacing => {
                "px"
            }
            NumericField::Weight | NumericField::LineHeight => "",
        }
    }

    /// Coerce raw control input (slider or text box) into a number.
    pub fn parse_value(&self, raw: &str) -> Result<f32> {
        raw.trim()
            .parse::<f32>()
            .map_err(|_| StyleError::InvalidNumber {
                field: self.label(),
                value: raw.to_string(),
            })
    }

    /// Build the typed update for this field
    pub fn update(&self, value: f32) -> SettingUpdate {
        match self {
            NumericField::FontSize => SettingUpdate::FontSize(value),
            NumericField::Weight => SettingUpdate::Weight(value),
            NumericField::LineHeight => SettingUpdate::LineHeight(value),
            NumericField::LetterSpacing => SettingUpdate::LetterSpacing(value),
            NumericField::WordSpacing => SettingUpdate::WordSpacing(value),
        }
    }
}

/// A change to exactly one setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingUpdate {
    FontSize(f32),
    Weight(f32),
    LineHeight(f32),
    LetterSpacing(f32),
    WordSpacing(f32),
    Transform(TextTransform),
    Align(TextAlign),
    Direction(Direction),
}

/// Typographic settings snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSettings")]
pub struct Settings {
    /// Font size in pixels (8-200)
    pub font_size: u16,
    /// Font weight (100-900)
    pub weight: u16,
    /// Unitless line height multiplier (0.8-3.0)
    pub line_height: f32,
    /// Letter spacing in pixels (-10-20)
    pub letter_spacing: f32,
    /// Word spacing in pixels (-5-50)
    pub word_spacing: f32,
    pub transform: TextTransform,
    pub align: TextAlign,
    pub direction: Direction,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: 48,
            weight: 400,
            line_height: 1.5,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            transform: TextTransform::None,
            align: TextAlign::Left,
            direction: Direction::Ltr,
        }
    }
}

impl Settings {
    /// Return a copy with one field replaced.
    ///
    /// Numeric values are clamped into the field's range; a NaN leaves the
    /// field as it was.
    pub fn update(self, update: SettingUpdate) -> Self {
        let mut next = self;
        match update {
            SettingUpdate::FontSize(v) => {
                if let Some(v) = NumericField::FontSize.range().clamp(v) {
                    next.font_size = v.round() as u16;
                }
            }
            SettingUpdate::Weight(v) => {
                if let Some(v) = NumericField::Weight.range().clamp(v) {
                    next.weight = v.round() as u16;
                }
            }
            SettingUpdate::LineHeight(v) => {
                if let Some(v) = NumericField::LineHeight.range().clamp(v) {
                    next.line_height = v;
                }
            }
            SettingUpdate::LetterSpacing(v) => {
                if let Some(v) = NumericField::LetterSpacing.range().clamp(v) {
                    next.letter_spacing = v;
                }
            }
            SettingUpdate::WordSpacing(v) => {
                if let Some(v) = NumericField::WordSpacing.range().clamp(v) {
                    next.word_spacing = v;
                }
            }
            SettingUpdate::Transform(t) => next.transform = t,
            SettingUpdate::Align(a) => next.align = a,
            SettingUpdate::Direction(d) => next.direction = d,
        }
        if next != self {
            tracing::trace!(?update, "settings updated");
        }
        next
    }

    /// Current value of a numeric field
    pub fn numeric(&self, field: NumericField) -> f32 {
        match field {
            NumericField::FontSize => self.font_size as f32,
            NumericField::Weight => self.weight as f32,
            NumericField::LineHeight => self.line_height,
            NumericField::LetterSpacing => self.letter_spacing,
            NumericField::WordSpacing => self.word_spacing,
        }
    }

    /// True when every numeric field lies inside its domain
    pub fn is_within_domain(&self) -> bool {
        NumericField::ALL
            .iter()
            .all(|field| field.range().contains(self.numeric(*field)))
    }
}

/// Unchecked wire form; converted into `Settings` through the clamping path.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSettings {
    font_size: f32,
    weight: f32,
    line_height: f32,
    letter_spacing: f32,
    word_spacing: f32,
    transform: TextTransform,
    align: TextAlign,
    direction: Direction,
}

impl Default for RawSettings {
    fn default() -> Self {
        let d = Settings::default();
        Self {
            font_size: d.font_size as f32,
            weight: d.weight as f32,
            line_height: d.line_height,
            letter_spacing: d.letter_spacing,
            word_spacing: d.word_spacing,
            transform: d.transform,
            align: d.align,
            direction: d.direction,
        }
    }
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        [
            SettingUpdate::FontSize(raw.font_size),
            SettingUpdate::Weight(raw.weight),
            SettingUpdate::LineHeight(raw.line_height),
            SettingUpdate::LetterSpacing(raw.letter_spacing),
            SettingUpdate::WordSpacing(raw.word_spacing),
            SettingUpdate::Transform(raw.transform),
            SettingUpdate::Align(raw.align),
            SettingUpdate::Direction(raw.direction),
        ]
        .into_iter()
        .fold(Settings::default(), Settings::update)
    }
}
