//! Control surface
//!
//! Turns raw control input into session operations. The only logic here is
//! input normalization: strings from sliders and text boxes become numbers,
//! keyword strings become typed values, picked files become an upload batch.

use typelab_fonts::{FontId, PickedFile};
use typelab_style::{
    Direction, NumericField, NumericRange, SampleText, SettingUpdate, Settings, StyleError,
    TextAlign, TextTransform,
};

/// A user action on the control panel
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Raw value from a slider or number box
    Numeric { field: NumericField, raw: String },
    Transform(TextTransform),
    Align(TextAlign),
    Direction(Direction),
    SelectFont(FontId),
    /// Replace the preview text
    EditText(String),
    UseSample(SampleText),
    /// Files chosen in the file picker
    Upload(Vec<PickedFile>),
}

impl Intent {
    /// Intent for a keyword control addressed by property name
    /// ("transform", "align" or "direction").
    pub fn keyword(property: &str, value: &str) -> Result<Self, StyleError> {
        match property {
            "transform" | "text-transform" => Ok(Intent::Transform(value.parse()?)),
            "align" | "text-align" => Ok(Intent::Align(value.parse()?)),
            "direction" => Ok(Intent::Direction(value.parse()?)),
            other => Err(StyleError::UnknownKeyword {
                kind: "property",
                value: other.to_string(),
            }),
        }
    }

    /// The settings change this intent carries, if it is a settings intent.
    ///
    /// Unparseable numeric input yields `None` and is dropped.
    pub fn setting_update(&self) -> Option<SettingUpdate> {
        match self {
            Intent::Numeric { field, raw } => match field.parse_value(raw) {
                Ok(value) => Some(field.update(value)),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring numeric input");
                    None
                }
            },
            Intent::Transform(t) => Some(SettingUpdate::Transform(*t)),
            Intent::Align(a) => Some(SettingUpdate::Align(*a)),
            Intent::Direction(d) => Some(SettingUpdate::Direction(*d)),
            Intent::SelectFont(_)
            | Intent::EditText(_)
            | Intent::UseSample(_)
            | Intent::Upload(_) => None,
        }
    }
}

/// Description of one numeric slider
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub field: NumericField,
    pub label: &'static str,
    pub range: NumericRange,
    pub unit: &'static str,
    pub value: f32,
}

impl Slider {
    /// Value with its unit, e.g. "48px"
    pub fn display_value(&self) -> String {
        format!("{}{}", self.value, self.unit)
    }
}

/// Sliders for every numeric setting, in panel order
pub fn sliders(settings: &Settings) -> Vec<Slider> {
    NumericField::ALL
        .iter()
        .map(|field| Slider {
            field: *field,
            label: field.label(),
            range: field.range(),
            unit: field.unit(),
            value: settings.numeric(*field),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        let intent = Intent::Numeric {
            field: NumericField::FontSize,
            raw: "72".into(),
        };
        assert_eq!(intent.setting_update(), Some(SettingUpdate::FontSize(72.0)));

        let junk = Intent::Numeric {
            field: NumericField::LineHeight,
            raw: "abc".into(),
        };
        assert_eq!(junk.setting_update(), None);
    }

    #[test]
    fn test_keyword_intent() {
        assert_eq!(
            Intent::keyword("align", "center").unwrap(),
            Intent::Align(TextAlign::Center)
        );
        assert!(Intent::keyword("direction", "up").is_err());
        assert!(Intent::keyword("color", "red").is_err());
    }

    #[test]
    fn test_non_setting_intents() {
        let upload = Intent::Upload(vec![PickedFile::from(typelab_fonts::DiskFile::new("a.ttf"))]);
        assert_eq!(upload.setting_update(), None);
        assert_eq!(Intent::EditText("x".into()).setting_update(), None);
    }

    #[test]
    fn test_sliders() {
        let sliders = sliders(&Settings::default());
        assert_eq!(sliders.len(), 5);
        assert_eq!(sliders[0].label, "Size");
        assert_eq!(sliders[0].display_value(), "48px");
        assert_eq!(sliders[1].display_value(), "400");
        assert_eq!(sliders[2].display_value(), "1.5");
    }
}
