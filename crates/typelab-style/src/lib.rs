//! TypeLab Style
//!
//! The typographic half of the preview:
//! - Settings record with clamped numeric domains
//! - Keyword properties (transform, align, direction)
//! - Preview projection into a flat style descriptor
//! - Built-in sample texts

pub mod keywords;
pub mod projector;
pub mod samples;
pub mod settings;

pub use keywords::{Direction, TextAlign, TextTransform};
pub use projector::{
    ActiveFont, FALLBACK_FAMILY, FontFamily, SYSTEM_FONT_LABEL, StyleDescriptor, char_count,
    project, word_count,
};
pub use samples::SampleText;
pub use settings::{NumericField, NumericRange, SettingUpdate, Settings};

/// Style error types
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Unknown {kind} keyword: {value}")]
    UnknownKeyword { kind: &'static str, value: String },

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, StyleError>;
