//! Edge case tests for typelab-style
//!
//! Settings clamping, projection of empty and odd inputs.

use typelab_style::{
    ActiveFont, Direction, FALLBACK_FAMILY, FontFamily, NumericField, SYSTEM_FONT_LABEL,
    SampleText, SettingUpdate, Settings, TextAlign, TextTransform, project,
};

fn font<'a>() -> ActiveFont<'a> {
    ActiveFont {
        family: "Font_lx1_0",
        file_name: "Inter-Regular.ttf",
        format: "ttf",
    }
}

// ============================================================================
// SETTINGS UPDATES
// ============================================================================

#[test]
fn test_update_touches_only_target_field() {
    let base = Settings::default();
    let values = [-1.0e6_f32, -3.0, 0.0, 0.5, 1.0, 12.5, 75.0, 450.0, 1.0e6];

    for field in NumericField::ALL {
        for value in values {
            let next = base.update(field.update(value));
            assert!(next.is_within_domain(), "{field:?} = {value} escaped its domain");

            for other in NumericField::ALL.iter().filter(|f| **f != field) {
                assert_eq!(next.numeric(*other), base.numeric(*other));
            }
            assert_eq!(next.transform, base.transform);
            assert_eq!(next.align, base.align);
            assert_eq!(next.direction, base.direction);
        }
    }
}

#[test]
fn test_keyword_updates() {
    let s = Settings::default()
        .update(SettingUpdate::Transform(TextTransform::Uppercase))
        .update(SettingUpdate::Align(TextAlign::Justify))
        .update(SettingUpdate::Direction(Direction::Rtl));

    assert_eq!(s.transform, TextTransform::Uppercase);
    assert_eq!(s.align, TextAlign::Justify);
    assert_eq!(s.direction, Direction::Rtl);
    assert_eq!(s.font_size, Settings::default().font_size);
}

#[test]
fn test_update_returns_new_snapshot() {
    let before = Settings::default();
    let after = before.update(SettingUpdate::FontSize(96.0));
    assert_eq!(before.font_size, 48);
    assert_eq!(after.font_size, 96);
}

#[test]
fn test_font_size_rounds_to_integer() {
    let s = Settings::default().update(SettingUpdate::FontSize(12.6));
    assert_eq!(s.font_size, 13);
}

#[test]
fn test_ranges_match_controls() {
    let size = NumericField::FontSize.range();
    assert_eq!((size.min, size.max), (8.0, 200.0));
    let weight = NumericField::Weight.range();
    assert_eq!(weight.step, 100.0);
    assert_eq!(NumericField::LetterSpacing.unit(), "px");
    assert_eq!(NumericField::LineHeight.unit(), "");
}

// ============================================================================
// PROJECTION
// ============================================================================

#[test]
fn test_project_empty_without_font() {
    let style = project(&Settings::default(), None, "");
    assert_eq!(style.char_count, 0);
    assert_eq!(style.word_count, 0);
    assert_eq!(style.family, FontFamily::Fallback);
    assert_eq!(style.family.name(), FALLBACK_FAMILY);
    assert_eq!(style.source_label, SYSTEM_FONT_LABEL);
    assert!(style.format.is_none());
}

#[test]
fn test_project_with_font() {
    let style = project(&Settings::default(), Some(font()), "The quick brown fox");
    assert_eq!(style.word_count, 4);
    assert_eq!(style.char_count, 19);
    assert_eq!(style.family.name(), "Font_lx1_0");
    assert_eq!(style.source_label, "Inter-Regular.ttf");
    assert_eq!(style.format.as_deref(), Some("ttf"));
}

#[test]
fn test_project_collapses_whitespace() {
    let style = project(&Settings::default(), None, "  a   b  ");
    assert_eq!(style.word_count, 2);
    assert_eq!(style.char_count, 9);
}

#[test]
fn test_project_maps_settings() {
    let settings = Settings::default()
        .update(SettingUpdate::Weight(700.0))
        .update(SettingUpdate::LetterSpacing(1.5))
        .update(SettingUpdate::Direction(Direction::Rtl));
    let style = project(&settings, None, "abc");

    assert_eq!(style.weight, 700);
    assert_eq!(style.letter_spacing, 1.5);
    assert_eq!(style.direction, Direction::Rtl);
    assert_eq!(style.line_height, settings.line_height);
}

#[test]
fn test_to_css() {
    let style = project(&Settings::default(), Some(font()), "x");
    let css = style.to_css();
    assert!(css.starts_with("font-family: \"Font_lx1_0\"; font-size: 48px; line-height: 1.5;"));
    assert!(css.contains("font-weight: 400;"));
    assert!(css.ends_with("direction: ltr;"));

    let fallback = project(&Settings::default(), None, "x").to_css();
    assert!(fallback.starts_with("font-family: sans-serif;"));
}

#[test]
fn test_footer() {
    let settings = Settings::default().update(SettingUpdate::Direction(Direction::Rtl));
    let style = project(&settings, None, SampleText::Heading.text());
    assert_eq!(style.footer(), "Glyphs: 37 | Words: 7 | RTL");
}
