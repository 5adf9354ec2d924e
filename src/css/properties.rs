//! CSS property value parsing
//!
//! Parses individual property values into [`PropertyValue`]s. This is the
//! same parser the `var()` substitution machinery uses to re-parse a
//! substituted token stream, so it must accept exactly what the cascade can
//! apply.

use crate::css::types::PropertyValue;
use crate::style::color::Rgba;
use crate::style::types::{Length, LengthUnit};

/// Parse a CSS property value
///
/// Returns `None` when the value doesn't fit the property's grammar, which
/// makes the declaration invalid at computed-value time when it arrived via
/// substitution.
pub fn parse_property_value(property: &str, value_str: &str) -> Option<PropertyValue> {
    // Custom properties store their tokens verbatim.
    if property.starts_with("--") {
        return Some(PropertyValue::Custom(value_str.to_string()));
    }

    let value_str = value_str.trim();
    if value_str.is_empty() {
        return None;
    }

    if is_color_property(property) {
        return parse_color_value(value_str);
    }

    match property {
        "border-top-width" | "border-right-width" | "border-bottom-width" | "border-left-width"
        | "outline-width" => parse_line_width(value_str).map(PropertyValue::Length),

        "border-top-style" | "border-right-style" | "border-bottom-style" | "border-left-style"
        | "outline-style" => parse_keyword_of(
            value_str,
            &[
                "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
            ],
        ),

        "opacity" => parse_opacity(value_str),

        "z-index" => parse_z_index(value_str),

        "display" => parse_keyword_of(
            value_str,
            &[
                "none",
                "block",
                "inline",
                "inline-block",
                "flow-root",
                "table",
                "table-row-group",
                "table-header-group",
                "table-footer-group",
                "table-row",
                "table-cell",
                "list-item",
            ],
        ),

        "position" => parse_keyword_of(value_str, &["static", "relative", "absolute", "fixed", "sticky"]),

        "float" => parse_keyword_of(value_str, &["none", "left", "right"]),

        "overflow-x" | "overflow-y" => parse_keyword_of(value_str, &["visible", "hidden", "clip", "scroll", "auto"]),

        "visibility" => parse_keyword_of(value_str, &["visible", "hidden", "collapse"]),

        "pointer-events" => parse_keyword_of(value_str, &["auto", "none"]),

        "isolation" => parse_keyword_of(value_str, &["auto", "isolate"]),

        "border-collapse" => parse_keyword_of(value_str, &["separate", "collapse"]),

        "mix-blend-mode" => parse_keyword_of(
            value_str,
            &[
                "normal", "multiply", "screen", "overlay", "darken", "lighten", "difference", "exclusion",
            ],
        ),

        "background-clip" => parse_keyword_of(value_str, &["border-box", "padding-box", "content-box", "text"]),

        // Mask images keep their token text; painting only needs to know
        // whether a mask is present and what geometry keyword applies.
        "mask-image" | "-webkit-mask-image" => Some(PropertyValue::Keyword(value_str.to_string())),

        "width" | "height" | "font-size" | "outline-offset" | "letter-spacing" | "border-spacing"
        | "border-top-left-radius" | "border-top-right-radius" | "border-bottom-right-radius"
        | "border-bottom-left-radius" => {
            if property == "width" || property == "height" {
                if value_str.eq_ignore_ascii_case("auto") {
                    return Some(PropertyValue::Keyword("auto".to_string()));
                }
            }
            parse_length_or_percentage(value_str)
        }

        // Unknown properties carry their value as a keyword so the cascade
        // can still record and revert them.
        _ => Some(PropertyValue::Keyword(value_str.to_string())),
    }
}

fn is_color_property(property: &str) -> bool {
    matches!(
        property,
        "color"
            | "background-color"
            | "border-top-color"
            | "border-right-color"
            | "border-bottom-color"
            | "border-left-color"
            | "outline-color"
    )
}

fn parse_color_value(value_str: &str) -> Option<PropertyValue> {
    if value_str.eq_ignore_ascii_case("currentcolor") {
        return Some(PropertyValue::Keyword("currentcolor".to_string()));
    }
    // `invert` is only valid on outline-color; accepting it generally is
    // harmless because the apply step maps it through currentColor.
    if value_str.eq_ignore_ascii_case("invert") {
        return Some(PropertyValue::Keyword("currentcolor".to_string()));
    }
    let color = csscolorparser::parse(value_str).ok()?;
    Some(PropertyValue::Color(Rgba::new(
        (color.r * 255.0).round() as u8,
        (color.g * 255.0).round() as u8,
        (color.b * 255.0).round() as u8,
        color.a,
    )))
}

/// Parse a `<line-width>`: a length or thin/medium/thick
///
/// The keyword widths use the same pixel values UAs converged on.
pub fn parse_line_width(s: &str) -> Option<Length> {
    match s.to_ascii_lowercase().as_str() {
        "thin" => return Some(Length::px(1.0)),
        "medium" => return Some(Length::px(3.0)),
        "thick" => return Some(Length::px(5.0)),
        _ => {}
    }
    let length = parse_length(s)?;
    if length.value < 0.0 {
        return None;
    }
    Some(length)
}

/// Parse a CSS length with unit
///
/// Unitless zero is accepted as `0px`; other unitless numbers are rejected
/// per the CSS grammar.
pub fn parse_length(s: &str) -> Option<Length> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(num) = s.parse::<f32>() {
        if num == 0.0 {
            return Some(Length::px(0.0));
        }
        return None;
    }

    let lower = s.to_ascii_lowercase();
    for (suffix, unit) in [
        ("vw", LengthUnit::Vw),
        ("vh", LengthUnit::Vh),
        ("rem", LengthUnit::Rem),
        ("em", LengthUnit::Em),
        ("px", LengthUnit::Px),
        ("pc", LengthUnit::Pc),
        ("pt", LengthUnit::Pt),
        ("cm", LengthUnit::Cm),
        ("mm", LengthUnit::Mm),
        ("q", LengthUnit::Q),
        ("in", LengthUnit::In),
        ("%", LengthUnit::Percent),
    ] {
        if let Some(rest) = lower.strip_suffix(suffix) {
            if let Ok(value) = rest.trim().parse::<f32>() {
                return Some(Length::new(value, unit));
            }
        }
    }

    None
}

fn parse_length_or_percentage(s: &str) -> Option<PropertyValue> {
    let length = parse_length(s)?;
    if length.unit == LengthUnit::Percent {
        Some(PropertyValue::Percentage(length.value))
    } else {
        Some(PropertyValue::Length(length))
    }
}

fn parse_opacity(s: &str) -> Option<PropertyValue> {
    if let Some(stripped) = s.strip_suffix('%') {
        if let Ok(pct) = stripped.trim().parse::<f32>() {
            return Some(PropertyValue::Number((pct / 100.0).clamp(0.0, 1.0)));
        }
        return None;
    }
    s.parse::<f32>().ok().map(|n| PropertyValue::Number(n.clamp(0.0, 1.0)))
}

fn parse_z_index(s: &str) -> Option<PropertyValue> {
    if s.eq_ignore_ascii_case("auto") {
        return Some(PropertyValue::Keyword("auto".to_string()));
    }
    s.parse::<i32>().ok().map(PropertyValue::Integer)
}

fn parse_keyword_of(s: &str, keywords: &[&str]) -> Option<PropertyValue> {
    let lower = s.to_ascii_lowercase();
    if keywords.contains(&lower.as_str()) {
        Some(PropertyValue::Keyword(lower))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_named_colors() {
        assert!(matches!(
            parse_property_value("color", "#ff0000"),
            Some(PropertyValue::Color(c)) if c.r == 255 && c.g == 0
        ));
        assert!(matches!(
            parse_property_value("background-color", "rebeccapurple"),
            Some(PropertyValue::Color(_))
        ));
        assert!(parse_property_value("color", "notacolor").is_none());
    }

    #[test]
    fn currentcolor_is_preserved_as_keyword() {
        assert!(matches!(
            parse_property_value("border-top-color", "currentColor"),
            Some(PropertyValue::Keyword(ref kw)) if kw == "currentcolor"
        ));
    }

    #[test]
    fn line_width_keywords_map_to_pixels() {
        assert_eq!(parse_line_width("thin"), Some(Length::px(1.0)));
        assert_eq!(parse_line_width("medium"), Some(Length::px(3.0)));
        assert_eq!(parse_line_width("thick"), Some(Length::px(5.0)));
        assert_eq!(parse_line_width("2px"), Some(Length::px(2.0)));
        assert!(parse_line_width("-1px").is_none());
    }

    #[test]
    fn unitless_nonzero_lengths_are_rejected() {
        assert_eq!(parse_length("0"), Some(Length::px(0.0)));
        assert!(parse_length("10").is_none());
        assert_eq!(parse_length("1.5em"), Some(Length::new(1.5, LengthUnit::Em)));
    }

    #[test]
    fn opacity_accepts_numbers_and_percentages() {
        assert!(matches!(
            parse_property_value("opacity", "0.5"),
            Some(PropertyValue::Number(n)) if (n - 0.5).abs() < f32::EPSILON
        ));
        assert!(matches!(
            parse_property_value("opacity", "40%"),
            Some(PropertyValue::Number(n)) if (n - 0.4).abs() < f32::EPSILON
        ));
        assert!(matches!(
            parse_property_value("opacity", "2.0"),
            Some(PropertyValue::Number(n)) if n == 1.0
        ));
    }

    #[test]
    fn z_index_parses_integers_and_auto() {
        assert_eq!(parse_property_value("z-index", "3"), Some(PropertyValue::Integer(3)));
        assert_eq!(parse_property_value("z-index", "-1"), Some(PropertyValue::Integer(-1)));
        assert!(matches!(
            parse_property_value("z-index", "auto"),
            Some(PropertyValue::Keyword(ref kw)) if kw == "auto"
        ));
        assert!(parse_property_value("z-index", "1.5").is_none());
    }

    #[test]
    fn border_style_keywords_validate() {
        assert!(parse_property_value("border-top-style", "solid").is_some());
        assert!(parse_property_value("border-top-style", "wavy").is_none());
    }

    #[test]
    fn width_accepts_auto_lengths_and_percentages() {
        assert!(matches!(
            parse_property_value("width", "auto"),
            Some(PropertyValue::Keyword(ref kw)) if kw == "auto"
        ));
        assert!(matches!(
            parse_property_value("width", "50%"),
            Some(PropertyValue::Percentage(p)) if p == 50.0
        ));
        assert!(matches!(
            parse_property_value("width", "120px"),
            Some(PropertyValue::Length(_))
        ));
    }
}
