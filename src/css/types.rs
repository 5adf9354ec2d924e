//! Core CSS declaration types
//!
//! A [`Declaration`] is one (property, value, importance) tuple as contributed
//! by a style rule, inline style, or an animation/transition tick. The cascade
//! consumes declarations together with their origin and specificity; painting
//! consumes the computed values that fall out.

use crate::css::properties::parse_property_value;
use crate::style::color::Rgba;
use crate::style::types::Length;
use std::fmt;

/// A parsed CSS property value
///
/// Values are parsed per-property where the grammar is known. Values that
/// still contain `var()` references stay as [`PropertyValue::Pending`] until
/// substitution happens at apply time.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
  /// A resolved color
  Color(Rgba),
  /// A length with unit
  Length(Length),
  /// A percentage (0-100 scale, as authored)
  Percentage(f32),
  /// A unitless number
  Number(f32),
  /// An integer (z-index, spans)
  Integer(i32),
  /// An identifier-like keyword the property grammar accepts
  Keyword(String),
  /// A whitespace-separated list of values
  Multiple(Vec<PropertyValue>),
  /// Raw custom property token text, stored unparsed
  Custom(String),
  /// A value containing unsubstituted var() references
  ///
  /// The raw token text is kept so substitution can re-tokenize it.
  Pending(String),
}

impl PropertyValue {
  /// Returns the keyword string if this is a keyword value
  pub fn as_keyword(&self) -> Option<&str> {
    match self {
      PropertyValue::Keyword(kw) => Some(kw),
      _ => None,
    }
  }

  /// Returns true if substitution is still required before this value
  /// can be applied
  pub fn is_pending(&self) -> bool {
    matches!(self, PropertyValue::Pending(_))
  }
}

/// The CSS-wide keywords accepted by every property
///
/// Reference: CSS Cascading and Inheritance Level 4, §7.3
/// <https://www.w3.org/TR/css-cascade-4/#defaulting-keywords>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssWideKeyword {
  /// Reset to the property's initial value
  Initial,
  /// Take the parent's computed value
  Inherit,
  /// `inherit` for inherited properties, `initial` otherwise
  Unset,
  /// Roll back to the winner from the next-lower cascade origin
  Revert,
}

impl CssWideKeyword {
  /// Parses a CSS-wide keyword, ignoring surrounding whitespace and case
  pub fn parse(text: &str) -> Option<Self> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("initial") {
      Some(CssWideKeyword::Initial)
    } else if trimmed.eq_ignore_ascii_case("inherit") {
      Some(CssWideKeyword::Inherit)
    } else if trimmed.eq_ignore_ascii_case("unset") {
      Some(CssWideKeyword::Unset)
    } else if trimmed.eq_ignore_ascii_case("revert") {
      Some(CssWideKeyword::Revert)
    } else {
      None
    }
  }
}

impl fmt::Display for CssWideKeyword {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      CssWideKeyword::Initial => "initial",
      CssWideKeyword::Inherit => "inherit",
      CssWideKeyword::Unset => "unset",
      CssWideKeyword::Revert => "revert",
    };
    f.write_str(s)
  }
}

/// A single CSS property declaration
///
/// # Examples
///
/// ```
/// use stylecast::css::Declaration;
///
/// let decl = Declaration::parse("color", "red", false);
/// assert_eq!(decl.property, "color");
/// assert!(!decl.important);
///
/// let decl = Declaration::parse("width", "var(--w, 10px)", false);
/// assert!(decl.value.is_pending());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
  /// Property name, lowercased for native properties; custom property
  /// names (`--x`) keep their authored case
  pub property: String,
  /// Parsed value, or `Pending` when substitution is required
  pub value: PropertyValue,
  /// Raw token string as authored (after stripping !important/semicolon).
  /// Used for custom properties and for re-substitution.
  pub raw_value: String,
  pub important: bool,
}

impl Declaration {
  /// Creates a declaration from an already-parsed value
  pub fn new(property: impl Into<String>, value: PropertyValue, raw_value: impl Into<String>, important: bool) -> Self {
    Self {
      property: property.into(),
      value,
      raw_value: raw_value.into(),
      important,
    }
  }

  /// Parses a declaration from property name and raw value text
  ///
  /// Custom properties store their token text verbatim. Values containing
  /// `var()` references are kept as [`PropertyValue::Pending`] for
  /// substitution at apply time. Anything the property grammar rejects
  /// falls back to a keyword so the cascade can still carry it.
  pub fn parse(property: &str, raw_value: &str, important: bool) -> Self {
    let raw_value = raw_value.trim();
    let property = if property.starts_with("--") {
      property.to_string()
    } else {
      property.to_ascii_lowercase()
    };

    let value = if property.starts_with("--") {
      PropertyValue::Custom(raw_value.to_string())
    } else if crate::style::var_resolution::contains_var(raw_value) {
      PropertyValue::Pending(raw_value.to_string())
    } else {
      parse_property_value(&property, raw_value).unwrap_or_else(|| PropertyValue::Keyword(raw_value.to_string()))
    };

    Self {
      property,
      value,
      raw_value: raw_value.to_string(),
      important,
    }
  }

  /// Returns true if this declares a custom property (`--x`)
  pub fn is_custom_property(&self) -> bool {
    self.property.starts_with("--")
  }

  /// Returns the CSS-wide keyword if the declared value is one
  pub fn css_wide_keyword(&self) -> Option<CssWideKeyword> {
    CssWideKeyword::parse(&self.raw_value)
  }
}
