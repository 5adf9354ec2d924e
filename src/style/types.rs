//! Style value types
//!
//! Computed-value-level types shared by the cascade and the painter.
//! These are deliberately concrete: by the time painting happens every
//! length is resolvable to pixels and every color is RGBA.

use crate::geometry::Size;
use crate::style::color::Rgba;
use serde::Serialize;
use std::fmt;

/// Units a [`Length`] can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
  /// CSS pixels
  Px,
  /// Relative to the element's font size
  Em,
  /// Relative to the root element's font size
  Rem,
  /// Points (1pt = 4/3 px)
  Pt,
  /// Centimeters
  Cm,
  /// Millimeters
  Mm,
  /// Inches (1in = 96px)
  In,
  /// Picas (1pc = 16px)
  Pc,
  /// Quarter-millimeters
  Q,
  /// 1% of viewport width
  Vw,
  /// 1% of viewport height
  Vh,
  /// Percentage of a context-dependent base
  Percent,
}

impl LengthUnit {
  /// Returns true for units with a fixed pixel ratio
  pub fn is_absolute(self) -> bool {
    matches!(
      self,
      LengthUnit::Px | LengthUnit::Pt | LengthUnit::Cm | LengthUnit::Mm | LengthUnit::In | LengthUnit::Pc | LengthUnit::Q
    )
  }
}

/// A CSS length: value plus unit
///
/// # Examples
///
/// ```
/// use stylecast::{Length, LengthUnit};
/// use stylecast::Size;
///
/// let em = Length::new(2.0, LengthUnit::Em);
/// assert_eq!(em.resolve(16.0, 16.0, Size::ZERO), Some(32.0));
///
/// let pct = Length::new(50.0, LengthUnit::Percent);
/// assert_eq!(pct.resolve(16.0, 16.0, Size::ZERO), None);
/// assert_eq!(pct.resolve_against(200.0, 16.0, 16.0, Size::ZERO), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
  /// The numeric value
  pub value: f32,
  /// The unit
  pub unit: LengthUnit,
}

impl Length {
  /// Creates a new length with the given value and unit
  pub const fn new(value: f32, unit: LengthUnit) -> Self {
    Self { value, unit }
  }

  /// Creates a pixel length
  pub const fn px(value: f32) -> Self {
    Self::new(value, LengthUnit::Px)
  }

  /// A zero pixel length
  pub const ZERO: Self = Self::px(0.0);

  /// Resolves this length to pixels
  ///
  /// Returns `None` for percentages, whose base depends on the property.
  pub fn resolve(self, font_size: f32, root_font_size: f32, viewport: Size) -> Option<f32> {
    let px = match self.unit {
      LengthUnit::Px => self.value,
      LengthUnit::Em => self.value * font_size,
      LengthUnit::Rem => self.value * root_font_size,
      LengthUnit::Pt => self.value * 4.0 / 3.0,
      LengthUnit::In => self.value * 96.0,
      LengthUnit::Cm => self.value * 96.0 / 2.54,
      LengthUnit::Mm => self.value * 96.0 / 25.4,
      LengthUnit::Q => self.value * 96.0 / 101.6,
      LengthUnit::Pc => self.value * 16.0,
      LengthUnit::Vw => self.value * viewport.width / 100.0,
      LengthUnit::Vh => self.value * viewport.height / 100.0,
      LengthUnit::Percent => return None,
    };
    Some(px)
  }

  /// Resolves this length to pixels, using `base` for percentages
  pub fn resolve_against(self, base: f32, font_size: f32, root_font_size: f32, viewport: Size) -> f32 {
    match self.unit {
      LengthUnit::Percent => self.value / 100.0 * base,
      _ => self.resolve(font_size, root_font_size, viewport).unwrap_or(0.0),
    }
  }
}

impl fmt::Display for Length {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let unit = match self.unit {
      LengthUnit::Px => "px",
      LengthUnit::Em => "em",
      LengthUnit::Rem => "rem",
      LengthUnit::Pt => "pt",
      LengthUnit::Cm => "cm",
      LengthUnit::Mm => "mm",
      LengthUnit::In => "in",
      LengthUnit::Pc => "pc",
      LengthUnit::Q => "q",
      LengthUnit::Vw => "vw",
      LengthUnit::Vh => "vh",
      LengthUnit::Percent => "%",
    };
    write!(f, "{}{}", self.value, unit)
  }
}

/// The outer display type, reduced to what painting distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
  None,
  #[default]
  Block,
  Inline,
  InlineBlock,
  FlowRoot,
  ListItem,
  Table,
  TableRowGroup,
  TableHeaderGroup,
  TableFooterGroup,
  TableRow,
  TableCell,
}

impl Display {
  /// Parses a display keyword, `None` for unsupported values
  pub fn parse(kw: &str) -> Option<Self> {
    Some(match kw {
      "none" => Display::None,
      "block" => Display::Block,
      "inline" => Display::Inline,
      "inline-block" => Display::InlineBlock,
      "flow-root" => Display::FlowRoot,
      "list-item" => Display::ListItem,
      "table" => Display::Table,
      "table-row-group" => Display::TableRowGroup,
      "table-header-group" => Display::TableHeaderGroup,
      "table-footer-group" => Display::TableFooterGroup,
      "table-row" => Display::TableRow,
      "table-cell" => Display::TableCell,
      _ => return None,
    })
  }

  /// Returns true for display types that generate atomic inline boxes
  pub fn is_atomic_inline(self) -> bool {
    matches!(self, Display::InlineBlock)
  }
}

/// CSS positioning schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
  #[default]
  Static,
  Relative,
  Absolute,
  Fixed,
  Sticky,
}

impl Position {
  pub fn parse(kw: &str) -> Option<Self> {
    Some(match kw {
      "static" => Position::Static,
      "relative" => Position::Relative,
      "absolute" => Position::Absolute,
      "fixed" => Position::Fixed,
      "sticky" => Position::Sticky,
      _ => return None,
    })
  }

  /// Returns true for any scheme other than static
  pub fn is_positioned(self) -> bool {
    !matches!(self, Position::Static)
  }
}

/// CSS float values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Float {
  #[default]
  None,
  Left,
  Right,
}

impl Float {
  pub fn parse(kw: &str) -> Option<Self> {
    Some(match kw {
      "none" => Float::None,
      "left" => Float::Left,
      "right" => Float::Right,
      _ => return None,
    })
  }

  pub fn is_floating(self) -> bool {
    !matches!(self, Float::None)
  }
}

/// Overflow behavior for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
  #[default]
  Visible,
  Hidden,
  Clip,
  Scroll,
  Auto,
}

impl Overflow {
  pub fn parse(kw: &str) -> Option<Self> {
    Some(match kw {
      "visible" => Overflow::Visible,
      "hidden" => Overflow::Hidden,
      "clip" => Overflow::Clip,
      "scroll" => Overflow::Scroll,
      "auto" => Overflow::Auto,
      _ => return None,
    })
  }

  /// Returns true when descendants are clipped to the padding box
  pub fn clips(self) -> bool {
    !matches!(self, Overflow::Visible)
  }

  /// Returns true when the box is a scroll container
  pub fn is_scrollable(self) -> bool {
    matches!(self, Overflow::Scroll | Overflow::Auto)
  }
}

/// Visibility of a box and its contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
  #[default]
  Visible,
  Hidden,
  Collapse,
}

impl Visibility {
  pub fn parse(kw: &str) -> Option<Self> {
    Some(match kw {
      "visible" => Visibility::Visible,
      "hidden" => Visibility::Hidden,
      "collapse" => Visibility::Collapse,
      _ => return None,
    })
  }
}

/// Whether a box participates in hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerEvents {
  #[default]
  Auto,
  None,
}

/// Blend modes supported by the display list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MixBlendMode {
  #[default]
  Normal,
  Multiply,
  Screen,
  Overlay,
  Darken,
  Lighten,
  Difference,
  Exclusion,
}

impl MixBlendMode {
  pub fn parse(kw: &str) -> Option<Self> {
    Some(match kw {
      "normal" => MixBlendMode::Normal,
      "multiply" => MixBlendMode::Multiply,
      "screen" => MixBlendMode::Screen,
      "overlay" => MixBlendMode::Overlay,
      "darken" => MixBlendMode::Darken,
      "lighten" => MixBlendMode::Lighten,
      "difference" => MixBlendMode::Difference,
      "exclusion" => MixBlendMode::Exclusion,
      _ => return None,
    })
  }
}

/// Border collapsing model for tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderCollapse {
  #[default]
  Separate,
  Collapse,
}

/// Line styles for borders and outlines
///
/// The discriminant order encodes the collapsed-border style rank used by
/// conflict resolution: higher wins at equal width. `Hidden` sits above
/// everything because it suppresses the edge entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum BorderStyle {
  #[default]
  None,
  Inset,
  Groove,
  Outset,
  Ridge,
  Dotted,
  Dashed,
  Solid,
  Double,
  Hidden,
}

impl BorderStyle {
  pub fn parse(kw: &str) -> Option<Self> {
    Some(match kw {
      "none" => BorderStyle::None,
      "hidden" => BorderStyle::Hidden,
      "dotted" => BorderStyle::Dotted,
      "dashed" => BorderStyle::Dashed,
      "solid" => BorderStyle::Solid,
      "double" => BorderStyle::Double,
      "groove" => BorderStyle::Groove,
      "ridge" => BorderStyle::Ridge,
      "inset" => BorderStyle::Inset,
      "outset" => BorderStyle::Outset,
      _ => return None,
    })
  }

  /// Returns true if an edge with this style draws anything
  pub fn is_visible(self) -> bool {
    !matches!(self, BorderStyle::None | BorderStyle::Hidden)
  }
}

/// One computed border edge: width, style, color
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderSide {
  /// Used width in pixels (zero when the style is none/hidden)
  pub width: f32,
  pub style: BorderStyle,
  pub color: Rgba,
}

impl Default for BorderSide {
  fn default() -> Self {
    Self {
      width: 0.0,
      style: BorderStyle::None,
      color: Rgba::BLACK,
    }
  }
}

impl BorderSide {
  /// Returns true if this edge paints
  pub fn is_visible(&self) -> bool {
    self.width > 0.0 && self.style.is_visible() && !self.color.is_transparent()
  }
}
