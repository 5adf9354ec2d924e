//! Longhand property application
//!
//! [`PropertyId`] enumerates the native longhands the cascade can apply,
//! together with the per-property metadata defaulting needs: whether the
//! property inherits, how to apply its initial value, and how to copy the
//! parent's computed value for `inherit`.
//!
//! Shorthands are expanded upstream; only longhands reach the cascade.

use crate::css::types::PropertyValue;
use crate::geometry::Size;
use crate::style::color::Rgba;
use crate::style::computed::{BackgroundClip, ComputedStyle};
use crate::style::types::{
  BorderCollapse, BorderStyle, Display, Float, Length, MixBlendMode, Overflow, PointerEvents, Position, Visibility,
};

/// Identifier for every native longhand the cascade understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
  Color,
  FontSize,
  Visibility,
  PointerEvents,
  BorderCollapse,
  LetterSpacing,
  Display,
  Position,
  Float,
  Width,
  Height,
  OverflowX,
  OverflowY,
  BackgroundColor,
  BackgroundClip,
  BorderTopWidth,
  BorderRightWidth,
  BorderBottomWidth,
  BorderLeftWidth,
  BorderTopStyle,
  BorderRightStyle,
  BorderBottomStyle,
  BorderLeftStyle,
  BorderTopColor,
  BorderRightColor,
  BorderBottomColor,
  BorderLeftColor,
  BorderTopLeftRadius,
  BorderTopRightRadius,
  BorderBottomRightRadius,
  BorderBottomLeftRadius,
  OutlineWidth,
  OutlineStyle,
  OutlineColor,
  OutlineOffset,
  Opacity,
  ZIndex,
  MixBlendMode,
  Isolation,
  MaskImage,
}

/// Context needed to resolve relative values during application
#[derive(Debug, Clone, Copy)]
pub struct ApplyContext {
  /// Parent's computed font size (for em on font-size itself)
  pub parent_font_size: f32,
  /// Root element font size (rem)
  pub root_font_size: f32,
  /// Viewport size (vw/vh)
  pub viewport: Size,
}

impl Default for ApplyContext {
  fn default() -> Self {
    Self {
      parent_font_size: 16.0,
      root_font_size: 16.0,
      viewport: Size::ZERO,
    }
  }
}

impl PropertyId {
  /// Maps a property name to its id
  pub fn parse(name: &str) -> Option<Self> {
    Some(match name {
      "color" => PropertyId::Color,
      "font-size" => PropertyId::FontSize,
      "visibility" => PropertyId::Visibility,
      "pointer-events" => PropertyId::PointerEvents,
      "border-collapse" => PropertyId::BorderCollapse,
      "letter-spacing" => PropertyId::LetterSpacing,
      "display" => PropertyId::Display,
      "position" => PropertyId::Position,
      "float" => PropertyId::Float,
      "width" => PropertyId::Width,
      "height" => PropertyId::Height,
      "overflow-x" => PropertyId::OverflowX,
      "overflow-y" => PropertyId::OverflowY,
      "background-color" => PropertyId::BackgroundColor,
      "background-clip" => PropertyId::BackgroundClip,
      "border-top-width" => PropertyId::BorderTopWidth,
      "border-right-width" => PropertyId::BorderRightWidth,
      "border-bottom-width" => PropertyId::BorderBottomWidth,
      "border-left-width" => PropertyId::BorderLeftWidth,
      "border-top-style" => PropertyId::BorderTopStyle,
      "border-right-style" => PropertyId::BorderRightStyle,
      "border-bottom-style" => PropertyId::BorderBottomStyle,
      "border-left-style" => PropertyId::BorderLeftStyle,
      "border-top-color" => PropertyId::BorderTopColor,
      "border-right-color" => PropertyId::BorderRightColor,
      "border-bottom-color" => PropertyId::BorderBottomColor,
      "border-left-color" => PropertyId::BorderLeftColor,
      "border-top-left-radius" => PropertyId::BorderTopLeftRadius,
      "border-top-right-radius" => PropertyId::BorderTopRightRadius,
      "border-bottom-right-radius" => PropertyId::BorderBottomRightRadius,
      "border-bottom-left-radius" => PropertyId::BorderBottomLeftRadius,
      "outline-width" => PropertyId::OutlineWidth,
      "outline-style" => PropertyId::OutlineStyle,
      "outline-color" => PropertyId::OutlineColor,
      "outline-offset" => PropertyId::OutlineOffset,
      "opacity" => PropertyId::Opacity,
      "z-index" => PropertyId::ZIndex,
      "mix-blend-mode" => PropertyId::MixBlendMode,
      "isolation" => PropertyId::Isolation,
      "mask-image" | "-webkit-mask-image" => PropertyId::MaskImage,
      _ => return None,
    })
  }

  /// The canonical property name
  pub fn name(self) -> &'static str {
    match self {
      PropertyId::Color => "color",
      PropertyId::FontSize => "font-size",
      PropertyId::Visibility => "visibility",
      PropertyId::PointerEvents => "pointer-events",
      PropertyId::BorderCollapse => "border-collapse",
      PropertyId::LetterSpacing => "letter-spacing",
      PropertyId::Display => "display",
      PropertyId::Position => "position",
      PropertyId::Float => "float",
      PropertyId::Width => "width",
      PropertyId::Height => "height",
      PropertyId::OverflowX => "overflow-x",
      PropertyId::OverflowY => "overflow-y",
      PropertyId::BackgroundColor => "background-color",
      PropertyId::BackgroundClip => "background-clip",
      PropertyId::BorderTopWidth => "border-top-width",
      PropertyId::BorderRightWidth => "border-right-width",
      PropertyId::BorderBottomWidth => "border-bottom-width",
      PropertyId::BorderLeftWidth => "border-left-width",
      PropertyId::BorderTopStyle => "border-top-style",
      PropertyId::BorderRightStyle => "border-right-style",
      PropertyId::BorderBottomStyle => "border-bottom-style",
      PropertyId::BorderLeftStyle => "border-left-style",
      PropertyId::BorderTopColor => "border-top-color",
      PropertyId::BorderRightColor => "border-right-color",
      PropertyId::BorderBottomColor => "border-bottom-color",
      PropertyId::BorderLeftColor => "border-left-color",
      PropertyId::BorderTopLeftRadius => "border-top-left-radius",
      PropertyId::BorderTopRightRadius => "border-top-right-radius",
      PropertyId::BorderBottomRightRadius => "border-bottom-right-radius",
      PropertyId::BorderBottomLeftRadius => "border-bottom-left-radius",
      PropertyId::OutlineWidth => "outline-width",
      PropertyId::OutlineStyle => "outline-style",
      PropertyId::OutlineColor => "outline-color",
      PropertyId::OutlineOffset => "outline-offset",
      PropertyId::Opacity => "opacity",
      PropertyId::ZIndex => "z-index",
      PropertyId::MixBlendMode => "mix-blend-mode",
      PropertyId::Isolation => "isolation",
      PropertyId::MaskImage => "mask-image",
    }
  }

  /// Returns true for properties that inherit by default
  pub fn is_inherited(self) -> bool {
    matches!(
      self,
      PropertyId::Color
        | PropertyId::FontSize
        | PropertyId::Visibility
        | PropertyId::PointerEvents
        | PropertyId::BorderCollapse
        | PropertyId::LetterSpacing
    )
  }

  /// Color and font-size resolve first so `currentcolor` and `em` in later
  /// declarations see this element's values.
  pub fn is_high_priority(self) -> bool {
    matches!(self, PropertyId::Color | PropertyId::FontSize)
  }

  /// Applies a parsed value onto the computed style
  ///
  /// Returns false when the value doesn't fit the property, making the
  /// declaration invalid at computed-value time (the caller then applies
  /// unset semantics by leaving the defaulted baseline in place).
  pub fn apply(self, style: &mut ComputedStyle, value: &PropertyValue, ctx: &ApplyContext) -> bool {
    let font_size = style.font_size;
    let resolve = |len: &Length| len.resolve(font_size, ctx.root_font_size, ctx.viewport);
    match self {
      PropertyId::Color => match value {
        PropertyValue::Color(c) => {
          style.color = *c;
          true
        }
        // currentcolor on `color` itself behaves as inherit; the baseline
        // already holds the parent's color.
        PropertyValue::Keyword(kw) if kw == "currentcolor" => true,
        _ => false,
      },
      PropertyId::FontSize => match value {
        PropertyValue::Length(len) => {
          match len.resolve(ctx.parent_font_size, ctx.root_font_size, ctx.viewport) {
            Some(px) if px >= 0.0 => {
              style.font_size = px;
              true
            }
            _ => false,
          }
        }
        PropertyValue::Percentage(pct) => {
          style.font_size = ctx.parent_font_size * pct / 100.0;
          true
        }
        _ => false,
      },
      PropertyId::Visibility => apply_keyword(value, |kw| Visibility::parse(kw).map(|v| style.visibility = v)),
      PropertyId::PointerEvents => apply_keyword(value, |kw| match kw {
        "auto" => Some(style.pointer_events = PointerEvents::Auto),
        "none" => Some(style.pointer_events = PointerEvents::None),
        _ => None,
      }),
      PropertyId::BorderCollapse => apply_keyword(value, |kw| match kw {
        "separate" => Some(style.border_collapse = BorderCollapse::Separate),
        "collapse" => Some(style.border_collapse = BorderCollapse::Collapse),
        _ => None,
      }),
      PropertyId::LetterSpacing => match value {
        PropertyValue::Length(len) => {
          style.letter_spacing = Some(*len);
          true
        }
        PropertyValue::Keyword(kw) if kw == "normal" => {
          style.letter_spacing = None;
          true
        }
        _ => false,
      },
      PropertyId::Display => apply_keyword(value, |kw| Display::parse(kw).map(|v| style.display = v)),
      PropertyId::Position => apply_keyword(value, |kw| Position::parse(kw).map(|v| style.position = v)),
      PropertyId::Float => apply_keyword(value, |kw| Float::parse(kw).map(|v| style.float = v)),
      PropertyId::Width => apply_size(value, &mut style.width),
      PropertyId::Height => apply_size(value, &mut style.height),
      PropertyId::OverflowX => apply_keyword(value, |kw| Overflow::parse(kw).map(|v| style.overflow_x = v)),
      PropertyId::OverflowY => apply_keyword(value, |kw| Overflow::parse(kw).map(|v| style.overflow_y = v)),
      PropertyId::BackgroundColor => apply_color(value, style.color, &mut style.background_color),
      PropertyId::BackgroundClip => apply_keyword(value, |kw| {
        let clip = match kw {
          "border-box" => BackgroundClip::BorderBox,
          "padding-box" => BackgroundClip::PaddingBox,
          "content-box" => BackgroundClip::ContentBox,
          "text" => BackgroundClip::Text,
          _ => return None,
        };
        Some(style.background_clip = clip)
      }),
      PropertyId::BorderTopWidth => apply_border_width(value, resolve, &mut style.border_top.width),
      PropertyId::BorderRightWidth => apply_border_width(value, resolve, &mut style.border_right.width),
      PropertyId::BorderBottomWidth => apply_border_width(value, resolve, &mut style.border_bottom.width),
      PropertyId::BorderLeftWidth => apply_border_width(value, resolve, &mut style.border_left.width),
      PropertyId::BorderTopStyle => apply_border_style(value, &mut style.border_top.style),
      PropertyId::BorderRightStyle => apply_border_style(value, &mut style.border_right.style),
      PropertyId::BorderBottomStyle => apply_border_style(value, &mut style.border_bottom.style),
      PropertyId::BorderLeftStyle => apply_border_style(value, &mut style.border_left.style),
      PropertyId::BorderTopColor => apply_color(value, style.color, &mut style.border_top.color),
      PropertyId::BorderRightColor => apply_color(value, style.color, &mut style.border_right.color),
      PropertyId::BorderBottomColor => apply_color(value, style.color, &mut style.border_bottom.color),
      PropertyId::BorderLeftColor => apply_color(value, style.color, &mut style.border_left.color),
      PropertyId::BorderTopLeftRadius => apply_radius(value, resolve, &mut style.border_radius, 0),
      PropertyId::BorderTopRightRadius => apply_radius(value, resolve, &mut style.border_radius, 1),
      PropertyId::BorderBottomRightRadius => apply_radius(value, resolve, &mut style.border_radius, 2),
      PropertyId::BorderBottomLeftRadius => apply_radius(value, resolve, &mut style.border_radius, 3),
      PropertyId::OutlineWidth => apply_border_width(value, resolve, &mut style.outline.width),
      PropertyId::OutlineStyle => apply_border_style(value, &mut style.outline.style),
      PropertyId::OutlineColor => apply_color(value, style.color, &mut style.outline.color),
      PropertyId::OutlineOffset => match value {
        PropertyValue::Length(len) => match resolve(len) {
          Some(px) => {
            style.outline_offset = px;
            true
          }
          None => false,
        },
        _ => false,
      },
      PropertyId::Opacity => match value {
        PropertyValue::Number(n) => {
          style.opacity = n.clamp(0.0, 1.0);
          true
        }
        _ => false,
      },
      PropertyId::ZIndex => match value {
        PropertyValue::Integer(i) => {
          style.z_index = Some(*i);
          true
        }
        PropertyValue::Keyword(kw) if kw == "auto" => {
          style.z_index = None;
          true
        }
        _ => false,
      },
      PropertyId::MixBlendMode => apply_keyword(value, |kw| MixBlendMode::parse(kw).map(|v| style.mix_blend_mode = v)),
      PropertyId::Isolation => apply_keyword(value, |kw| match kw {
        "auto" => Some(style.isolation_isolate = false),
        "isolate" => Some(style.isolation_isolate = true),
        _ => None,
      }),
      PropertyId::MaskImage => match value {
        PropertyValue::Keyword(kw) if kw == "none" => {
          style.mask_image = None;
          true
        }
        PropertyValue::Keyword(kw) => {
          style.mask_image = Some(kw.clone());
          true
        }
        _ => false,
      },
    }
  }

  /// Resets the property to its initial value
  pub fn apply_initial(self, style: &mut ComputedStyle) {
    let initial = ComputedStyle::default();
    self.copy_from(style, &initial);
  }

  /// Copies the property's computed value from the parent
  pub fn apply_inherit(self, style: &mut ComputedStyle, parent: &ComputedStyle) {
    self.copy_from(style, parent);
  }

  fn copy_from(self, style: &mut ComputedStyle, source: &ComputedStyle) {
    match self {
      PropertyId::Color => style.color = source.color,
      PropertyId::FontSize => style.font_size = source.font_size,
      PropertyId::Visibility => style.visibility = source.visibility,
      PropertyId::PointerEvents => style.pointer_events = source.pointer_events,
      PropertyId::BorderCollapse => style.border_collapse = source.border_collapse,
      PropertyId::LetterSpacing => style.letter_spacing = source.letter_spacing,
      PropertyId::Display => style.display = source.display,
      PropertyId::Position => style.position = source.position,
      PropertyId::Float => style.float = source.float,
      PropertyId::Width => style.width = source.width,
      PropertyId::Height => style.height = source.height,
      PropertyId::OverflowX => style.overflow_x = source.overflow_x,
      PropertyId::OverflowY => style.overflow_y = source.overflow_y,
      PropertyId::BackgroundColor => style.background_color = source.background_color,
      PropertyId::BackgroundClip => style.background_clip = source.background_clip,
      PropertyId::BorderTopWidth => style.border_top.width = source.border_top.width,
      PropertyId::BorderRightWidth => style.border_right.width = source.border_right.width,
      PropertyId::BorderBottomWidth => style.border_bottom.width = source.border_bottom.width,
      PropertyId::BorderLeftWidth => style.border_left.width = source.border_left.width,
      PropertyId::BorderTopStyle => style.border_top.style = source.border_top.style,
      PropertyId::BorderRightStyle => style.border_right.style = source.border_right.style,
      PropertyId::BorderBottomStyle => style.border_bottom.style = source.border_bottom.style,
      PropertyId::BorderLeftStyle => style.border_left.style = source.border_left.style,
      PropertyId::BorderTopColor => style.border_top.color = source.border_top.color,
      PropertyId::BorderRightColor => style.border_right.color = source.border_right.color,
      PropertyId::BorderBottomColor => style.border_bottom.color = source.border_bottom.color,
      PropertyId::BorderLeftColor => style.border_left.color = source.border_left.color,
      PropertyId::BorderTopLeftRadius => style.border_radius[0] = source.border_radius[0],
      PropertyId::BorderTopRightRadius => style.border_radius[1] = source.border_radius[1],
      PropertyId::BorderBottomRightRadius => style.border_radius[2] = source.border_radius[2],
      PropertyId::BorderBottomLeftRadius => style.border_radius[3] = source.border_radius[3],
      PropertyId::OutlineWidth => style.outline.width = source.outline.width,
      PropertyId::OutlineStyle => style.outline.style = source.outline.style,
      PropertyId::OutlineColor => style.outline.color = source.outline.color,
      PropertyId::OutlineOffset => style.outline_offset = source.outline_offset,
      PropertyId::Opacity => style.opacity = source.opacity,
      PropertyId::ZIndex => style.z_index = source.z_index,
      PropertyId::MixBlendMode => style.mix_blend_mode = source.mix_blend_mode,
      PropertyId::Isolation => style.isolation_isolate = source.isolation_isolate,
      PropertyId::MaskImage => style.mask_image = source.mask_image.clone(),
    }
  }
}

fn apply_keyword(value: &PropertyValue, mut set: impl FnMut(&str) -> Option<()>) -> bool {
  match value {
    PropertyValue::Keyword(kw) => set(kw).is_some(),
    _ => false,
  }
}

fn apply_color(value: &PropertyValue, current_color: Rgba, slot: &mut Rgba) -> bool {
  match value {
    PropertyValue::Color(c) => {
      *slot = *c;
      true
    }
    PropertyValue::Keyword(kw) if kw == "currentcolor" => {
      *slot = current_color;
      true
    }
    _ => false,
  }
}

fn apply_border_width(value: &PropertyValue, resolve: impl Fn(&Length) -> Option<f32>, slot: &mut f32) -> bool {
  match value {
    PropertyValue::Length(len) => match resolve(len) {
      Some(px) if px >= 0.0 => {
        *slot = px;
        true
      }
      _ => false,
    },
    _ => false,
  }
}

fn apply_border_style(value: &PropertyValue, slot: &mut BorderStyle) -> bool {
  match value {
    PropertyValue::Keyword(kw) => match BorderStyle::parse(kw) {
      Some(style) => {
        *slot = style;
        true
      }
      None => false,
    },
    _ => false,
  }
}

fn apply_radius(
  value: &PropertyValue,
  resolve: impl Fn(&Length) -> Option<f32>,
  radii: &mut [f32; 4],
  corner: usize,
) -> bool {
  match value {
    PropertyValue::Length(len) => match resolve(len) {
      Some(px) if px >= 0.0 => {
        radii[corner] = px;
        true
      }
      _ => false,
    },
    // Percentage radii need the box size; painting resolves them against
    // the fragment, so store nothing here and keep the declaration valid.
    PropertyValue::Percentage(_) => true,
    _ => false,
  }
}

fn apply_size(value: &PropertyValue, slot: &mut Option<Length>) -> bool {
  match value {
    PropertyValue::Length(len) => {
      *slot = Some(*len);
      true
    }
    PropertyValue::Percentage(pct) => {
      *slot = Some(Length::new(*pct, crate::style::types::LengthUnit::Percent));
      true
    }
    PropertyValue::Keyword(kw) if kw == "auto" => {
      *slot = None;
      true
    }
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_round_trips_names() {
    for id in [
      PropertyId::Color,
      PropertyId::BackgroundColor,
      PropertyId::BorderLeftStyle,
      PropertyId::OutlineOffset,
      PropertyId::ZIndex,
    ] {
      assert_eq!(PropertyId::parse(id.name()), Some(id));
    }
    assert_eq!(PropertyId::parse("margin-top"), None);
  }

  #[test]
  fn border_width_resolves_em_against_element_font_size() {
    let mut style = ComputedStyle::default();
    style.font_size = 20.0;
    let ctx = ApplyContext::default();
    let applied = PropertyId::BorderTopWidth.apply(
      &mut style,
      &PropertyValue::Length(Length::new(2.0, crate::style::types::LengthUnit::Em)),
      &ctx,
    );
    assert!(applied);
    assert_eq!(style.border_top.width, 40.0);
  }

  #[test]
  fn font_size_em_resolves_against_parent() {
    let mut style = ComputedStyle::default();
    let ctx = ApplyContext {
      parent_font_size: 10.0,
      ..Default::default()
    };
    PropertyId::FontSize.apply(
      &mut style,
      &PropertyValue::Length(Length::new(1.5, crate::style::types::LengthUnit::Em)),
      &ctx,
    );
    assert_eq!(style.font_size, 15.0);
  }

  #[test]
  fn currentcolor_resolves_against_applied_color() {
    let mut style = ComputedStyle::default();
    style.color = Rgba::RED;
    let ctx = ApplyContext::default();
    PropertyId::BorderTopColor.apply(&mut style, &PropertyValue::Keyword("currentcolor".to_string()), &ctx);
    assert_eq!(style.border_top.color, Rgba::RED);
  }

  #[test]
  fn invalid_value_reports_failure_without_mutation() {
    let mut style = ComputedStyle::default();
    let ctx = ApplyContext::default();
    assert!(!PropertyId::Opacity.apply(&mut style, &PropertyValue::Keyword("solid".to_string()), &ctx));
    assert_eq!(style.opacity, 1.0);
  }

  #[test]
  fn apply_inherit_copies_single_property() {
    let mut parent = ComputedStyle::default();
    parent.opacity = 0.25;
    let mut style = ComputedStyle::default();
    PropertyId::Opacity.apply_inherit(&mut style, &parent);
    assert_eq!(style.opacity, 0.25);
  }
}
