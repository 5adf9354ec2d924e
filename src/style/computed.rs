//! Computed style
//!
//! The paint-relevant slice of an element's computed style: what the cascade
//! produces and what the fragment painter consumes. Layout-only properties
//! (margins, flex, grid) are out of scope; fragments arrive positioned.

use crate::geometry::EdgeOffsets;
use crate::style::color::Rgba;
use crate::style::custom_properties::CustomPropertyStore;
use crate::style::types::{
  BorderCollapse, BorderSide, Display, Float, Length, MixBlendMode, Overflow, PointerEvents, Position, Visibility,
};

/// What the background paints under (`background-clip`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundClip {
  #[default]
  BorderBox,
  PaddingBox,
  ContentBox,
  /// Clip the background to the foreground text (triggers the text-clip
  /// paint phase)
  Text,
}

/// Computed style for one box
///
/// Defaults are the CSS initial values. Inherited properties are copied from
/// the parent by [`ComputedStyle::inherit_from`]; everything else starts at
/// its initial value for each element.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
  // Inherited
  pub color: Rgba,
  pub font_size: f32,
  pub visibility: Visibility,
  pub pointer_events: PointerEvents,
  pub border_collapse: BorderCollapse,
  pub letter_spacing: Option<Length>,

  // Box
  pub display: Display,
  pub position: Position,
  pub float: Float,
  pub width: Option<Length>,
  pub height: Option<Length>,
  pub overflow_x: Overflow,
  pub overflow_y: Overflow,

  // Backgrounds and borders
  pub background_color: Rgba,
  pub background_clip: BackgroundClip,
  pub border_top: BorderSide,
  pub border_right: BorderSide,
  pub border_bottom: BorderSide,
  pub border_left: BorderSide,
  /// Corner radii in px: top-left, top-right, bottom-right, bottom-left
  pub border_radius: [f32; 4],

  // Outline
  pub outline: BorderSide,
  pub outline_offset: f32,

  // Compositing
  pub opacity: f32,
  pub z_index: Option<i32>,
  pub mix_blend_mode: MixBlendMode,
  pub isolation_isolate: bool,
  /// Raw mask-image value; `None` when no mask applies
  pub mask_image: Option<String>,

  /// Custom property snapshot for this element (inherited by default)
  pub custom_properties: CustomPropertyStore,
}

impl Default for ComputedStyle {
  fn default() -> Self {
    Self {
      color: Rgba::BLACK,
      font_size: 16.0,
      visibility: Visibility::Visible,
      pointer_events: PointerEvents::Auto,
      border_collapse: BorderCollapse::Separate,
      letter_spacing: None,
      display: Display::Block,
      position: Position::Static,
      float: Float::None,
      width: None,
      height: None,
      overflow_x: Overflow::Visible,
      overflow_y: Overflow::Visible,
      background_color: Rgba::TRANSPARENT,
      background_clip: BackgroundClip::BorderBox,
      border_top: BorderSide::default(),
      border_right: BorderSide::default(),
      border_bottom: BorderSide::default(),
      border_left: BorderSide::default(),
      border_radius: [0.0; 4],
      outline: BorderSide::default(),
      outline_offset: 0.0,
      opacity: 1.0,
      z_index: None,
      mix_blend_mode: MixBlendMode::Normal,
      isolation_isolate: false,
      mask_image: None,
      custom_properties: CustomPropertyStore::default(),
    }
  }
}

impl ComputedStyle {
  /// Creates a style inheriting the inherited properties from `parent`
  ///
  /// Custom properties inherit as a unit; non-inheriting registered
  /// properties are reset by the cascade after this runs.
  pub fn inherit_from(parent: &ComputedStyle) -> Self {
    Self {
      color: parent.color,
      font_size: parent.font_size,
      visibility: parent.visibility,
      pointer_events: parent.pointer_events,
      border_collapse: parent.border_collapse,
      letter_spacing: parent.letter_spacing,
      custom_properties: parent.custom_properties.clone(),
      ..Self::default()
    }
  }

  /// Border widths as per-edge offsets
  pub fn border_widths(&self) -> EdgeOffsets {
    EdgeOffsets::new(
      self.border_top.width,
      self.border_right.width,
      self.border_bottom.width,
      self.border_left.width,
    )
  }

  /// Returns true if any border edge paints
  pub fn has_visible_border(&self) -> bool {
    self.border_top.is_visible()
      || self.border_right.is_visible()
      || self.border_bottom.is_visible()
      || self.border_left.is_visible()
  }

  /// Returns true if the background paints anything
  pub fn has_visible_background(&self) -> bool {
    !self.background_color.is_transparent()
  }

  /// Returns true if any corner has a nonzero radius
  pub fn has_border_radius(&self) -> bool {
    self.border_radius.iter().any(|r| *r > 0.0)
  }

  /// Returns true if the outline paints
  pub fn has_visible_outline(&self) -> bool {
    self.outline.is_visible()
  }

  /// Returns true when the box and its subtree are skipped by hit testing
  pub fn hit_test_disabled(&self) -> bool {
    self.pointer_events == PointerEvents::None || self.visibility != Visibility::Visible
  }

  /// Returns true when the box clips descendant painting
  pub fn clips_overflow(&self) -> bool {
    self.overflow_x.clips() || self.overflow_y.clips()
  }

  /// Returns true when the box is a scroll container with overlay
  /// scrollbars to paint
  pub fn is_scroll_container(&self) -> bool {
    self.overflow_x.is_scrollable() || self.overflow_y.is_scrollable()
  }
}
