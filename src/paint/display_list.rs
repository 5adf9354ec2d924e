//! Display List Types
//!
//! The display list is the output boundary of painting: a flat, ordered
//! list of draw commands that a rasterizer executes without knowing
//! anything about fragments, styles, or stacking.
//!
//! ```text
//! Fragment Tree → Display List → Rasterization (out of scope)
//! ```
//!
//! # Display Items
//!
//! Leaf items fill or stroke geometry; push/pop pairs bracket item runs
//! with compositing state (clip, opacity, blend mode, mask, stacking
//! context). A well-formed list has balanced push/pop pairs, which
//! [`DisplayList::validate_balance`] checks.
//!
//! # Example
//!
//! ```
//! use stylecast::paint::display_list::{DisplayItem, DisplayList, FillRectItem};
//! use stylecast::{Rect, Rgba};
//!
//! let mut list = DisplayList::new();
//! list.push(DisplayItem::FillRect(FillRectItem {
//!     rect: Rect::from_xywh(10.0, 10.0, 100.0, 50.0),
//!     color: Rgba::RED,
//! }));
//! assert_eq!(list.len(), 1);
//! assert!(list.validate_balance().is_ok());
//! ```

use crate::error::PaintError;
use crate::geometry::{Point, Rect};
use crate::style::color::Rgba;
use crate::style::types::{BorderSide, BorderStyle, MixBlendMode};
use serde::Serialize;
use std::fmt;

/// Corner radii for rounded rectangles
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BorderRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl BorderRadii {
    /// Radii of zero on every corner
    pub const ZERO: Self = Self {
        top_left: 0.0,
        top_right: 0.0,
        bottom_right: 0.0,
        bottom_left: 0.0,
    };

    /// Builds radii from the style's corner array
    /// (top-left, top-right, bottom-right, bottom-left)
    pub fn from_corners(corners: [f32; 4]) -> Self {
        Self {
            top_left: corners[0],
            top_right: corners[1],
            bottom_right: corners[2],
            bottom_left: corners[3],
        }
    }

    /// Returns true when every corner is square
    pub fn is_zero(&self) -> bool {
        self.top_left == 0.0 && self.top_right == 0.0 && self.bottom_right == 0.0 && self.bottom_left == 0.0
    }
}

/// Fill a rectangle with a solid color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillRectItem {
    pub rect: Rect,
    pub color: Rgba,
}

/// Fill a rounded rectangle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillRoundedRectItem {
    pub rect: Rect,
    pub radii: BorderRadii,
    pub color: Rgba,
}

/// Stroke a rectangle outline at a uniform width
///
/// Used for outlines; the stroke is centered on the rect edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeRectItem {
    pub rect: Rect,
    pub color: Rgba,
    pub width: f32,
    pub style: BorderStyle,
}

/// Draw all four border edges of a box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderItem {
    pub rect: Rect,
    pub radii: BorderRadii,
    pub top: BorderSide,
    pub right: BorderSide,
    pub bottom: BorderSide,
    pub left: BorderSide,
}

/// One resolved collapsed-border segment along a table grid line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderSegmentItem {
    /// The segment's rectangle, centered on the grid line
    pub rect: Rect,
    pub style: BorderStyle,
    pub color: Rgba,
}

/// Draw a text run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    /// Baseline origin
    pub origin: Point,
    pub text: String,
    pub color: Rgba,
    pub font_size: f32,
}

/// Overlay scrollbar thumb for a scroll container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollbarItem {
    pub rect: Rect,
    /// True for the horizontal bar, false for the vertical one
    pub horizontal: bool,
}

/// Begin a clip region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipItem {
    pub rect: Rect,
    pub radii: BorderRadii,
}

/// Begin an opacity group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpacityItem {
    pub opacity: f32,
}

/// Begin a blend-mode group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendModeItem {
    pub mode: MixBlendMode,
}

/// Begin a stacking context group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackingContextItem {
    /// Border box of the context root, in absolute coordinates
    pub bounds: Rect,
    pub z_index: i32,
}

/// Begin a mask group; subsequent items composite through the mask
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskItem {
    /// Border box the mask image maps onto
    pub rect: Rect,
    /// Raw mask-image value, resolved by the rasterizer
    pub source: String,
}

/// Begin a text-clip group for `background-clip: text`
///
/// Items until the matching pop only paint where the runs' glyphs are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextClipItem {
    pub runs: Vec<TextItem>,
}

/// A single display item representing a paint operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DisplayItem {
    FillRect(FillRectItem),
    FillRoundedRect(FillRoundedRectItem),
    StrokeRect(StrokeRectItem),
    Border(BorderItem),
    BorderSegment(BorderSegmentItem),
    Text(TextItem),
    Scrollbar(ScrollbarItem),
    PushClip(ClipItem),
    PopClip,
    PushOpacity(OpacityItem),
    PopOpacity,
    PushBlendMode(BlendModeItem),
    PopBlendMode,
    PushStackingContext(StackingContextItem),
    PopStackingContext,
    PushMask(MaskItem),
    PopMask,
    PushTextClip(TextClipItem),
    PopTextClip,
}

impl DisplayItem {
    /// Returns the bounding rectangle of this display item, if applicable
    ///
    /// Group operations return `None`: their extent is their contents.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DisplayItem::FillRect(item) => Some(item.rect),
            DisplayItem::FillRoundedRect(item) => Some(item.rect),
            DisplayItem::StrokeRect(item) => Some(item.rect.inflate(item.width / 2.0)),
            DisplayItem::Border(item) => Some(item.rect),
            DisplayItem::BorderSegment(item) => Some(item.rect),
            DisplayItem::Text(item) => Some(Rect::from_xywh(
                item.origin.x,
                item.origin.y - item.font_size,
                item.text.chars().count() as f32 * item.font_size * 0.5,
                item.font_size * 1.2,
            )),
            DisplayItem::Scrollbar(item) => Some(item.rect),
            _ => None,
        }
    }

    /// Returns true for group-opening items
    pub fn is_push(&self) -> bool {
        matches!(
            self,
            DisplayItem::PushClip(_)
                | DisplayItem::PushOpacity(_)
                | DisplayItem::PushBlendMode(_)
                | DisplayItem::PushStackingContext(_)
                | DisplayItem::PushMask(_)
                | DisplayItem::PushTextClip(_)
        )
    }

    /// Returns true for group-closing items
    pub fn is_pop(&self) -> bool {
        matches!(
            self,
            DisplayItem::PopClip
                | DisplayItem::PopOpacity
                | DisplayItem::PopBlendMode
                | DisplayItem::PopStackingContext
                | DisplayItem::PopMask
                | DisplayItem::PopTextClip
        )
    }
}

/// A flat, ordered list of paint commands
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Creates an empty display list
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item
    pub fn push(&mut self, item: DisplayItem) {
        self.items.push(item);
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when no items were emitted
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items in paint order
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Iterates over items in paint order
    pub fn iter(&self) -> std::slice::Iter<'_, DisplayItem> {
        self.items.iter()
    }

    /// Union of all leaf item bounds
    pub fn bounds(&self) -> Rect {
        self.items
            .iter()
            .filter_map(DisplayItem::bounds)
            .fold(Rect::ZERO, Rect::union)
    }

    /// Checks that push/pop pairs are balanced and properly nested
    pub fn validate_balance(&self) -> Result<(), PaintError> {
        let mut depth = 0usize;
        let mut pushes = 0usize;
        let mut pops = 0usize;
        for item in &self.items {
            if item.is_push() {
                depth += 1;
                pushes += 1;
            } else if item.is_pop() {
                if depth == 0 {
                    return Err(PaintError::UnbalancedList { pushes, pops: pops + 1 });
                }
                depth -= 1;
                pops += 1;
            }
        }
        if depth != 0 {
            return Err(PaintError::UnbalancedList { pushes, pops });
        }
        Ok(())
    }

    /// Serializes the list as JSON for inspection and snapshotting
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.items)
    }
}

impl fmt::Display for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayList({} items)", self.items.len())
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DisplayItem;
    type IntoIter = std::slice::Iter<'a, DisplayItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
