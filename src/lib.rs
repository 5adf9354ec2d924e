//! stylecast: CSS cascade resolution and fragment painting
//!
//! Two subsystems connected by [`ComputedStyle`]:
//!
//! - **Cascade** ([`style`]): declarations in (origin, specificity,
//!   importance), computed styles out, with `var()` substitution, cycle
//!   detection over the custom property graph, CSS-wide keywords, and
//!   registered custom properties.
//! - **Painting** ([`paint`]): laid-out fragment trees in ([`tree`]),
//!   display lists out, via multi-phase traversal in CSS painting order,
//!   plus reverse-phase hit testing and collapsed table borders.
//!
//! ```
//! use std::sync::Arc;
//! use stylecast::css::Declaration;
//! use stylecast::style::cascade::StyleCascade;
//! use stylecast::style::cascade_priority::CascadeOrigin;
//! use stylecast::style::custom_properties::CustomPropertyRegistry;
//! use stylecast::paint::DisplayListBuilder;
//! use stylecast::{ComputedStyle, FragmentNode, Rect};
//!
//! // Cascade: resolve a computed style.
//! let mut cascade = StyleCascade::new(Arc::new(CustomPropertyRegistry::new()));
//! cascade
//!     .add(Declaration::parse("background-color", "rebeccapurple", false), CascadeOrigin::Author, 1)
//!     .unwrap();
//! let style = cascade.apply(&ComputedStyle::default());
//!
//! // Paint: a one-fragment tree into a display list.
//! let root = FragmentNode::new_block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), vec![])
//!     .with_style(Arc::new(style));
//! let list = DisplayListBuilder::new().build(&root);
//! assert!(!list.is_empty());
//! ```

pub mod css;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod style;
pub mod tree;

pub use error::{Error, Result};
pub use geometry::{EdgeOffsets, Point, Rect, Size};
pub use paint::{DisplayItem, DisplayList, DisplayListBuilder, PaintPhase};
pub use style::{ComputedStyle, Length, LengthUnit, Rgba, StyleCascade};
pub use tree::{FragmentContent, FragmentNode, FragmentTree};
