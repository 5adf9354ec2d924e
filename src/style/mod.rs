//! Style system: cascade resolution and computed styles
//!
//! The cascade takes declarations (with origin, specificity, importance)
//! and produces [`ComputedStyle`]s, resolving `var()` references over the
//! custom property graph with cycle detection along the way.

pub mod cascade;
pub mod cascade_priority;
pub mod color;
pub mod computed;
pub mod custom_properties;
pub mod properties;
pub mod types;
pub mod var_resolution;

pub use cascade::StyleCascade;
pub use cascade_priority::{CascadeOrigin, CascadePriority};
pub use color::Rgba;
pub use computed::{BackgroundClip, ComputedStyle};
pub use custom_properties::{CustomPropertyRegistry, CustomPropertyStore, PropertyRule};
pub use properties::PropertyId;
pub use types::{
  BorderCollapse, BorderSide, BorderStyle, Display, Float, Length, LengthUnit, MixBlendMode, Overflow, PointerEvents,
  Position, Visibility,
};
