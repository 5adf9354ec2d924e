//! Painting: fragment trees to display lists, plus hit testing
//!
//! The painter walks the stacking context tree built over a fragment tree
//! and emits a flat display list in CSS painting order. Hit testing mirrors
//! the same traversal in reverse so the topmost hit always corresponds to
//! the last thing painted at a point.

pub mod collapsed_borders;
pub mod display_list;
pub mod display_list_builder;
pub mod phases;
pub mod stacking;

pub use collapsed_borders::{BorderContribution, CollapsedBorderGrid};
pub use display_list::{DisplayItem, DisplayList};
pub use display_list_builder::{paint_tree, DisplayListBuilder};
pub use hit_test::{hit_test, hit_test_tree, HitTarget};
pub use phases::PaintPhase;
pub use stacking::{build_stacking_tree, creates_stacking_context, StackingContext, StackingContextReason};
