//! Fragment tree types
//!
//! Fragments represent boxes after layout, with final positions and sizes.
//! They are the input to painting and hit testing.

pub mod fragment;
pub mod fragment_tree;

pub use fragment::{FragmentContent, FragmentNode, FragmentSliceInfo, FragmentainerPath};
pub use fragment_tree::FragmentTree;
