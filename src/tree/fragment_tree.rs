//! Fragment tree
//!
//! The fragment tree is the complete output of layout for one document:
//! a root fragment per fragmentainer (page or column row), plus the
//! viewport geometry painting needs.

use crate::geometry::{Point, Rect, Size};
use crate::tree::fragment::FragmentNode;
use std::fmt;

/// A complete fragment tree
///
/// # Examples
///
/// ```
/// use stylecast::{FragmentNode, FragmentTree};
/// use stylecast::{Rect, Size};
///
/// let root = FragmentNode::new_block(Rect::from_xywh(0.0, 0.0, 800.0, 600.0), vec![]);
/// let tree = FragmentTree::with_viewport(root, Size::new(800.0, 600.0));
/// assert_eq!(tree.viewport_size(), Size::new(800.0, 600.0));
/// ```
#[derive(Debug, Clone)]
pub struct FragmentTree {
  /// The first (or only) fragmentainer root
  pub root: FragmentNode,

  /// Additional fragmentainer roots (subsequent pages/columns)
  pub additional_fragmentainers: Vec<FragmentNode>,

  /// Explicit viewport size, when tracked separately from the root bounds
  viewport: Option<Size>,
}

impl FragmentTree {
  /// Creates a fragment tree with a single root
  pub fn new(root: FragmentNode) -> Self {
    Self {
      root,
      additional_fragmentainers: Vec::new(),
      viewport: None,
    }
  }

  /// Creates a fragment tree with an explicit viewport size
  pub fn with_viewport(root: FragmentNode, viewport: Size) -> Self {
    Self {
      root,
      additional_fragmentainers: Vec::new(),
      viewport: Some(viewport),
    }
  }

  /// Creates a fragment tree from multiple fragmentainer roots
  ///
  /// Returns `None` when `roots` is empty.
  pub fn from_fragmentainers(mut roots: Vec<FragmentNode>, viewport: Size) -> Option<Self> {
    if roots.is_empty() {
      return None;
    }
    let root = roots.remove(0);
    Some(Self {
      root,
      additional_fragmentainers: roots,
      viewport: Some(viewport),
    })
  }

  /// Returns the viewport size, falling back to the root fragment's size
  pub fn viewport_size(&self) -> Size {
    self.viewport.unwrap_or(self.root.bounds.size)
  }

  /// Iterates over every fragmentainer root in order
  pub fn fragmentainer_roots(&self) -> impl Iterator<Item = &FragmentNode> {
    std::iter::once(&self.root).chain(self.additional_fragmentainers.iter())
  }

  /// Total bounding box of all content, in the tree's coordinate space
  pub fn content_bounds(&self) -> Rect {
    self
      .fragmentainer_roots()
      .fold(Rect::ZERO, |acc, root| acc.union(root.ink_overflow.translate(root.bounds.origin)))
  }

  /// Counts all fragments across all fragmentainers
  pub fn fragment_count(&self) -> usize {
    self.fragmentainer_roots().map(FragmentNode::subtree_size).sum()
  }

  /// Recomputes ink overflow over every fragmentainer
  pub fn update_ink_overflow(&mut self) {
    self.root.update_ink_overflow();
    for root in &mut self.additional_fragmentainers {
      root.update_ink_overflow();
    }
  }

  /// Geometric hit test across all fragmentainers, outermost first
  pub fn fragments_at_point(&self, point: Point) -> Vec<&FragmentNode> {
    let mut hits = self.root.fragments_at_point(point);
    for root in &self.additional_fragmentainers {
      hits.extend(root.fragments_at_point(point));
    }
    hits
  }
}

impl fmt::Display for FragmentTree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "FragmentTree(fragments: {})", self.fragment_count())
  }
}
