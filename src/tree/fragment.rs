//! Fragment types
//!
//! Fragments are the output of layout: positioned, sized, immutable boxes
//! consumed by painting and hit testing. Unlike the box tree, one box can
//! generate several fragments when content splits across lines, columns, or
//! pages.
//!
//! # Coordinate spaces
//!
//! `bounds` is expressed in the coordinate space of the containing fragment.
//! Painting accumulates offsets while walking the tree; hit testing
//! translates points the other way.

use crate::geometry::{Point, Rect};
use crate::style::ComputedStyle;
use std::sync::Arc;

/// Content type of a fragment
///
/// Each variant requires different paint and hit-testing logic, and selects
/// the paint phase the fragment's own drawing belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentContent {
  /// Block-level box
  Block,

  /// Non-atomic inline box (possibly split from an inline across lines)
  Inline {
    /// Which fragment of the originating inline box this is
    fragment_index: usize,
  },

  /// Line box containing inline and text fragments
  Line {
    /// Baseline position relative to the line box top
    baseline: f32,
  },

  /// Text run with final geometry
  Text {
    text: String,
    /// Baseline offset from the fragment's top edge
    baseline_offset: f32,
    /// Selected byte range of `text`, if any (drives the selection phase)
    selection: Option<(usize, usize)>,
  },

  /// Atomic inline (inline-block, replaced): painted as a complete
  /// mini-paint during the parent's foreground phase
  AtomicInline,

  /// Floated box: painted in the float phase of its containing context
  Float,

  /// Table wrapper box; carries the resolved grid dimensions
  Table { rows: usize, columns: usize },

  /// Row group (thead/tbody/tfoot level)
  TableSection,

  /// Table row
  TableRow {
    /// Zero-based row index in the table grid
    row: usize,
  },

  /// Table cell anchored at a grid slot
  TableCell {
    row: usize,
    column: usize,
    row_span: usize,
    col_span: usize,
  },
}

impl FragmentContent {
  /// Returns true if this is a block fragment
  pub fn is_block(&self) -> bool {
    matches!(self, FragmentContent::Block)
  }

  /// Returns true if this is an inline fragment
  pub fn is_inline(&self) -> bool {
    matches!(self, FragmentContent::Inline { .. })
  }

  /// Returns true if this is a text fragment
  pub fn is_text(&self) -> bool {
    matches!(self, FragmentContent::Text { .. })
  }

  /// Returns true if this is a line box
  pub fn is_line(&self) -> bool {
    matches!(self, FragmentContent::Line { .. })
  }

  /// Returns true for atomic inlines
  pub fn is_atomic_inline(&self) -> bool {
    matches!(self, FragmentContent::AtomicInline)
  }

  /// Returns true for floats
  pub fn is_float(&self) -> bool {
    matches!(self, FragmentContent::Float)
  }

  /// Returns true for any table part
  pub fn is_table_part(&self) -> bool {
    matches!(
      self,
      FragmentContent::Table { .. }
        | FragmentContent::TableSection
        | FragmentContent::TableRow { .. }
        | FragmentContent::TableCell { .. }
    )
  }

  /// Gets the text content if this is a text fragment
  pub fn text(&self) -> Option<&str> {
    match self {
      FragmentContent::Text { text, .. } => Some(text),
      _ => None,
    }
  }
}

/// Identifies the fragmentainer (page/column) a fragment belongs to
///
/// Pagination yields distinct pages; multi-column layout further partitions
/// content into columns. The default path is page 0 with no column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FragmentainerPath {
  /// Zero-based page index within the paginated flow
  pub page_index: usize,
  /// Column within the page, when inside a multi-column container
  pub column_index: Option<usize>,
}

impl FragmentainerPath {
  /// Creates a path for the given page with no column information
  pub fn new(page_index: usize) -> Self {
    Self {
      page_index,
      column_index: None,
    }
  }

  /// Sets the column index
  pub fn with_column(mut self, column_index: usize) -> Self {
    self.column_index = Some(column_index);
    self
  }

  /// Returns true when two fragments share a fragmentainer
  ///
  /// Collapsed-border resolution only considers contributors in the same
  /// fragmentainer; edges at a break are never collapsed across it.
  pub fn same_fragmentainer(&self, other: &FragmentainerPath) -> bool {
    self == other
  }
}

/// How a fragment relates to other fragments of the same box
///
/// Used to suppress border/background segments at fragmentation breaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentSliceInfo {
  /// Whether this fragment starts at the box's block-start edge
  pub is_first: bool,
  /// Whether this fragment ends at the box's block-end edge
  pub is_last: bool,
  /// Distance from the original box's block-start edge to this slice
  pub slice_offset: f32,
  /// Block-size of the unfragmented box
  pub original_block_size: f32,
}

impl FragmentSliceInfo {
  /// Slice info for an unfragmented box
  pub fn single(block_size: f32) -> Self {
    Self {
      is_first: true,
      is_last: true,
      slice_offset: 0.0,
      original_block_size: block_size,
    }
  }
}

/// A single fragment in the fragment tree
///
/// # Examples
///
/// ```
/// use stylecast::{FragmentContent, FragmentNode};
/// use stylecast::Rect;
///
/// let fragment = FragmentNode::new_block(Rect::from_xywh(0.0, 0.0, 100.0, 50.0), vec![]);
/// assert_eq!(fragment.bounds.width(), 100.0);
/// assert!(fragment.content.is_block());
/// ```
#[derive(Debug, Clone)]
pub struct FragmentNode {
  /// The positioned rectangle, in the containing fragment's space
  pub bounds: Rect,

  /// The content type of this fragment
  pub content: FragmentContent,

  /// Computed style for painting
  pub style: Arc<ComputedStyle>,

  /// Child fragments
  ///
  /// Blocks hold block and line children; lines hold inline and text
  /// children; text and atomic leaves are typically empty.
  pub children: Vec<FragmentNode>,

  /// Index of this fragment within the fragmented sequence of its box
  pub fragment_index: usize,

  /// Total number of fragments generated for the originating box
  pub fragment_count: usize,

  /// Which fragmentainer (page/column) this fragment occupies
  pub fragmentainer: FragmentainerPath,

  /// Slice metadata for fragmentation-aware painting
  pub slice_info: FragmentSliceInfo,

  /// Ink overflow of this fragment including descendants, in local
  /// coordinates relative to the fragment's own origin
  ///
  /// Starts as the local border box; call
  /// [`FragmentNode::update_ink_overflow`] after building a tree by hand.
  pub ink_overflow: Rect,
}

impl FragmentNode {
  /// Creates a new fragment with the given bounds, content, style, and
  /// children
  pub fn new(bounds: Rect, content: FragmentContent, style: Arc<ComputedStyle>, children: Vec<FragmentNode>) -> Self {
    let ink_overflow = Rect::from_xywh(0.0, 0.0, bounds.width(), bounds.height());
    Self {
      bounds,
      content,
      style,
      children,
      fragment_index: 0,
      fragment_count: 1,
      fragmentainer: FragmentainerPath::default(),
      slice_info: FragmentSliceInfo::single(bounds.height()),
      ink_overflow,
    }
  }

  /// Creates a block fragment with a default style
  pub fn new_block(bounds: Rect, children: Vec<FragmentNode>) -> Self {
    Self::new(bounds, FragmentContent::Block, Arc::new(ComputedStyle::default()), children)
  }

  /// Creates a line box fragment
  pub fn new_line(bounds: Rect, baseline: f32, children: Vec<FragmentNode>) -> Self {
    Self::new(
      bounds,
      FragmentContent::Line { baseline },
      Arc::new(ComputedStyle::default()),
      children,
    )
  }

  /// Creates a text fragment
  pub fn new_text(bounds: Rect, text: impl Into<String>, baseline_offset: f32) -> Self {
    Self::new(
      bounds,
      FragmentContent::Text {
        text: text.into(),
        baseline_offset,
        selection: None,
      },
      Arc::new(ComputedStyle::default()),
      vec![],
    )
  }

  /// Replaces the fragment's style
  pub fn with_style(mut self, style: Arc<ComputedStyle>) -> Self {
    self.style = style;
    self
  }

  /// Marks the fragment as one slice of a fragmented box
  pub fn with_slice(mut self, fragment_index: usize, fragment_count: usize, slice_info: FragmentSliceInfo) -> Self {
    self.fragment_index = fragment_index;
    self.fragment_count = fragment_count;
    self.slice_info = slice_info;
    self
  }

  /// Assigns the fragmentainer this fragment belongs to
  pub fn with_fragmentainer(mut self, path: FragmentainerPath) -> Self {
    self.fragmentainer = path;
    self
  }

  /// The fragment's border box positioned at the origin of its own space
  pub fn local_rect(&self) -> Rect {
    Rect::from_xywh(0.0, 0.0, self.bounds.width(), self.bounds.height())
  }

  /// Returns true if the point (in the parent's space) is inside bounds
  pub fn contains_point(&self, point: Point) -> bool {
    self.bounds.contains_point(point)
  }

  /// Recomputes ink overflow bottom-up over the subtree
  ///
  /// Ink overflow is the union of the local border box, outline extents,
  /// and every child's translated ink overflow. Overflow clipping bounds it
  /// back to the border box.
  pub fn update_ink_overflow(&mut self) {
    for child in &mut self.children {
      child.update_ink_overflow();
    }

    let mut ink = self.local_rect();
    if self.style.has_visible_outline() {
      ink = ink.union(self.local_rect().inflate(self.style.outline.width + self.style.outline_offset));
    }
    if !self.style.clips_overflow() {
      for child in &self.children {
        ink = ink.union(child.ink_overflow.translate(child.bounds.origin));
      }
    }
    self.ink_overflow = ink;
  }

  /// Number of direct children
  pub fn child_count(&self) -> usize {
    self.children.len()
  }

  /// Counts all fragments in this subtree, including self
  pub fn subtree_size(&self) -> usize {
    1 + self.children.iter().map(FragmentNode::subtree_size).sum::<usize>()
  }

  /// Finds all fragments containing the point, outermost first
  ///
  /// This is the purely geometric walk; phase-aware hit testing with clip
  /// and pointer-events handling lives in the paint module.
  pub fn fragments_at_point(&self, point: Point) -> Vec<&FragmentNode> {
    let mut hits = Vec::new();
    self.collect_fragments_at_point(point, &mut hits);
    hits
  }

  fn collect_fragments_at_point<'a>(&'a self, point: Point, hits: &mut Vec<&'a FragmentNode>) {
    if !self.contains_point(point) {
      return;
    }
    hits.push(self);
    let local = Point::new(point.x - self.bounds.x(), point.y - self.bounds.y());
    for child in &self.children {
      child.collect_fragments_at_point(local, hits);
    }
  }
}
