//! Display List Builder
//!
//! Converts a fragment tree into a display list by walking the stacking
//! context tree and, within each context, running the paint phases over the
//! in-flow content. Each phase traverses the same fragments and emits only
//! the operations that belong to it; the concatenation of phases yields the
//! CSS painting order.
//!
//! Per stacking context the sequence is:
//!
//! 1. Compositing wrappers (clip carried from ancestors, stacking context,
//!    opacity, blend mode, mask)
//! 2. Background and border of the context root
//! 3. Child contexts with negative z-index
//! 4. Content phases: descendant backgrounds → floats → selection →
//!    foreground → outlines
//! 5. Child contexts with zero, then positive z-index
//! 6. Overlay scrollbars
//!
//! Floats and atomic inlines are painted as complete mini-paints: the same
//! sequence minus the z-index buckets, which belong to the enclosing
//! context.

use crate::geometry::{Point, Rect};
use crate::paint::collapsed_borders::CollapsedBorderGrid;
use crate::paint::display_list::{
    BlendModeItem, BorderItem, BorderRadii, ClipItem, DisplayItem, DisplayList, FillRectItem, FillRoundedRectItem,
    MaskItem, OpacityItem, ScrollbarItem, StackingContextItem, StrokeRectItem, TextClipItem, TextItem,
};
use crate::paint::phases::PaintPhase;
use crate::paint::stacking::{build_stacking_tree, clip_rect_for, creates_stacking_context, StackingContext};
use crate::style::color::Rgba;
use crate::style::computed::BackgroundClip;
use crate::style::types::{BorderCollapse, MixBlendMode, Visibility};
use crate::tree::fragment::{FragmentContent, FragmentNode};
use crate::tree::fragment_tree::FragmentTree;

/// Overlay scrollbar thumb thickness in px
const SCROLLBAR_THICKNESS: f32 = 8.0;

/// Gap between the thumb and the box edge
const SCROLLBAR_INSET: f32 = 2.0;

/// Highlight color for selected text
const SELECTION_COLOR: Rgba = Rgba {
    r: 0,
    g: 120,
    b: 215,
    a: 0.35,
};

/// Builder that converts a fragment tree to a display list
///
/// # Examples
///
/// ```
/// use stylecast::paint::display_list_builder::DisplayListBuilder;
/// use stylecast::{FragmentNode, Rect};
///
/// let root = FragmentNode::new_block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), vec![]);
/// let list = DisplayListBuilder::new().build(&root);
/// assert!(list.validate_balance().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct DisplayListBuilder {
    list: DisplayList,
    cull_rect: Option<Rect>,
}

impl DisplayListBuilder {
    /// Creates a new display list builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts painting to fragments whose ink overflow intersects `rect`
    ///
    /// Pruned subtrees emit nothing; the relative order of everything else
    /// is unchanged.
    pub fn with_cull_rect(mut self, rect: Rect) -> Self {
        self.cull_rect = Some(rect);
        self
    }

    /// Builds a display list from a single fragment root
    pub fn build(mut self, root: &FragmentNode) -> DisplayList {
        let stacking = build_stacking_tree(root, root.bounds.origin);
        self.paint_context(&stacking);
        self.list
    }

    /// Builds a display list from a fragment tree, one fragmentainer at a
    /// time in document order
    pub fn build_tree(mut self, tree: &FragmentTree) -> DisplayList {
        for root in tree.fragmentainer_roots() {
            let stacking = build_stacking_tree(root, root.bounds.origin);
            self.paint_context(&stacking);
        }
        self.list
    }

    fn culled(&self, absolute_ink: Rect) -> bool {
        match self.cull_rect {
            Some(cull) => !cull.intersects(absolute_ink),
            None => false,
        }
    }

    /// Paints one stacking context: wrappers, root decorations, z-ordered
    /// children interleaved with the content phases
    fn paint_context(&mut self, context: &StackingContext<'_>) {
        let absolute_ink = context.root.ink_overflow.translate(context.origin);
        if self.culled(absolute_ink) {
            return;
        }
        if let Some(clip) = context.clip {
            if clip.intersection(absolute_ink).is_none() {
                return;
            }
        }

        let style = &context.root.style;
        let border_rect = Rect::new(context.origin, context.root.bounds.size);
        let mut pops: Vec<DisplayItem> = Vec::new();

        if let Some(clip) = context.clip {
            self.list.push(DisplayItem::PushClip(ClipItem {
                rect: clip,
                radii: BorderRadii::ZERO,
            }));
            pops.push(DisplayItem::PopClip);
        }
        self.list.push(DisplayItem::PushStackingContext(StackingContextItem {
            bounds: border_rect,
            z_index: context.z_index,
        }));
        pops.push(DisplayItem::PopStackingContext);
        if style.opacity < 1.0 {
            self.list.push(DisplayItem::PushOpacity(OpacityItem {
                opacity: style.opacity,
            }));
            pops.push(DisplayItem::PopOpacity);
        }
        if style.mix_blend_mode != MixBlendMode::Normal {
            self.list.push(DisplayItem::PushBlendMode(BlendModeItem {
                mode: style.mix_blend_mode,
            }));
            pops.push(DisplayItem::PopBlendMode);
        }
        if let Some(source) = &style.mask_image {
            self.list.push(DisplayItem::PushMask(MaskItem {
                rect: border_rect,
                source: source.clone(),
            }));
            pops.push(DisplayItem::PopMask);
        }

        self.paint_unit(context.root, context.origin, Some(context));

        for pop in pops.into_iter().rev() {
            self.list.push(pop);
        }
    }

    /// Paints a fragment subtree as one unit: its own decorations, then the
    /// content phases, plus the z-ordered child contexts when this unit is
    /// a stacking context root
    fn paint_unit(&mut self, fragment: &FragmentNode, origin: Point, context: Option<&StackingContext<'_>>) {
        self.paint_box_decorations(fragment, origin);

        let clips = fragment.style.clips_overflow();
        if clips {
            self.list.push(DisplayItem::PushClip(ClipItem {
                rect: clip_rect_for(fragment, origin),
                radii: BorderRadii::from_corners(fragment.style.border_radius),
            }));
        }

        if let Some(context) = context {
            for child in context.negative_z_children() {
                self.paint_context(child);
            }
        }

        for phase in PaintPhase::CONTENT_ORDER {
            if phase == PaintPhase::Outline {
                self.paint_outline(fragment, origin);
            }
            // A text fragment promoted to its own unit (e.g. opacity on a
            // run) has no parent foreground walk to emit its glyphs.
            if phase == PaintPhase::Foreground && fragment.content.is_text() {
                self.paint_text(fragment, origin);
            }
            self.paint_phase_children(fragment, origin, phase);
            if phase == PaintPhase::DescendantBackgrounds {
                self.maybe_emit_collapsed_borders(fragment, origin);
            }
        }

        if let Some(context) = context {
            for child in context.zero_z_children() {
                self.paint_context(child);
            }
            for child in context.positive_z_children() {
                self.paint_context(child);
            }
        }

        if clips {
            self.list.push(DisplayItem::PopClip);
        }

        self.paint_overlay_scrollbars(fragment, origin);
    }

    /// One phase pass over the in-flow children of `fragment`
    ///
    /// Stacking context roots are skipped (painted via the context walk);
    /// floats and atomic inlines only surface in their own phases, where
    /// they recurse as complete mini-paints.
    fn paint_phase_children(&mut self, fragment: &FragmentNode, origin: Point, phase: PaintPhase) {
        for child in &fragment.children {
            if creates_stacking_context(&child.style, false) {
                continue;
            }
            let child_origin = origin.translate(child.bounds.origin);
            if self.culled(child.ink_overflow.translate(child_origin)) {
                continue;
            }

            match phase {
                PaintPhase::DescendantBackgrounds => {
                    if child.content.is_float() || child.content.is_atomic_inline() {
                        continue;
                    }
                    let inline_level = child.content.is_inline() || child.content.is_text() || child.content.is_line();
                    if !inline_level {
                        self.paint_box_decorations(child, child_origin);
                    }
                    self.recurse_phase(child, child_origin, phase);
                    self.maybe_emit_collapsed_borders(child, child_origin);
                }
                PaintPhase::Floats => {
                    if child.content.is_atomic_inline() {
                        continue;
                    }
                    if child.content.is_float() {
                        self.paint_unit(child, child_origin, None);
                        continue;
                    }
                    self.recurse_phase(child, child_origin, phase);
                }
                PaintPhase::Selection => {
                    if child.content.is_float() || child.content.is_atomic_inline() {
                        continue;
                    }
                    self.paint_selection(child, child_origin);
                    self.recurse_phase(child, child_origin, phase);
                }
                PaintPhase::Foreground => {
                    if child.content.is_float() {
                        continue;
                    }
                    if child.content.is_atomic_inline() {
                        self.paint_unit(child, child_origin, None);
                        continue;
                    }
                    match &child.content {
                        FragmentContent::Text { .. } => self.paint_text(child, child_origin),
                        FragmentContent::Inline { .. } => {
                            // Inline box decorations are inline-level
                            // content and paint here, not with the block
                            // backgrounds.
                            self.paint_box_decorations(child, child_origin);
                            self.recurse_phase(child, child_origin, phase);
                        }
                        _ => self.recurse_phase(child, child_origin, phase),
                    }
                }
                PaintPhase::Outline => {
                    if child.content.is_float() || child.content.is_atomic_inline() {
                        continue;
                    }
                    self.paint_outline(child, child_origin);
                    self.recurse_phase(child, child_origin, phase);
                }
                PaintPhase::SelfBackground
                | PaintPhase::Mask
                | PaintPhase::TextClip
                | PaintPhase::OverlayScrollbars => {}
            }
        }
    }

    /// Descends into a child's subtree for one phase, bracketing with the
    /// child's overflow clip when it has one
    fn recurse_phase(&mut self, child: &FragmentNode, child_origin: Point, phase: PaintPhase) {
        if child.children.is_empty() {
            return;
        }
        let clips = child.style.clips_overflow();
        if clips {
            self.list.push(DisplayItem::PushClip(ClipItem {
                rect: clip_rect_for(child, child_origin),
                radii: BorderRadii::from_corners(child.style.border_radius),
            }));
        }
        self.paint_phase_children(child, child_origin, phase);
        if clips {
            self.list.push(DisplayItem::PopClip);
        }
    }

    /// Emits background and border for one box
    fn paint_box_decorations(&mut self, fragment: &FragmentNode, origin: Point) {
        let style = &fragment.style;
        if style.visibility != Visibility::Visible {
            return;
        }
        let rect = Rect::new(origin, fragment.bounds.size);
        if rect.is_empty() {
            return;
        }
        let radii = BorderRadii::from_corners(style.border_radius);

        if style.has_visible_background() {
            let paint_rect = match style.background_clip {
                BackgroundClip::BorderBox | BackgroundClip::Text => rect,
                // Without the box model's padding values, the content box
                // degrades to the padding box.
                BackgroundClip::PaddingBox | BackgroundClip::ContentBox => rect.inset(style.border_widths()),
            };
            if style.background_clip == BackgroundClip::Text {
                let mut runs = Vec::new();
                self.collect_text_runs(fragment, origin, &mut runs);
                self.list.push(DisplayItem::PushTextClip(TextClipItem { runs }));
                self.list.push(DisplayItem::FillRect(FillRectItem {
                    rect: paint_rect,
                    color: style.background_color,
                }));
                self.list.push(DisplayItem::PopTextClip);
            } else if radii.is_zero() {
                self.list.push(DisplayItem::FillRect(FillRectItem {
                    rect: paint_rect,
                    color: style.background_color,
                }));
            } else {
                self.list.push(DisplayItem::FillRoundedRect(FillRoundedRectItem {
                    rect: paint_rect,
                    radii,
                    color: style.background_color,
                }));
            }
        }

        // Borders of collapsed table parts are resolved on the grid and
        // painted as segments after the cell backgrounds.
        let collapsed = fragment.content.is_table_part() && style.border_collapse == BorderCollapse::Collapse;
        if style.has_visible_border() && !collapsed {
            self.list.push(DisplayItem::Border(BorderItem {
                rect,
                radii,
                top: style.border_top,
                right: style.border_right,
                bottom: style.border_bottom,
                left: style.border_left,
            }));
        }
    }

    fn maybe_emit_collapsed_borders(&mut self, fragment: &FragmentNode, origin: Point) {
        let is_table = matches!(fragment.content, FragmentContent::Table { .. });
        if !is_table || fragment.style.border_collapse != BorderCollapse::Collapse {
            return;
        }
        // A malformed grid paints nothing rather than failing the build.
        if let Ok(grid) = CollapsedBorderGrid::resolve(fragment) {
            grid.emit(&mut self.list, origin);
        }
    }

    fn paint_text(&mut self, fragment: &FragmentNode, origin: Point) {
        let style = &fragment.style;
        if style.visibility != Visibility::Visible {
            return;
        }
        let FragmentContent::Text {
            text, baseline_offset, ..
        } = &fragment.content
        else {
            return;
        };
        if text.is_empty() {
            return;
        }
        self.list.push(DisplayItem::Text(TextItem {
            origin: Point::new(origin.x, origin.y + baseline_offset),
            text: text.clone(),
            color: style.color,
            font_size: style.font_size,
        }));
    }

    fn paint_selection(&mut self, fragment: &FragmentNode, origin: Point) {
        let FragmentContent::Text {
            text,
            selection: Some((start, end)),
            ..
        } = &fragment.content
        else {
            return;
        };
        if text.is_empty() || start >= end {
            return;
        }
        let len = text.len() as f32;
        let start_fraction = (*start).min(text.len()) as f32 / len;
        let end_fraction = (*end).min(text.len()) as f32 / len;
        // Glyph advances are unavailable here, so the highlight slices the
        // fragment width proportionally to the byte range.
        let width = fragment.bounds.width();
        let rect = Rect::from_xywh(
            origin.x + width * start_fraction,
            origin.y,
            width * (end_fraction - start_fraction),
            fragment.bounds.height(),
        );
        self.list.push(DisplayItem::FillRect(FillRectItem {
            rect,
            color: SELECTION_COLOR,
        }));
    }

    fn paint_outline(&mut self, fragment: &FragmentNode, origin: Point) {
        let style = &fragment.style;
        if style.visibility != Visibility::Visible || !style.has_visible_outline() {
            return;
        }
        let rect = Rect::new(origin, fragment.bounds.size).inflate(style.outline_offset + style.outline.width / 2.0);
        self.list.push(DisplayItem::StrokeRect(StrokeRectItem {
            rect,
            color: style.outline.color,
            width: style.outline.width,
            style: style.outline.style,
        }));
    }

    /// Paints overlay scrollbar thumbs for this unit's scroll containers
    ///
    /// Walks the in-flow subtree only: floats, atomic inlines, and nested
    /// stacking contexts emit their own scrollbars in their own units.
    fn paint_overlay_scrollbars(&mut self, fragment: &FragmentNode, origin: Point) {
        self.paint_scrollbar_thumbs(fragment, origin);
        self.paint_descendant_scrollbars(fragment, origin);
    }

    fn paint_descendant_scrollbars(&mut self, fragment: &FragmentNode, origin: Point) {
        for child in &fragment.children {
            if creates_stacking_context(&child.style, false)
                || child.content.is_float()
                || child.content.is_atomic_inline()
            {
                continue;
            }
            let child_origin = origin.translate(child.bounds.origin);
            self.paint_scrollbar_thumbs(child, child_origin);
            self.paint_descendant_scrollbars(child, child_origin);
        }
    }

    fn paint_scrollbar_thumbs(&mut self, fragment: &FragmentNode, origin: Point) {
        let style = &fragment.style;
        if style.visibility != Visibility::Visible || !style.is_scroll_container() {
            return;
        }
        let padding_box = clip_rect_for(fragment, origin);
        if padding_box.is_empty() {
            return;
        }
        if style.overflow_y.is_scrollable() {
            let thumb_height = (padding_box.height() / 3.0).max(SCROLLBAR_THICKNESS);
            self.list.push(DisplayItem::Scrollbar(ScrollbarItem {
                rect: Rect::from_xywh(
                    padding_box.max_x() - SCROLLBAR_THICKNESS,
                    padding_box.y() + SCROLLBAR_INSET,
                    SCROLLBAR_THICKNESS - SCROLLBAR_INSET,
                    thumb_height,
                ),
                horizontal: false,
            }));
        }
        if style.overflow_x.is_scrollable() {
            let thumb_width = (padding_box.width() / 3.0).max(SCROLLBAR_THICKNESS);
            self.list.push(DisplayItem::Scrollbar(ScrollbarItem {
                rect: Rect::from_xywh(
                    padding_box.x() + SCROLLBAR_INSET,
                    padding_box.max_y() - SCROLLBAR_THICKNESS,
                    thumb_width,
                    SCROLLBAR_THICKNESS - SCROLLBAR_INSET,
                ),
                horizontal: true,
            }));
        }
    }

    fn collect_text_runs(&self, fragment: &FragmentNode, origin: Point, runs: &mut Vec<TextItem>) {
        for child in &fragment.children {
            let child_origin = origin.translate(child.bounds.origin);
            if let FragmentContent::Text {
                text, baseline_offset, ..
            } = &child.content
            {
                if !text.is_empty() {
                    runs.push(TextItem {
                        origin: Point::new(child_origin.x, child_origin.y + baseline_offset),
                        text: text.clone(),
                        color: child.style.color,
                        font_size: child.style.font_size,
                    });
                }
            }
            self.collect_text_runs(child, child_origin, runs);
        }
    }
}

/// Convenience: paints a fragment tree with default options
pub fn paint_tree(tree: &FragmentTree) -> DisplayList {
    DisplayListBuilder::new().build_tree(tree)
}
