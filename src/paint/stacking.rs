//! Stacking Context Tree
//!
//! Stacking contexts determine paint order across z-index, opacity, blend
//! modes, and masks. The painter first builds a stacking tree over the
//! fragment tree, then paints each context as one unit: its in-flow content
//! via the paint phases, its child contexts ordered by z-index.
//!
//! # CSS Specification
//!
//! - CSS 2.1 Appendix E: Elaborate description of Stacking Contexts
//!   <https://www.w3.org/TR/CSS21/zindex.html>
//! - CSS 2.1 Section 9.9: Layered presentation
//!   <https://www.w3.org/TR/CSS21/visuren.html#layered-presentation>
//!
//! Within each stacking context, painting proceeds:
//!
//! 1. Background and borders of the stacking context root
//! 2. Child stacking contexts with negative z-index (most negative first)
//! 3. In-flow descendant backgrounds (tree order)
//! 4. Non-positioned floats (tree order)
//! 5. Inline-level content (tree order)
//! 6. Child stacking contexts with z-index 0/auto (tree order)
//! 7. Child stacking contexts with positive z-index (least positive first)

use crate::geometry::{Point, Rect};
use crate::style::computed::ComputedStyle;
use crate::style::types::{MixBlendMode, Position};
use crate::tree::fragment::FragmentNode;

/// Reasons why a stacking context was created
///
/// Used for debugging and understanding the stacking tree structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingContextReason {
    /// Root of the fragment tree
    Root,

    /// Positioned element with z-index != auto
    PositionedWithZIndex,

    /// Fixed positioning (always creates a stacking context)
    FixedPositioning,

    /// Sticky positioning (always creates a stacking context)
    StickyPositioning,

    /// Opacity < 1.0
    Opacity,

    /// mix-blend-mode != normal
    MixBlendMode,

    /// isolation: isolate
    Isolation,

    /// A mask is applied
    Mask,
}

/// Returns true if the style establishes a stacking context
pub fn creates_stacking_context(style: &ComputedStyle, is_root: bool) -> bool {
    get_stacking_context_reason(style, is_root).is_some()
}

/// The first matching reason a stacking context is established, if any
pub fn get_stacking_context_reason(style: &ComputedStyle, is_root: bool) -> Option<StackingContextReason> {
    if is_root {
        return Some(StackingContextReason::Root);
    }
    if style.position.is_positioned() && style.z_index.is_some() {
        return Some(StackingContextReason::PositionedWithZIndex);
    }
    if style.position == Position::Fixed {
        return Some(StackingContextReason::FixedPositioning);
    }
    if style.position == Position::Sticky {
        return Some(StackingContextReason::StickyPositioning);
    }
    if style.opacity < 1.0 {
        return Some(StackingContextReason::Opacity);
    }
    if style.mix_blend_mode != MixBlendMode::Normal {
        return Some(StackingContextReason::MixBlendMode);
    }
    if style.isolation_isolate {
        return Some(StackingContextReason::Isolation);
    }
    if style.mask_image.is_some() {
        return Some(StackingContextReason::Mask);
    }
    None
}

/// The clip rectangle a box imposes on its descendants, in absolute
/// coordinates: the padding box (border box inset by border widths)
pub fn clip_rect_for(fragment: &FragmentNode, origin: Point) -> Rect {
    let border_rect = Rect::new(origin, fragment.bounds.size);
    border_rect.inset(fragment.style.border_widths())
}

/// One stacking context over a borrowed fragment subtree
///
/// `origin` is the absolute position of the root fragment's border box;
/// `clip` is the accumulated clip imposed by boxes between the parent
/// context's root and this one (the parent's own in-flow walk never
/// descends into this subtree, so the clip must be carried here).
#[derive(Debug, Clone)]
pub struct StackingContext<'a> {
    pub root: &'a FragmentNode,
    pub origin: Point,
    pub clip: Option<Rect>,
    pub z_index: i32,
    pub reason: StackingContextReason,
    /// Pre-order index used to break z-index ties in tree order
    pub tree_order: usize,
    pub children: Vec<StackingContext<'a>>,
}

impl<'a> StackingContext<'a> {
    /// Child contexts with negative z-index, most negative first
    pub fn negative_z_children(&self) -> impl Iterator<Item = &StackingContext<'a>> {
        self.children.iter().filter(|child| child.z_index < 0)
    }

    /// Child contexts with z-index zero (or auto), in tree order
    pub fn zero_z_children(&self) -> impl Iterator<Item = &StackingContext<'a>> {
        self.children.iter().filter(|child| child.z_index == 0)
    }

    /// Child contexts with positive z-index, least positive first
    pub fn positive_z_children(&self) -> impl Iterator<Item = &StackingContext<'a>> {
        self.children.iter().filter(|child| child.z_index > 0)
    }

    /// Total number of contexts in this subtree, including self
    pub fn context_count(&self) -> usize {
        1 + self.children.iter().map(StackingContext::context_count).sum::<usize>()
    }

    fn sort_children(&mut self) {
        // Stable: tree order breaks z-index ties.
        self.children.sort_by_key(|child| child.z_index);
        for child in &mut self.children {
            child.sort_children();
        }
    }
}

/// Builds the stacking tree for one fragmentainer root
///
/// `origin` is the absolute position of the root fragment's border box
/// (usually `root.bounds.origin`).
pub fn build_stacking_tree(root: &FragmentNode, origin: Point) -> StackingContext<'_> {
    let mut order = 0usize;
    let mut context = StackingContext {
        root,
        origin,
        clip: None,
        z_index: 0,
        reason: StackingContextReason::Root,
        tree_order: order,
        children: Vec::new(),
    };
    collect_child_contexts(&mut context, root, origin, None, &mut order);
    context.sort_children();
    context
}

/// Walks in-flow content below `fragment`, recording descendant stacking
/// context roots (without descending into them) on `context`.
fn collect_child_contexts<'a>(
    context: &mut StackingContext<'a>,
    fragment: &'a FragmentNode,
    origin: Point,
    clip: Option<Rect>,
    order: &mut usize,
) {
    let child_clip = if fragment.style.clips_overflow() && !std::ptr::eq(fragment, context.root) {
        let own = clip_rect_for(fragment, origin);
        Some(match clip {
            Some(existing) => existing.intersection(own).unwrap_or(Rect::ZERO),
            None => own,
        })
    } else {
        clip
    };

    for child in &fragment.children {
        *order += 1;
        let child_origin = origin.translate(child.bounds.origin);
        if let Some(reason) = get_stacking_context_reason(&child.style, false) {
            let mut child_context = StackingContext {
                root: child,
                origin: child_origin,
                clip: child_clip,
                z_index: child.style.z_index.unwrap_or(0),
                reason,
                tree_order: *order,
                children: Vec::new(),
            };
            collect_child_contexts(&mut child_context, child, child_origin, None, order);
            context.children.push(child_context);
        } else {
            collect_child_contexts(context, child, child_origin, child_clip, order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn styled(mutate: impl FnOnce(&mut ComputedStyle)) -> Arc<ComputedStyle> {
        let mut style = ComputedStyle::default();
        mutate(&mut style);
        Arc::new(style)
    }

    fn block_at(x: f32, y: f32, children: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::new_block(Rect::from_xywh(x, y, 100.0, 100.0), children)
    }

    #[test]
    fn opacity_creates_stacking_context() {
        let style = styled(|s| s.opacity = 0.5);
        assert_eq!(get_stacking_context_reason(&style, false), Some(StackingContextReason::Opacity));
    }

    #[test]
    fn positioned_without_z_index_does_not_create_context() {
        let style = styled(|s| s.position = Position::Relative);
        assert!(!creates_stacking_context(&style, false));

        let style = styled(|s| {
            s.position = Position::Relative;
            s.z_index = Some(0);
        });
        assert!(creates_stacking_context(&style, false));
    }

    #[test]
    fn z_index_on_static_box_does_not_create_context() {
        let style = styled(|s| s.z_index = Some(5));
        assert!(!creates_stacking_context(&style, false));
    }

    #[test]
    fn children_sorted_by_z_index_with_tree_order_ties() {
        let make = |z: i32, x: f32| {
            block_at(x, 0.0, vec![]).with_style(styled(|s| {
                s.position = Position::Relative;
                s.z_index = Some(z);
            }))
        };
        let root = block_at(0.0, 0.0, vec![make(3, 1.0), make(-1, 2.0), make(0, 3.0), make(-1, 4.0)]);
        let tree = build_stacking_tree(&root, root.bounds.origin);

        let zs: Vec<i32> = tree.children.iter().map(|c| c.z_index).collect();
        assert_eq!(zs, vec![-1, -1, 0, 3]);
        // The two z:-1 children keep tree order.
        assert_eq!(tree.children[0].root.bounds.x(), 2.0);
        assert_eq!(tree.children[1].root.bounds.x(), 4.0);

        assert_eq!(tree.negative_z_children().count(), 2);
        assert_eq!(tree.zero_z_children().count(), 1);
        assert_eq!(tree.positive_z_children().count(), 1);
    }

    #[test]
    fn nested_context_roots_are_not_flattened() {
        let inner = block_at(0.0, 0.0, vec![]).with_style(styled(|s| s.opacity = 0.5));
        let outer = block_at(10.0, 10.0, vec![inner]).with_style(styled(|s| s.opacity = 0.8));
        let root = block_at(0.0, 0.0, vec![outer]);
        let tree = build_stacking_tree(&root, Point::ZERO);

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].children.len(), 1);
        assert_eq!(tree.context_count(), 3);
    }

    #[test]
    fn context_origin_accumulates_through_non_context_ancestors() {
        let leaf = block_at(5.0, 6.0, vec![]).with_style(styled(|s| s.opacity = 0.5));
        let middle = block_at(10.0, 20.0, vec![leaf]);
        let root = block_at(100.0, 200.0, vec![middle]);
        let tree = build_stacking_tree(&root, root.bounds.origin);

        assert_eq!(tree.children.len(), 1);
        let child = &tree.children[0];
        assert_eq!(child.origin, Point::new(115.0, 226.0));
    }

    #[test]
    fn clip_from_intermediate_box_is_recorded_on_child_context() {
        let leaf = block_at(0.0, 0.0, vec![]).with_style(styled(|s| s.opacity = 0.5));
        let clipper = FragmentNode::new_block(Rect::from_xywh(10.0, 10.0, 50.0, 50.0), vec![leaf]).with_style(styled(|s| {
            s.overflow_x = crate::style::types::Overflow::Hidden;
            s.overflow_y = crate::style::types::Overflow::Hidden;
        }));
        let root = block_at(0.0, 0.0, vec![clipper]);
        let tree = build_stacking_tree(&root, Point::ZERO);

        assert_eq!(tree.children.len(), 1);
        let clip = tree.children[0].clip.expect("clip must be carried onto the child context");
        assert_eq!(clip, Rect::from_xywh(10.0, 10.0, 50.0, 50.0));
    }
}
