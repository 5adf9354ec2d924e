//! Paint phases
//!
//! Painting a box subtree is not one traversal but several: each phase
//! walks the same fragments and emits only the draw operations relevant to
//! that phase. Running the phases in order produces the CSS painting-order
//! stacking within one stacking context.
//!
//! Reference: CSS 2.1 Appendix E
//! <https://www.w3.org/TR/CSS21/zindex.html>

/// One pass over a stacking context's in-flow content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintPhase {
    /// Background and border of the stacking context root itself
    SelfBackground,

    /// Backgrounds and borders of in-flow, non-positioned descendants
    DescendantBackgrounds,

    /// Non-positioned floats, each painted as a complete mini-paint
    Floats,

    /// Inline-level content: text runs and atomic inline subtrees
    Foreground,

    /// Selection highlights for text fragments carrying a selection
    Selection,

    /// Outlines of the root and of in-flow descendants
    Outline,

    /// Mask geometry for boxes with a mask image
    Mask,

    /// Text geometry used as a clip for `background-clip: text`
    TextClip,

    /// Overlay scrollbar thumbs of scroll containers, on top of content
    OverlayScrollbars,
}

impl PaintPhase {
    /// The in-flow content phases, in paint order
    ///
    /// `SelfBackground` is excluded: the context root's own background is
    /// painted once by the context walk, not per phase. Selection
    /// highlights paint after backgrounds but before glyphs so selected
    /// text stays legible. `Mask` and `TextClip` are excluded because they
    /// wrap other phases' output rather than traversing on their own.
    pub const CONTENT_ORDER: [PaintPhase; 5] = [
        PaintPhase::DescendantBackgrounds,
        PaintPhase::Floats,
        PaintPhase::Selection,
        PaintPhase::Foreground,
        PaintPhase::Outline,
    ];

    /// Phases consulted by hit testing, topmost first
    ///
    /// Mirrors the paint order in reverse; phases that never produce
    /// hit-testable geometry (selection, outline, mask, text-clip,
    /// scrollbars) are skipped.
    pub const HIT_TEST_ORDER: [PaintPhase; 3] = [
        PaintPhase::Foreground,
        PaintPhase::Floats,
        PaintPhase::DescendantBackgrounds,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_order_reverses_hit_testable_content_phases() {
        let mut paint_order: Vec<PaintPhase> = PaintPhase::CONTENT_ORDER
            .iter()
            .copied()
            .filter(|phase| PaintPhase::HIT_TEST_ORDER.contains(phase))
            .collect();
        paint_order.reverse();
        assert_eq!(paint_order, PaintPhase::HIT_TEST_ORDER.to_vec());
    }
}
