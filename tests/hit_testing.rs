//! Hit-testing tests: topmost-first ordering, z-index, clip consistency
//! with painting, and pointer-events/visibility transparency.

use std::sync::Arc;
use stylecast::paint::hit_test::hit_test;
use stylecast::paint::PaintPhase;
use stylecast::style::types::{Overflow, PointerEvents, Position, Visibility};
use stylecast::{ComputedStyle, FragmentContent, FragmentNode, Point, Rect, Rgba};

fn styled(mutate: impl FnOnce(&mut ComputedStyle)) -> Arc<ComputedStyle> {
    let mut style = ComputedStyle::default();
    mutate(&mut style);
    Arc::new(style)
}

fn block(rect: Rect, style: Arc<ComputedStyle>, children: Vec<FragmentNode>) -> FragmentNode {
    FragmentNode::new_block(rect, children).with_style(style)
}

fn prepared(mut root: FragmentNode) -> FragmentNode {
    root.update_ink_overflow();
    root
}

#[test]
fn topmost_sibling_is_hit_first() {
    // Two overlapping siblings: the later one paints on top.
    let first = block(Rect::from_xywh(0.0, 0.0, 50.0, 50.0), styled(|s| s.background_color = Rgba::RED), vec![]);
    let second = block(
        Rect::from_xywh(25.0, 0.0, 50.0, 50.0),
        styled(|s| s.background_color = Rgba::rgb(0, 0, 255)),
        vec![],
    );
    let root = prepared(FragmentNode::new_block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        vec![first, second],
    ));

    let hits = hit_test(&root, Point::new(30.0, 10.0));
    assert!(hits.len() >= 3);
    assert_eq!(hits[0].fragment.bounds.x(), 25.0, "second sibling on top");
    assert_eq!(hits[0].position, Point::new(5.0, 10.0));
    assert_eq!(hits[1].fragment.bounds.x(), 0.0);
    // The root is hit last.
    assert!(std::ptr::eq(hits.last().unwrap().fragment, &root));
}

#[test]
fn positive_z_index_hits_before_overlapping_in_flow_content() {
    let positioned = block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        styled(|s| {
            s.position = Position::Relative;
            s.z_index = Some(1);
        }),
        vec![],
    );
    let in_flow = block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), Arc::new(ComputedStyle::default()), vec![]);
    // The positioned box comes first in tree order but hits first anyway.
    let root = prepared(FragmentNode::new_block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        vec![positioned, in_flow],
    ));

    let hits = hit_test(&root, Point::new(50.0, 50.0));
    assert!(hits[0].fragment.style.z_index == Some(1));
}

#[test]
fn negative_z_index_hits_after_in_flow_content() {
    let behind = block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        styled(|s| {
            s.position = Position::Relative;
            s.z_index = Some(-1);
        }),
        vec![],
    );
    let in_flow = block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), Arc::new(ComputedStyle::default()), vec![]);
    let root = prepared(FragmentNode::new_block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        vec![behind, in_flow],
    ));

    let hits = hit_test(&root, Point::new(50.0, 50.0));
    let behind_at = hits
        .iter()
        .position(|hit| hit.fragment.style.z_index == Some(-1))
        .expect("negative z still hit");
    let flow_at = hits
        .iter()
        .position(|hit| hit.fragment.style.z_index.is_none() && !std::ptr::eq(hit.fragment, &root))
        .expect("in-flow hit");
    assert!(flow_at < behind_at);
}

#[test]
fn text_hits_in_foreground_phase_before_its_block() {
    let text = FragmentNode::new_text(Rect::from_xywh(0.0, 0.0, 80.0, 16.0), "hit me", 12.0);
    let line = FragmentNode::new_line(Rect::from_xywh(10.0, 10.0, 80.0, 16.0), 12.0, vec![text]);
    let holder = block(Rect::from_xywh(0.0, 0.0, 100.0, 40.0), Arc::new(ComputedStyle::default()), vec![line]);
    let root = prepared(FragmentNode::new_block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), vec![holder]));

    let hits = hit_test(&root, Point::new(20.0, 20.0));
    assert!(hits[0].fragment.content.is_text());
    assert_eq!(hits[0].phase, PaintPhase::Foreground);
    assert!(hits[1].fragment.content.is_block());
}

#[test]
fn clipped_content_cannot_be_hit_outside_the_clip() {
    // Child extends past its clipping parent; painting clips it, so
    // hit testing must agree.
    let overflowing = block(Rect::from_xywh(0.0, 0.0, 300.0, 20.0), Arc::new(ComputedStyle::default()), vec![]);
    let clipper = block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        styled(|s| {
            s.overflow_x = Overflow::Hidden;
            s.overflow_y = Overflow::Hidden;
        }),
        vec![overflowing],
    );
    let root = prepared(FragmentNode::new_block(
        Rect::from_xywh(0.0, 0.0, 400.0, 100.0),
        vec![clipper],
    ));

    // Inside the clip: the overflowing child is hit.
    let hits = hit_test(&root, Point::new(50.0, 10.0));
    assert!(hits.iter().any(|hit| hit.fragment.bounds.width() == 300.0));

    // Outside the clip (but inside the child's unclipped bounds): only the
    // root remains.
    let hits = hit_test(&root, Point::new(200.0, 10.0));
    assert!(hits.iter().all(|hit| hit.fragment.bounds.width() != 300.0));
    assert!(hits.iter().any(|hit| std::ptr::eq(hit.fragment, &root)));
}

#[test]
fn pointer_events_none_is_transparent_to_hits() {
    let inert = block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        styled(|s| s.pointer_events = PointerEvents::None),
        vec![],
    );
    let root = prepared(FragmentNode::new_block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), vec![inert]));

    let hits = hit_test(&root, Point::new(50.0, 50.0));
    assert_eq!(hits.len(), 1);
    assert!(std::ptr::eq(hits[0].fragment, &root));
}

#[test]
fn hidden_fragment_is_transparent_but_children_still_hit() {
    let visible_child = block(
        Rect::from_xywh(10.0, 10.0, 30.0, 30.0),
        styled(|s| s.visibility = Visibility::Visible),
        vec![],
    );
    let hidden = block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        styled(|s| s.visibility = Visibility::Hidden),
        vec![visible_child],
    );
    let root = prepared(FragmentNode::new_block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), vec![hidden]));

    let hits = hit_test(&root, Point::new(20.0, 20.0));
    assert!(hits.iter().any(|hit| hit.fragment.bounds.width() == 30.0));
    assert!(!hits.iter().any(|hit| hit.fragment.bounds.width() == 100.0 && hit.fragment.style.visibility == Visibility::Hidden));
}

#[test]
fn float_hits_between_foreground_and_backgrounds() {
    let float_child = FragmentNode::new(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        FragmentContent::Float,
        Arc::new(ComputedStyle::default()),
        vec![],
    );
    let background_block = block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), Arc::new(ComputedStyle::default()), vec![]);
    let text = FragmentNode::new_text(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), "top", 12.0);
    let line = FragmentNode::new_line(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), 12.0, vec![text]);
    let root = prepared(FragmentNode::new_block(
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        vec![background_block, float_child, line],
    ));

    let hits = hit_test(&root, Point::new(50.0, 50.0));
    let text_at = hits.iter().position(|hit| hit.fragment.content.is_text()).unwrap();
    let float_at = hits.iter().position(|hit| hit.fragment.content.is_float()).unwrap();
    let block_at = hits
        .iter()
        .position(|hit| hit.fragment.content.is_block() && !std::ptr::eq(hit.fragment, &root))
        .unwrap();
    assert!(text_at < float_at, "foreground above floats");
    assert!(float_at < block_at, "floats above in-flow backgrounds");
}

#[test]
fn topmost_hit_matches_last_painted_fill() {
    // Consistency between painting and hit testing: build a small
    // overlapping arrangement, find the last fill painted at a point, and
    // check the topmost hit is the fragment with that color.
    use stylecast::paint::display_list::DisplayItem;
    use stylecast::paint::DisplayListBuilder;

    let colors = [Rgba::rgb(1, 1, 1), Rgba::rgb(2, 2, 2), Rgba::rgb(3, 3, 3)];
    let children = vec![
        block(Rect::from_xywh(0.0, 0.0, 60.0, 60.0), styled(|s| s.background_color = colors[0]), vec![]),
        block(
            Rect::from_xywh(30.0, 0.0, 60.0, 60.0),
            styled(|s| {
                s.background_color = colors[1];
                s.position = Position::Relative;
                s.z_index = Some(2);
            }),
            vec![],
        ),
        block(Rect::from_xywh(0.0, 30.0, 60.0, 60.0), styled(|s| s.background_color = colors[2]), vec![]),
    ];
    let root = prepared(FragmentNode::new_block(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), children));

    let point = Point::new(45.0, 45.0);
    let list = DisplayListBuilder::new().build(&root);
    let last_painted = list
        .iter()
        .filter_map(|item| match item {
            DisplayItem::FillRect(fill) if fill.rect.contains_point(point) => Some(fill.color),
            _ => None,
        })
        .last()
        .expect("something painted at the probe point");

    let hits = hit_test(&root, point);
    assert_eq!(hits[0].fragment.style.background_color, last_painted);
}
