use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use std::sync::Arc;
use stylecast::paint::hit_test::hit_test;
use stylecast::paint::DisplayListBuilder;
use stylecast::style::types::Position;
use stylecast::{ComputedStyle, FragmentNode, Point, Rect, Rgba};

/// A grid of rows, each holding a handful of blocks and a text line, with
/// a sprinkling of positioned boxes to exercise the stacking tree.
fn build_tree(rows: usize, columns: usize) -> FragmentNode {
  let mut row_fragments = Vec::with_capacity(rows);
  for row in 0..rows {
    let mut children = Vec::with_capacity(columns + 1);
    for column in 0..columns {
      let mut style = ComputedStyle::default();
      style.background_color = Rgba::rgb((row % 255) as u8, (column % 255) as u8, 128);
      if (row + column) % 7 == 0 {
        style.position = Position::Relative;
        style.z_index = Some(((row + column) % 3) as i32 - 1);
      }
      children.push(
        FragmentNode::new_block(
          Rect::from_xywh(column as f32 * 40.0, 0.0, 36.0, 18.0),
          vec![],
        )
        .with_style(Arc::new(style)),
      );
    }
    let text = FragmentNode::new_text(Rect::from_xywh(0.0, 0.0, 200.0, 14.0), "row label", 11.0);
    let line = FragmentNode::new_line(
      Rect::from_xywh(0.0, 18.0, columns as f32 * 40.0, 14.0),
      11.0,
      vec![text],
    );
    children.push(line);
    row_fragments.push(FragmentNode::new_block(
      Rect::from_xywh(0.0, row as f32 * 36.0, columns as f32 * 40.0, 34.0),
      children,
    ));
  }
  let mut root = FragmentNode::new_block(
    Rect::from_xywh(0.0, 0.0, columns as f32 * 40.0, rows as f32 * 36.0),
    row_fragments,
  );
  root.update_ink_overflow();
  root
}

fn bench_build(c: &mut Criterion) {
  let small = build_tree(10, 10);
  let large = build_tree(60, 20);

  c.bench_function("display_list_small", |b| {
    b.iter(|| black_box(DisplayListBuilder::new().build(&small)));
  });

  c.bench_function("display_list_large", |b| {
    b.iter(|| black_box(DisplayListBuilder::new().build(&large)));
  });

  c.bench_function("display_list_large_culled", |b| {
    b.iter(|| {
      black_box(
        DisplayListBuilder::new()
          .with_cull_rect(Rect::from_xywh(0.0, 0.0, 400.0, 300.0))
          .build(&large),
      )
    });
  });
}

fn bench_hit_test(c: &mut Criterion) {
  let tree = build_tree(60, 20);
  c.bench_function("hit_test_large", |b| {
    b.iter(|| black_box(hit_test(&tree, Point::new(401.0, 1077.0))));
  });
}

criterion_group!(benches, bench_build, bench_hit_test);
criterion_main!(benches);
