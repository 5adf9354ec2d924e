//! Collapsed table border resolution
//!
//! With `border-collapse: collapse`, adjacent table, row-group, row, and
//! cell borders share grid lines, and each edge slot must pick a single
//! winner. The conflict rules, in order:
//!
//! 1. `hidden` suppresses the edge entirely, beating everything.
//! 2. A wider border beats a narrower one.
//! 3. At equal width, the style rank decides:
//!    `double > solid > dashed > dotted > ridge > outset > groove > inset`.
//! 4. At equal width and style, the contributor later in DOM order wins.
//! 5. `none` loses to any real style.
//!
//! The winning edge paints centered on the grid line, extending half its
//! width into each adjacent cell.
//!
//! # Fragmentation
//!
//! A table split across pages/columns never collapses borders across the
//! break: a non-first fragment drops the table's block-start contribution,
//! a non-last fragment its block-end one, and row edges at the break see
//! only the contributors present in this fragment.
//!
//! Reference: CSS 2.1 §17.6.2 <https://www.w3.org/TR/CSS21/tables.html#collapsing-borders>

use crate::error::PaintError;
use crate::geometry::{Point, Rect};
use crate::paint::display_list::{BorderSegmentItem, DisplayItem, DisplayList};
use crate::style::color::Rgba;
use crate::style::types::{BorderSide, BorderStyle};
use crate::tree::fragment::{FragmentContent, FragmentNode};

/// One candidate border for a grid edge slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderContribution {
    pub width: f32,
    pub style: BorderStyle,
    pub color: Rgba,
}

impl BorderContribution {
    fn from_side(side: &BorderSide) -> Self {
        Self {
            width: side.width,
            style: side.style,
            color: side.color,
        }
    }

    /// Returns true when this contribution displaces `incumbent`
    ///
    /// Callers apply contributions in DOM order, so "later wins" at full
    /// ties means returning true on equality.
    pub fn wins_over(&self, incumbent: &BorderContribution) -> bool {
        if incumbent.style == BorderStyle::Hidden {
            return false;
        }
        if self.style == BorderStyle::Hidden {
            return true;
        }
        if self.style == BorderStyle::None {
            return false;
        }
        if incumbent.style == BorderStyle::None {
            return true;
        }
        if self.width != incumbent.width {
            return self.width > incumbent.width;
        }
        if self.style != incumbent.style {
            return self.style > incumbent.style;
        }
        true
    }

    /// Returns true when the resolved edge actually draws
    fn paints(&self) -> bool {
        self.width > 0.0 && self.style.is_visible() && !self.color.is_transparent()
    }
}

/// Resolved winners for every edge slot of one table fragment's grid
///
/// Horizontal edges live on `rows + 1` lines of `columns` slots each;
/// vertical edges on rows of `columns + 1` lines. Grid line positions are
/// relative to the table fragment's origin.
#[derive(Debug, Clone)]
pub struct CollapsedBorderGrid {
    rows: usize,
    columns: usize,
    row_positions: Vec<f32>,
    column_positions: Vec<f32>,
    horizontal: Vec<Option<BorderContribution>>,
    vertical: Vec<Option<BorderContribution>>,
}

impl CollapsedBorderGrid {
    /// Resolves the collapsed borders of a table fragment
    ///
    /// `table.content` must be [`FragmentContent::Table`]; other fragments
    /// resolve to an empty grid. Cells referencing slots outside the
    /// declared grid are an error.
    pub fn resolve(table: &FragmentNode) -> Result<Self, PaintError> {
        let FragmentContent::Table { rows, columns } = table.content else {
            return Ok(Self::empty());
        };
        if rows == 0 || columns == 0 {
            return Ok(Self::empty());
        }

        let mut grid = Self {
            rows,
            columns,
            row_positions: vec![f32::NAN; rows + 1],
            column_positions: vec![f32::NAN; columns + 1],
            horizontal: vec![None; (rows + 1) * columns],
            vertical: vec![None; rows * (columns + 1)],
        };

        grid.row_positions[0] = 0.0;
        grid.row_positions[rows] = table.bounds.height();
        grid.column_positions[0] = 0.0;
        grid.column_positions[columns] = table.bounds.width();

        // The table's own border contributes to the outer grid lines,
        // except along a fragmentation break.
        let table_side = |side: &BorderSide| BorderContribution::from_side(side);
        if table.slice_info.is_first {
            grid.contribute_horizontal(0, 0..columns, table_side(&table.style.border_top))?;
        }
        if table.slice_info.is_last {
            grid.contribute_horizontal(rows, 0..columns, table_side(&table.style.border_bottom))?;
        }
        grid.contribute_vertical(0, 0..rows, table_side(&table.style.border_left))?;
        grid.contribute_vertical(columns, 0..rows, table_side(&table.style.border_right))?;

        grid.collect(table, Point::ZERO)?;
        grid.fill_missing_positions();
        Ok(grid)
    }

    fn empty() -> Self {
        Self {
            rows: 0,
            columns: 0,
            row_positions: Vec::new(),
            column_positions: Vec::new(),
            horizontal: Vec::new(),
            vertical: Vec::new(),
        }
    }

    /// The resolved winner for a horizontal edge slot
    pub fn horizontal_edge(&self, line: usize, column: usize) -> Option<&BorderContribution> {
        self.horizontal.get(line * self.columns + column)?.as_ref()
    }

    /// The resolved winner for a vertical edge slot
    pub fn vertical_edge(&self, line: usize, row: usize) -> Option<&BorderContribution> {
        self.vertical.get(row * (self.columns + 1) + line)?.as_ref()
    }

    fn collect(&mut self, fragment: &FragmentNode, offset: Point) -> Result<(), PaintError> {
        for child in &fragment.children {
            let child_offset = offset.translate(child.bounds.origin);
            match &child.content {
                FragmentContent::TableSection => {
                    if let Some((first, last)) = section_row_range(child) {
                        let contribution = BorderContribution::from_side(&child.style.border_top);
                        self.contribute_horizontal(first, 0..self.columns, contribution)?;
                        let contribution = BorderContribution::from_side(&child.style.border_bottom);
                        self.contribute_horizontal(last + 1, 0..self.columns, contribution)?;
                        let contribution = BorderContribution::from_side(&child.style.border_left);
                        self.contribute_vertical(0, first..last + 1, contribution)?;
                        let contribution = BorderContribution::from_side(&child.style.border_right);
                        self.contribute_vertical(self.columns, first..last + 1, contribution)?;
                    }
                    self.collect(child, child_offset)?;
                }
                FragmentContent::TableRow { row } => {
                    let row = *row;
                    if row >= self.rows {
                        return Err(PaintError::GridOutOfBounds {
                            row,
                            column: 0,
                            rows: self.rows,
                            columns: self.columns,
                        });
                    }
                    self.row_positions[row] = child_offset.y;
                    self.row_positions[row + 1] = child_offset.y + child.bounds.height();

                    let contribution = BorderContribution::from_side(&child.style.border_top);
                    self.contribute_horizontal(row, 0..self.columns, contribution)?;
                    let contribution = BorderContribution::from_side(&child.style.border_bottom);
                    self.contribute_horizontal(row + 1, 0..self.columns, contribution)?;
                    let contribution = BorderContribution::from_side(&child.style.border_left);
                    self.contribute_vertical(0, row..row + 1, contribution)?;
                    let contribution = BorderContribution::from_side(&child.style.border_right);
                    self.contribute_vertical(self.columns, row..row + 1, contribution)?;

                    self.collect(child, child_offset)?;
                }
                FragmentContent::TableCell {
                    row,
                    column,
                    row_span,
                    col_span,
                } => {
                    let (row, column) = (*row, *column);
                    let row_end = row + (*row_span).max(1);
                    let col_end = column + (*col_span).max(1);
                    if row_end > self.rows || col_end > self.columns {
                        return Err(PaintError::GridOutOfBounds {
                            row,
                            column,
                            rows: self.rows,
                            columns: self.columns,
                        });
                    }

                    self.column_positions[column] = child_offset.x;
                    self.column_positions[col_end] = child_offset.x + child.bounds.width();

                    let contribution = BorderContribution::from_side(&child.style.border_top);
                    self.contribute_horizontal(row, column..col_end, contribution)?;
                    let contribution = BorderContribution::from_side(&child.style.border_bottom);
                    self.contribute_horizontal(row_end, column..col_end, contribution)?;
                    let contribution = BorderContribution::from_side(&child.style.border_left);
                    self.contribute_vertical(column, row..row_end, contribution)?;
                    let contribution = BorderContribution::from_side(&child.style.border_right);
                    self.contribute_vertical(col_end, row..row_end, contribution)?;
                }
                _ => self.collect(child, child_offset)?,
            }
        }
        Ok(())
    }

    fn contribute_horizontal(
        &mut self,
        line: usize,
        columns: std::ops::Range<usize>,
        contribution: BorderContribution,
    ) -> Result<(), PaintError> {
        if line > self.rows {
            return Err(PaintError::GridOutOfBounds {
                row: line,
                column: columns.start,
                rows: self.rows,
                columns: self.columns,
            });
        }
        for column in columns {
            let slot = &mut self.horizontal[line * self.columns + column];
            apply_contribution(slot, contribution);
        }
        Ok(())
    }

    fn contribute_vertical(
        &mut self,
        line: usize,
        rows: std::ops::Range<usize>,
        contribution: BorderContribution,
    ) -> Result<(), PaintError> {
        if line > self.columns {
            return Err(PaintError::GridOutOfBounds {
                row: rows.start,
                column: line,
                rows: self.rows,
                columns: self.columns,
            });
        }
        for row in rows {
            if row >= self.rows {
                return Err(PaintError::GridOutOfBounds {
                    row,
                    column: line,
                    rows: self.rows,
                    columns: self.columns,
                });
            }
            let slot = &mut self.vertical[row * (self.columns + 1) + line];
            apply_contribution(slot, contribution);
        }
        Ok(())
    }

    /// Interpolates grid line positions no cell pinned down
    fn fill_missing_positions(&mut self) {
        interpolate_positions(&mut self.row_positions);
        interpolate_positions(&mut self.column_positions);
    }

    /// Emits the resolved edges as display items
    ///
    /// `origin` is the absolute position of the table fragment. Contiguous
    /// slots with identical winners merge into one segment.
    pub fn emit(&self, list: &mut DisplayList, origin: Point) {
        for line in 0..=self.rows {
            if self.columns == 0 {
                break;
            }
            let y = self.row_positions[line];
            let mut run_start: Option<(usize, BorderContribution)> = None;
            for column in 0..=self.columns {
                let current = if column < self.columns {
                    self.horizontal_edge(line, column).copied().filter(BorderContribution::paints)
                } else {
                    None
                };
                match (run_start, current) {
                    (None, Some(contribution)) => run_start = Some((column, contribution)),
                    (Some((start, active)), next) if next != Some(active) => {
                        let x0 = self.column_positions[start];
                        let x1 = self.column_positions[column];
                        list.push(DisplayItem::BorderSegment(BorderSegmentItem {
                            rect: Rect::from_xywh(
                                origin.x + x0,
                                origin.y + y - active.width / 2.0,
                                x1 - x0,
                                active.width,
                            ),
                            style: active.style,
                            color: active.color,
                        }));
                        run_start = next.map(|contribution| (column, contribution));
                    }
                    _ => {}
                }
            }
        }

        for line in 0..=self.columns {
            if self.rows == 0 {
                break;
            }
            let x = self.column_positions[line];
            let mut run_start: Option<(usize, BorderContribution)> = None;
            for row in 0..=self.rows {
                let current = if row < self.rows {
                    self.vertical_edge(line, row).copied().filter(BorderContribution::paints)
                } else {
                    None
                };
                match (run_start, current) {
                    (None, Some(contribution)) => run_start = Some((row, contribution)),
                    (Some((start, active)), next) if next != Some(active) => {
                        let y0 = self.row_positions[start];
                        let y1 = self.row_positions[row];
                        list.push(DisplayItem::BorderSegment(BorderSegmentItem {
                            rect: Rect::from_xywh(
                                origin.x + x - active.width / 2.0,
                                origin.y + y0,
                                active.width,
                                y1 - y0,
                            ),
                            style: active.style,
                            color: active.color,
                        }));
                        run_start = next.map(|contribution| (row, contribution));
                    }
                    _ => {}
                }
            }
        }
    }
}

fn apply_contribution(slot: &mut Option<BorderContribution>, contribution: BorderContribution) {
    match slot {
        Some(incumbent) => {
            if contribution.wins_over(incumbent) {
                *slot = Some(contribution);
            }
        }
        None => *slot = Some(contribution),
    }
}

/// Minimum and maximum row indices covered by a section's row children
fn section_row_range(section: &FragmentNode) -> Option<(usize, usize)> {
    let mut range: Option<(usize, usize)> = None;
    for child in &section.children {
        if let FragmentContent::TableRow { row } = child.content {
            range = Some(match range {
                Some((first, last)) => (first.min(row), last.max(row)),
                None => (row, row),
            });
        }
    }
    range
}

fn interpolate_positions(positions: &mut [f32]) {
    let len = positions.len();
    if len < 2 {
        return;
    }
    let mut index = 1;
    while index < len {
        if positions[index].is_nan() {
            // Find the next known position and spread the gap evenly.
            let prev = positions[index - 1];
            let mut next_index = index + 1;
            while next_index < len && positions[next_index].is_nan() {
                next_index += 1;
            }
            let next = if next_index < len { positions[next_index] } else { prev };
            let gap = (next_index - index + 1) as f32;
            for (step, slot) in (index..next_index).enumerate() {
                positions[slot] = prev + (next - prev) * (step as f32 + 1.0) / gap;
            }
            index = next_index;
        } else {
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::computed::ComputedStyle;
    use crate::tree::fragment::FragmentSliceInfo;
    use std::sync::Arc;

    fn side(width: f32, style: BorderStyle) -> BorderSide {
        BorderSide {
            width,
            style,
            color: Rgba::BLACK,
        }
    }

    fn contribution(width: f32, style: BorderStyle) -> BorderContribution {
        BorderContribution {
            width,
            style,
            color: Rgba::BLACK,
        }
    }

    fn cell(row: usize, column: usize, rect: Rect, style: ComputedStyle) -> FragmentNode {
        FragmentNode::new(
            rect,
            FragmentContent::TableCell {
                row,
                column,
                row_span: 1,
                col_span: 1,
            },
            Arc::new(style),
            vec![],
        )
    }

    fn row(index: usize, rect: Rect, cells: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::new(
            rect,
            FragmentContent::TableRow { row: index },
            Arc::new(ComputedStyle::default()),
            cells,
        )
    }

    fn table(rows: usize, columns: usize, rect: Rect, children: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::new(
            rect,
            FragmentContent::Table { rows, columns },
            Arc::new(ComputedStyle::default()),
            children,
        )
    }

    /// 1x2 table with configurable cell borders on the shared edge.
    fn shared_edge_table(left_right: BorderSide, right_left: BorderSide) -> FragmentNode {
        let mut left_style = ComputedStyle::default();
        left_style.border_right = left_right;
        let mut right_style = ComputedStyle::default();
        right_style.border_left = right_left;
        let cells = vec![
            cell(0, 0, Rect::from_xywh(0.0, 0.0, 50.0, 20.0), left_style),
            cell(0, 1, Rect::from_xywh(50.0, 0.0, 50.0, 20.0), right_style),
        ];
        table(
            1,
            2,
            Rect::from_xywh(0.0, 0.0, 100.0, 20.0),
            vec![row(0, Rect::from_xywh(0.0, 0.0, 100.0, 20.0), cells)],
        )
    }

    #[test]
    fn wider_border_wins() {
        let winner = contribution(4.0, BorderStyle::Dotted);
        let loser = contribution(2.0, BorderStyle::Double);
        assert!(winner.wins_over(&loser));
        assert!(!loser.wins_over(&winner));
    }

    #[test]
    fn equal_width_compares_style_rank() {
        let double = contribution(2.0, BorderStyle::Double);
        let solid = contribution(2.0, BorderStyle::Solid);
        assert!(double.wins_over(&solid));
        assert!(!solid.wins_over(&double));
    }

    #[test]
    fn full_tie_later_contribution_wins() {
        let a = contribution(2.0, BorderStyle::Solid);
        let b = contribution(2.0, BorderStyle::Solid);
        assert!(b.wins_over(&a));
    }

    #[test]
    fn hidden_suppresses_everything() {
        let hidden = contribution(0.0, BorderStyle::Hidden);
        let wide = contribution(10.0, BorderStyle::Solid);
        assert!(hidden.wins_over(&wide));
        assert!(!wide.wins_over(&hidden));
    }

    #[test]
    fn none_loses_to_any_real_style() {
        let none = contribution(5.0, BorderStyle::None);
        let thin = contribution(1.0, BorderStyle::Dotted);
        assert!(!none.wins_over(&thin));
        assert!(thin.wins_over(&none));
    }

    #[test]
    fn shared_edge_resolves_to_wider_cell_border() {
        let fragment = shared_edge_table(side(4.0, BorderStyle::Solid), side(2.0, BorderStyle::Double));
        let grid = CollapsedBorderGrid::resolve(&fragment).unwrap();
        let edge = grid.vertical_edge(1, 0).expect("shared edge resolved");
        assert_eq!(edge.width, 4.0);
        assert_eq!(edge.style, BorderStyle::Solid);
    }

    #[test]
    fn shared_edge_tie_resolves_to_later_cell() {
        let mut red = side(2.0, BorderStyle::Solid);
        red.color = Rgba::RED;
        let fragment = shared_edge_table(side(2.0, BorderStyle::Solid), red);
        let grid = CollapsedBorderGrid::resolve(&fragment).unwrap();
        let edge = grid.vertical_edge(1, 0).expect("shared edge resolved");
        assert_eq!(edge.color, Rgba::RED);
    }

    #[test]
    fn hidden_cell_border_suppresses_shared_edge() {
        let fragment = shared_edge_table(side(4.0, BorderStyle::Solid), side(0.0, BorderStyle::Hidden));
        let grid = CollapsedBorderGrid::resolve(&fragment).unwrap();
        let edge = grid.vertical_edge(1, 0).expect("slot still resolved");
        assert_eq!(edge.style, BorderStyle::Hidden);

        let mut list = DisplayList::new();
        grid.emit(&mut list, Point::ZERO);
        let has_segments = list
            .iter()
            .any(|item| matches!(item, DisplayItem::BorderSegment(_)));
        assert!(!has_segments, "hidden edge must not paint");
    }

    #[test]
    fn non_first_fragment_drops_table_top_border() {
        let mut fragment = shared_edge_table(side(1.0, BorderStyle::Solid), side(1.0, BorderStyle::Solid));
        {
            let style = Arc::make_mut(&mut fragment.style);
            style.border_top = side(6.0, BorderStyle::Solid);
            style.border_bottom = side(6.0, BorderStyle::Solid);
        }
        fragment.slice_info = FragmentSliceInfo {
            is_first: false,
            is_last: true,
            slice_offset: 20.0,
            original_block_size: 40.0,
        };
        let grid = CollapsedBorderGrid::resolve(&fragment).unwrap();
        // Top line: only the row/cell contributions remain.
        assert!(grid.horizontal_edge(0, 0).map_or(true, |edge| edge.width < 6.0));
        // Bottom line keeps the table border.
        assert_eq!(grid.horizontal_edge(1, 0).map(|edge| edge.width), Some(6.0));
    }

    #[test]
    fn out_of_bounds_cell_is_an_error() {
        let bad_cell = cell(3, 0, Rect::from_xywh(0.0, 0.0, 10.0, 10.0), ComputedStyle::default());
        let fragment = table(
            1,
            1,
            Rect::from_xywh(0.0, 0.0, 10.0, 10.0),
            vec![row(0, Rect::from_xywh(0.0, 0.0, 10.0, 10.0), vec![bad_cell])],
        );
        assert!(matches!(
            CollapsedBorderGrid::resolve(&fragment),
            Err(PaintError::GridOutOfBounds { .. })
        ));
    }

    #[test]
    fn emit_merges_contiguous_identical_segments() {
        let mut row_style = ComputedStyle::default();
        row_style.border_top = side(2.0, BorderStyle::Solid);
        let cells = vec![
            cell(0, 0, Rect::from_xywh(0.0, 0.0, 50.0, 20.0), ComputedStyle::default()),
            cell(0, 1, Rect::from_xywh(50.0, 0.0, 50.0, 20.0), ComputedStyle::default()),
        ];
        let row_fragment = FragmentNode::new(
            Rect::from_xywh(0.0, 0.0, 100.0, 20.0),
            FragmentContent::TableRow { row: 0 },
            Arc::new(row_style),
            cells,
        );
        let fragment = table(1, 2, Rect::from_xywh(0.0, 0.0, 100.0, 20.0), vec![row_fragment]);
        let grid = CollapsedBorderGrid::resolve(&fragment).unwrap();
        let mut list = DisplayList::new();
        grid.emit(&mut list, Point::ZERO);

        let top_segments: Vec<_> = list
            .iter()
            .filter_map(|item| match item {
                DisplayItem::BorderSegment(segment) if segment.rect.y() < 1.0 && segment.rect.height() <= 2.0 => {
                    Some(segment)
                }
                _ => None,
            })
            .collect();
        assert_eq!(top_segments.len(), 1, "both columns should merge into one run");
        assert_eq!(top_segments[0].rect.width(), 100.0);
    }
}
