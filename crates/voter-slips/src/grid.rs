//! Slot grid generation ("auto-detect")
//!
//! Tiles a uniform 3-column grid of unit rectangles over the base page.
//! The result always replaces the caller's whole rectangle set.

use crate::constants::*;
use crate::geometry::{Rect, Size, UnitRectSet};
use crate::types::{Result, SlipError};

/// Supported row counts for generated grids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    /// 15 slots, template with a taller header
    Five,
    /// 18 slots, denser template
    Six,
}

impl RowCount {
    pub fn rows(self) -> usize {
        match self {
            RowCount::Five => 5,
            RowCount::Six => 6,
        }
    }
}

impl TryFrom<usize> for RowCount {
    type Error = SlipError;

    fn try_from(rows: usize) -> Result<Self> {
        match rows {
            5 => Ok(RowCount::Five),
            6 => Ok(RowCount::Six),
            _ => Err(SlipError::Config(format!(
                "Grid generation supports 5 or 6 rows, got {}",
                rows
            ))),
        }
    }
}

/// Grid layout parameters, as fractions of the page plus absolute gaps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    pub columns: usize,
    pub left_fraction: f64,
    pub top_fraction: f64,
    pub width_fraction: f64,
    pub height_fraction: f64,
    pub h_gap: f64,
    pub v_gap: f64,
}

impl GridParams {
    pub fn for_rows(rows: RowCount) -> Self {
        let (top_fraction, height_fraction) = match rows {
            RowCount::Five => (GRID_TOP_FRACTION_5_ROWS, GRID_HEIGHT_FRACTION_5_ROWS),
            RowCount::Six => (GRID_TOP_FRACTION_6_ROWS, GRID_HEIGHT_FRACTION_6_ROWS),
        };
        Self {
            columns: GRID_COLUMNS,
            left_fraction: GRID_LEFT_FRACTION,
            top_fraction,
            width_fraction: GRID_WIDTH_FRACTION,
            height_fraction,
            h_gap: GRID_H_GAP,
            v_gap: GRID_V_GAP,
        }
    }
}

/// Generate the standard grid on the base authoring page
pub fn generate_grid(rows: RowCount) -> UnitRectSet {
    generate_grid_with(
        rows,
        Size::new(BASE_PAGE_WIDTH, BASE_PAGE_HEIGHT),
        &GridParams::for_rows(rows),
    )
}

/// Generate a grid in row-major order (left to right, top to bottom)
pub fn generate_grid_with(rows: RowCount, page: Size, params: &GridParams) -> UnitRectSet {
    let row_count = rows.rows();
    let cols = params.columns;

    let grid_width = page.width * params.width_fraction;
    let grid_height = page.height * params.height_fraction;
    let cell_width = (grid_width - (cols - 1) as f64 * params.h_gap) / cols as f64;
    let cell_height = (grid_height - (row_count - 1) as f64 * params.v_gap) / row_count as f64;

    let left = page.width * params.left_fraction;
    let top = page.height * params.top_fraction;

    let mut rects = Vec::with_capacity(row_count * cols);
    for row in 0..row_count {
        for col in 0..cols {
            rects.push(Rect::new(
                left + col as f64 * (cell_width + params.h_gap),
                top + row as f64 * (cell_height + params.v_gap),
                cell_width,
                cell_height,
            ));
        }
    }

    log::debug!(
        "Generated {}x{} grid, cell {:.1}x{:.1}",
        row_count,
        cols,
        cell_width,
        cell_height
    );

    UnitRectSet::from(rects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_rows_yields_fifteen() {
        let set = generate_grid(RowCount::Five);
        assert_eq!(set.len(), 15);
    }

    #[test]
    fn test_six_rows_yields_eighteen() {
        let set = generate_grid(RowCount::Six);
        assert_eq!(set.len(), 18);
    }

    #[test]
    fn test_uniform_cells() {
        for rows in [RowCount::Five, RowCount::Six] {
            let set = generate_grid(rows);
            let first = *set.get(0).unwrap();
            for r in &set {
                assert_eq!(r.width, first.width);
                assert_eq!(r.height, first.height);
            }
        }
    }

    #[test]
    fn test_row_major_order() {
        let set = generate_grid(RowCount::Five);
        let rects = set.as_slice();
        for row in 0..5 {
            let base = row * 3;
            assert_eq!(rects[base].y, rects[base + 1].y);
            assert_eq!(rects[base + 1].y, rects[base + 2].y);
            assert!(rects[base].x < rects[base + 1].x);
            assert!(rects[base + 1].x < rects[base + 2].x);
            if row > 0 {
                assert!(rects[base].y > rects[base - 3].y);
            }
        }
    }

    #[test]
    fn test_five_row_geometry() {
        let set = generate_grid(RowCount::Five);
        let first = set.get(0).unwrap();
        assert!((first.x - BASE_PAGE_WIDTH * 0.04).abs() < 1e-9);
        assert!((first.y - BASE_PAGE_HEIGHT * 0.17).abs() < 1e-9);

        let second = set.get(1).unwrap();
        assert!((second.x - first.right() - GRID_H_GAP).abs() < 1e-9);

        let below = set.get(3).unwrap();
        assert!((below.y - first.bottom() - GRID_V_GAP).abs() < 1e-9);
    }

    #[test]
    fn test_six_rows_start_higher() {
        let five = generate_grid(RowCount::Five);
        let six = generate_grid(RowCount::Six);
        assert!(six.get(0).unwrap().y < five.get(0).unwrap().y);
    }

    #[test]
    fn test_grid_stays_on_page() {
        let page = Size::new(BASE_PAGE_WIDTH, BASE_PAGE_HEIGHT);
        for rows in [RowCount::Five, RowCount::Six] {
            for r in &generate_grid(rows) {
                assert!(r.fits_within(page), "{r:?}");
            }
        }
    }

    #[test]
    fn test_row_count_try_from() {
        assert_eq!(RowCount::try_from(5).unwrap(), RowCount::Five);
        assert_eq!(RowCount::try_from(6).unwrap(), RowCount::Six);
        assert!(RowCount::try_from(4).is_err());
    }
}
