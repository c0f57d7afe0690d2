//! Page-dependent candidate rectangles
//!
//! On the reference roll, pages after the first slip page have their first
//! row shifted up by one row pitch. For 15-slot sets on those pages the first
//! row is duplicated one pitch higher and prepended, so both positions are
//! tried. Other set sizes pass through untouched.

use crate::constants::{
    OFFSET_CORRECTION_FIRST_PAGE, OFFSET_CORRECTION_ROW_LEN, OFFSET_CORRECTION_SLOT_COUNT,
};
use crate::geometry::Rect;

/// Whether the offset quirk applies to this page and set size
pub fn needs_offset_correction(slot_count: usize, page_number: usize) -> bool {
    slot_count == OFFSET_CORRECTION_SLOT_COUNT && page_number >= OFFSET_CORRECTION_FIRST_PAGE
}

/// Extraction-space candidates for one page, in the order they are tried
pub fn candidate_rects(unit_rects: &[Rect], scale: f64, page_number: usize) -> Vec<Rect> {
    let active: Vec<Rect> = unit_rects.iter().map(|r| r.to_extraction(scale)).collect();

    if !needs_offset_correction(active.len(), page_number) {
        return active;
    }

    let pitch = active[OFFSET_CORRECTION_ROW_LEN].y - active[0].y;
    let mut candidates = Vec::with_capacity(active.len() + OFFSET_CORRECTION_ROW_LEN);
    candidates.extend(
        active[..OFFSET_CORRECTION_ROW_LEN]
            .iter()
            .map(|r| r.offset_y(-pitch)),
    );
    candidates.extend(active);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{RowCount, generate_grid};

    #[test]
    fn test_first_slip_page_untouched() {
        let set = generate_grid(RowCount::Five);
        let candidates = candidate_rects(set.as_slice(), 4.0, 3);
        assert_eq!(candidates.len(), 15);
        assert_eq!(candidates[0], set.get(0).unwrap().to_extraction(4.0));
    }

    #[test]
    fn test_later_pages_get_shifted_row() {
        let set = generate_grid(RowCount::Five);
        let candidates = candidate_rects(set.as_slice(), 4.0, 4);
        assert_eq!(candidates.len(), 18);

        let original: Vec<Rect> = set.to_extraction(4.0);
        let pitch = original[3].y - original[0].y;
        for i in 0..3 {
            assert_eq!(candidates[i].x, original[i].x);
            assert!((candidates[i].y - (original[i].y - pitch)).abs() < 1e-9);
            assert_eq!(candidates[i].height, original[i].height);
        }
        assert_eq!(&candidates[3..], original.as_slice());
    }

    #[test]
    fn test_other_set_sizes_pass_through() {
        let six = generate_grid(RowCount::Six);
        for page in 3..10 {
            let candidates = candidate_rects(six.as_slice(), 4.0, page);
            assert_eq!(candidates, six.to_extraction(4.0));
        }

        let fourteen: Vec<Rect> = generate_grid(RowCount::Five).iter().take(14).copied().collect();
        let candidates = candidate_rects(&fourteen, 2.0, 7);
        assert_eq!(candidates.len(), 14);
    }

    #[test]
    fn test_guard() {
        assert!(needs_offset_correction(15, 4));
        assert!(!needs_offset_correction(15, 3));
        assert!(!needs_offset_correction(16, 4));
        assert!(!needs_offset_correction(0, 9));
    }
}
