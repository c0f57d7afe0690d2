use super::Rect;
use crate::constants::MIN_DRAWN_WIDTH;
use crate::types::{Result, SlipError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered rectangles in authoring space.
///
/// Order is the slot order: it is never changed implicitly, and the
/// 1-based position is what users see as the slot label.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitRectSet {
    rects: Vec<Rect>,
}

impl UnitRectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rect> {
        self.rects.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rect> {
        self.rects.iter()
    }

    pub fn as_slice(&self) -> &[Rect] {
        &self.rects
    }

    /// Append a rectangle already in authoring space
    pub fn push(&mut self, rect: Rect) {
        self.rects.push(rect);
    }

    /// Append a rectangle drawn in display space at `zoom`.
    ///
    /// Returns the new slot index, or `None` when the drawn rectangle is
    /// too narrow to be intentional.
    pub fn push_drawn(&mut self, drawn: Rect, zoom: f64) -> Option<usize> {
        if drawn.width <= MIN_DRAWN_WIDTH {
            return None;
        }
        self.rects.push(drawn.to_authoring(zoom));
        Some(self.rects.len() - 1)
    }

    /// Remove the slot at `index`, shifting later slots down by one
    pub fn remove_at(&mut self, index: usize) -> Option<Rect> {
        if index < self.rects.len() {
            Some(self.rects.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Replace every slot, returning the previous ones
    pub fn replace(&mut self, rects: Vec<Rect>) -> Vec<Rect> {
        std::mem::replace(&mut self.rects, rects)
    }

    /// Reject slots with inverted or non-finite geometry
    pub fn validate(&self) -> Result<()> {
        match self.rects.iter().position(|r| !r.is_well_formed()) {
            Some(index) => Err(SlipError::Config(format!(
                "Rectangle #{} is malformed: {:?}",
                Self::label(index),
                self.rects[index]
            ))),
            None => Ok(()),
        }
    }

    /// Display label for a slot index
    pub fn label(index: usize) -> usize {
        index + 1
    }

    /// All slots converted to display space
    pub fn to_display(&self, zoom: f64) -> Vec<Rect> {
        self.rects.iter().map(|r| r.to_display(zoom)).collect()
    }

    /// All slots converted to extraction space
    pub fn to_extraction(&self, scale: f64) -> Vec<Rect> {
        self.rects.iter().map(|r| r.to_extraction(scale)).collect()
    }
}

impl From<Vec<Rect>> for UnitRectSet {
    fn from(rects: Vec<Rect>) -> Self {
        Self { rects }
    }
}

impl FromIterator<Rect> for UnitRectSet {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        Self {
            rects: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UnitRectSet {
    type Item = &'a Rect;
    type IntoIter = std::slice::Iter<'a, Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}
