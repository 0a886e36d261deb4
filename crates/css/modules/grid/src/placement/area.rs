//! Line spans and the rectangular areas grid items occupy.

use core::ops::Range;

use crate::types::GridAxis;

/// Translated, half-open track range `[start, end)` on one axis.
///
/// Line indices are 0-based and relative to the first implicit track, so
/// they are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpan {
    start: usize,
    end: usize,
}

impl GridSpan {
    /// Create a span.
    ///
    /// # Panics
    /// Panics if `end <= start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end > start, "empty grid span [{start}, {end})");
        Self { start, end }
    }

    /// Span of `span` tracks starting at `start`.
    ///
    /// # Panics
    /// Panics if `span` is zero.
    pub fn with_size(start: usize, span: usize) -> Self {
        Self::new(start, start + span)
    }

    pub const fn start_line(&self) -> usize {
        self.start
    }

    pub const fn end_line(&self) -> usize {
        self.end
    }

    /// Number of tracks covered.
    pub const fn integer_span(&self) -> usize {
        self.end - self.start
    }

    /// Track indices covered by the span.
    pub const fn iter(&self) -> Range<usize> {
        self.start..self.end
    }

    pub const fn contains(&self, track: usize) -> bool {
        self.start <= track && track < self.end
    }
}

impl IntoIterator for GridSpan {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Span in untranslated line coordinates, where line 0 is the start of the
/// explicit grid and implicit tracks before it have negative indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UntranslatedSpan {
    pub start: i32,
    pub end: i32,
}

impl UntranslatedSpan {
    pub const fn integer_span(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Shift by the explicit grid start to get a translated span.
    ///
    /// # Panics
    /// Panics if the shifted start is negative or the span is empty.
    pub fn translate(&self, explicit_start: usize) -> GridSpan {
        let offset = explicit_start as i32;
        assert!(self.start + offset >= 0, "span starts before the implicit grid");
        GridSpan::new((self.start + offset) as usize, (self.end + offset) as usize)
    }
}

/// Outcome of resolving a pair of placement lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSpan {
    /// Both lines known
    Definite(UntranslatedSpan),
    /// Needs auto-placement; carries the span size
    Indefinite(usize),
}

impl ResolvedSpan {
    pub const fn is_indefinite(&self) -> bool {
        matches!(self, Self::Indefinite(_))
    }

    /// Number of tracks the item will occupy.
    pub const fn integer_span(&self) -> usize {
        match self {
            Self::Definite(span) => span.integer_span(),
            Self::Indefinite(span) => *span,
        }
    }
}

/// Area occupied by a grid item (row/column span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridArea {
    /// Row tracks covered
    pub rows: GridSpan,
    /// Column tracks covered
    pub columns: GridSpan,
}

impl GridArea {
    /// Create a new grid area.
    pub const fn new(rows: GridSpan, columns: GridSpan) -> Self {
        Self { rows, columns }
    }

    /// Project the area onto one axis.
    pub const fn span(&self, axis: GridAxis) -> GridSpan {
        match axis {
            GridAxis::Row => self.rows,
            GridAxis::Column => self.columns,
        }
    }

    /// Replace the span on one axis.
    pub fn set_span(&mut self, axis: GridAxis, span: GridSpan) {
        match axis {
            GridAxis::Row => self.rows = span,
            GridAxis::Column => self.columns = span,
        }
    }

    /// Check if this area overlaps with another area.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.rows.start < other.rows.end
            && self.rows.end > other.rows.start
            && self.columns.start < other.columns.end
            && self.columns.end > other.columns.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test grid area span calculation.
    ///
    /// # Panics
    /// Panics if assertions fail.
    #[test]
    fn test_grid_area_span() {
        let area = GridArea::new(GridSpan::new(0, 2), GridSpan::new(1, 4));
        assert_eq!(area.span(GridAxis::Row).integer_span(), 2);
        assert_eq!(area.span(GridAxis::Column).integer_span(), 3);
        assert_eq!(area.columns.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    /// Test grid area overlap detection.
    ///
    /// # Panics
    /// Panics if assertions fail.
    #[test]
    fn test_grid_area_overlaps() {
        let first = GridArea::new(GridSpan::new(0, 2), GridSpan::new(0, 2));
        let second = GridArea::new(GridSpan::new(1, 3), GridSpan::new(1, 3));
        let third = GridArea::new(GridSpan::new(3, 4), GridSpan::new(3, 4));

        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
        assert!(!first.overlaps(&third));
        assert!(!third.overlaps(&first));
    }

    /// Untranslated spans shift by the explicit start.
    ///
    /// # Panics
    /// Panics if translation is wrong.
    #[test]
    fn test_translate_negative_span() {
        let span = UntranslatedSpan { start: -2, end: 6 };
        assert_eq!(span.translate(2), GridSpan::new(0, 8));
        assert_eq!(span.integer_span(), 8);
    }

    /// Empty spans are a contract violation.
    ///
    /// # Panics
    /// Panics by design when the span is empty.
    #[test]
    #[should_panic(expected = "empty grid span")]
    fn test_empty_span_panics() {
        let _span = GridSpan::new(3, 3);
    }
}
