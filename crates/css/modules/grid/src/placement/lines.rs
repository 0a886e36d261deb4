//! Line-based placement resolution.
//!
//! Spec: §8.3 Line-based Placement
//! <https://www.w3.org/TR/css-grid-2/#line-placement>

use core::cmp::Ordering;

use super::area::{ResolvedSpan, UntranslatedSpan};
use super::auto_repeat::MAX_GRID_TRACKS;
use crate::types::GridLine;

/// Convert a 1-based CSS line number to an untranslated line index.
///
/// Negative numbers count back from the last explicit line. Line `0` is
/// invalid and treated as `auto`.
fn line_index(line: i32, explicit_count: usize) -> Option<i64> {
    match line {
        0 => None,
        positive if positive > 0 => Some(i64::from(positive) - 1),
        negative => Some(explicit_count as i64 + 1 + i64::from(negative)),
    }
}

/// Drop invalid line numbers so they behave as `auto`, and bound spans to
/// the largest grid.
fn normalize(line: Option<GridLine>) -> Option<GridLine> {
    match line {
        Some(GridLine::Line(0) | GridLine::Span(0)) => None,
        Some(GridLine::Span(span)) => Some(GridLine::Span(span.min(MAX_GRID_TRACKS))),
        other => other,
    }
}

/// Span between two line indices, kept inside `[-MAX_GRID_TRACKS,
/// MAX_GRID_TRACKS]` and at least one track wide.
fn clamped_span(start: i64, end: i64) -> UntranslatedSpan {
    let max_line = MAX_GRID_TRACKS as i64;
    let start = start.clamp(-max_line, max_line - 1);
    let end = end.clamp(start + 1, max_line);
    UntranslatedSpan {
        start: start as i32,
        end: end as i32,
    }
}

/// Resolve the placement lines of one axis.
///
/// `explicit_count` is the number of explicit tracks in the axis, including
/// auto-repeated ones. Lines beyond [`MAX_GRID_TRACKS`] on either side of
/// the explicit grid are clamped to it.
pub fn resolve_grid_positions(
    start: Option<GridLine>,
    end: Option<GridLine>,
    explicit_count: usize,
) -> ResolvedSpan {
    let lines = (normalize(start), normalize(end));
    let resolved = match lines {
        (Some(GridLine::Line(start_line)), Some(GridLine::Line(end_line))) => {
            let (Some(first), Some(second)) = (
                line_index(start_line, explicit_count),
                line_index(end_line, explicit_count),
            ) else {
                return ResolvedSpan::Indefinite(1);
            };
            match first.cmp(&second) {
                Ordering::Less => clamped_span(first, second),
                Ordering::Greater => clamped_span(second, first),
                Ordering::Equal => clamped_span(first, first + 1),
            }
        }
        (Some(GridLine::Line(start_line)), end_line) => {
            let Some(first) = line_index(start_line, explicit_count) else {
                return ResolvedSpan::Indefinite(1);
            };
            let span = match end_line {
                Some(GridLine::Span(span)) => span,
                Some(GridLine::Line(_)) | None => 1,
            };
            clamped_span(first, first + span as i64)
        }
        (start_line, Some(GridLine::Line(end_line))) => {
            let Some(last) = line_index(end_line, explicit_count) else {
                return ResolvedSpan::Indefinite(1);
            };
            let span = match start_line {
                Some(GridLine::Span(span)) => span,
                Some(GridLine::Line(_)) | None => 1,
            };
            clamped_span(last - span as i64, last)
        }
        (Some(GridLine::Span(span)), _) | (None, Some(GridLine::Span(span))) => {
            return ResolvedSpan::Indefinite(span);
        }
        (None, None) => return ResolvedSpan::Indefinite(1),
    };
    ResolvedSpan::Definite(resolved)
}
