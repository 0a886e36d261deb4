//! Errors reported when grid container inputs cannot be laid out.

use core::error::Error;
use core::fmt;

use crate::types::GridAxis;

/// Invalid grid container input, detected before placement starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The implicit track list (`grid-auto-rows` / `grid-auto-columns`) is empty.
    EmptyImplicitTrackList { axis: GridAxis },
    /// `repeat(auto-fill | auto-fit, ...)` without any tracks.
    EmptyAutoRepeat { axis: GridAxis },
    /// An auto-repeated track has neither a fixed minimum nor a fixed maximum.
    IndefiniteAutoRepeatTrack { axis: GridAxis },
    /// The auto-repeat insertion point lies past the end of the explicit tracks.
    InvalidAutoRepeatInsertionPoint { axis: GridAxis },
    /// A length, percentage or flex factor is negative or not finite.
    InvalidTrackBreadth { axis: GridAxis },
    /// An available size is negative or NaN.
    InvalidAvailableSize { axis: GridAxis },
}

impl fmt::Display for GridError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyImplicitTrackList { axis } => {
                write!(formatter, "{axis:?} axis has an empty implicit track list")
            }
            Self::EmptyAutoRepeat { axis } => {
                write!(formatter, "{axis:?} axis auto-repeat has no tracks")
            }
            Self::IndefiniteAutoRepeatTrack { axis } => write!(
                formatter,
                "{axis:?} axis auto-repeat track needs a fixed min or max sizing function"
            ),
            Self::InvalidAutoRepeatInsertionPoint { axis } => write!(
                formatter,
                "{axis:?} axis auto-repeat insertion point is out of range"
            ),
            Self::InvalidTrackBreadth { axis } => {
                write!(formatter, "{axis:?} axis has a negative or non-finite track breadth")
            }
            Self::InvalidAvailableSize { axis } => {
                write!(formatter, "{axis:?} axis available size is negative or NaN")
            }
        }
    }
}

impl Error for GridError {}
