//! Occupancy vocabulary shared by every backend.

use serde::{Deserialize, Serialize};

/// Occupancy classification returned by every map query.
///
/// Backends answer all point, bounding-box and line queries with exactly one
/// of these three states:
/// - `Free` - Observed (or assumed) empty space
/// - `Occupied` - Observed obstacle
/// - `Unknown` - Never observed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellStatus {
    /// Space is free to traverse
    #[default]
    Free = 0,

    /// Space contains an obstacle
    Occupied = 1,

    /// Space has not been observed
    Unknown = 2,
}

impl CellStatus {
    /// Is this cell known to be free?
    #[inline]
    pub fn is_free(self) -> bool {
        matches!(self, CellStatus::Free)
    }

    /// Is this cell known to be occupied?
    #[inline]
    pub fn is_occupied(self) -> bool {
        matches!(self, CellStatus::Occupied)
    }

    /// Has this cell been observed?
    #[inline]
    pub fn is_known(self) -> bool {
        self != CellStatus::Unknown
    }

    /// Combine the status of two regions into the status of their union.
    ///
    /// Any occupied part makes the union occupied; otherwise any unknown
    /// part makes it unknown. Useful for backends aggregating over a box or
    /// a line of cells.
    #[inline]
    pub fn merge(self, other: CellStatus) -> CellStatus {
        match (self, other) {
            (CellStatus::Occupied, _) | (_, CellStatus::Occupied) => CellStatus::Occupied,
            (CellStatus::Unknown, _) | (_, CellStatus::Unknown) => CellStatus::Unknown,
            _ => CellStatus::Free,
        }
    }

    /// Convert from u8. Values outside the enumeration map to `Unknown`.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => CellStatus::Free,
            1 => CellStatus::Occupied,
            _ => CellStatus::Unknown,
        }
    }

    /// Single character representation for debugging
    pub fn as_char(self) -> char {
        match self {
            CellStatus::Free => '.',
            CellStatus::Occupied => '#',
            CellStatus::Unknown => '?',
        }
    }
}
