//! Six-dot pattern assembly.

use serde::Serialize;
use std::fmt;

use super::cluster::Cell;

/// First code point of the Unicode Braille Patterns block (blank cell)
pub const BASE_BRAILLE_CODEPOINT: u32 = 0x2800;

/// Which of the six cell positions hold a dot.
///
/// Bit `n - 1` is position `n`, numbered down the left column (1, 2, 3) then
/// the right column (4, 5, 6). This is the Unicode Braille bit layout, so the
/// value doubles as the offset from [`BASE_BRAILLE_CODEPOINT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct DotPattern(u8);

impl DotPattern {
    pub const EMPTY: DotPattern = DotPattern(0);
    #[cfg(test)]
    pub const FULL: DotPattern = DotPattern(0b11_1111);

    /// Returns `None` for values that need more than six bits
    #[cfg(test)]
    pub fn new(bits: u8) -> Option<Self> {
        (bits <= Self::FULL.0).then_some(Self(bits))
    }

    #[cfg(test)]
    pub fn from_positions(positions: &[u8]) -> Option<Self> {
        positions.iter().try_fold(Self::EMPTY, |pattern, &p| {
            (1..=6).contains(&p).then(|| pattern.with(p))
        })
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, position: u8) -> bool {
        (1..=6).contains(&position) && self.0 & (1 << (position - 1)) != 0
    }

    /// Raised positions in ascending order
    pub fn positions(self) -> Vec<u8> {
        (1..=6).filter(|&p| self.contains(p)).collect()
    }

    fn with(self, position: u8) -> Self {
        Self(self.0 | 1 << (position - 1))
    }
}

impl fmt::Display for DotPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits: String = self
            .positions()
            .iter()
            .map(|p| char::from(b'0' + p))
            .collect();
        if digits.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", digits)
        }
    }
}

/// Grid offset of a position in units of dot spacing: (column, line)
fn grid_offset(position: u8) -> (f32, f32) {
    let index = position - 1;
    ((index / 3) as f32, (index % 3) as f32)
}

/// Decode a cell into its dot pattern.
///
/// Expected dot locations are laid out from the cell's bounding top-left
/// corner in steps of `spacing`; a position is raised when some centroid
/// falls within half a spacing of it on both axes. Overfull cells are not
/// rejected: the first matching centroid wins.
pub fn decode(cell: &Cell, spacing: f32) -> DotPattern {
    let (origin_x, origin_y) = cell.origin();
    let tolerance = spacing / 2.0;

    (1..=6).fold(DotPattern::EMPTY, |pattern, position| {
        let (col, line) = grid_offset(position);
        let expected_x = origin_x + col * spacing;
        let expected_y = origin_y + line * spacing;

        let raised = cell.centroids.iter().any(|c| {
            (c.x - expected_x).abs() < tolerance && (c.y - expected_y).abs() < tolerance
        });

        if raised {
            pattern.with(position)
        } else {
            pattern
        }
    })
}
