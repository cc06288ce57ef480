/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not, str::FromStr};

use anyhow::{anyhow, bail, Result};

/// Largest supported board size.
///
/// Coordinates are stored as `u8`, and offsets are computed in `i16`, so anything up to this is safe.
pub const MAX_BOARD_SIZE: u8 = 16;

/// Represents which edge of the board a team starts on.
///
/// The top team starts on row `0` and moves towards higher rows.
/// The bottom team starts on the last row and moves towards row `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Side {
    Top,
    #[default]
    Bottom,
}

impl Side {
    /// Number of side variants.
    pub const COUNT: usize = 2;

    /// An array of both sides, starting with the Top.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::Top, Self::Bottom]
    }

    /// Returns this [`Side`]'s index, for use in arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the opposing [`Side`].
    ///
    /// # Example
    /// ```
    /// # use draughts::Side;
    /// assert_eq!(Side::Top.opponent(), Side::Bottom);
    /// assert_eq!(Side::Bottom.opponent(), Side::Top);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// The sign of the `y` delta of a forward move for this side.
    #[inline(always)]
    pub const fn forward(&self) -> i16 {
        match self {
            Self::Top => 1,
            Self::Bottom => -1,
        }
    }

    /// The row a regular piece of this side must reach in order to be promoted, on a board of `size`.
    ///
    /// # Example
    /// ```
    /// # use draughts::Side;
    /// assert_eq!(Side::Top.promotion_row(8), 7);
    /// assert_eq!(Side::Bottom.promotion_row(8), 0);
    /// ```
    #[inline(always)]
    pub const fn promotion_row(&self, size: u8) -> u8 {
        match self {
            Self::Top => size - 1,
            Self::Bottom => 0,
        }
    }

    /// Returns the lowercase name of this side.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl Not for Side {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A cell on the board, addressed by column (`x`) and row (`y`).
///
/// `(0, 0)` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    /// Creates a new [`Square`] at `(x, y)`.
    ///
    /// No bounds checks are performed; that is the board's job.
    #[inline(always)]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Offsets this square by `(dx, dy)`, yielding `None` if the result falls outside a board of `size`.
    ///
    /// # Example
    /// ```
    /// # use draughts::Square;
    /// let sq = Square::new(0, 0);
    /// assert_eq!(sq.offset(1, 1, 8), Some(Square::new(1, 1)));
    /// assert_eq!(sq.offset(-1, 1, 8), None);
    /// assert_eq!(Square::new(7, 7).offset(1, 1, 8), None);
    /// ```
    #[inline(always)]
    pub fn offset(&self, dx: i16, dy: i16, size: u8) -> Option<Self> {
        let x = self.x as i16 + dx;
        let y = self.y as i16 + dy;
        let size = size as i16;

        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Self::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Returns `true` if this is a dark cell.
    ///
    /// A cell's color is fully determined by the parity of `x + y`: odd sums are dark, and only dark cells are ever played on.
    ///
    /// # Example
    /// ```
    /// # use draughts::Square;
    /// assert!(Square::new(1, 0).is_dark());
    /// assert!(!Square::new(1, 1).is_dark());
    /// ```
    #[inline(always)]
    pub const fn is_dark(&self) -> bool {
        (self.x + self.y) % 2 == 1
    }

    /// Euclidean distance between the center of this square and the point `(x, y)`.
    #[inline(always)]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x as f64 - x;
        let dy = self.y as f64 - y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;

    /// Parses a square from the `x,y` format produced by its [`fmt::Display`] impl.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((x, y)) = s.trim().split_once(',') else {
            bail!("Invalid square {s:?}: expected the format `x,y`");
        };

        let x = x
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid x coordinate in {s:?}: {e}"))?;
        let y = y
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid y coordinate in {s:?}: {e}"))?;

        Ok(Self::new(x, y))
    }
}
