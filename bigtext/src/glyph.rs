//! Glyphs: rectangular grids of renderable sub-characters
//!
//! Every composition operation treats the glyph as a stack of byte rows of a
//! shared height. Composition is left to right: kerning measures the blank
//! gap between two glyphs and closes it, pushing merges a fixed number of
//! columns through the glyph's [`Smoosher`].

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use bstr::BString;
use itertools::izip;
use thiserror::Error;

use crate::smoosh::Smoosher;

/// A rectangular grid of sub-characters, composable with its neighbors.
///
/// Cloning is cheap-ish: rows are copied, the smoosh rules are shared.
#[derive(Clone, Debug)]
pub struct Glyph {
    rows: Vec<BString>,
    rules: Arc<Smoosher>,
}

impl Glyph {
    /// A glyph over the default rule chain; see [`Smoosher::new`].
    #[must_use]
    pub fn new(rows: impl IntoIterator<Item = impl Into<BString>>, hardblank: u8) -> Self {
        Self::with_rules(rows, Arc::new(Smoosher::new(hardblank)))
    }

    /// A glyph sharing an existing rule chain, the way fonts build them.
    #[must_use]
    pub fn with_rules(
        rows: impl IntoIterator<Item = impl Into<BString>>,
        rules: Arc<Smoosher>,
    ) -> Self {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
            rules,
        }
    }

    /// The number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// The length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    /// The rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// The hardblank of the glyph's rule chain.
    #[must_use]
    pub fn hardblank(&self) -> u8 {
        self.rules.hardblank()
    }

    /// How many columns of plain blank separate this glyph from `other` when
    /// set side by side: the minimum over rows of trailing blanks on the left
    /// plus leading blanks on the right. Hardblanks count as visible.
    ///
    /// # Errors
    /// [`ShapeMismatch`] when the glyphs differ in height.
    pub fn horizontal_space(&self, other: &Self) -> Result<usize, ShapeMismatch> {
        self.check_shape(other)?;
        Ok(izip!(&self.rows, &other.rows)
            .map(|(left, right)| trailing_blanks(left) + leading_blanks(right))
            .min()
            .unwrap_or(0))
    }

    /// Composes `other` to the right, closing the whole blank gap between
    /// them. Equivalent to `self.push(other, self.horizontal_space(other)?)`.
    ///
    /// # Errors
    /// [`ShapeMismatch`] when the glyphs differ in height.
    pub fn kern(&self, other: &Self) -> Result<Self, ShapeMismatch> {
        let overlap = self.horizontal_space(other)?;
        self.push(other, overlap)
    }

    /// Composes `other` to the right with `overlap` columns merged through
    /// the smoosh rules.
    ///
    /// The overlap is clamped per row to the shorter of the two rows, so an
    /// oversized request degrades to merging what is actually there.
    ///
    /// # Errors
    /// [`ShapeMismatch`] when the glyphs differ in height.
    pub fn push(&self, other: &Self, overlap: usize) -> Result<Self, ShapeMismatch> {
        self.check_shape(other)?;
        let rows = izip!(&self.rows, &other.rows)
            .map(|(left, right)| {
                let overlap = overlap.min(left.len()).min(right.len());
                let (kept, left_edge) = left.split_at(left.len() - overlap);
                let (right_edge, rest) = right.split_at(overlap);
                let mut row = BString::from(kept);
                row.extend_from_slice(&self.rules.smoosh(left_edge, right_edge));
                row.extend_from_slice(rest);
                row
            })
            .collect();
        Ok(Self {
            rows,
            rules: Arc::clone(&self.rules),
        })
    }

    /// Whether any row of this glyph ends on a visible sub-character that
    /// would sit directly against a visible one starting the same row of
    /// `other`.
    #[must_use]
    pub fn touch(&self, other: &Self) -> bool {
        izip!(&self.rows, &other.rows).any(|(left, right)| {
            left.last().is_some_and(|&c| c != b' ')
                && right.first().is_some_and(|&c| c != b' ')
        })
    }

    /// Rotates the glyph a quarter turn in place and returns it for chaining.
    ///
    /// Ragged rows are squared up to the glyph's width with blanks first, so
    /// four equal rotations restore any rectangular glyph.
    pub fn rotate(&mut self, rotation: Rotation) -> &mut Self {
        let width = self.width();
        let cell = |row: &BString, i: usize| row.get(i).copied().unwrap_or(b' ');
        let rotated: Vec<BString> = match rotation {
            Rotation::Clockwise => (0..width)
                .map(|i| self.rows.iter().rev().map(|row| cell(row, i)).collect())
                .collect(),
            Rotation::Counterclockwise => (0..width)
                .rev()
                .map(|i| self.rows.iter().map(|row| cell(row, i)).collect())
                .collect(),
        };
        self.rows = rotated;
        self
    }

    /// The rendered bytes: rows joined by newlines, hardblanks blanked out.
    #[must_use]
    pub fn display_bytes(&self) -> Vec<u8> {
        let hardblank = self.hardblank();
        let mut bytes = Vec::new();
        let mut first = true;
        for row in &self.rows {
            if !first {
                bytes.push(b'\n');
            }
            bytes.extend(row.iter().map(|&c| if c == hardblank { b' ' } else { c }));
            first = false;
        }
        bytes
    }

    fn check_shape(&self, other: &Self) -> Result<(), ShapeMismatch> {
        if self.height() == other.height() {
            Ok(())
        } else {
            Err(ShapeMismatch {
                left: self.height(),
                right: other.height(),
            })
        }
    }
}

/// Compares the grids; the rule chains do not take part.
impl PartialEq for Glyph {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl Eq for Glyph {}

impl Display for Glyph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.display_bytes()))
    }
}

/// A quarter turn for [`Glyph::rotate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// 90 degrees clockwise
    Clockwise,
    /// 90 degrees counterclockwise
    Counterclockwise,
}

/// Two glyphs of different heights cannot be composed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("cannot combine a {left}-row glyph with a {right}-row glyph")]
pub struct ShapeMismatch {
    /// Height of the left-hand glyph
    pub left: usize,
    /// Height of the right-hand glyph
    pub right: usize,
}

fn leading_blanks(row: &[u8]) -> usize {
    row.iter().take_while(|&&c| c == b' ').count()
}

fn trailing_blanks(row: &[u8]) -> usize {
    row.iter().rev().take_while(|&&c| c == b' ').count()
}
