//! Fixed petal/leaf templates and color pairs.
//!
//! These tables are part of the visual contract: descriptors store indices
//! into them, so reordering or editing an entry changes every flower that
//! points at it.

use std::fmt;

use image::Rgb;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const fn from_hex(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.red(), self.green(), self.blue()])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const BACKGROUND: Color = Color::from_hex(0x000000);
pub const STEM_GREEN: Color = Color::from_hex(0x228B22);

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColorPair {
    pub name: &'static str,
    pub flower: Color,
    pub stem: Color,
}

pub static COLOR_PAIRS: [ColorPair; 6] = [
    ColorPair {
        name: "pink",
        flower: Color::from_hex(0xFF69B4),
        stem: STEM_GREEN,
    },
    ColorPair {
        name: "yellow",
        flower: Color::from_hex(0xFFD700),
        stem: STEM_GREEN,
    },
    ColorPair {
        name: "orange",
        flower: Color::from_hex(0xFF4500),
        stem: STEM_GREEN,
    },
    ColorPair {
        name: "purple",
        flower: Color::from_hex(0x9370DB),
        stem: STEM_GREEN,
    },
    ColorPair {
        name: "red",
        flower: Color::from_hex(0xFF0000),
        stem: STEM_GREEN,
    },
    ColorPair {
        name: "white",
        flower: Color::from_hex(0xFFFFFF),
        stem: STEM_GREEN,
    },
];

/// A small on/off bitmap. Rows all share the same width.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    rows: &'static [&'static [u8]],
}

impl Template {
    pub const fn new(name: &'static str, rows: &'static [&'static [u8]]) -> Self {
        Self { name, rows }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_on(&self, col: usize, row: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .is_some_and(|cell| *cell != 0)
    }

    /// `(col, row)` of every on-cell, row-major.
    pub fn on_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell != 0)
                .map(move |(col, _)| (col, row))
        })
    }
}

pub static PETALS: [Template; 3] = [
    Template::new(
        "round",
        &[&[0, 1, 1, 0], &[1, 1, 1, 1], &[1, 1, 1, 1], &[0, 1, 1, 0]],
    ),
    Template::new("star", &[&[1, 0, 1], &[0, 1, 0], &[1, 0, 1]]),
    Template::new("cross", &[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]]),
];

pub static LEAVES: [Template; 2] = [
    Template::new("basic", &[&[0, 1], &[1, 0]]),
    Template::new("pointed", &[&[0, 1, 0], &[1, 1, 1]]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_fit_in_four_by_four() {
        for template in PETALS.iter().chain(LEAVES.iter()) {
            assert!(template.width() <= 4 && template.height() <= 4);
            assert!(template.width() > 0);
        }
    }

    #[test]
    fn on_cells_follow_bitmap() {
        let cross: Vec<_> = PETALS[2].on_cells().collect();
        assert_eq!(cross, vec![(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]);
        assert!(!LEAVES[0].is_on(0, 0));
        assert!(LEAVES[0].is_on(1, 0));
        assert!(!LEAVES[0].is_on(5, 5));
    }

    #[test]
    fn colors_format_as_hex() {
        assert_eq!(COLOR_PAIRS[0].flower.to_string(), "#FF69B4");
        assert_eq!(COLOR_PAIRS[3].flower.to_rgb(), Rgb([0x93, 0x70, 0xDB]));
        assert!(COLOR_PAIRS.iter().all(|pair| pair.stem == STEM_GREEN));
    }
}
