//! Draw routine. The order (background, stem, leaves, petals) is part of the
//! output: later layers overdraw earlier ones only at their on-cells.

use crate::{
    canvas::{Canvas, GRID_SIZE},
    flower::FlowerDescriptor,
    palette::BACKGROUND,
};

pub const STEM_X: i32 = GRID_SIZE as i32 / 2;
pub const STEM_BOTTOM: i32 = GRID_SIZE as i32 - 5;

pub fn stem_top(flower: &FlowerDescriptor) -> i32 {
    STEM_BOTTOM - flower.stem_height() as i32
}

/// Top-left cell of the leaf attached `offset` cells above the stem base.
/// Odd offsets hang right of the stem, even ones left.
pub fn leaf_origin(flower: &FlowerDescriptor, offset: u32) -> (i32, i32) {
    let x = if offset % 2 == 1 {
        STEM_X + 1
    } else {
        STEM_X - flower.leaf().width() as i32
    };
    (x, STEM_BOTTOM - offset as i32)
}

/// `floor(STEM_X - width / 2)`, so odd-width petals lean one cell left.
pub fn petal_origin(flower: &FlowerDescriptor) -> (i32, i32) {
    let petal = flower.petal();
    let x = STEM_X - (petal.width() as i32 + 1) / 2;
    (x, stem_top(flower) - petal.height() as i32)
}

pub fn render(flower: &FlowerDescriptor, canvas: &mut Canvas) {
    let colors = flower.colors();
    canvas.fill(BACKGROUND);

    for y in stem_top(flower)..=STEM_BOTTOM {
        canvas.fill_cell(STEM_X, y, colors.stem);
    }

    for offset in flower.leaf_positions() {
        let (x, y) = leaf_origin(flower, offset);
        canvas.composite(flower.leaf(), x, y, colors.stem);
    }

    let (x, y) = petal_origin(flower);
    canvas.composite(flower.petal(), x, y, colors.flower);
}

/// Convenience for callers that just want the finished surface.
pub fn draw(flower: &FlowerDescriptor) -> Canvas {
    let mut canvas = Canvas::new();
    render(flower, &mut canvas);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{COLOR_PAIRS, STEM_GREEN};

    fn flower(petal: usize, leaf: usize, stem: u32, leaves: [u32; 2]) -> FlowerDescriptor {
        FlowerDescriptor::new(petal, leaf, 0, stem, leaves).unwrap()
    }

    #[test]
    fn rendering_is_deterministic() {
        let f = flower(1, 1, 12, [5, 10]);
        assert_eq!(draw(&f).as_bytes(), draw(&f).as_bytes());
    }

    #[test]
    fn shortest_stem_spans_nine_cells() {
        let f = flower(2, 0, 8, [4, 8]);
        let canvas = draw(&f);
        let stem_cells: Vec<u32> = (0..GRID_SIZE)
            .filter(|y| canvas.cell(STEM_X as u32, *y) == Some(STEM_GREEN))
            .collect();
        // The cross petal sits above the stem top, so the column's green
        // run is the stem alone: rows 19..=27.
        assert_eq!(stem_cells, (19..=27).collect::<Vec<_>>());
        assert_eq!(leaf_origin(&f, 4), (STEM_X - 2, STEM_BOTTOM - 4));
        assert_eq!(leaf_origin(&f, 8), (STEM_X - 2, STEM_BOTTOM - 8));
    }

    #[test]
    fn odd_leaves_hang_right() {
        let f = flower(0, 1, 10, [5, 9]);
        assert_eq!(leaf_origin(&f, 5), (STEM_X + 1, 22));
        let canvas = draw(&f);
        // Pointed leaf rows: 010 / 111, origin (17, 22).
        assert_eq!(canvas.cell(18, 22), Some(STEM_GREEN));
        assert_eq!(canvas.cell(17, 22), Some(BACKGROUND));
        assert_eq!(canvas.cell(17, 23), Some(STEM_GREEN));
        assert_eq!(canvas.cell(19, 23), Some(STEM_GREEN));
    }

    #[test]
    fn round_bloom_leaves_background_at_off_cells() {
        let f = flower(0, 0, 8, [4, 8]);
        let canvas = draw(&f);
        let pink = COLOR_PAIRS[0].flower;
        // stemTop = 19, petal is 4 tall so its box is rows 15..=18, cols 14..=17.
        assert_eq!(petal_origin(&f), (14, 15));
        let expected = [[0, 1, 1, 0], [1, 1, 1, 1], [1, 1, 1, 1], [0, 1, 1, 0]];
        for (row, cells) in expected.iter().enumerate() {
            for (col, on) in cells.iter().enumerate() {
                let cell = canvas.cell(14 + col as u32, 15 + row as u32);
                if *on == 1 {
                    assert_eq!(cell, Some(pink));
                } else {
                    assert_eq!(cell, Some(BACKGROUND), "col {col} row {row}");
                }
            }
        }
    }

    #[test]
    fn leaf_off_cells_stay_background() {
        // Basic leaf at offset 4 sits left of the stem and never touches it.
        let f = flower(2, 0, 15, [4, 8]);
        let canvas = draw(&f);
        assert_eq!(canvas.cell(15, 23), Some(STEM_GREEN));
        assert_eq!(canvas.cell(14, 24), Some(STEM_GREEN));
        assert_eq!(canvas.cell(14, 23), Some(BACKGROUND));
        assert_eq!(canvas.cell(15, 24), Some(BACKGROUND));
    }

    #[test]
    fn odd_width_petals_lean_left() {
        let f = flower(2, 0, 8, [4, 8]);
        assert_eq!(petal_origin(&f), (14, 16));
        let canvas = draw(&f);
        let pink = COLOR_PAIRS[0].flower;
        assert_eq!(canvas.cell(15, 16), Some(pink));
        assert_eq!(canvas.cell(16, 17), Some(pink));
        assert_eq!(canvas.cell(16, 16), Some(BACKGROUND));
    }
}
