//! Logical-cell drawing surface backed by an `image::RgbImage`.

use image::{
    codecs::png::PngEncoder,
    imageops::{self, FilterType},
    ColorType, ImageEncoder, ImageResult, RgbImage,
};

use crate::palette::{Color, Template};

pub const GRID_SIZE: u32 = 32;
pub const PIXEL_SIZE: u32 = 2;
pub const CANVAS_SIZE: u32 = GRID_SIZE * PIXEL_SIZE;
pub const DISPLAY_SCALE: u32 = 4;

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            image: RgbImage::new(CANVAS_SIZE, CANVAS_SIZE),
        }
    }

    pub fn fill(&mut self, color: Color) {
        let rgb = color.to_rgb();
        for pixel in self.image.pixels_mut() {
            *pixel = rgb;
        }
    }

    /// Paints one `PIXEL_SIZE` block. Cells off the grid are ignored.
    pub fn fill_cell(&mut self, x: i32, y: i32, color: Color) {
        if !Self::in_grid(x, y) {
            return;
        }
        let rgb = color.to_rgb();
        let (left, top) = (x as u32 * PIXEL_SIZE, y as u32 * PIXEL_SIZE);
        for py in top..top + PIXEL_SIZE {
            for px in left..left + PIXEL_SIZE {
                self.image.put_pixel(px, py, rgb);
            }
        }
    }

    /// Paints the template's on-cells with their top-left at `(origin_x,
    /// origin_y)`; off-cells leave whatever is already there.
    pub fn composite(&mut self, template: &Template, origin_x: i32, origin_y: i32, color: Color) {
        for (col, row) in template.on_cells() {
            self.fill_cell(origin_x + col as i32, origin_y + row as i32, color);
        }
    }

    /// Color of a logical cell, read from its top-left pixel.
    pub fn cell(&self, x: u32, y: u32) -> Option<Color> {
        if x >= GRID_SIZE || y >= GRID_SIZE {
            return None;
        }
        let [r, g, b] = self.image.get_pixel(x * PIXEL_SIZE, y * PIXEL_SIZE).0;
        Some(Color::from_hex(
            (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b),
        ))
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Nearest-neighbour upscale so cells stay crisp.
    pub fn upscaled(&self, factor: u32) -> RgbImage {
        let factor = factor.max(1);
        imageops::resize(
            &self.image,
            CANVAS_SIZE * factor,
            CANVAS_SIZE * factor,
            FilterType::Nearest,
        )
    }

    pub fn to_png(&self, scale: u32) -> ImageResult<Vec<u8>> {
        encode_png(&self.upscaled(scale))
    }

    fn in_grid(x: i32, y: i32) -> bool {
        (0..GRID_SIZE as i32).contains(&x) && (0..GRID_SIZE as i32).contains(&y)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

pub fn encode_png(image: &RgbImage) -> ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgb8,
    )?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BACKGROUND, LEAVES, STEM_GREEN};

    #[test]
    fn fill_cell_paints_a_pixel_block() {
        let mut canvas = Canvas::new();
        canvas.fill(BACKGROUND);
        canvas.fill_cell(3, 5, STEM_GREEN);
        let green = STEM_GREEN.to_rgb();
        for (px, py) in [(6, 10), (7, 10), (6, 11), (7, 11)] {
            assert_eq!(*canvas.image().get_pixel(px, py), green);
        }
        assert_eq!(*canvas.image().get_pixel(8, 10), BACKGROUND.to_rgb());
        assert_eq!(canvas.cell(3, 5), Some(STEM_GREEN));
    }

    #[test]
    fn off_grid_cells_are_clipped() {
        let mut canvas = Canvas::new();
        canvas.fill(BACKGROUND);
        canvas.composite(&LEAVES[1], -1, 31, STEM_GREEN);
        // Only (0, 31) of the pointed leaf lands on the grid.
        assert_eq!(canvas.cell(0, 31), Some(STEM_GREEN));
        assert_eq!(canvas.cell(1, 31), Some(BACKGROUND));
        assert_eq!(canvas.cell(32, 0), None);
    }

    #[test]
    fn upscale_and_png() {
        let mut canvas = Canvas::new();
        canvas.fill(STEM_GREEN);
        let big = canvas.upscaled(DISPLAY_SCALE);
        assert_eq!(big.dimensions(), (256, 256));
        let png = canvas.to_png(1).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
