use image::{Rgb, RgbImage};

use super::glyphs::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Pixel drawing on top of an [`RgbImage`]. Coordinates are signed and
/// everything outside the current clip rectangle is discarded.
pub struct Canvas {
    img: RgbImage,
    clip: (i64, i64, i64, i64),
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Canvas {
            img: RgbImage::from_pixel(width, height, background),
            clip: (0, 0, i64::from(width), i64::from(height)),
        }
    }

    /// Restrict drawing to the half-open rectangle `[x0, x1) × [y0, y1)`.
    pub fn set_clip(&mut self, x0: i64, y0: i64, x1: i64, y1: i64) {
        let (w, h) = (i64::from(self.img.width()), i64::from(self.img.height()));
        self.clip = (x0.max(0), y0.max(0), x1.min(w), y1.min(h));
    }

    pub fn reset_clip(&mut self) {
        self.clip = (0, 0, i64::from(self.img.width()), i64::from(self.img.height()));
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        let (x0, y0, x1, y1) = self.clip;
        if x >= x0 && x < x1 && y >= y0 && y < y1 {
            self.img.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill the inclusive rectangle spanned by two corners.
    pub fn fill_rect(&mut self, xa: i64, ya: i64, xb: i64, yb: i64, color: Rgb<u8>) {
        let (cx0, cy0, cx1, cy1) = self.clip;
        let x0 = xa.min(xb).max(cx0);
        let x1 = xa.max(xb).min(cx1 - 1);
        let y0 = ya.min(yb).max(cy0);
        let y1 = ya.max(yb).min(cy1 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.img.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    pub fn hline(&mut self, xa: i64, xb: i64, y: i64, thickness: i64, color: Rgb<u8>) {
        let top = y - (thickness - 1) / 2;
        self.fill_rect(xa, top, xb, top + thickness - 1, color);
    }

    pub fn vline(&mut self, x: i64, ya: i64, yb: i64, thickness: i64, color: Rgb<u8>) {
        let left = x - (thickness - 1) / 2;
        self.fill_rect(left, ya, left + thickness - 1, yb, color);
    }

    pub fn rect_outline(
        &mut self,
        (xa, ya): (i64, i64),
        (xb, yb): (i64, i64),
        thickness: i64,
        color: Rgb<u8>,
    ) {
        let (x0, x1) = (xa.min(xb), xa.max(xb));
        let (y0, y1) = (ya.min(yb), ya.max(yb));
        self.fill_rect(x0, y0, x1, y0 + thickness - 1, color);
        self.fill_rect(x0, y1 - thickness + 1, x1, y1, color);
        self.fill_rect(x0, y0, x0 + thickness - 1, y1, color);
        self.fill_rect(x1 - thickness + 1, y0, x1, y1, color);
    }

    /// Hollow diamond centred on (`cx`, `cy`).
    pub fn diamond(&mut self, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
        for d in 0..=radius {
            let r = radius - d;
            for (dx, dy) in [(d, r), (-d, r), (d, -r), (-d, -r)] {
                self.put(cx + dx, cy + dy, color);
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let s = i64::from(scale);
        for (i, c) in text.chars().enumerate() {
            let gx = x + i as i64 * i64::from(ADVANCE) * s;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if glyphs::is_set(c, col, row) {
                        let px = gx + i64::from(col) * s;
                        let py = y + i64::from(row) * s;
                        self.fill_rect(px, py, px + s - 1, py + s - 1, color);
                    }
                }
            }
        }
    }

    /// Draw `text` rotated a quarter turn counter-clockwise, reading bottom to
    /// top, with the bounding box's top-left corner at (`x`, `y`).
    pub fn text_vertical(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let s = i64::from(scale);
        let bottom = y + i64::from(glyphs::text_width(text, scale)) - 1;
        for (i, c) in text.chars().enumerate() {
            let gy = bottom - i as i64 * i64::from(ADVANCE) * s;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if glyphs::is_set(c, col, row) {
                        let px = x + i64::from(row) * s;
                        let py = gy - i64::from(col) * s;
                        self.fill_rect(px, py - s + 1, px + s - 1, py, color);
                    }
                }
            }
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.img.get_pixel(x, y)
    }

    pub fn into_image(self) -> RgbImage {
        self.img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn drawing_respects_the_clip() {
        let mut c = Canvas::new(10, 10, WHITE);
        c.set_clip(2, 2, 5, 5);
        c.fill_rect(0, 0, 9, 9, BLACK);
        assert_eq!(c.pixel(1, 1), WHITE);
        assert_eq!(c.pixel(2, 2), BLACK);
        assert_eq!(c.pixel(4, 4), BLACK);
        assert_eq!(c.pixel(5, 5), WHITE);

        c.reset_clip();
        c.put(9, 9, BLACK);
        assert_eq!(c.pixel(9, 9), BLACK);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut c = Canvas::new(4, 4, WHITE);
        c.fill_rect(-10, -10, -1, -1, BLACK);
        c.hline(-5, 20, 2, 1, BLACK);
        assert_eq!(c.pixel(0, 2), BLACK);
        assert_eq!(c.pixel(3, 2), BLACK);
        assert_eq!(c.pixel(0, 0), WHITE);
    }

    #[test]
    fn text_sets_glyph_pixels() {
        let mut c = Canvas::new(20, 20, WHITE);
        c.text(0, 0, "1", 1, BLACK);
        assert_eq!(c.pixel(2, 3), BLACK);
        assert_eq!(c.pixel(0, 3), WHITE);

        let mut v = Canvas::new(20, 20, WHITE);
        v.text_vertical(0, 0, "1", 1, BLACK);
        // Stem of '1' becomes a horizontal run two dots above the bottom.
        assert_eq!(v.pixel(3, 2), BLACK);
    }
}
