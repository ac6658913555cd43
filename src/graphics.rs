//! A wrapper around the 64x32 monochrome frame buffer, plus the built-in hex font
use serde::{Deserialize, Serialize};
#[cfg(test)]
use std::ops::Index;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// value of a lit pixel in the buffer returned by `Emulator::get_pixels`
pub const PIXEL_ON: u32 = 0xFFFFFF;
pub const PIXEL_OFF: u32 = 0;

pub const NUM_BYTES_IN_FONT_CHAR: usize = 5;

/// The 16 5-byte hex glyphs 0-F
pub const FONT_SET: [[u8; NUM_BYTES_IN_FONT_CHAR]; 16] = [
    [0xF0, 0x90, 0x90, 0x90, 0xF0], // 0
    [0x20, 0x60, 0x20, 0x20, 0x70], // 1
    [0xF0, 0x10, 0xF0, 0x80, 0xF0], // 2
    [0xF0, 0x10, 0xF0, 0x10, 0xF0], // 3
    [0x90, 0x90, 0xF0, 0x10, 0x10], // 4
    [0xF0, 0x80, 0xF0, 0x10, 0xF0], // 5
    [0xF0, 0x80, 0xF0, 0x90, 0xF0], // 6
    [0xF0, 0x10, 0x20, 0x40, 0x40], // 7
    [0xF0, 0x90, 0xF0, 0x90, 0xF0], // 8
    [0xF0, 0x90, 0xF0, 0x10, 0xF0], // 9
    [0xF0, 0x90, 0xF0, 0x90, 0x90], // A
    [0xE0, 0x90, 0xE0, 0x90, 0xE0], // B
    [0xF0, 0x80, 0x80, 0x80, 0xF0], // C
    [0xE0, 0x90, 0x90, 0x90, 0xE0], // D
    [0xF0, 0x80, 0xF0, 0x80, 0xF0], // E
    [0xF0, 0x80, 0xF0, 0x80, 0x80], // F
];

/// What happens to sprite pixels that fall past the right or bottom edge of the
/// screen. The sprite origin always wraps.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteEdge {
    /// wrap each pixel around to the opposite edge
    Wrap,
    /// drop pixels that fall off screen
    Clip,
    /// index the buffer as `y * WIDTH + x` without wrapping columns, so pixels past
    /// the right edge land at the start of the next row. Pixels past the end of the
    /// buffer are dropped.
    Spill,
}

impl Default for SpriteEdge {
    fn default() -> Self {
        SpriteEdge::Wrap
    }
}

pub struct Graphics {
    buffer: [u32; WIDTH * HEIGHT],
}

impl Graphics {
    pub fn new() -> Self {
        Graphics {
            buffer: [PIXEL_OFF; WIDTH * HEIGHT],
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        WIDTH * HEIGHT
    }

    /// Given x and y coordinate for a pixel in the buffer, return the corresponding
    /// index of that pixel in the buffer
    pub fn get_graphics_idx(x: usize, y: usize) -> usize {
        y * WIDTH + x
    }

    pub fn clear(&mut self) {
        self.buffer = [PIXEL_OFF; WIDTH * HEIGHT];
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.buffer[Self::get_graphics_idx(x, y)] == PIXEL_ON
    }

    /// XOR `sprite` onto the buffer with its top left corner at (x, y), one byte per
    /// row, most significant bit leftmost. Returns true if any lit pixel was turned off.
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8], edge: SpriteEdge) -> bool {
        let origin_x = x as usize % WIDTH;
        let origin_y = y as usize % HEIGHT;
        let mut collision = false;

        for (row, byte) in sprite.iter().enumerate() {
            for col in 0..8 {
                if (byte >> (7 - col)) & 1 == 0 {
                    continue;
                }

                let idx = match Self::pixel_idx(origin_x + col, origin_y + row, edge) {
                    Some(idx) => idx,
                    None => continue,
                };

                if self.buffer[idx] == PIXEL_ON {
                    collision = true;
                }
                self.buffer[idx] ^= PIXEL_ON;
            }
        }

        collision
    }

    fn pixel_idx(x: usize, y: usize, edge: SpriteEdge) -> Option<usize> {
        match edge {
            SpriteEdge::Wrap => Some(Self::get_graphics_idx(x % WIDTH, y % HEIGHT)),
            SpriteEdge::Clip if x < WIDTH && y < HEIGHT => Some(Self::get_graphics_idx(x, y)),
            SpriteEdge::Clip => None,
            SpriteEdge::Spill => {
                let idx = Self::get_graphics_idx(x, y);
                if idx < WIDTH * HEIGHT {
                    Some(idx)
                } else {
                    None
                }
            }
        }
    }

    /// The raw row-major pixel buffer
    pub fn pixels(&self) -> &[u32] {
        &self.buffer
    }
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Index<usize> for Graphics {
    type Output = u32;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.buffer[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_count(graphics: &Graphics) -> usize {
        graphics.pixels().iter().filter(|&&p| p == PIXEL_ON).count()
    }

    #[test]
    fn draw_sets_pixels_msb_first() {
        let mut graphics = Graphics::new();

        let collision = graphics.draw(2, 3, &[0b1000_0001], SpriteEdge::Wrap);

        assert!(!collision);
        assert!(graphics.is_lit(2, 3));
        assert!(graphics.is_lit(9, 3));
        assert_eq!(lit_count(&graphics), 2);
    }

    #[test]
    fn draw_twice_restores_buffer() {
        let mut graphics = Graphics::new();
        graphics.draw(0, 0, &[0xFF], SpriteEdge::Wrap);
        let before: Vec<u32> = graphics.pixels().to_vec();

        let sprite = [0x3C, 0x42, 0x81, 0x42, 0x3C];
        graphics.draw(10, 0, &sprite, SpriteEdge::Wrap);
        let collision = graphics.draw(10, 0, &sprite, SpriteEdge::Wrap);

        assert!(collision);
        assert_eq!(graphics.pixels(), &before[..]);
    }

    #[test]
    fn collision_stays_set_for_whole_draw() {
        let mut graphics = Graphics::new();
        graphics.draw(0, 0, &[0x80], SpriteEdge::Wrap);

        // first pixel collides, the rest of the rows don't
        let collision = graphics.draw(0, 0, &[0x80, 0x01, 0x01], SpriteEdge::Wrap);

        assert!(collision);
        assert!(!graphics.is_lit(0, 0));
        assert!(graphics.is_lit(7, 1));
        assert!(graphics.is_lit(7, 2));
    }

    #[test]
    fn origin_wraps_for_every_edge_policy() {
        for &edge in &[SpriteEdge::Wrap, SpriteEdge::Clip, SpriteEdge::Spill] {
            let mut graphics = Graphics::new();
            graphics.draw((WIDTH + 1) as u8, (HEIGHT + 2) as u8, &[0x80], edge);

            assert!(graphics.is_lit(1, 2), "{:?}", edge);
            assert_eq!(lit_count(&graphics), 1);
        }
    }

    #[test]
    fn wrap_right_to_left_and_bottom_to_top() {
        let mut graphics = Graphics::new();

        graphics.draw((WIDTH - 4) as u8, (HEIGHT - 1) as u8, &[0xFF, 0xFF], SpriteEdge::Wrap);

        for x in (WIDTH - 4)..WIDTH {
            assert!(graphics.is_lit(x, HEIGHT - 1));
            assert!(graphics.is_lit(x, 0));
        }
        for x in 0..4 {
            assert!(graphics.is_lit(x, HEIGHT - 1));
            assert!(graphics.is_lit(x, 0));
        }
        assert_eq!(lit_count(&graphics), 16);
    }

    #[test]
    fn clip_drops_offscreen_pixels() {
        let mut graphics = Graphics::new();

        graphics.draw((WIDTH - 4) as u8, (HEIGHT - 1) as u8, &[0xFF, 0xFF], SpriteEdge::Clip);

        for x in (WIDTH - 4)..WIDTH {
            assert!(graphics.is_lit(x, HEIGHT - 1));
        }
        assert_eq!(lit_count(&graphics), 4);
    }

    #[test]
    fn spill_runs_into_next_row() {
        let mut graphics = Graphics::new();

        graphics.draw((WIDTH - 4) as u8, 0, &[0xFF], SpriteEdge::Spill);

        for x in (WIDTH - 4)..WIDTH {
            assert!(graphics.is_lit(x, 0));
        }
        for x in 0..4 {
            assert!(graphics.is_lit(x, 1));
        }
        assert_eq!(lit_count(&graphics), 8);
    }

    #[test]
    fn spill_drops_pixels_past_buffer_end() {
        let mut graphics = Graphics::new();

        graphics.draw((WIDTH - 4) as u8, (HEIGHT - 1) as u8, &[0xFF, 0xFF], SpriteEdge::Spill);

        for x in (WIDTH - 4)..WIDTH {
            assert!(graphics.is_lit(x, HEIGHT - 1));
        }
        assert_eq!(lit_count(&graphics), 4);
    }

    #[test]
    fn clear_unlights_everything() {
        let mut graphics = Graphics::new();
        graphics.draw(5, 5, &[0xFF; 15], SpriteEdge::Wrap);

        graphics.clear();

        assert_eq!(lit_count(&graphics), 0);
    }
}
