pub const CHIP8_DISPLAY_WIDTH: usize = 64;
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;
pub const CHIP8_DISPLAY_PIXELS: usize = CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT;

/// sprites are always one byte wide
const SPRITE_WIDTH: usize = 8;

/// 64x32 monochrome display, stored flat and row-major. Every cell holds
/// exactly 0 (unlit) or 1 (lit).
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [u8; CHIP8_DISPLAY_PIXELS],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&p| if p == 1 { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [0; CHIP8_DISPLAY_PIXELS],
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// pixel at (x, y); anything off the display reads as unlit
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= CHIP8_DISPLAY_WIDTH || y >= CHIP8_DISPLAY_HEIGHT {
            return 0;
        }
        self.pixels[y * CHIP8_DISPLAY_WIDTH + x]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks(CHIP8_DISPLAY_WIDTH)
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == 1).count()
    }

    /// (x, y) of every lit pixel, top row first
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p == 1)
            .map(|(i, _)| (i % CHIP8_DISPLAY_WIDTH, i / CHIP8_DISPLAY_WIDTH))
    }

    /// XOR a sprite onto the display with its top-left corner at (x, y).
    ///
    /// The origin wraps (x mod 64, y mod 32) but the sprite itself is clipped
    /// at the right and bottom edges. Each row is one byte, MSB leftmost.
    /// Returns true if any lit pixel was switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let x0 = x as usize % CHIP8_DISPLAY_WIDTH;
        let y0 = y as usize % CHIP8_DISPLAY_HEIGHT;
        let mut collided = false;

        for (row, bits) in rows.iter().enumerate() {
            let py = y0 + row;
            if py >= CHIP8_DISPLAY_HEIGHT {
                break;
            }
            for col in 0..SPRITE_WIDTH {
                let px = x0 + col;
                if px >= CHIP8_DISPLAY_WIDTH {
                    break;
                }
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let pixel = &mut self.pixels[py * CHIP8_DISPLAY_WIDTH + px];
                if *pixel == 1 {
                    collided = true;
                }
                *pixel ^= 1;
            }
        }
        collided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let fb = Framebuffer::new();
        assert_eq!(fb.lit_count(), 0);
        assert_eq!(fb.as_slice().len(), 2048);
    }

    #[test]
    fn test_draw_sets_pixels_msb_first() {
        let mut fb = Framebuffer::new();
        let collided = fb.draw_sprite(0, 0, &[0b1000_0001]);
        assert!(!collided);
        assert_eq!(fb.get(0, 0), 1);
        assert_eq!(fb.get(7, 0), 1);
        assert_eq!(fb.lit_count(), 2);
    }

    #[test]
    fn test_draw_twice_restores_and_collides() {
        let mut fb = Framebuffer::new();
        let glyph = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!fb.draw_sprite(10, 5, &glyph));
        assert_eq!(fb.lit_count(), 14);
        assert!(fb.draw_sprite(10, 5, &glyph));
        assert_eq!(fb, Framebuffer::new());
    }

    #[test]
    fn test_zero_bits_never_collide() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0xff]);
        assert!(!fb.draw_sprite(0, 0, &[0x00]));
        assert_eq!(fb.lit_count(), 8);
    }

    #[test]
    fn test_clip_right_and_bottom() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(60, 30, &[0xff; 4]);
        let lit: Vec<_> = fb.lit_pixels().collect();
        assert_eq!(lit.len(), 8);
        for (x, y) in lit {
            assert!((60..64).contains(&x), "x {} out of clip", x);
            assert!((30..32).contains(&y), "y {} out of clip", y);
        }
        // nothing wrapped round
        assert_eq!(fb.get(0, 0), 0);
        assert_eq!(fb.get(0, 30), 0);
        assert_eq!(fb.get(60, 0), 0);
    }

    #[test]
    fn test_origin_wraps() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(64 + 3, 32 + 2, &[0x80]);
        assert_eq!(fb.get(3, 2), 1);
        assert_eq!(fb.lit_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(1, 1, &[0xff, 0xff]);
        fb.clear();
        assert_eq!(fb.lit_count(), 0);
    }

    #[test]
    fn test_debug_render() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0xc0]);
        let s = format!("{:?}", fb);
        assert!(s.starts_with("##......"));
        assert_eq!(s.lines().count(), 32);
    }
}
