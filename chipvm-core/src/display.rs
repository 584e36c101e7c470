use std::fmt;

use thiserror::Error;

/// Sprites are always eight pixels wide, one bit per pixel, MSB leftmost.
pub const SPRITE_WIDTH: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    #[error("{width}x{height} sprite at ({x}, {y}) does not fit on a {screen_width}x{screen_height} display")]
    SpriteOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        screen_width: usize,
        screen_height: usize,
    },
}

pub type Result<T> = std::result::Result<T, DisplayError>;

/// What happens to sprite pixels that land outside of the display.
///
/// Under `Clip` and `Wrap` the sprite origin is first reduced modulo the
/// display size, so an origin is never out of range. `Clip` then drops pixels
/// past the right and bottom edges, `Wrap` moves them to the opposite edge.
/// `Reject` refuses to draw any sprite whose bounding box leaves the display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpritePolicy {
    #[default]
    Clip,
    Wrap,
    Reject,
}

#[derive(Clone, PartialEq, Eq)]
pub struct MonochromeDisplay<const W: usize, const H: usize> {
    pixels: Vec<bool>,
}

impl<const W: usize, const H: usize> fmt::Debug for MonochromeDisplay<W, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MonochromeDisplay[{}x{}, {} lit]", W, H, self.lit_count())
    }
}

impl<const W: usize, const H: usize> Default for MonochromeDisplay<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> MonochromeDisplay<W, H> {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; W * H],
        }
    }

    pub const fn width(&self) -> usize {
        W
    }

    pub const fn height(&self) -> usize {
        H
    }

    pub fn clear(&mut self) {
        tracing::trace!(width = W, height = H, "clearing display");
        self.pixels.fill(false);
    }

    /// Pixel at `(x, y)`; anything off-screen reads as unlit.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < W && y < H && self.pixels[y * W + x]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&lit| lit).count()
    }

    /// XORs `rows` onto the display with its top-left corner at `(x, y)`.
    /// Returns `true` if any lit pixel was turned off.
    pub fn draw_sprite(
        &mut self,
        x: usize,
        y: usize,
        rows: &[u8],
        policy: SpritePolicy,
    ) -> Result<bool> {
        let (origin_x, origin_y) = match policy {
            SpritePolicy::Reject => {
                if x + SPRITE_WIDTH > W || y + rows.len() > H {
                    return Err(DisplayError::SpriteOutOfBounds {
                        x,
                        y,
                        width: SPRITE_WIDTH,
                        height: rows.len(),
                        screen_width: W,
                        screen_height: H,
                    });
                }
                (x, y)
            }
            SpritePolicy::Clip | SpritePolicy::Wrap => (x % W, y % H),
        };
        tracing::trace!(
            rows = rows.len(),
            x = origin_x,
            y = origin_y,
            ?policy,
            "drawing sprite"
        );

        let mut collision = false;
        for (dy, row) in rows.iter().enumerate() {
            for dx in 0..SPRITE_WIDTH {
                if row & (0x80u8 >> dx) == 0 {
                    continue;
                }
                let (px, py) = (origin_x + dx, origin_y + dy);
                let (px, py) = match policy {
                    SpritePolicy::Wrap => (px % W, py % H),
                    _ if px >= W || py >= H => continue,
                    _ => (px, py),
                };
                let pixel = &mut self.pixels[py * W + px];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        Ok(collision)
    }

    /// Packed RGB24 frame, row-major, for presenters.
    pub fn to_rgb(&self, on: [u8; 3], off: [u8; 3]) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&lit| if lit { on } else { off })
            .collect()
    }
}
