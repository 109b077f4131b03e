//! Color-keyed collision index
//!
//! Pointer hit testing works like the classic dual-canvas trick: every
//! collidable entity owns a random RGB key and fills its bounding rectangle
//! with that key into an off-screen buffer during draw. Resolving a click is
//! then a single pixel read. Where two entities overlap, whichever painted
//! last wins - draw order is the z-order policy, by design.

use rand::Rng;

/// Per-entity collision key: three independently random channels.
///
/// Uniqueness is not enforced; two live entities sharing a key is an accepted
/// one-in-sixteen-million case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorKey {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            r: rng.random(),
            g: rng.random(),
            b: rng.random(),
        }
    }
}

/// Off-screen RGBA buffer with the same dimensions as the viewport.
///
/// The alpha byte marks a painted pixel, so even an all-black key resolves.
#[derive(Debug, Clone)]
pub struct CollisionIndex {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CollisionIndex {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset the whole index; called once per frame before the draw pass
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Fill a screen-space rectangle with the entity's key, clamped to bounds
    pub fn paint_rect(&mut self, x: f32, y: f32, w: f32, h: f32, key: ColorKey) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = (x.max(0.0) as u32).min(self.width);
        let y0 = (y.max(0.0) as u32).min(self.height);
        let x1 = ((x + w).max(0.0) as u32).min(self.width);
        let y1 = ((y + h).max(0.0) as u32).min(self.height);

        for py in y0..y1 {
            let row = (py * self.width) as usize * 4;
            for px in x0..x1 {
                let i = row + px as usize * 4;
                self.pixels[i] = key.r;
                self.pixels[i + 1] = key.g;
                self.pixels[i + 2] = key.b;
                self.pixels[i + 3] = 255;
            }
        }
    }

    /// Read back the key under a pointer coordinate; `None` for unpainted or
    /// out-of-bounds pixels
    pub fn sample(&self, x: f32, y: f32) -> Option<ColorKey> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (px, py) = (x as u32, y as u32);
        if px >= self.width || py >= self.height {
            return None;
        }
        let i = ((py * self.width + px) as usize) * 4;
        if self.pixels[i + 3] == 0 {
            return None;
        }
        Some(ColorKey {
            r: self.pixels[i],
            g: self.pixels[i + 1],
            b: self.pixels[i + 2],
        })
    }
}
