//! Rendering seam between the simulation and the platform
//!
//! The sim draws through the `Surface` trait and never touches `web_sys`.
//! `canvas` provides the Canvas2D implementation on wasm32; `NullSurface`
//! backs native tests.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod hud;

/// RGBA color; alpha is multiplied with the surface's global alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const GOLD: Color = Color::rgb(255, 215, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const SILVER: Color = Color::rgb(192, 192, 192);
    pub const PURPLE: Color = Color::rgb(160, 32, 240);
    pub const LIME: Color = Color::rgb(0, 255, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    /// CSS color string for the canvas backend
    pub fn css(&self) -> String {
        if (self.a - 1.0).abs() < f32::EPSILON {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Sprite sheets addressed by name; loading is the platform's concern and a
/// not-yet-loaded sprite draws nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Raven,
    Boom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// 2D drawing primitives required by the game
pub trait Surface {
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn set_alpha(&mut self, alpha: f32);
    /// Glow via shadow blur; reset by `restore`
    fn set_glow(&mut self, blur: f32, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, line_width: f32, color: Color);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color, align: TextAlign);
    /// Draw one frame of a horizontal sprite strip into the destination rect
    #[allow(clippy::too_many_arguments)]
    fn draw_sprite_frame(
        &mut self,
        sprite: Sprite,
        frame: u32,
        frame_w: f32,
        frame_h: f32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    );
}

/// No-op surface for headless tests
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self) {}
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _dx: f32, _dy: f32) {}
    fn set_alpha(&mut self, _alpha: f32) {}
    fn set_glow(&mut self, _blur: f32, _color: Color) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Color) {}
    fn fill_circle(&mut self, _x: f32, _y: f32, _radius: f32, _color: Color) {}
    fn stroke_circle(&mut self, _x: f32, _y: f32, _r: f32, _w: f32, _color: Color) {}
    fn fill_text(&mut self, _t: &str, _x: f32, _y: f32, _s: f32, _c: Color, _a: TextAlign) {}
    fn draw_sprite_frame(
        &mut self,
        _sprite: Sprite,
        _frame: u32,
        _fw: f32,
        _fh: f32,
        _x: f32,
        _y: f32,
        _w: f32,
        _h: f32,
    ) {
    }
}
