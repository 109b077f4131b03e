//! Canvas2D backend for the `Surface` trait

use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::{Color, Sprite, Surface, TextAlign};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    sprites: HashMap<Sprite, HtmlImageElement>,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self {
            ctx,
            sprites: HashMap::new(),
            width,
            height,
        }
    }

    /// Kick off an async image load; frames drawn before it completes simply
    /// skip the sprite
    pub fn register_sprite(&mut self, sprite: Sprite, url: &str) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_src(url);
        self.sprites.insert(sprite, image);
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        let _ = self.ctx.translate(dx as f64, dy as f64);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn set_glow(&mut self, blur: f32, color: Color) {
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(&color.css());
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(x as f64, y as f64, radius as f64, 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, line_width: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(x as f64, y as f64, radius as f64, 0.0, std::f64::consts::TAU);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color, align: TextAlign) {
        self.ctx.set_font(&format!("{size}px Impact, sans-serif"));
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        self.ctx.set_fill_style_str(&color.css());
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }

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
    ) {
        let Some(image) = self.sprites.get(&sprite) else {
            return;
        };
        if !image.complete() {
            return;
        }
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                (frame as f32 * frame_w) as f64,
                0.0,
                frame_w as f64,
                frame_h as f64,
                x as f64,
                y as f64,
                w as f64,
                h as f64,
            );
    }
}
