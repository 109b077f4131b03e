//! Entity model
//!
//! Every dynamic object shares the same lifecycle contract: `update` advances
//! internal state and may set the deletion flag, `draw` renders (and, for
//! collidable entities, paints the collision index), `is_dead` marks it for
//! the end-of-frame cull. The flag is never reset once set.
//!
//! Entities never touch collection membership. Destruction side effects
//! (explosions, bursts, texts, pickup drops, sounds) are appended to the `Fx`
//! queue and drained into the owning collections by the orchestrator, so
//! update/draw never iterate a mutating collection mid-pass.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{CollisionIndex, ColorKey};
use super::state::{EffectState, PowerupKind, RavenKind, Viewport};
use crate::consts::*;
use crate::render::{Color, Sprite, Surface, TextAlign};

/// Sound requests emitted by the core and played by the platform layer;
/// playback is fire-and-forget and failures never reach the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Click,
    Explosion,
    Combo,
    Powerup,
    LevelUp,
    GameOver,
    HighScore,
}

/// Pending spawns and sound requests accumulated during a frame
#[derive(Debug, Default)]
pub struct Fx {
    pub texts: Vec<FloatingText>,
    pub explosions: Vec<Explosion>,
    pub bursts: Vec<BurstParticle>,
    pub particles: Vec<Particle>,
    pub pickups: Vec<Pickup>,
    pub sounds: Vec<SoundEffect>,
}

impl Fx {
    pub fn sound(&mut self, effect: SoundEffect) {
        self.sounds.push(effect);
    }

    pub fn text(&mut self, text: FloatingText) {
        self.texts.push(text);
    }

    /// Queue a radial particle burst at a point
    pub fn burst(&mut self, pos: Vec2, color: Color, count: usize, rng: &mut Pcg32) {
        for _ in 0..count {
            self.bursts.push(BurstParticle::new(pos, color, rng));
        }
    }
}

/// Shared mutable context handed to entity operations; entities mutate only
/// themselves, the state machine's operations, and the Fx queue
pub struct Ctx<'a> {
    pub state: &'a mut EffectState,
    pub fx: &'a mut Fx,
    pub rng: &'a mut Pcg32,
    pub viewport: Viewport,
}

/// Common lifecycle contract for the seven entity kinds
pub trait Entity {
    fn update(&mut self, dt_ms: f32, ctx: &mut Ctx<'_>);
    fn draw(&self, surface: &mut dyn Surface, index: &mut CollisionIndex);
    fn is_dead(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Raven
// ---------------------------------------------------------------------------

/// A moving destructible target crossing the viewport right to left.
///
/// Velocity is split into an authoritative base pair and a derived pair
/// re-scaled each tick from the active modifiers; the base is only written on
/// a screen-edge bounce, which flips both.
pub struct Raven {
    pub kind: RavenKind,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Authoritative velocity, pixels per nominal frame; x is leftward
    pub base_vel: Vec2,
    /// Derived each tick from base x slow-mo
    pub vel: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub key: ColorKey,
    pub frame: u32,
    pub flap_timer_ms: f32,
    pub flap_interval_ms: f32,
    pub has_trail: bool,
    pub dead: bool,
}

impl Raven {
    pub fn spawn(kind: RavenKind, rng: &mut Pcg32, viewport: Viewport, speed_multiplier: f32) -> Self {
        let props = kind.props();

        let mut size_modifier = rng.random_range(0.4..1.0f32);
        match kind {
            RavenKind::Mini => size_modifier *= 0.5,
            RavenKind::Armored => size_modifier *= 1.2,
            _ => {}
        }
        let width = RAVEN_SPRITE_W * size_modifier;
        let height = RAVEN_SPRITE_H * size_modifier;

        let y_range = (viewport.height - height).max(1.0);
        let base_speed = rng.random_range(3.0..5.0f32);
        let base_vel = Vec2::new(
            base_speed * props.speed * speed_multiplier,
            rng.random_range(-2.5..2.5f32),
        );

        Self {
            kind,
            pos: Vec2::new(viewport.width, rng.random_range(0.0..y_range)),
            width,
            height,
            base_vel,
            vel: base_vel,
            health: props.health,
            max_health: props.health,
            key: ColorKey::random(rng),
            frame: 0,
            flap_timer_ms: 0.0,
            flap_interval_ms: rng.random_range(100.0..150.0f32),
            has_trail: rng.random_bool(0.5),
            dead: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    fn trail_color(&self) -> Color {
        self.kind
            .props()
            .tint
            .unwrap_or(Color::rgb(self.key.r, self.key.g, self.key.b))
    }

    /// Apply one hit. On the killing blow, scores the kill and queues the
    /// destruction side effects; an armored raven that survives gets feedback
    /// only.
    pub fn hit(&mut self, ctx: &mut Ctx<'_>) {
        if self.dead {
            return;
        }
        self.health = self.health.saturating_sub(1);
        let Ctx { state, fx, rng, viewport } = ctx;
        let props = self.kind.props();

        if self.health == 0 {
            self.dead = true;
            let points = state.register_kill(props.points, *viewport, fx, rng);

            let label = if state.combo_multiplier > 1 {
                format!("+{} x{}", points, state.combo_multiplier)
            } else {
                format!("+{points}")
            };
            fx.text(FloatingText::new(
                Vec2::new(self.pos.x + self.width / 2.0, self.pos.y),
                &label,
                props.tint.unwrap_or(Color::YELLOW),
                800.0,
            ));

            fx.explosions.push(Explosion::new(self.pos, self.width));
            fx.burst(self.center(), props.tint.unwrap_or(Color::ORANGE), 10, rng);

            state.trigger_screen_shake(match self.kind {
                RavenKind::Golden => 15.0,
                RavenKind::Armored => 12.0,
                _ => 8.0,
            });

            if self.kind == RavenKind::Golden {
                state.trigger_time_freeze();
                fx.burst(self.center(), Color::GOLD, 25, rng);
            }

            if rng.random::<f32>() < POWERUP_DROP_CHANCE {
                fx.pickups.push(Pickup::spawn(self.center(), rng));
            }
        } else {
            fx.text(FloatingText::new(
                Vec2::new(self.pos.x + self.width / 2.0, self.pos.y),
                "HIT!",
                Color::ORANGE,
                500.0,
            ));
            state.trigger_screen_shake(5.0);
            fx.burst(self.center(), Color::SILVER, 5, rng);
        }
    }
}

impl Entity for Raven {
    fn update(&mut self, dt_ms: f32, ctx: &mut Ctx<'_>) {
        let Ctx { state, fx, rng, viewport } = ctx;

        // Derived velocity: base x slow-mo, never persisted back
        self.vel = if state.powerups.is_active(PowerupKind::SlowMo) {
            self.base_vel * SLOWMO_FACTOR
        } else {
            self.base_vel
        };

        // Bounce at the top/bottom edges flips both pairs
        if self.pos.y < 0.0 || self.pos.y > viewport.height - self.height {
            self.vel.y = -self.vel.y;
            self.base_vel.y = -self.base_vel.y;
        }

        let step = state.time_scale() * dt_ms / FRAME_MS;
        self.pos.x -= self.vel.x * step;
        self.pos.y += self.vel.y * step;

        // Wing flap drives the sprite frame and the particle trail
        self.flap_timer_ms += state.time_scale() * dt_ms;
        if self.flap_timer_ms > self.flap_interval_ms {
            self.frame = (self.frame + 1) % RAVEN_FRAME_COUNT;
            self.flap_timer_ms = 0.0;
            if self.has_trail {
                let color = self.trail_color();
                for _ in 0..5 {
                    fx.particles
                        .push(Particle::new(self.pos, self.width, color, rng));
                }
            }
        }

        // Escaped off the left edge: a miss through inaction
        if self.pos.x < -self.width {
            self.dead = true;
            state.register_escape(*viewport, fx);
        }
    }

    fn draw(&self, surface: &mut dyn Surface, index: &mut CollisionIndex) {
        index.paint_rect(self.pos.x, self.pos.y, self.width, self.height, self.key);

        surface.save();
        let props = self.kind.props();

        if self.kind == RavenKind::Golden {
            surface.set_glow(20.0, Color::GOLD);
        }
        if let Some(tint) = props.tint {
            surface.set_alpha(0.8);
            surface.fill_rect(self.pos.x, self.pos.y, self.width, self.height, tint);
            surface.set_alpha(1.0);
        }

        surface.draw_sprite_frame(
            Sprite::Raven,
            self.frame,
            RAVEN_SPRITE_W,
            RAVEN_SPRITE_H,
            self.pos.x,
            self.pos.y,
            self.width,
            self.height,
        );

        // Health bar once an armored raven is damaged
        if self.kind == RavenKind::Armored && self.health < self.max_health {
            let bar_y = self.pos.y - 10.0;
            surface.fill_rect(self.pos.x, bar_y, self.width, 5.0, Color::RED);
            let ratio = self.health as f32 / self.max_health as f32;
            surface.fill_rect(self.pos.x, bar_y, self.width * ratio, 5.0, Color::LIME);
        }

        if !props.label.is_empty() {
            surface.fill_text(
                props.label,
                self.pos.x + self.width / 2.0,
                self.pos.y + self.height / 2.0,
                12.0,
                Color::WHITE,
                TextAlign::Center,
            );
        }
        surface.restore();
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// Pickup
// ---------------------------------------------------------------------------

/// Falling collectible; destroyed on collection or on leaving the viewport
#[derive(Debug)]
pub struct Pickup {
    pub kind: PowerupKind,
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    pub key: ColorKey,
    pub fall_speed: f32,
    pub float_offset: f32,
    pub pulse_scale: f32,
    pub pulse_dir: f32,
    pub dead: bool,
}

impl Pickup {
    pub fn spawn(pos: Vec2, rng: &mut Pcg32) -> Self {
        let kind = PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())];
        Self {
            kind,
            pos,
            size: 40.0,
            key: ColorKey::random(rng),
            fall_speed: 2.0,
            float_offset: 0.0,
            pulse_scale: 1.0,
            pulse_dir: 1.0,
            dead: false,
        }
    }

    /// Collection: timed kinds go through the active-powerup mapping
    /// (extend-on-recollect); an extra life applies instantly
    pub fn collect(&mut self, ctx: &mut Ctx<'_>) {
        if self.dead {
            return;
        }
        self.dead = true;
        let Ctx { state, fx, rng, viewport } = ctx;
        fx.burst(self.pos, self.kind.color(), 12, rng);
        if self.kind.is_timed() {
            state.activate_powerup(self.kind, *viewport, fx);
        } else {
            state.grant_extra_life(*viewport, fx);
        }
    }
}

impl Entity for Pickup {
    fn update(&mut self, dt_ms: f32, ctx: &mut Ctx<'_>) {
        let frames = dt_ms / FRAME_MS;
        self.pos.y += self.fall_speed * frames;
        self.float_offset += 0.05 * frames;

        self.pulse_scale += 0.02 * self.pulse_dir * frames;
        if self.pulse_scale > 1.2 {
            self.pulse_dir = -1.0;
        } else if self.pulse_scale < 0.9 {
            self.pulse_dir = 1.0;
        }

        if self.pos.y > ctx.viewport.height {
            self.dead = true;
        }
    }

    fn draw(&self, surface: &mut dyn Surface, index: &mut CollisionIndex) {
        let half = self.size / 2.0;
        index.paint_rect(self.pos.x - half, self.pos.y - half, self.size, self.size, self.key);

        let bob = self.float_offset.sin() * 5.0;
        let drawn = self.size * self.pulse_scale;
        let color = self.kind.color();

        surface.save();
        surface.set_glow(25.0, color);
        surface.fill_rect(
            self.pos.x - drawn / 2.0,
            self.pos.y + bob - drawn / 2.0,
            drawn,
            drawn,
            color,
        );
        surface.fill_text(
            self.kind.icon(),
            self.pos.x,
            self.pos.y + bob,
            20.0,
            Color::WHITE,
            TextAlign::Center,
        );
        surface.restore();
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// Explosion
// ---------------------------------------------------------------------------

/// Sprite-strip explosion left behind by a destroyed raven
#[derive(Debug)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: f32,
    pub frame: u32,
    pub frame_timer_ms: f32,
    sound_requested: bool,
    pub dead: bool,
}

impl Explosion {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size,
            frame: 0,
            frame_timer_ms: 0.0,
            sound_requested: false,
            dead: false,
        }
    }
}

impl Entity for Explosion {
    fn update(&mut self, dt_ms: f32, ctx: &mut Ctx<'_>) {
        if !self.sound_requested {
            ctx.fx.sound(SoundEffect::Explosion);
            self.sound_requested = true;
        }
        self.frame_timer_ms += dt_ms;
        if self.frame_timer_ms > BOOM_FRAME_INTERVAL_MS {
            self.frame += 1;
            self.frame_timer_ms = 0.0;
            if self.frame >= BOOM_FRAME_COUNT {
                self.dead = true;
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _index: &mut CollisionIndex) {
        if self.dead {
            return;
        }
        surface.draw_sprite_frame(
            Sprite::Boom,
            self.frame,
            BOOM_SPRITE_W,
            BOOM_SPRITE_H,
            self.pos.x,
            self.pos.y - self.size / 4.0,
            self.size,
            self.size,
        );
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// Particle (wing trail)
// ---------------------------------------------------------------------------

/// Drifting, growing circle shed by flapping ravens
#[derive(Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub drift_x: f32,
    pub color: Color,
    pub dead: bool,
}

impl Particle {
    pub fn new(origin: Vec2, size: f32, color: Color, rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(origin.x + size / 2.0, origin.y + size / 3.0),
            radius: rng.random::<f32>() + size / 10.0,
            max_radius: rng.random_range(35.0..55.0f32),
            drift_x: rng.random_range(0.5..1.5f32),
            color,
            dead: false,
        }
    }
}

impl Entity for Particle {
    fn update(&mut self, dt_ms: f32, _ctx: &mut Ctx<'_>) {
        let frames = dt_ms / FRAME_MS;
        self.pos.x += self.drift_x * frames;
        self.radius += 0.5 * frames;
        if self.radius > self.max_radius - 5.0 {
            self.dead = true;
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _index: &mut CollisionIndex) {
        surface.save();
        surface.set_alpha((1.0 - self.radius / self.max_radius).max(0.0));
        surface.fill_circle(self.pos.x, self.pos.y, self.radius, self.color);
        surface.restore();
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// BurstParticle
// ---------------------------------------------------------------------------

/// Radial debris from kills, collections and level-ups
#[derive(Debug)]
pub struct BurstParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub life: f32,
    pub decay: f32,
    pub color: Color,
    pub dead: bool,
}

impl BurstParticle {
    pub fn new(pos: Vec2, color: Color, rng: &mut Pcg32) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(2.0..7.0f32);
        Self {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            radius: rng.random_range(2.0..5.0f32),
            life: 1.0,
            decay: rng.random_range(0.01..0.03f32),
            color,
            dead: false,
        }
    }
}

impl Entity for BurstParticle {
    fn update(&mut self, dt_ms: f32, _ctx: &mut Ctx<'_>) {
        let frames = dt_ms / FRAME_MS;
        self.pos += self.vel * frames;
        self.vel.y += 0.1 * frames;
        self.vel.x *= 0.98f32.powf(frames);
        self.life -= self.decay * frames;
        if self.life <= 0.0 {
            self.dead = true;
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _index: &mut CollisionIndex) {
        if self.life <= 0.0 {
            return;
        }
        let radius = (self.radius * self.life).max(0.0);
        surface.save();
        surface.set_alpha(self.life);
        surface.fill_circle(self.pos.x, self.pos.y, radius, self.color);
        // Soft glow halo
        surface.set_alpha(self.life * 0.5);
        surface.fill_circle(self.pos.x, self.pos.y, radius * 2.0, self.color);
        surface.restore();
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// FloatingText
// ---------------------------------------------------------------------------

/// Rising score/status text with a pop-in scale
#[derive(Debug)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: Color,
    pub duration_ms: f32,
    pub timer_ms: f32,
    pub scale: f32,
    pub dead: bool,
}

impl FloatingText {
    pub fn new(pos: Vec2, text: &str, color: Color, duration_ms: f32) -> Self {
        Self {
            pos,
            text: text.to_owned(),
            color,
            duration_ms,
            timer_ms: 0.0,
            scale: 0.5,
            dead: false,
        }
    }
}

impl Entity for FloatingText {
    fn update(&mut self, dt_ms: f32, _ctx: &mut Ctx<'_>) {
        let frames = dt_ms / FRAME_MS;
        self.timer_ms += dt_ms;
        self.pos.y -= 2.0 * frames;
        self.scale = (self.scale + 0.05 * frames).min(1.0);
        if self.timer_ms > self.duration_ms {
            self.dead = true;
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _index: &mut CollisionIndex) {
        let alpha = (1.0 - self.timer_ms / self.duration_ms).max(0.0);
        let size = 40.0 * self.scale;
        surface.save();
        surface.set_alpha(alpha);
        // Drop shadow
        surface.fill_text(
            &self.text,
            self.pos.x + 2.0,
            self.pos.y + 2.0,
            size,
            Color::BLACK,
            TextAlign::Center,
        );
        surface.fill_text(&self.text, self.pos.x, self.pos.y, size, self.color, TextAlign::Center);
        surface.restore();
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// ClickRipple
// ---------------------------------------------------------------------------

/// Expanding ring at the click point; white for a shot, red for a miss
pub struct ClickRipple {
    pub pos: Vec2,
    pub color: Color,
    pub radius: f32,
    pub timer_ms: f32,
    pub dead: bool,
}

impl ClickRipple {
    pub fn new(pos: Vec2, color: Color) -> Self {
        Self {
            pos,
            color,
            radius: 0.0,
            timer_ms: 0.0,
            dead: false,
        }
    }
}

impl Entity for ClickRipple {
    fn update(&mut self, dt_ms: f32, _ctx: &mut Ctx<'_>) {
        self.timer_ms += dt_ms;
        self.radius = (self.timer_ms / RIPPLE_DURATION_MS) * RIPPLE_MAX_RADIUS;
        if self.timer_ms > RIPPLE_DURATION_MS {
            self.dead = true;
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _index: &mut CollisionIndex) {
        let alpha = (1.0 - self.timer_ms / RIPPLE_DURATION_MS).max(0.0);
        surface.save();
        surface.set_alpha(alpha * 0.6);
        surface.stroke_circle(self.pos.x, self.pos.y, self.radius, 3.0, self.color);
        surface.set_alpha(alpha * 0.3);
        surface.stroke_circle(self.pos.x, self.pos.y, self.radius * 0.7, 3.0, self.color);
        surface.restore();
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_ctx<'a>(
        state: &'a mut EffectState,
        fx: &'a mut Fx,
        rng: &'a mut Pcg32,
    ) -> Ctx<'a> {
        Ctx {
            state,
            fx,
            rng,
            viewport: Viewport::new(800.0, 600.0),
        }
    }

    fn raven(kind: RavenKind, rng: &mut Pcg32) -> Raven {
        let mut r = Raven::spawn(kind, rng, Viewport::new(800.0, 600.0), 1.0);
        r.pos = Vec2::new(400.0, 300.0);
        r
    }

    #[test]
    fn test_bounce_flips_base_and_derived_velocity() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        let mut r = raven(RavenKind::Normal, &mut rng);
        r.pos.y = -1.0;
        r.base_vel.y = -2.0;

        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        r.update(FRAME_MS, &mut ctx);
        assert!(r.base_vel.y > 0.0);
        assert!(r.vel.y > 0.0);
    }

    #[test]
    fn test_slowmo_scales_derived_not_base() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        state.activate_powerup(PowerupKind::SlowMo, Viewport::new(800.0, 600.0), &mut fx);

        let mut r = raven(RavenKind::Normal, &mut rng);
        let base = r.base_vel;
        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        r.update(FRAME_MS, &mut ctx);

        assert_eq!(r.base_vel.x, base.x);
        assert!((r.vel.x - base.x * SLOWMO_FACTOR).abs() < 1e-4);
    }

    #[test]
    fn test_escape_flags_deletion_and_costs_a_life() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        let mut r = raven(RavenKind::Normal, &mut rng);
        r.pos.x = -r.width - 1.0;

        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        r.update(FRAME_MS, &mut ctx);
        assert!(r.is_dead());
        assert_eq!(state.lives, INITIAL_LIVES - 1);
        assert_eq!(state.combo, 0);
    }

    #[test]
    fn test_armored_raven_takes_two_hits() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        let mut r = raven(RavenKind::Armored, &mut rng);

        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        r.hit(&mut ctx);
        assert!(!r.is_dead());
        assert_eq!(ctx.state.stats.kills, 0);

        r.hit(&mut ctx);
        assert!(r.is_dead());
        assert_eq!(state.stats.kills, 1);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_hit_on_dead_raven_is_inert() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        let mut r = raven(RavenKind::Normal, &mut rng);

        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        r.hit(&mut ctx);
        let score = ctx.state.score;
        r.hit(&mut ctx);
        assert_eq!(ctx.state.score, score);
        assert_eq!(ctx.state.stats.kills, 1);
    }

    #[test]
    fn test_golden_kill_triggers_time_freeze() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        let mut r = raven(RavenKind::Golden, &mut rng);

        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        r.hit(&mut ctx);
        assert!(state.freeze.active);
        assert_eq!(state.time_scale(), FREEZE_FACTOR);
    }

    #[test]
    fn test_extra_life_pickup_clamps_at_max() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = EffectState::new(0);
        state.lives = MAX_LIVES;
        let mut fx = Fx::default();

        let mut pickup = Pickup::spawn(Vec2::new(100.0, 100.0), &mut rng);
        pickup.kind = PowerupKind::ExtraLife;
        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        pickup.collect(&mut ctx);

        assert!(pickup.is_dead());
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_pickup_dies_below_viewport() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        let mut pickup = Pickup::spawn(Vec2::new(100.0, 601.0), &mut rng);

        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        pickup.update(FRAME_MS, &mut ctx);
        assert!(pickup.is_dead());
    }

    #[test]
    fn test_explosion_runs_frames_then_dies() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        let mut boom = Explosion::new(Vec2::ZERO, 100.0);

        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        let mut guard = 0;
        while !boom.is_dead() && guard < 1000 {
            boom.update(BOOM_FRAME_INTERVAL_MS + 1.0, &mut ctx);
            guard += 1;
        }
        assert!(boom.is_dead());
        assert_eq!(guard, BOOM_FRAME_COUNT as i32);
        // Exactly one sound request for the whole animation
        assert_eq!(
            fx.sounds.iter().filter(|s| **s == SoundEffect::Explosion).count(),
            1
        );
    }

    #[test]
    fn test_ripple_expires_after_duration() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut state = EffectState::new(0);
        let mut fx = Fx::default();
        let mut ripple = ClickRipple::new(Vec2::ZERO, Color::WHITE);

        let mut ctx = test_ctx(&mut state, &mut fx, &mut rng);
        ripple.update(RIPPLE_DURATION_MS - 1.0, &mut ctx);
        assert!(!ripple.is_dead());
        ripple.update(2.0, &mut ctx);
        assert!(ripple.is_dead());
    }
}
