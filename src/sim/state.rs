//! Economy state machine and session context
//!
//! `EffectState` owns score, lives, combo, powerups, difficulty and the timed
//! feedback effects (shake, freeze). Entities never mutate it directly; they
//! call its operations. `Session` bundles the state with the seven entity
//! collections, spawner, RNG and collision index for one playthrough.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::CollisionIndex;
use super::entity::{
    BurstParticle, ClickRipple, Explosion, FloatingText, Fx, Particle, Pickup, Raven, SoundEffect,
};
use super::spawn::Spawner;
use crate::consts::*;
use crate::render::Color;

/// Visible region, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Raven variants, weighted per `RavenProps`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RavenKind {
    Normal,
    Fast,
    Golden,
    Armored,
    Mini,
}

/// Per-kind balance values
#[derive(Debug, Clone, Copy)]
pub struct RavenProps {
    pub weight: f32,
    pub speed: f32,
    pub points: u64,
    pub health: u32,
    pub tint: Option<Color>,
    pub label: &'static str,
}

impl RavenKind {
    /// Draw order for the weighted spawn roll
    pub const ALL: [RavenKind; 5] = [
        RavenKind::Normal,
        RavenKind::Fast,
        RavenKind::Golden,
        RavenKind::Armored,
        RavenKind::Mini,
    ];

    pub fn props(&self) -> RavenProps {
        match self {
            RavenKind::Normal => RavenProps {
                weight: 0.6,
                speed: 1.0,
                points: 1,
                health: 1,
                tint: None,
                label: "",
            },
            RavenKind::Fast => RavenProps {
                weight: 0.2,
                speed: 2.0,
                points: 2,
                health: 1,
                tint: Some(Color::CYAN),
                label: "»",
            },
            RavenKind::Golden => RavenProps {
                weight: 0.05,
                speed: 0.8,
                points: 5,
                health: 1,
                tint: Some(Color::GOLD),
                label: "★",
            },
            RavenKind::Armored => RavenProps {
                weight: 0.1,
                speed: 0.9,
                points: 3,
                health: 2,
                tint: Some(Color::SILVER),
                label: "⬛",
            },
            RavenKind::Mini => RavenProps {
                weight: 0.05,
                speed: 1.5,
                points: 3,
                health: 1,
                tint: Some(Color::PURPLE),
                label: "•",
            },
        }
    }
}

/// Powerup variants; all but `ExtraLife` are timed global modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    SlowMo,
    MultiShot,
    ScoreBoost,
    ExtraLife,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::SlowMo,
        PowerupKind::MultiShot,
        PowerupKind::ScoreBoost,
        PowerupKind::ExtraLife,
    ];

    /// Timed kinds live in the active-powerup mapping; ExtraLife is instant
    pub fn is_timed(&self) -> bool {
        !matches!(self, PowerupKind::ExtraLife)
    }

    pub fn banner(&self) -> &'static str {
        match self {
            PowerupKind::SlowMo => "SLOWMO!",
            PowerupKind::MultiShot => "MULTISHOT!",
            PowerupKind::ScoreBoost => "SCOREBOOST!",
            PowerupKind::ExtraLife => "+1 LIFE!",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerupKind::SlowMo => Color::CYAN,
            PowerupKind::MultiShot => Color::ORANGE,
            PowerupKind::ScoreBoost => Color::GOLD,
            PowerupKind::ExtraLife => Color::LIME,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PowerupKind::SlowMo => "⏱",
            PowerupKind::MultiShot => "✸",
            PowerupKind::ScoreBoost => "★",
            PowerupKind::ExtraLife => "♥",
        }
    }
}

/// Mapping from timed powerup kind to absolute expiry timestamp (ms).
///
/// Small and fixed-size, so a Vec beats a hash map; keys stay unique because
/// re-activation overwrites the existing entry.
#[derive(Debug, Clone, Default)]
pub struct ActivePowerups {
    entries: Vec<(PowerupKind, f64)>,
}

impl ActivePowerups {
    /// Set or extend: re-collecting an active kind replaces its expiry
    pub fn set(&mut self, kind: PowerupKind, expiry_ms: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 = expiry_ms;
        } else {
            self.entries.push((kind, expiry_ms));
        }
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.entries.iter().any(|(k, _)| *k == kind)
    }

    /// Drop entries whose expiry has passed; silent, no event
    pub fn remove_expired(&mut self, now_ms: f64) {
        self.entries.retain(|(_, expiry)| *expiry > now_ms);
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerupKind, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Timed shake of the visible surface; overwrite-on-retrigger, last call wins
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenShake {
    pub active: bool,
    pub remaining_ms: f32,
    pub intensity: f32,
}

/// Brief global slowdown; independent from the slow-mo powerup
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFreeze {
    pub active: bool,
    pub remaining_ms: f32,
}

/// Session statistics shown in the HUD and on the terminal screen
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub shots_fired: u32,
    pub hits: u32,
    pub misses: u32,
    pub kills: u32,
    pub best_combo: u32,
    /// round(hits / shots_fired * 100); stays 0 until the first shot
    pub accuracy: u32,
}

/// The effect/economy state machine
#[derive(Debug, Clone)]
pub struct EffectState {
    pub score: u64,
    pub lives: u32,
    pub game_over: bool,
    /// Monotonically non-decreasing within a session
    pub difficulty_level: u32,
    pub spawn_interval_ms: f32,
    pub speed_multiplier: f32,
    pub combo: u32,
    pub combo_timer_ms: f32,
    pub combo_multiplier: u64,
    pub powerups: ActivePowerups,
    pub shake: ScreenShake,
    pub freeze: TimeFreeze,
    pub stats: Stats,
    /// Stored best, folded with the final score when the session ends
    pub high_score: u64,
    /// Wall clock fed by the orchestrator each frame
    pub now_ms: f64,
}

impl EffectState {
    pub fn new(high_score: u64) -> Self {
        Self {
            score: 0,
            lives: INITIAL_LIVES,
            game_over: false,
            difficulty_level: 1,
            spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            speed_multiplier: 1.0,
            combo: 0,
            combo_timer_ms: 0.0,
            combo_multiplier: 1,
            powerups: ActivePowerups::default(),
            shake: ScreenShake::default(),
            freeze: TimeFreeze::default(),
            stats: Stats::default(),
            high_score,
            now_ms: 0.0,
        }
    }

    /// Full restart; only the stored high score survives
    pub fn reset(&mut self) {
        *self = Self::new(self.high_score);
    }

    /// A raven was destroyed. Scores the kill with the multiplier in effect
    /// at the moment of the hit, then advances combo and difficulty.
    /// Returns the points awarded (for the floating text).
    pub fn register_kill(
        &mut self,
        base_points: u64,
        viewport: Viewport,
        fx: &mut Fx,
        rng: &mut Pcg32,
    ) -> u64 {
        let mut points = base_points * self.combo_multiplier;
        if self.powerups.is_active(PowerupKind::ScoreBoost) {
            points *= 2;
        }
        self.score += points;
        self.stats.kills += 1;
        self.advance_combo(fx);
        self.check_difficulty_up(viewport, fx, rng);
        points
    }

    /// Consecutive hit: bump combo, rearm the decay window, re-derive the
    /// multiplier from the table
    pub fn advance_combo(&mut self, fx: &mut Fx) {
        self.combo += 1;
        self.combo_timer_ms = COMBO_WINDOW_MS;
        let idx = (self.combo as usize - 1).min(COMBO_MULTIPLIERS.len() - 1);
        self.combo_multiplier = COMBO_MULTIPLIERS[idx];

        if self.combo > self.stats.best_combo {
            self.stats.best_combo = self.combo;
        }
        if self.combo >= 3 {
            self.trigger_screen_shake(SHAKE_INTENSITY * self.combo as f32 / 3.0);
        }
        if self.combo >= 2 {
            fx.sound(SoundEffect::Combo);
        }
    }

    /// Count down the combo window; on expiry the combo resets silently
    pub fn decay_combo(&mut self, dt_ms: f32) {
        if self.combo > 0 {
            self.combo_timer_ms -= dt_ms;
            if self.combo_timer_ms <= 0.0 {
                self.combo = 0;
                self.combo_multiplier = 1;
                self.combo_timer_ms = 0.0;
            }
        }
    }

    /// Immediate reset on a miss or an escaped raven
    pub fn reset_combo(&mut self) {
        self.combo = 0;
        self.combo_multiplier = 1;
        self.combo_timer_ms = 0.0;
    }

    /// Raise the difficulty when the score crosses the next threshold.
    ///
    /// Raises by exactly one level per check, even when a single kill jumps
    /// the score across several thresholds at once.
    pub fn check_difficulty_up(&mut self, viewport: Viewport, fx: &mut Fx, rng: &mut Pcg32) {
        let derived = (self.score / DIFFICULTY_SCORE_THRESHOLD) as u32 + 1;
        if derived > self.difficulty_level {
            self.difficulty_level += 1;
            self.speed_multiplier = 1.0 + (self.difficulty_level - 1) as f32 * SPEED_PER_LEVEL;
            self.spawn_interval_ms = (INITIAL_SPAWN_INTERVAL_MS
                - (self.difficulty_level - 1) as f32 * SPAWN_INTERVAL_STEP_MS)
                .max(MIN_SPAWN_INTERVAL_MS);
            log::debug!(
                "difficulty up: level {} interval {}ms speed x{:.2}",
                self.difficulty_level,
                self.spawn_interval_ms,
                self.speed_multiplier
            );

            fx.text(FloatingText::new(
                viewport.center(),
                "DIFFICULTY UP!",
                Color::RED,
                2000.0,
            ));
            fx.burst(viewport.center(), Color::RED, 20, rng);
            self.trigger_screen_shake(15.0);
            fx.sound(SoundEffect::LevelUp);
        }
    }

    /// A raven left the viewport unharmed: lose a life, break the combo
    pub fn register_escape(&mut self, viewport: Viewport, fx: &mut Fx) {
        self.lives = self.lives.saturating_sub(1);
        self.reset_combo();
        self.trigger_screen_shake(20.0);
        fx.text(FloatingText::new(
            Vec2::new(100.0, viewport.height - 100.0),
            "MISSED!",
            Color::RED,
            1000.0,
        ));
        if self.lives == 0 {
            self.end_session(fx);
        }
    }

    /// Terminal transition; folds the high score before anything renders.
    /// Idempotent so a forced quit and a final escape cannot double-fire.
    pub fn end_session(&mut self, fx: &mut Fx) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        if self.score > self.high_score {
            self.high_score = self.score;
            fx.sound(SoundEffect::HighScore);
        }
        fx.sound(SoundEffect::GameOver);
        log::info!(
            "game over: score {} best {} accuracy {}%",
            self.score,
            self.high_score,
            self.stats.accuracy
        );
    }

    /// One more heart, capped
    pub fn grant_extra_life(&mut self, viewport: Viewport, fx: &mut Fx) {
        self.lives = (self.lives + 1).min(MAX_LIVES);
        fx.text(FloatingText::new(
            Vec2::new(viewport.width / 2.0, 100.0),
            PowerupKind::ExtraLife.banner(),
            Color::LIME,
            1500.0,
        ));
        fx.sound(SoundEffect::Powerup);
    }

    /// Activate (or extend) a timed powerup until now + duration
    pub fn activate_powerup(&mut self, kind: PowerupKind, viewport: Viewport, fx: &mut Fx) {
        debug_assert!(kind.is_timed());
        self.powerups.set(kind, self.now_ms + POWERUP_DURATION_MS);
        fx.text(FloatingText::new(
            Vec2::new(viewport.width / 2.0, 100.0),
            kind.banner(),
            Color::YELLOW,
            1500.0,
        ));
        fx.sound(SoundEffect::Powerup);
    }

    /// Expire powerups; natural expiry is silent
    pub fn tick_powerups(&mut self) {
        self.powerups.remove_expired(self.now_ms);
    }

    /// Overwrite semantics: last call wins for both timer and intensity
    pub fn trigger_screen_shake(&mut self, intensity: f32) {
        self.shake.active = true;
        self.shake.remaining_ms = SHAKE_DURATION_MS;
        self.shake.intensity = intensity;
    }

    pub fn tick_shake(&mut self, dt_ms: f32) {
        if self.shake.active {
            self.shake.remaining_ms -= dt_ms;
            if self.shake.remaining_ms <= 0.0 {
                self.shake = ScreenShake::default();
            }
        }
    }

    pub fn trigger_time_freeze(&mut self) {
        self.freeze.active = true;
        self.freeze.remaining_ms = FREEZE_DURATION_MS;
    }

    pub fn tick_freeze(&mut self, dt_ms: f32) {
        if self.freeze.active {
            self.freeze.remaining_ms -= dt_ms;
            if self.freeze.remaining_ms <= 0.0 {
                self.freeze = TimeFreeze::default();
            }
        }
    }

    /// Global time scale consumed by target motion. Freeze is checked first;
    /// the slow-mo powerup is a separate multiplier applied by the ravens.
    pub fn time_scale(&self) -> f32 {
        if self.freeze.active { FREEZE_FACTOR } else { 1.0 }
    }

    /// Recomputed after every click
    pub fn update_accuracy(&mut self) {
        if self.stats.shots_fired > 0 {
            self.stats.accuracy =
                (self.stats.hits as f32 / self.stats.shots_fired as f32 * 100.0).round() as u32;
        }
    }
}

/// One playthrough: effect state, the seven entity collections, spawner, RNG,
/// collision index and clock. The orchestrator is the only owner of
/// collection membership (append and cull).
pub struct Session {
    pub state: EffectState,
    pub ravens: Vec<Raven>,
    pub explosions: Vec<Explosion>,
    pub particles: Vec<Particle>,
    pub pickups: Vec<Pickup>,
    pub texts: Vec<FloatingText>,
    pub ripples: Vec<ClickRipple>,
    pub bursts: Vec<BurstParticle>,
    pub fx: Fx,
    pub index: CollisionIndex,
    pub spawner: Spawner,
    pub rng: Pcg32,
    pub viewport: Viewport,
    pub last_timestamp: f64,
    pub paused: bool,
}

impl Session {
    pub fn new(seed: u64, viewport: Viewport, high_score: u64) -> Self {
        Self {
            state: EffectState::new(high_score),
            ravens: Vec::new(),
            explosions: Vec::new(),
            particles: Vec::new(),
            pickups: Vec::new(),
            texts: Vec::new(),
            ripples: Vec::new(),
            bursts: Vec::new(),
            fx: Fx::default(),
            index: CollisionIndex::new(viewport.width as u32, viewport.height as u32),
            spawner: Spawner::default(),
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            last_timestamp: 0.0,
            paused: false,
        }
    }

    /// Restart after game over: everything back to initial, high score kept,
    /// RNG stream continues
    pub fn reset(&mut self) {
        self.state.reset();
        self.ravens.clear();
        self.explosions.clear();
        self.particles.clear();
        self.pickups.clear();
        self.texts.clear();
        self.ripples.clear();
        self.bursts.clear();
        self.fx = Fx::default();
        self.index.clear();
        self.spawner = Spawner::default();
        self.last_timestamp = 0.0;
        self.paused = false;
    }

    /// Move queued entity spawns into their owning collections; called once
    /// per frame after the update pass. Sound requests stay queued for the
    /// platform layer.
    pub fn drain_fx(&mut self) {
        self.texts.append(&mut self.fx.texts);
        self.explosions.append(&mut self.fx.explosions);
        self.bursts.append(&mut self.fx.bursts);
        self.particles.append(&mut self.fx.particles);
        self.pickups.append(&mut self.fx.pickups);
    }

    /// Hand pending sound requests to the platform layer
    pub fn take_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.fx.sounds)
    }
}
