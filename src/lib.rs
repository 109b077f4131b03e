//! Raven Mayhem - a pointer-driven arcade shooter
//!
//! Core modules:
//! - `sim`: platform-free simulation (entities, collision index, economy state machine)
//! - `render`: drawing surface abstraction, HUD, Canvas2D backend
//! - `audio`: procedural Web Audio sound effects
//! - `highscores` / `settings`: LocalStorage-backed persistence

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod render;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game balance constants
pub mod consts {
    /// Nominal frame duration; authored velocities are pixels per nominal frame
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Deltas above this (tab switch, debugger stall) are clamped to one frame
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    pub const INITIAL_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 5;

    /// Spawn pacing: starts at the initial interval, shrinks per difficulty
    /// level, never below the floor
    pub const INITIAL_SPAWN_INTERVAL_MS: f32 = 500.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 200.0;
    pub const SPAWN_INTERVAL_STEP_MS: f32 = 50.0;

    /// Score needed per difficulty level
    pub const DIFFICULTY_SCORE_THRESHOLD: u64 = 10;
    /// Target speed gain per difficulty level
    pub const SPEED_PER_LEVEL: f32 = 0.15;

    /// Idle window before a combo decays
    pub const COMBO_WINDOW_MS: f32 = 2000.0;
    /// Multiplier table indexed by min(combo - 1, len - 1)
    pub const COMBO_MULTIPLIERS: [u64; 5] = [1, 2, 3, 4, 5];

    pub const POWERUP_DROP_CHANCE: f32 = 0.15;
    pub const POWERUP_DURATION_MS: f64 = 5000.0;
    /// Slow-motion powerup velocity factor
    pub const SLOWMO_FACTOR: f32 = 0.4;
    /// Splash radius for the multi-shot powerup
    pub const MULTISHOT_RADIUS: f32 = 200.0;

    pub const SHAKE_DURATION_MS: f32 = 200.0;
    pub const SHAKE_INTENSITY: f32 = 10.0;

    /// Brief global slowdown on golden kills
    pub const FREEZE_DURATION_MS: f32 = 150.0;
    pub const FREEZE_FACTOR: f32 = 0.2;

    pub const RIPPLE_DURATION_MS: f32 = 400.0;
    pub const RIPPLE_MAX_RADIUS: f32 = 50.0;

    /// Raven sprite sheet geometry
    pub const RAVEN_SPRITE_W: f32 = 271.0;
    pub const RAVEN_SPRITE_H: f32 = 194.0;
    pub const RAVEN_FRAME_COUNT: u32 = 6;

    /// Explosion sprite sheet geometry
    pub const BOOM_SPRITE_W: f32 = 200.0;
    pub const BOOM_SPRITE_H: f32 = 179.0;
    pub const BOOM_FRAME_COUNT: u32 = 6;
    pub const BOOM_FRAME_INTERVAL_MS: f32 = 200.0;
}
