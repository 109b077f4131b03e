//! Platform-free simulation
//!
//! All gameplay logic lives here and runs natively for tests:
//! - Seeded RNG only
//! - Drawing goes through the `Surface` trait
//! - Sounds and spawns are queued, never played or inserted mid-pass

pub mod collision;
pub mod entity;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionIndex, ColorKey};
pub use entity::{
    BurstParticle, ClickRipple, Ctx, Entity, Explosion, FloatingText, Fx, Particle, Pickup, Raven,
    SoundEffect,
};
pub use input::pointer_down;
pub use spawn::{Spawner, roll_raven_kind};
pub use state::{EffectState, PowerupKind, RavenKind, Session, Stats, Viewport};
pub use tick::{FrameInput, frame};
