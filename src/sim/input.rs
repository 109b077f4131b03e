//! Pointer resolution
//!
//! A pointer-down is resolved against the collision index painted by the
//! previous frame's draw pass. Exactly one primary target can be hit per
//! click; the multi-shot powerup then splashes to every other live raven
//! within range of the primary.

use glam::Vec2;

use super::entity::{ClickRipple, Ctx, SoundEffect};
use super::state::{PowerupKind, Session};
use crate::consts::MULTISHOT_RADIUS;
use crate::render::Color;

/// Handle a pointer-down at viewport coordinates. Returns `true` when the
/// click restarted a finished session, so the platform can resume its loop.
pub fn pointer_down(session: &mut Session, x: f32, y: f32) -> bool {
    if session.state.game_over {
        session.reset();
        return true;
    }
    if session.paused {
        return false;
    }

    let Session {
        state,
        ravens,
        pickups,
        ripples,
        fx,
        index,
        rng,
        viewport,
        ..
    } = session;
    let mut ctx = Ctx {
        state,
        fx,
        rng,
        viewport: *viewport,
    };

    ctx.state.stats.shots_fired += 1;
    ripples.push(ClickRipple::new(
        Vec2::new(x, y),
        Color::rgba(255, 255, 255, 0.8),
    ));
    ctx.fx.sound(SoundEffect::Click);

    let mut resolved = false;
    if let Some(key) = index.sample(x, y) {
        if let Some(primary) = ravens.iter().position(|r| !r.dead && r.key == key) {
            let center = ravens[primary].center();
            ravens[primary].hit(&mut ctx);
            ctx.state.stats.hits += 1;
            resolved = true;

            if ctx.state.powerups.is_active(PowerupKind::MultiShot) {
                for (i, raven) in ravens.iter_mut().enumerate() {
                    if i != primary
                        && !raven.dead
                        && raven.center().distance(center) < MULTISHOT_RADIUS
                    {
                        raven.hit(&mut ctx);
                        ctx.state.stats.hits += 1;
                    }
                }
            }
        } else if let Some(pickup) = pickups.iter_mut().find(|p| !p.dead && p.key == key) {
            pickup.collect(&mut ctx);
            resolved = true;
        }
    }

    // A whiff with targets on screen is a miss; an empty sky costs nothing
    if !resolved && !ravens.is_empty() {
        ctx.state.stats.misses += 1;
        ctx.state.reset_combo();
        ripples.push(ClickRipple::new(
            Vec2::new(x, y),
            Color::rgba(255, 0, 0, 0.5),
        ));
    }

    ctx.state.update_accuracy();
    false
}
