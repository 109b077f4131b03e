//! Frame orchestrator
//!
//! One call per animation frame. The fixed pass order is the contract the
//! rest of the simulation relies on: spawn, decay timers, update entities,
//! drain queued spawns, draw (which repaints the collision index), cull dead
//! entities, HUD. Pausing skips every mutation but still refreshes the clock
//! so resuming never produces a delta spanning the pause.

use rand::Rng;

use super::entity::{Ctx, Entity};
use super::state::Session;
use crate::consts::{FRAME_MS, MAX_FRAME_DELTA_MS};
use crate::render::hud;
use crate::render::Surface;

/// Per-frame platform input, collected between frames
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// One-shot: toggle pause (cleared by the platform after the frame)
    pub toggle_pause: bool,
    /// One-shot: abandon the session from the pause screen
    pub quit_to_game_over: bool,
    /// Sticky accessibility setting: suppress the shake translate
    pub reduced_motion: bool,
}

/// Advance and render one frame at the given wall-clock timestamp (ms)
pub fn frame(session: &mut Session, input: &FrameInput, timestamp: f64, surface: &mut dyn Surface) {
    let dt_ms = frame_delta(session.last_timestamp, timestamp);
    session.last_timestamp = timestamp;
    session.state.now_ms = timestamp;

    if input.toggle_pause && !session.state.game_over {
        session.paused = !session.paused;
    }
    if input.quit_to_game_over && session.paused {
        session.paused = false;
        let Session { state, fx, .. } = session;
        state.end_session(fx);
    }

    surface.clear();

    if session.state.game_over {
        hud::draw_game_over(surface, &session.state, session.viewport);
        return;
    }

    surface.save();
    if session.state.shake.active && !input.reduced_motion {
        let half = session.state.shake.intensity / 2.0;
        let dx = session.rng.random_range(-half..half);
        let dy = session.rng.random_range(-half..half);
        surface.translate(dx, dy);
    }

    if session.paused {
        // Frozen frame: draw from existing state, mutate nothing
        draw_world(session, surface);
        hud::draw_hud(surface, &session.state, session.viewport);
        surface.restore();
        hud::draw_pause_overlay(surface, &session.state, session.viewport);
        return;
    }

    session.index.clear();

    {
        let Session {
            state,
            ravens,
            spawner,
            rng,
            viewport,
            ..
        } = session;
        spawner.advance(dt_ms, state, ravens, rng, *viewport);
    }

    session.state.decay_combo(dt_ms);
    session.state.tick_powerups();
    session.state.tick_shake(dt_ms);
    session.state.tick_freeze(dt_ms);

    {
        let Session {
            state,
            ravens,
            explosions,
            particles,
            pickups,
            texts,
            ripples,
            bursts,
            fx,
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
        update_all(particles, dt_ms, &mut ctx);
        update_all(ravens, dt_ms, &mut ctx);
        update_all(explosions, dt_ms, &mut ctx);
        update_all(pickups, dt_ms, &mut ctx);
        update_all(texts, dt_ms, &mut ctx);
        update_all(ripples, dt_ms, &mut ctx);
        update_all(bursts, dt_ms, &mut ctx);
    }

    session.drain_fx();
    draw_world(session, surface);
    cull(session);

    hud::draw_hud(surface, &session.state, session.viewport);
    surface.restore();

    // Lives may have hit zero during this frame's update pass
    if session.state.game_over {
        hud::draw_game_over(surface, &session.state, session.viewport);
    }
}

/// Delta from the previous frame, clamped so the first frame, clock skew and
/// long stalls all advance the world by exactly one nominal frame
fn frame_delta(last_timestamp: f64, timestamp: f64) -> f32 {
    if last_timestamp <= 0.0 {
        return FRAME_MS;
    }
    let dt = (timestamp - last_timestamp) as f32;
    if dt <= 0.0 || dt > MAX_FRAME_DELTA_MS {
        FRAME_MS
    } else {
        dt
    }
}

/// Draw pass; collidable entities repaint the collision index here
fn draw_world(session: &mut Session, surface: &mut dyn Surface) {
    let index = &mut session.index;
    draw_all(&session.particles, surface, index);
    draw_all(&session.ravens, surface, index);
    draw_all(&session.explosions, surface, index);
    draw_all(&session.pickups, surface, index);
    draw_all(&session.texts, surface, index);
    draw_all(&session.ripples, surface, index);
    draw_all(&session.bursts, surface, index);
}

/// End-of-frame cull: drop every entity flagged dead during update or input
fn cull(session: &mut Session) {
    session.particles.retain(|e| !e.is_dead());
    session.ravens.retain(|e| !e.is_dead());
    session.explosions.retain(|e| !e.is_dead());
    session.pickups.retain(|e| !e.is_dead());
    session.texts.retain(|e| !e.is_dead());
    session.ripples.retain(|e| !e.is_dead());
    session.bursts.retain(|e| !e.is_dead());
}

fn update_all<E: Entity>(entities: &mut [E], dt_ms: f32, ctx: &mut Ctx<'_>) {
    for entity in entities {
        entity.update(dt_ms, ctx);
    }
}

fn draw_all<E: Entity>(
    entities: &[E],
    surface: &mut dyn Surface,
    index: &mut super::collision::CollisionIndex,
) {
    for entity in entities {
        entity.draw(surface, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::render::NullSurface;
    use crate::sim::state::Viewport;

    fn session() -> Session {
        Session::new(11, Viewport::new(800.0, 600.0), 0)
    }

    fn run_frames(session: &mut Session, input: &FrameInput, count: u32) {
        let mut surface = NullSurface;
        let mut t = session.last_timestamp;
        for _ in 0..count {
            t += FRAME_MS as f64;
            frame(session, input, t, &mut surface);
        }
    }

    #[test]
    fn test_first_frame_uses_nominal_delta() {
        assert_eq!(frame_delta(0.0, 12345.0), FRAME_MS);
    }

    #[test]
    fn test_stalled_and_backwards_deltas_clamp() {
        assert_eq!(frame_delta(1000.0, 1000.0 + MAX_FRAME_DELTA_MS as f64 + 1.0), FRAME_MS);
        assert_eq!(frame_delta(1000.0, 900.0), FRAME_MS);
        let dt = frame_delta(1000.0, 1030.0);
        assert!((dt - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_ravens_spawn_over_time() {
        let mut session = session();
        let input = FrameInput::default();
        // Two seconds at the initial interval is at least three spawns
        run_frames(&mut session, &input, 120);
        assert!(session.ravens.len() >= 3);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = session();
        let input = FrameInput::default();
        run_frames(&mut session, &input, 60);
        let score = session.state.score;
        let raven_count = session.ravens.len();
        let positions: Vec<_> = session.ravens.iter().map(|r| r.pos).collect();

        let mut surface = NullSurface;
        let t = session.last_timestamp + FRAME_MS as f64;
        frame(
            &mut session,
            &FrameInput {
                toggle_pause: true,
                ..Default::default()
            },
            t,
            &mut surface,
        );
        assert!(session.paused);

        run_frames(&mut session, &FrameInput::default(), 120);
        assert_eq!(session.state.score, score);
        assert_eq!(session.ravens.len(), raven_count);
        for (raven, pos) in session.ravens.iter().zip(&positions) {
            assert_eq!(raven.pos, *pos);
        }
    }

    #[test]
    fn test_resume_after_long_pause_has_no_catchup() {
        let mut session = session();
        run_frames(&mut session, &FrameInput::default(), 10);
        let raven_count = session.ravens.len();

        let mut surface = NullSurface;
        let t = session.last_timestamp + FRAME_MS as f64;
        frame(
            &mut session,
            &FrameInput {
                toggle_pause: true,
                ..Default::default()
            },
            t,
            &mut surface,
        );

        // Clock keeps advancing during the pause
        run_frames(&mut session, &FrameInput::default(), 300);

        let t = session.last_timestamp + FRAME_MS as f64;
        frame(
            &mut session,
            &FrameInput {
                toggle_pause: true,
                ..Default::default()
            },
            t,
            &mut surface,
        );
        assert!(!session.paused);

        // One frame after resume spawns at most one raven
        let t = session.last_timestamp + FRAME_MS as f64;
        frame(&mut session, &FrameInput::default(), t, &mut surface);
        assert!(session.ravens.len() <= raven_count + 1);
    }

    #[test]
    fn test_quit_from_pause_ends_session() {
        let mut session = session();
        run_frames(&mut session, &FrameInput::default(), 5);

        let mut surface = NullSurface;
        let t = session.last_timestamp + FRAME_MS as f64;
        frame(
            &mut session,
            &FrameInput {
                toggle_pause: true,
                ..Default::default()
            },
            t,
            &mut surface,
        );
        assert!(session.paused);

        let t = session.last_timestamp + FRAME_MS as f64;
        frame(
            &mut session,
            &FrameInput {
                quit_to_game_over: true,
                ..Default::default()
            },
            t,
            &mut surface,
        );
        assert!(session.state.game_over);
        assert!(!session.paused);
    }

    #[test]
    fn test_quit_ignored_while_playing() {
        let mut session = session();
        run_frames(&mut session, &FrameInput::default(), 5);

        let mut surface = NullSurface;
        let t = session.last_timestamp + FRAME_MS as f64;
        frame(
            &mut session,
            &FrameInput {
                quit_to_game_over: true,
                ..Default::default()
            },
            t,
            &mut surface,
        );
        assert!(!session.state.game_over);
    }

    #[test]
    fn test_pause_toggle_ignored_when_game_over() {
        let mut session = session();
        let Session { state, fx, .. } = &mut session;
        state.end_session(fx);

        let mut surface = NullSurface;
        frame(
            &mut session,
            &FrameInput {
                toggle_pause: true,
                ..Default::default()
            },
            100.0,
            &mut surface,
        );
        assert!(!session.paused);
    }

    #[test]
    fn test_dead_entities_culled_after_draw() {
        let mut session = session();
        run_frames(&mut session, &FrameInput::default(), 60);
        assert!(!session.ravens.is_empty());

        // Kill everything by pushing it past the left edge
        for raven in &mut session.ravens {
            raven.pos.x = -10_000.0;
        }
        run_frames(&mut session, &FrameInput::default(), 1);
        assert!(session.ravens.iter().all(|r| !r.dead));
    }

    #[test]
    fn test_clock_refreshes_while_paused() {
        let mut session = session();
        run_frames(&mut session, &FrameInput::default(), 5);

        let mut surface = NullSurface;
        let t = session.last_timestamp + FRAME_MS as f64;
        frame(
            &mut session,
            &FrameInput {
                toggle_pause: true,
                ..Default::default()
            },
            t,
            &mut surface,
        );
        let t = session.last_timestamp + 5000.0;
        frame(&mut session, &FrameInput::default(), t, &mut surface);
        assert_eq!(session.last_timestamp, t);
    }
}
