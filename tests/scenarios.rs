//! End-to-end session tests driving the frame loop and pointer input the way
//! the platform layer does, against a null drawing surface.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use raven_mayhem::consts::*;
use raven_mayhem::render::NullSurface;
use raven_mayhem::sim::{
    frame, pointer_down, FrameInput, Raven, RavenKind, Session, Viewport,
};

fn new_session(seed: u64) -> Session {
    Session::new(seed, Viewport::new(800.0, 600.0), 0)
}

/// Advance whole nominal frames
fn run_frames(session: &mut Session, count: u32) {
    let input = FrameInput::default();
    let mut surface = NullSurface;
    let mut t = session.last_timestamp;
    for _ in 0..count {
        t += FRAME_MS as f64;
        frame(session, &input, t, &mut surface);
    }
}

/// A stationary raven the tests can click reliably; the collision index picks
/// it up on the next frame's draw pass
fn plant_raven(session: &mut Session, x: f32, y: f32) -> Vec2 {
    let mut rng = Pcg32::seed_from_u64(session.ravens.len() as u64 + 77);
    let mut raven = Raven::spawn(RavenKind::Normal, &mut rng, session.viewport, 1.0);
    raven.pos = Vec2::new(x, y);
    raven.base_vel = Vec2::ZERO;
    raven.has_trail = false;
    let center = raven.pos + Vec2::new(raven.width / 2.0, raven.height / 2.0);
    session.ravens.push(raven);
    center
}

#[test]
fn three_escapes_end_the_session_on_the_same_frame() {
    let mut session = new_session(1);
    assert_eq!(session.state.lives, INITIAL_LIVES);

    // Three ravens already past the left edge all escape on the next frame
    for i in 0..3 {
        plant_raven(&mut session, 0.0, 100.0 + i as f32 * 120.0);
        let idx = session.ravens.len() - 1;
        session.ravens[idx].pos.x = -session.ravens[idx].width - 1.0;
    }
    run_frames(&mut session, 1);

    assert_eq!(session.state.lives, 0);
    assert!(session.state.game_over);
    // Escaped ravens were culled that same frame
    assert!(session.ravens.is_empty());
}

#[test]
fn combo_survives_inside_the_window_and_decays_after_it() {
    let mut session = new_session(2);
    session.state.spawn_interval_ms = f32::MAX; // keep the sky controlled

    let first = plant_raven(&mut session, 200.0, 100.0);
    let second = plant_raven(&mut session, 500.0, 350.0);
    run_frames(&mut session, 1); // paint the index

    pointer_down(&mut session, first.x, first.y);
    assert_eq!(session.state.combo, 1);

    // Just under the window: combo chains
    let frames_inside = (COMBO_WINDOW_MS / FRAME_MS) as u32 - 10;
    run_frames(&mut session, frames_inside);
    assert_eq!(session.state.combo, 1);

    pointer_down(&mut session, second.x, second.y);
    assert_eq!(session.state.combo, 2);
    assert_eq!(session.state.combo_multiplier, 2);

    // Past the window with no kills: silent reset
    let frames_past = (COMBO_WINDOW_MS / FRAME_MS) as u32 + 10;
    run_frames(&mut session, frames_past);
    assert_eq!(session.state.combo, 0);
    assert_eq!(session.state.combo_multiplier, 1);
    // Decay is not a miss
    assert_eq!(session.state.stats.misses, 0);
}

#[test]
fn crossing_the_score_threshold_raises_difficulty_once() {
    let mut session = new_session(3);
    session.state.spawn_interval_ms = f32::MAX;
    session.state.score = DIFFICULTY_SCORE_THRESHOLD - 1;

    let first = plant_raven(&mut session, 200.0, 100.0);
    let second = plant_raven(&mut session, 500.0, 350.0);
    run_frames(&mut session, 1);

    assert_eq!(session.state.difficulty_level, 1);
    pointer_down(&mut session, first.x, first.y);
    assert_eq!(session.state.score, DIFFICULTY_SCORE_THRESHOLD);
    assert_eq!(session.state.difficulty_level, 2);
    assert_eq!(
        session.state.spawn_interval_ms,
        INITIAL_SPAWN_INTERVAL_MS - SPAWN_INTERVAL_STEP_MS
    );
    assert!((session.state.speed_multiplier - (1.0 + SPEED_PER_LEVEL)).abs() < 1e-5);

    // The next kill stays below the next threshold: no further raise
    run_frames(&mut session, 1);
    pointer_down(&mut session, second.x, second.y);
    assert_eq!(session.state.difficulty_level, 2);
}

#[test]
fn restart_resets_everything_but_keeps_the_high_score() {
    let mut session = new_session(4);

    // Score a kill, then lose all lives
    let center = plant_raven(&mut session, 300.0, 200.0);
    run_frames(&mut session, 1);
    pointer_down(&mut session, center.x, center.y);
    assert!(session.state.score > 0);

    for _ in 0..INITIAL_LIVES {
        let idx = {
            plant_raven(&mut session, 100.0, 100.0);
            session.ravens.len() - 1
        };
        session.ravens[idx].pos.x = -session.ravens[idx].width - 1.0;
        run_frames(&mut session, 1);
    }
    assert!(session.state.game_over);
    let best = session.state.high_score;
    assert!(best > 0);

    // The click on the terminal screen restarts
    let restarted = pointer_down(&mut session, 10.0, 10.0);
    assert!(restarted);
    assert!(!session.state.game_over);
    assert_eq!(session.state.score, 0);
    assert_eq!(session.state.lives, INITIAL_LIVES);
    assert_eq!(session.state.combo, 0);
    assert_eq!(session.state.difficulty_level, 1);
    assert_eq!(session.state.high_score, best);
    assert!(session.ravens.is_empty());
    assert!(session.explosions.is_empty());
    assert!(session.particles.is_empty());
    assert!(session.pickups.is_empty());
    assert!(session.texts.is_empty());
    assert!(session.ripples.is_empty());
    assert!(session.bursts.is_empty());
    assert!(session.state.stats.shots_fired == 0);
}

#[test]
fn long_session_smoke_run_stays_consistent() {
    let mut session = new_session(5);

    // A minute of frames with periodic clicks at the viewport center
    let input = FrameInput::default();
    let mut surface = NullSurface;
    let mut t = 0.0;
    for i in 0..3600u32 {
        t += FRAME_MS as f64;
        frame(&mut session, &input, t, &mut surface);
        if i % 30 == 0 && !session.state.game_over {
            pointer_down(&mut session, 400.0, 300.0);
        }
    }

    let stats = session.state.stats;
    assert!(stats.kills as u64 <= session.state.score);
    assert!(stats.hits <= stats.shots_fired);
    assert!(stats.misses <= stats.shots_fired);
    assert!(stats.accuracy <= 100);
    assert!(session.state.lives <= MAX_LIVES);
    assert!(session.state.difficulty_level >= 1);
    assert!(session.state.spawn_interval_ms >= MIN_SPAWN_INTERVAL_MS);
}
