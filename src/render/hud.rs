//! HUD, pause overlay and terminal screen
//!
//! Pure draw code over `Surface`; reads the state machine, mutates nothing.

use crate::consts::{COMBO_WINDOW_MS, MAX_LIVES, POWERUP_DURATION_MS};
use crate::render::{Color, Surface, TextAlign};
use crate::sim::state::{EffectState, Viewport};

const PANEL_BG: Color = Color::rgba(0, 0, 0, 0.5);
const OVERLAY_BG: Color = Color::rgba(0, 0, 0, 0.7);

pub fn draw_hud(surface: &mut dyn Surface, state: &EffectState, viewport: Viewport) {
    // Score with a hard drop shadow
    let score = format!("Score: {}", state.score);
    surface.fill_text(&score, 53.0, 83.0, 50.0, Color::BLACK, TextAlign::Left);
    surface.fill_text(&score, 50.0, 80.0, 50.0, Color::WHITE, TextAlign::Left);

    surface.fill_text(
        &format!("Level: {}", state.difficulty_level),
        50.0,
        120.0,
        24.0,
        Color::CYAN,
        TextAlign::Left,
    );

    // Hearts, right to left; spent lives stay as gray sockets
    for i in 0..MAX_LIVES {
        let x = viewport.width - 50.0 - i as f32 * 40.0;
        let color = if i < state.lives { Color::RED } else { Color::GRAY };
        surface.fill_text("♥", x, 60.0, 32.0, color, TextAlign::Center);
    }

    surface.fill_text(
        &format!("Best: {}", state.high_score),
        viewport.width - 50.0,
        110.0,
        24.0,
        Color::GOLD,
        TextAlign::Right,
    );

    if state.combo > 1 {
        draw_combo_banner(surface, state, viewport);
    }
    draw_powerup_icons(surface, state, viewport);
    draw_stats_panel(surface, state, 50.0, 160.0);
}

fn draw_combo_banner(surface: &mut dyn Surface, state: &EffectState, viewport: Viewport) {
    let cx = viewport.width / 2.0;
    let banner = format!("COMBO x{}", state.combo_multiplier);
    surface.fill_text(&banner, cx + 3.0, 83.0, 60.0, Color::BLACK, TextAlign::Center);
    surface.fill_text(&banner, cx, 80.0, 60.0, Color::YELLOW, TextAlign::Center);

    // Decay bar drains over the combo window
    let ratio = (state.combo_timer_ms / COMBO_WINDOW_MS).clamp(0.0, 1.0);
    surface.fill_rect(cx - 100.0, 95.0, 200.0, 10.0, Color::GRAY);
    surface.fill_rect(cx - 100.0, 95.0, 200.0 * ratio, 10.0, Color::YELLOW);
}

fn draw_powerup_icons(surface: &mut dyn Surface, state: &EffectState, viewport: Viewport) {
    for (i, (kind, expiry_ms)) in state.powerups.iter().enumerate() {
        let y = viewport.height - 60.0 - i as f32 * 50.0;
        let remaining = (expiry_ms - state.now_ms).max(0.0);

        surface.save();
        // Blink during the last second
        if remaining < 1000.0 && ((state.now_ms / 100.0) as u64).is_multiple_of(2) {
            surface.set_alpha(0.4);
        }
        surface.fill_text(kind.icon(), 50.0, y, 40.0, kind.color(), TextAlign::Left);

        let ratio = (remaining / POWERUP_DURATION_MS).clamp(0.0, 1.0) as f32;
        surface.fill_rect(90.0, y - 14.0, 60.0, 8.0, Color::GRAY);
        surface.fill_rect(90.0, y - 14.0, 60.0 * ratio, 8.0, kind.color());
        surface.restore();
    }
}

fn draw_stats_panel(surface: &mut dyn Surface, state: &EffectState, x: f32, y: f32) {
    surface.fill_rect(x, y, 220.0, 130.0, PANEL_BG);
    surface.fill_text("STATS", x + 10.0, y + 25.0, 20.0, Color::WHITE, TextAlign::Left);

    let lines = [
        format!("Accuracy: {}%", state.stats.accuracy),
        format!("Kills: {}", state.stats.kills),
        format!("Best Combo: {}", state.stats.best_combo),
        format!("Hits: {} / {}", state.stats.hits, state.stats.shots_fired),
    ];
    for (i, line) in lines.iter().enumerate() {
        surface.fill_text(
            line,
            x + 10.0,
            y + 50.0 + i as f32 * 22.0,
            16.0,
            Color::SILVER,
            TextAlign::Left,
        );
    }
}

pub fn draw_pause_overlay(surface: &mut dyn Surface, state: &EffectState, viewport: Viewport) {
    surface.fill_rect(0.0, 0.0, viewport.width, viewport.height, OVERLAY_BG);
    let cx = viewport.width / 2.0;
    let cy = viewport.height / 2.0;

    surface.fill_text("PAUSED", cx, cy - 40.0, 100.0, Color::WHITE, TextAlign::Center);
    surface.fill_text(
        &format!("Score: {}", state.score),
        cx,
        cy + 20.0,
        30.0,
        Color::SILVER,
        TextAlign::Center,
    );
    surface.fill_text(
        "Space to resume",
        cx,
        cy + 60.0,
        24.0,
        Color::GRAY,
        TextAlign::Center,
    );
    surface.fill_text(
        "Escape to quit",
        cx,
        cy + 90.0,
        24.0,
        Color::GRAY,
        TextAlign::Center,
    );
}

pub fn draw_game_over(surface: &mut dyn Surface, state: &EffectState, viewport: Viewport) {
    surface.fill_rect(0.0, 0.0, viewport.width, viewport.height, OVERLAY_BG);
    let cx = viewport.width / 2.0;
    let cy = viewport.height / 2.0;

    surface.fill_text("GAME OVER", cx + 3.0, cy - 117.0, 80.0, Color::BLACK, TextAlign::Center);
    surface.fill_text("GAME OVER", cx, cy - 120.0, 80.0, Color::RED, TextAlign::Center);

    surface.fill_text(
        &format!("Final Score: {}", state.score),
        cx,
        cy - 50.0,
        40.0,
        Color::WHITE,
        TextAlign::Center,
    );

    // The high score was folded when the session ended
    if state.score > 0 && state.score == state.high_score {
        surface.fill_text("NEW HIGH SCORE!", cx, cy, 34.0, Color::GOLD, TextAlign::Center);
    } else {
        surface.fill_text(
            &format!("High Score: {}", state.high_score),
            cx,
            cy,
            28.0,
            Color::GRAY,
            TextAlign::Center,
        );
    }

    let lines = [
        format!("Accuracy: {}%", state.stats.accuracy),
        format!("Kills: {}", state.stats.kills),
        format!("Best Combo: {}", state.stats.best_combo),
    ];
    for (i, line) in lines.iter().enumerate() {
        surface.fill_text(
            line,
            cx,
            cy + 50.0 + i as f32 * 28.0,
            20.0,
            Color::SILVER,
            TextAlign::Center,
        );
    }

    surface.fill_text(
        "Click to restart",
        cx,
        cy + 160.0,
        26.0,
        Color::YELLOW,
        TextAlign::Center,
    );
}
