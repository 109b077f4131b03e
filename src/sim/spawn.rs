//! Timed spawner
//!
//! Accumulates frame deltas and emits at most one raven per tick once the
//! state machine's current spawn interval has elapsed. The accumulator resets
//! to zero rather than carrying the remainder, so a long stall produces one
//! spawn, not a backlog.

use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::Raven;
use super::state::{EffectState, RavenKind, Viewport};

#[derive(Debug, Default)]
pub struct Spawner {
    elapsed_ms: f32,
}

impl Spawner {
    /// Advance the spawn timer; pushes a new raven when the interval elapses.
    ///
    /// The collection is re-sorted by width after a spawn so larger ravens
    /// draw (and therefore hit-test) in front of smaller ones.
    pub fn advance(
        &mut self,
        dt_ms: f32,
        state: &EffectState,
        ravens: &mut Vec<Raven>,
        rng: &mut Pcg32,
        viewport: Viewport,
    ) {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms > state.spawn_interval_ms {
            let kind = roll_raven_kind(rng);
            ravens.push(Raven::spawn(kind, rng, viewport, state.speed_multiplier));
            ravens.sort_by(|a, b| a.width.total_cmp(&b.width));
            self.elapsed_ms = 0.0;
        }
    }
}

/// Weighted draw over the kind table; the weights sum to one, the fallback
/// only guards float rounding
pub fn roll_raven_kind(rng: &mut Pcg32) -> RavenKind {
    let roll = rng.random::<f32>();
    let mut cumulative = 0.0;
    for kind in RavenKind::ALL {
        cumulative += kind.props().weight;
        if roll < cumulative {
            return kind;
        }
    }
    RavenKind::Normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut spawner = Spawner::default();
        let state = EffectState::new(0);
        let mut ravens = Vec::new();
        let mut rng = Pcg32::seed_from_u64(1);

        spawner.advance(state.spawn_interval_ms - 1.0, &state, &mut ravens, &mut rng, viewport());
        assert!(ravens.is_empty());
        spawner.advance(2.0, &state, &mut ravens, &mut rng, viewport());
        assert_eq!(ravens.len(), 1);
    }

    #[test]
    fn test_single_spawn_per_tick_even_after_stall() {
        let mut spawner = Spawner::default();
        let state = EffectState::new(0);
        let mut ravens = Vec::new();
        let mut rng = Pcg32::seed_from_u64(2);

        // Ten intervals' worth of time in one tick still yields one spawn
        spawner.advance(state.spawn_interval_ms * 10.0, &state, &mut ravens, &mut rng, viewport());
        assert_eq!(ravens.len(), 1);

        // And the accumulator restarted from zero
        spawner.advance(state.spawn_interval_ms - 1.0, &state, &mut ravens, &mut rng, viewport());
        assert_eq!(ravens.len(), 1);
    }

    #[test]
    fn test_spawned_ravens_sorted_by_width() {
        let mut spawner = Spawner::default();
        let state = EffectState::new(0);
        let mut ravens = Vec::new();
        let mut rng = Pcg32::seed_from_u64(3);

        for _ in 0..8 {
            spawner.advance(state.spawn_interval_ms + 1.0, &state, &mut ravens, &mut rng, viewport());
        }
        assert_eq!(ravens.len(), 8);
        for pair in ravens.windows(2) {
            assert!(pair[0].width <= pair[1].width);
        }
    }

    #[test]
    fn test_roll_covers_every_kind() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut seen = [false; 5];
        for _ in 0..2000 {
            let kind = roll_raven_kind(&mut rng);
            let idx = RavenKind::ALL.iter().position(|k| *k == kind).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
