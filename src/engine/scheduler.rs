//! Frame timing and the ordered set of ticking tweens

use instant::Instant;

use crate::core::config::FrameTimingConfig;
use crate::engine::TweenId;

/// Measures wall-clock time between frames
pub struct FrameClock {
    last: Option<Instant>,
    timing: FrameTimingConfig,
}

impl FrameClock {
    pub fn new(timing: FrameTimingConfig) -> Self {
        Self { last: None, timing }
    }

    /// Milliseconds since the previous call, clamped by the timing config.
    /// The first call returns 0.
    pub fn delta_ms(&mut self) -> f64 {
        let now = Instant::now();
        let dt = match self.last {
            Some(previous) => now.duration_since(previous).as_secs_f64() * 1000.0,
            None => 0.0,
        };
        self.last = Some(now);
        self.timing.clamp_delta(dt)
    }

    /// Forget the previous frame, e.g. after the host was suspended.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn timing(&self) -> &FrameTimingConfig {
        &self.timing
    }
}

/// Insertion-ordered tween ids. Ids added while a tick is running are staged
/// and join the order at commit.
#[derive(Debug, Default)]
pub(crate) struct ActiveSet {
    order: Vec<TweenId>,
    staged: Vec<TweenId>,
    ticking: bool,
}

impl ActiveSet {
    pub(crate) fn insert(&mut self, id: TweenId) {
        if self.ticking {
            self.staged.push(id);
        } else {
            self.order.push(id);
        }
    }

    /// Snapshot of the ids to tick this frame.
    pub(crate) fn begin_tick(&mut self) -> Vec<TweenId> {
        self.ticking = true;
        self.order.clone()
    }

    /// End the tick: keep live ids, then append the staged ones.
    pub(crate) fn commit(&mut self, is_live: impl Fn(&TweenId) -> bool) {
        self.ticking = false;
        self.order.retain(|id| is_live(id));
        let staged = std::mem::take(&mut self.staged);
        self.order.extend(staged.into_iter().filter(|id| is_live(id)));
    }

    pub(crate) fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len() + self.staged.len()
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.staged.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_ids_wait_for_commit() {
        let mut active = ActiveSet::default();
        active.insert(TweenId(1));
        active.insert(TweenId(2));

        let snapshot = active.begin_tick();
        active.insert(TweenId(3));
        assert_eq!(snapshot, vec![TweenId(1), TweenId(2)]);
        assert_eq!(active.len(), 3);

        active.commit(|id| *id != TweenId(1));
        assert!(!active.is_ticking());
        assert_eq!(active.begin_tick(), vec![TweenId(2), TweenId(3)]);
    }

    #[test]
    fn test_clear_during_tick() {
        let mut active = ActiveSet::default();
        active.insert(TweenId(1));
        let _ = active.begin_tick();
        active.insert(TweenId(2));
        active.clear();
        active.commit(|_| true);
        assert_eq!(active.len(), 0);
    }

    #[test]
    fn test_first_frame_delta_is_zero() {
        let mut clock = FrameClock::new(FrameTimingConfig::default());
        assert_eq!(clock.delta_ms(), 0.0);
        let dt = clock.delta_ms();
        assert!(dt >= 0.0 && dt <= clock.timing().max_frame_delta_ms);
        clock.reset();
        assert_eq!(clock.delta_ms(), 0.0);
    }
}
