//! The tween engine: scheduling, sequencing, registry and cancellation
//!
//! Everything is single-threaded. A host drives the engine by calling
//! [`TweenEngine::tick`] (or [`TweenEngine::update`]) once per frame; all
//! target mutation, completion callbacks and sequence advancement happen
//! inside that call or inside the call that submitted the animation.
//!
//! Callbacks receive `&mut TweenEngine`, so they may start new animations,
//! cancel others or call [`TweenEngine::kill_all`]. To make that safe a tween
//! is taken out of the engine's tables while it is being processed, and
//! tweens started during a tick only join the active order once the tick has
//! finished.

pub mod events;
pub mod registry;
pub mod scheduler;

use std::{cell::RefCell, fmt, rc::Rc};

use crossbeam_channel::Receiver;
use fxhash::FxHashMap;

use crate::animation::{
    sequence::{Sequence, SequenceMode, SequenceSpec, Step},
    tweening::{TickStatus, Tween, TweenSpec, TweenState},
};
use crate::core::config::{EngineOptions, EngineProfile};
use crate::{Result, TweenError};

use events::{AnimationEvent, Completion, EventBus, Outcome};
use registry::{Registry, TargetId};
use scheduler::{ActiveSet, FrameClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(pub(crate) u64);

/// Identifies a submitted tween or sequence. Never reused by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Handle {
    Tween(TweenId),
    Sequence(SequenceId),
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Tween(id) => write!(f, "tween#{}", id.0),
            Handle::Sequence(id) => write!(f, "sequence#{}", id.0),
        }
    }
}

/// Frame-driven tweening engine
pub struct TweenEngine {
    options: EngineOptions,
    tweens: FxHashMap<TweenId, Tween>,
    sequences: FxHashMap<SequenceId, Sequence>,
    active: ActiveSet,
    registry: Registry,
    events: EventBus,
    clock: FrameClock,
    next_id: u64,
    frame: u64,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_profile(profile: EngineProfile) -> Self {
        Self::with_options(profile.resolve())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            events: EventBus::new(options.diagnostics.event_buffer),
            clock: FrameClock::new(options.frame.clone()),
            options,
            tweens: FxHashMap::default(),
            sequences: FxHashMap::default(),
            active: ActiveSet::default(),
            registry: Registry::default(),
            next_id: 1,
            frame: 0,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Number of ticks processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Submit a single tween. It starts immediately and first moves on the
    /// next tick.
    ///
    /// Fails without touching the engine if the duration is zero, a name
    /// does not resolve, or the start values cannot be read.
    pub fn start(&mut self, spec: TweenSpec) -> Result<Handle> {
        if spec.duration() == 0 {
            return Err(TweenError::InvalidDuration(0));
        }
        spec.validate()?;
        let id = self.launch_tween(spec, None, 0.0)?;
        Ok(Handle::Tween(id))
    }

    /// Submit a serial or parallel sequence.
    ///
    /// Every nested name is checked before anything starts. Start values of
    /// later steps are read when the step launches; if that fails the step
    /// counts as cancelled.
    pub fn sequence(&mut self, spec: SequenceSpec) -> Result<Handle> {
        spec.validate()?;
        let id = self.launch_sequence(spec, None, 0.0);
        Ok(Handle::Sequence(id))
    }

    /// Advance every active tween by `dt_ms`.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.active.is_ticking() {
            log::warn!("tick() called from inside a tick, ignoring");
            return;
        }
        self.frame += 1;

        let snapshot = self.active.begin_tick();
        if self.options.diagnostics.log_frames {
            log::trace!(
                "frame {}: dt={:.2}ms tweens={} sequences={}",
                self.frame,
                dt_ms,
                snapshot.len(),
                self.sequences.len()
            );
        }

        for id in snapshot {
            self.run_tween(id, dt_ms);
        }

        let tweens = &self.tweens;
        self.active.commit(|id| tweens.contains_key(id));
    }

    /// Tick with the wall-clock time since the previous `update`. Returns
    /// the delta used.
    pub fn update(&mut self) -> f64 {
        let dt = self.clock.delta_ms();
        self.tick(dt);
        dt
    }

    /// Cancel one tween or sequence. Returns `false` if it was not active.
    pub fn cancel(&mut self, handle: Handle) -> bool {
        match handle {
            Handle::Tween(id) => match self.tweens.remove(&id) {
                Some(tween) => {
                    self.abort_tween(tween, None);
                    true
                }
                None => false,
            },
            Handle::Sequence(id) => self.cancel_sequence(id),
        }
    }

    /// Cancel every animation registered for `target`, including whole
    /// sequences that touched it. Returns how many were cancelled.
    pub fn kill_target<T: ?Sized>(&mut self, target: &Rc<RefCell<T>>) -> usize {
        let handles = self.registry.handles(TargetId::of_rc(target));
        handles.into_iter().filter(|h| self.cancel(*h)).count()
    }

    /// Cancel everything without firing completion callbacks and empty the
    /// registry. Safe to call from inside a callback.
    pub fn kill_all(&mut self) {
        let tweens = self.tweens.len();
        let sequences = self.sequences.len();
        if tweens == 0 && sequences == 0 {
            self.registry.clear();
            return;
        }

        let mut roots: Vec<SequenceId> = self
            .sequences
            .iter()
            .filter(|(_, sequence)| sequence.parent.is_none())
            .map(|(id, _)| *id)
            .collect();
        roots.sort();
        for id in roots {
            self.cancel_sequence(id);
        }

        let mut remaining: Vec<TweenId> = self.tweens.keys().copied().collect();
        remaining.sort();
        for id in remaining {
            self.cancel(Handle::Tween(id));
        }

        // parents already gone mid-conclusion
        let orphans: Vec<SequenceId> = self.sequences.keys().copied().collect();
        for id in orphans {
            self.cancel_sequence(id);
        }

        self.registry.clear();
        self.active.clear();
        log::info!(
            "kill_all cancelled {} tweens and {} sequences",
            tweens,
            sequences
        );
    }

    /// Freeze a tween, or every running step of a sequence.
    pub fn pause(&mut self, handle: Handle) -> bool {
        self.set_paused(handle, true)
    }

    pub fn resume(&mut self, handle: Handle) -> bool {
        self.set_paused(handle, false)
    }

    /// A future resolving when `handle` completes or is cancelled; `None` if
    /// it already ended.
    pub fn completion(&mut self, handle: Handle) -> Option<Completion> {
        match handle {
            Handle::Tween(id) => self.tweens.get_mut(&id).map(|t| t.notifier.subscribe()),
            Handle::Sequence(id) => self
                .sequences
                .get_mut(&id)
                .map(|s| s.notifier.subscribe()),
        }
    }

    /// Receive lifecycle events of every animation from now on.
    pub fn subscribe(&mut self) -> Receiver<AnimationEvent> {
        self.events.subscribe()
    }

    pub fn is_active(&self, handle: Handle) -> bool {
        match handle {
            Handle::Tween(id) => self.tweens.contains_key(&id),
            Handle::Sequence(id) => self.sequences.contains_key(&id),
        }
    }

    pub fn is_paused(&self, handle: Handle) -> bool {
        match handle {
            Handle::Tween(id) => self.tweens.get(&id).map_or(false, Tween::is_paused),
            Handle::Sequence(id) => self.sequences.get(&id).map_or(false, |s| s.paused),
        }
    }

    /// Progress of an active tween (elapsed over duration) or sequence
    /// (completed steps over total steps).
    pub fn progress(&self, handle: Handle) -> Option<f64> {
        match handle {
            Handle::Tween(id) => self.tweens.get(&id).map(Tween::progress),
            Handle::Sequence(id) => self.sequences.get(&id).map(Sequence::progress),
        }
    }

    pub fn tween_state(&self, id: TweenId) -> Option<TweenState> {
        self.tweens.get(&id).map(Tween::state)
    }

    pub fn is_animating<T: ?Sized>(&self, target: &Rc<RefCell<T>>) -> bool {
        self.registry.contains(TargetId::of_rc(target))
    }

    pub fn active_handles<T: ?Sized>(&self, target: &Rc<RefCell<T>>) -> Vec<Handle> {
        self.registry.handles(TargetId::of_rc(target))
    }

    pub fn active_tween_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn active_sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Number of targets with at least one registered animation.
    pub fn animated_target_count(&self) -> usize {
        self.registry.target_count()
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty() && self.sequences.is_empty() && self.registry.is_empty()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// `credit_ms` is time the previous serial step ran past its end.
    fn launch_tween(
        &mut self,
        spec: TweenSpec,
        owner: Option<SequenceId>,
        credit_ms: f64,
    ) -> Result<TweenId> {
        let id = TweenId(self.allocate_id());
        let mut tween = Tween::new(id, spec, &self.options.defaults, owner)?;
        tween.start()?;
        tween.credit(credit_ms);

        let handle = Handle::Tween(id);
        let target = tween.target_id();
        self.registry.register(target, handle);
        let mut ancestor = owner;
        while let Some(sequence_id) = ancestor {
            self.registry.register(target, Handle::Sequence(sequence_id));
            let Some(sequence) = self.sequences.get_mut(&sequence_id) else {
                break;
            };
            if sequence.paused {
                tween.set_paused(true);
            }
            if Some(sequence_id) == owner {
                sequence.live.push(handle);
            }
            ancestor = sequence.parent;
        }

        let instant = tween.duration_ms() == 0.0;
        log::debug!("{} started on {:?}", handle, target);
        self.tweens.insert(id, tween);
        self.active.insert(id);
        self.events.emit(AnimationEvent::Started(handle));

        if instant {
            self.run_tween(id, 0.0);
        }
        Ok(id)
    }

    fn launch_sequence(
        &mut self,
        spec: SequenceSpec,
        parent: Option<SequenceId>,
        credit_ms: f64,
    ) -> SequenceId {
        let id = SequenceId(self.allocate_id());
        let handle = Handle::Sequence(id);
        let mut sequence = Sequence::new(spec, parent);
        sequence.credit(credit_ms);

        if let Some(parent) = parent.and_then(|p| self.sequences.get_mut(&p)) {
            parent.live.push(handle);
            sequence.paused = parent.paused;
        }
        log::debug!(
            "{} started ({:?}, {} steps)",
            handle,
            sequence.mode,
            sequence.total
        );
        self.sequences.insert(id, sequence);
        self.events.emit(AnimationEvent::Started(handle));

        self.advance(id);
        id
    }

    fn launch_step(&mut self, sequence_id: SequenceId, step: Step, credit_ms: f64) {
        match step {
            Step::Tween(spec) => {
                if let Err(err) = self.launch_tween(spec, Some(sequence_id), credit_ms) {
                    log::warn!(
                        "{} step failed to start: {}",
                        Handle::Sequence(sequence_id),
                        err
                    );
                    self.step_ended(sequence_id, None, Outcome::Cancelled, 0.0);
                }
            }
            Step::Sequence(spec) => {
                self.launch_sequence(spec, Some(sequence_id), credit_ms);
            }
        }
    }

    /// Launch whatever the sequence is ready for, or conclude it.
    ///
    /// Serial steps that finish while being launched are followed in a loop
    /// rather than by recursion, so long chains of instant steps stay flat.
    fn advance(&mut self, id: SequenceId) {
        let Some(sequence) = self.sequences.get_mut(&id) else {
            return;
        };
        if sequence.launching {
            return;
        }

        if sequence.is_settled() {
            self.conclude(id);
            return;
        }

        let mode = sequence.mode;
        if sequence.pending.is_empty()
            || (mode == SequenceMode::Serial && !sequence.live.is_empty())
        {
            return;
        }

        sequence.launching = true;
        // every parallel step starts from the same point
        let shared_credit = match mode {
            SequenceMode::Parallel => sequence.take_carry(),
            SequenceMode::Serial => 0.0,
        };
        loop {
            let Some(sequence) = self.sequences.get_mut(&id) else {
                // cancelled by a step or a callback
                return;
            };
            if mode == SequenceMode::Serial && !sequence.live.is_empty() {
                break;
            }
            let Some(step) = sequence.pending.pop_front() else {
                break;
            };
            let credit = match mode {
                SequenceMode::Serial => sequence.take_carry(),
                SequenceMode::Parallel => shared_credit,
            };
            self.launch_step(id, step, credit);
        }

        if let Some(sequence) = self.sequences.get_mut(&id) {
            sequence.launching = false;
            if sequence.is_settled() {
                self.conclude(id);
            }
        }
    }

    /// A step of `id` finished; `step` is `None` if it never launched.
    /// `overshoot_ms` is how far a completed step ran past its end.
    fn step_ended(
        &mut self,
        id: SequenceId,
        step: Option<Handle>,
        outcome: Outcome,
        overshoot_ms: f64,
    ) {
        let frame = self.frame;
        let Some(sequence) = self.sequences.get_mut(&id) else {
            return;
        };
        if let Some(step) = step {
            sequence.release(step);
        }

        match (outcome, sequence.mode) {
            (Outcome::Completed, _) => {
                sequence.completed += 1;
                sequence.record_overshoot(frame, overshoot_ms);
            }
            (Outcome::Cancelled, SequenceMode::Serial) => {
                self.cancel_sequence(id);
                return;
            }
            (Outcome::Cancelled, SequenceMode::Parallel) => {
                sequence.broken = true;
            }
        }
        self.advance(id);
    }

    /// Every step has finished.
    fn conclude(&mut self, id: SequenceId) {
        let Some(mut sequence) = self.sequences.remove(&id) else {
            return;
        };
        let handle = Handle::Sequence(id);
        self.registry.forget(handle);

        let outcome = if sequence.broken {
            log::debug!("{} ended with cancelled steps", handle);
            sequence.notifier.resolve(Outcome::Cancelled);
            self.events.emit(AnimationEvent::Cancelled(handle));
            Outcome::Cancelled
        } else {
            log::debug!("{} completed", handle);
            sequence.notifier.resolve(Outcome::Completed);
            self.events.emit(AnimationEvent::Completed(handle));
            if let Some(on_complete) = sequence.on_complete.take() {
                on_complete(self);
            }
            Outcome::Completed
        };

        if let Some(parent) = sequence.parent {
            self.step_ended(parent, Some(handle), outcome, sequence.carry_ms());
        }
    }

    fn cancel_sequence(&mut self, id: SequenceId) -> bool {
        let Some(mut sequence) = self.sequences.remove(&id) else {
            return false;
        };
        let handle = Handle::Sequence(id);
        sequence.pending.clear();

        // children look their owner up and find nothing
        for child in std::mem::take(&mut sequence.live) {
            self.cancel(child);
        }

        self.registry.forget(handle);
        log::debug!("{} cancelled", handle);
        sequence.notifier.resolve(Outcome::Cancelled);
        self.events.emit(AnimationEvent::Cancelled(handle));

        if let Some(parent) = sequence.parent {
            self.step_ended(parent, Some(handle), Outcome::Cancelled, 0.0);
        }
        true
    }

    fn run_tween(&mut self, id: TweenId, dt_ms: f64) {
        let Some(mut tween) = self.tweens.remove(&id) else {
            return;
        };
        match tween.tick(dt_ms) {
            Ok(TickStatus::Idle | TickStatus::Running) => {
                self.tweens.insert(id, tween);
            }
            Ok(TickStatus::Completed) => self.finish_tween(tween),
            Err(TweenError::StaleTarget) => {
                log::debug!("{} target dropped, cancelling", Handle::Tween(id));
                self.abort_tween(tween, None);
            }
            Err(err) => {
                log::warn!("{} failed: {}", Handle::Tween(id), err);
                self.abort_tween(tween, Some(err.to_string()));
            }
        }
    }

    fn finish_tween(&mut self, mut tween: Tween) {
        let handle = Handle::Tween(tween.id());
        self.registry.forget(handle);
        log::debug!("{} completed", handle);

        tween.notifier.resolve(Outcome::Completed);
        self.events.emit(AnimationEvent::Completed(handle));
        if let Some(on_complete) = tween.on_complete.take() {
            on_complete(self);
        }
        if let Some(owner) = tween.owner {
            self.step_ended(owner, Some(handle), Outcome::Completed, tween.overshoot_ms());
        }
    }

    /// Retire a tween already taken out of the table without completing it.
    fn abort_tween(&mut self, mut tween: Tween, failure: Option<String>) {
        let handle = Handle::Tween(tween.id());
        tween.cancel();
        self.registry.forget(handle);

        tween.notifier.resolve(Outcome::Cancelled);
        match failure {
            Some(reason) => self.events.emit(AnimationEvent::Failed { handle, reason }),
            None => {
                log::debug!("{} cancelled", handle);
                self.events.emit(AnimationEvent::Cancelled(handle));
            }
        }
        if let Some(owner) = tween.owner {
            self.step_ended(owner, Some(handle), Outcome::Cancelled, 0.0);
        }
    }

    fn set_paused(&mut self, handle: Handle, paused: bool) -> bool {
        match handle {
            Handle::Tween(id) => match self.tweens.get_mut(&id) {
                Some(tween) => {
                    tween.set_paused(paused);
                    true
                }
                None => false,
            },
            Handle::Sequence(id) => {
                let Some(sequence) = self.sequences.get_mut(&id) else {
                    return false;
                };
                sequence.paused = paused;
                for child in sequence.live.clone() {
                    self.set_paused(child, paused);
                }
                true
            }
        }
    }
}

impl Default for TweenEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TweenEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenEngine")
            .field("frame", &self.frame)
            .field("tweens", &self.tweens.len())
            .field("sequences", &self.sequences.len())
            .field("scheduled", &self.active.len())
            .field("targets", &self.registry.target_count())
            .field("subscribers", &self.events.subscriber_count())
            .finish()
    }
}
