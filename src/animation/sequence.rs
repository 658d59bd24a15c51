//! Serial and parallel composition of tweens
//!
//! A [`SequenceSpec`] is an ordered list of steps, each a tween or a nested
//! sequence. Serial sequences launch one step at a time and advance when the
//! running step completes; parallel sequences launch every step at once and
//! complete when all of them have.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::animation::tweening::{CompletionCallback, TweenSpec};
use crate::engine::{events::Notifier, Handle, SequenceId, TweenEngine};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SequenceMode {
    #[default]
    Serial,
    Parallel,
}

/// One element of a sequence
pub enum Step {
    Tween(TweenSpec),
    Sequence(SequenceSpec),
}

impl Step {
    fn validate(&self) -> Result<()> {
        match self {
            Step::Tween(spec) => spec.validate(),
            Step::Sequence(spec) => spec.validate(),
        }
    }
}

impl From<TweenSpec> for Step {
    fn from(spec: TweenSpec) -> Self {
        Step::Tween(spec)
    }
}

impl From<SequenceSpec> for Step {
    fn from(spec: SequenceSpec) -> Self {
        Step::Sequence(spec)
    }
}

/// Description of a sequence before it is submitted to an engine
pub struct SequenceSpec {
    mode: SequenceMode,
    steps: Vec<Step>,
    on_complete: Option<CompletionCallback>,
}

impl SequenceSpec {
    pub fn new(mode: SequenceMode) -> Self {
        Self {
            mode,
            steps: Vec::new(),
            on_complete: None,
        }
    }

    pub fn serial() -> Self {
        Self::new(SequenceMode::Serial)
    }

    pub fn parallel() -> Self {
        Self::new(SequenceMode::Parallel)
    }

    pub fn step(mut self, step: impl Into<Step>) -> Self {
        self.steps.push(step.into());
        self
    }

    pub fn steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        self.steps.extend(steps.into_iter().map(Into::into));
        self
    }

    /// Runs once when every step has completed. Never runs if a step is
    /// cancelled.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut TweenEngine) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn mode(&self) -> SequenceMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check every nested step up front so a bad name never surfaces halfway
    /// through a running sequence.
    pub(crate) fn validate(&self) -> Result<()> {
        self.steps.iter().try_for_each(Step::validate)
    }
}

/// Runtime state of a submitted sequence
pub(crate) struct Sequence {
    pub(crate) mode: SequenceMode,
    pub(crate) pending: VecDeque<Step>,
    /// Steps launched and not yet finished
    pub(crate) live: Vec<Handle>,
    pub(crate) total: usize,
    pub(crate) completed: usize,
    /// A step was cancelled; the sequence will not complete.
    pub(crate) broken: bool,
    pub(crate) paused: bool,
    /// Steps are being launched; completions must not advance or conclude.
    pub(crate) launching: bool,
    /// How far the last finished step ran past its end
    carry_ms: f64,
    carry_frame: Option<u64>,
    pub(crate) parent: Option<SequenceId>,
    pub(crate) on_complete: Option<CompletionCallback>,
    pub(crate) notifier: Notifier,
}

impl Sequence {
    pub(crate) fn new(spec: SequenceSpec, parent: Option<SequenceId>) -> Self {
        Self {
            mode: spec.mode,
            total: spec.steps.len(),
            pending: spec.steps.into(),
            live: Vec::new(),
            completed: 0,
            broken: false,
            paused: false,
            launching: false,
            carry_ms: 0.0,
            carry_frame: None,
            parent,
            on_complete: spec.on_complete,
            notifier: Notifier::default(),
        }
    }

    /// Every step has been launched and none is still running.
    pub(crate) fn is_settled(&self) -> bool {
        self.pending.is_empty() && self.live.is_empty()
    }

    /// Note that a step finished `ms` past its end during `frame`. Parallel
    /// steps ending in the same frame keep the smallest overrun, which is the
    /// one of the longest step.
    pub(crate) fn record_overshoot(&mut self, frame: u64, ms: f64) {
        self.carry_ms = match (self.mode, self.carry_frame) {
            (SequenceMode::Parallel, Some(last)) if last == frame => self.carry_ms.min(ms),
            _ => ms,
        };
        self.carry_frame = Some(frame);
    }

    /// Time owed to whatever launches next.
    pub(crate) fn take_carry(&mut self) -> f64 {
        self.carry_frame = None;
        std::mem::take(&mut self.carry_ms)
    }

    /// Time this sequence ran past its last step.
    pub(crate) fn carry_ms(&self) -> f64 {
        self.carry_ms
    }

    pub(crate) fn credit(&mut self, ms: f64) {
        if ms.is_finite() && ms > 0.0 {
            self.carry_ms += ms;
        }
    }

    pub(crate) fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub(crate) fn release(&mut self, step: Handle) {
        self.live.retain(|h| *h != step);
    }
}
