use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::animation::{
    easing::Easing,
    interpolation::{interpolate, RotationDirection},
};
use crate::core::{config::TweenDefaults, value::Value, value::ValueKind};
use crate::engine::{events::Notifier, registry::TargetId, SequenceId, TweenEngine, TweenId};
use crate::target::{Animatable, PropertyKey};
use crate::{Result, TweenError};

/// Invoked once when a tween or sequence completes. Never invoked on cancel.
pub type CompletionCallback = Box<dyn FnOnce(&mut TweenEngine)>;

/// Invoked after every applied frame with the linear progress (0.0 to 1.0).
pub type UpdateCallback = Box<dyn FnMut(f64)>;

/// A property given either as a typed key or by its dictionary name
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySelector {
    Key(PropertyKey),
    Named(String),
}

impl PropertySelector {
    fn resolve(&self) -> Result<PropertyKey> {
        match self {
            PropertySelector::Key(key) => Ok(*key),
            PropertySelector::Named(name) => name.parse(),
        }
    }
}

impl From<PropertyKey> for PropertySelector {
    fn from(key: PropertyKey) -> Self {
        PropertySelector::Key(key)
    }
}

impl From<&str> for PropertySelector {
    fn from(name: &str) -> Self {
        PropertySelector::Named(name.to_string())
    }
}

impl From<String> for PropertySelector {
    fn from(name: String) -> Self {
        PropertySelector::Named(name)
    }
}

/// An easing given either as a curve or by name
#[derive(Debug, Clone, PartialEq)]
pub enum EasingSelector {
    Kind(Easing),
    Named(String),
}

impl EasingSelector {
    fn resolve(&self) -> Result<Easing> {
        match self {
            EasingSelector::Kind(easing) => Ok(*easing),
            EasingSelector::Named(name) => name.parse(),
        }
    }
}

impl From<Easing> for EasingSelector {
    fn from(easing: Easing) -> Self {
        EasingSelector::Kind(easing)
    }
}

impl From<&str> for EasingSelector {
    fn from(name: &str) -> Self {
        EasingSelector::Named(name.to_string())
    }
}

impl From<String> for EasingSelector {
    fn from(name: String) -> Self {
        EasingSelector::Named(name)
    }
}

struct PropertySpec {
    selector: PropertySelector,
    start: Option<Value>,
    end: Value,
}

/// Description of a tween before it is submitted to an engine
pub struct TweenSpec {
    target: Weak<RefCell<dyn Animatable>>,
    properties: Vec<PropertySpec>,
    duration_ms: u64,
    delay_ms: u64,
    easing: Option<EasingSelector>,
    rotation: Option<RotationDirection>,
    on_complete: Option<CompletionCallback>,
    on_update: Option<UpdateCallback>,
}

impl TweenSpec {
    /// Start describing a tween of `target`. The builder keeps only a weak
    /// reference.
    pub fn new<T: Animatable + 'static>(target: &Rc<RefCell<T>>) -> Self {
        let target: Rc<RefCell<dyn Animatable>> = target.clone();
        Self::for_target(&target)
    }

    /// Same as [`TweenSpec::new`] for an already type-erased target.
    pub fn for_target(target: &Rc<RefCell<dyn Animatable>>) -> Self {
        Self {
            target: Rc::downgrade(target),
            properties: Vec::new(),
            duration_ms: 0,
            delay_ms: 0,
            easing: None,
            rotation: None,
            on_complete: None,
            on_update: None,
        }
    }

    /// Animate `property` from its current value to `end`.
    pub fn to(mut self, property: impl Into<PropertySelector>, end: impl Into<Value>) -> Self {
        self.properties.push(PropertySpec {
            selector: property.into(),
            start: None,
            end: end.into(),
        });
        self
    }

    /// Animate `property` from an explicit `start` to `end`.
    pub fn from_to(
        mut self,
        property: impl Into<PropertySelector>,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Self {
        self.properties.push(PropertySpec {
            selector: property.into(),
            start: Some(start.into()),
            end: end.into(),
        });
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the easing curve, by value or by name (`"ease-out-back"`).
    pub fn easing(mut self, easing: impl Into<EasingSelector>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// Direction used for angle-kind properties.
    pub fn rotation(mut self, direction: RotationDirection) -> Self {
        self.rotation = Some(direction);
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut TweenEngine) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f64) + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn duration(&self) -> u64 {
        self.duration_ms
    }

    /// Check names that can only fail at submission time.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(easing) = &self.easing {
            easing.resolve()?;
        }
        for property in &self.properties {
            property.selector.resolve()?;
        }
        Ok(())
    }
}

/// State of a tween animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    Pending,
    Running,
    Completed,
    Cancelled,
}

/// Result of advancing a running tween by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickStatus {
    /// Paused, delayed, or not running; nothing was applied.
    Idle,
    Running,
    Completed,
}

/// One animated property: key, resolved kind, endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub key: PropertyKey,
    pub kind: ValueKind,
    pub start: Option<Value>,
    pub end: Value,
    pub direction: RotationDirection,
}

impl PropertyDescriptor {
    /// Only called after `Tween::start` has filled every start value.
    fn value_at(&self, progress: f64) -> Result<Value> {
        debug_assert!(self.start.is_some(), "{} has no start value", self.key);
        let start = self.start.as_ref().unwrap_or(&self.end);
        interpolate(
            self.key,
            self.kind,
            start,
            &self.end,
            progress,
            self.direction,
        )
    }
}

/// A single timed transition of one or more properties on one target
pub struct Tween {
    id: TweenId,
    target: Weak<RefCell<dyn Animatable>>,
    target_id: TargetId,
    properties: Vec<PropertyDescriptor>,
    duration_ms: f64,
    delay_remaining_ms: f64,
    easing: Easing,
    elapsed_ms: f64,
    /// Time owed from an earlier frame, spent on the next tick
    credit_ms: f64,
    overshoot_ms: f64,
    state: TweenState,
    paused: bool,
    pub(crate) owner: Option<SequenceId>,
    pub(crate) on_complete: Option<CompletionCallback>,
    on_update: Option<UpdateCallback>,
    pub(crate) notifier: Notifier,
}

impl Tween {
    /// Build a pending tween, resolving names and value kinds once.
    pub(crate) fn new(
        id: TweenId,
        spec: TweenSpec,
        defaults: &TweenDefaults,
        owner: Option<SequenceId>,
    ) -> Result<Self> {
        let easing = match &spec.easing {
            Some(selector) => selector.resolve()?,
            None => defaults.easing,
        };
        let direction = spec.rotation.unwrap_or(defaults.rotation);

        let properties = spec
            .properties
            .into_iter()
            .map(|p| -> Result<PropertyDescriptor> {
                let key = p.selector.resolve()?;
                Ok(PropertyDescriptor {
                    key,
                    kind: key.kind(),
                    start: p.start,
                    end: p.end,
                    direction,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id,
            target_id: TargetId::of(&spec.target),
            target: spec.target,
            properties,
            duration_ms: spec.duration_ms as f64,
            delay_remaining_ms: spec.delay_ms as f64,
            easing,
            elapsed_ms: 0.0,
            credit_ms: 0.0,
            overshoot_ms: 0.0,
            state: TweenState::Pending,
            paused: false,
            owner,
            on_complete: spec.on_complete,
            on_update: spec.on_update,
            notifier: Notifier::default(),
        })
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    pub fn target_id(&self) -> TargetId {
        self.target_id
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get the current progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        match self.state {
            TweenState::Completed => 1.0,
            _ if self.duration_ms == 0.0 => 0.0,
            _ => (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0),
        }
    }

    /// Pending -> Running, reading start values that were not given explicitly.
    pub(crate) fn start(&mut self) -> Result<()> {
        if self.state != TweenState::Pending {
            return Ok(());
        }

        let target = self.target.upgrade().ok_or(TweenError::StaleTarget)?;
        {
            let target = target.try_borrow().map_err(|_| TweenError::TargetBusy)?;
            for descriptor in self.properties.iter_mut().filter(|d| d.start.is_none()) {
                let current = target
                    .get(descriptor.key)
                    .ok_or(TweenError::UnsupportedProperty(descriptor.key))?;
                descriptor.start = Some(current);
            }
        }

        self.state = TweenState::Running;
        Ok(())
    }

    /// Advance by `dt_ms` and apply the blended values.
    ///
    /// Reaching the duration snaps every property to its end value and moves
    /// the tween to `Completed`. Errors leave the target untouched for this
    /// frame; the caller decides how to retire the tween.
    pub(crate) fn tick(&mut self, dt_ms: f64) -> Result<TickStatus> {
        if self.state != TweenState::Running {
            return Ok(TickStatus::Idle);
        }
        if self.target.strong_count() == 0 {
            return Err(TweenError::StaleTarget);
        }
        if self.paused {
            return Ok(TickStatus::Idle);
        }

        let frame = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let mut dt = frame + std::mem::take(&mut self.credit_ms);
        if self.delay_remaining_ms > 0.0 {
            let consumed = dt.min(self.delay_remaining_ms);
            self.delay_remaining_ms -= consumed;
            dt -= consumed;
            if self.delay_remaining_ms > 0.0 {
                return Ok(TickStatus::Idle);
            }
        }

        let unclamped = self.elapsed_ms + dt;
        let elapsed = unclamped.min(self.duration_ms);
        let finished = elapsed >= self.duration_ms;
        let progress = if finished {
            1.0
        } else {
            self.easing.apply(elapsed / self.duration_ms)
        };

        if !self.apply(progress)? {
            // target busy: retry with this frame's time on the next tick
            self.credit_ms = dt;
            return Ok(TickStatus::Running);
        }
        self.elapsed_ms = elapsed;

        if let Some(on_update) = self.on_update.as_mut() {
            on_update(if finished { 1.0 } else { elapsed / self.duration_ms });
        }

        if finished {
            self.overshoot_ms = unclamped - self.duration_ms;
            self.state = TweenState::Completed;
            Ok(TickStatus::Completed)
        } else {
            Ok(TickStatus::Running)
        }
    }

    /// Running/Pending -> Cancelled. Target values stay where they are.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.state {
            TweenState::Pending | TweenState::Running => {
                self.state = TweenState::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// Time past the duration in the frame that completed the tween.
    pub(crate) fn overshoot_ms(&self) -> f64 {
        self.overshoot_ms
    }

    /// Spend `ms` extra on the next tick, after any delay.
    pub(crate) fn credit(&mut self, ms: f64) {
        if ms.is_finite() && ms > 0.0 {
            self.credit_ms += ms;
        }
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn apply(&mut self, progress: f64) -> Result<bool> {
        let target = self.target.upgrade().ok_or(TweenError::StaleTarget)?;

        let values = self
            .properties
            .iter()
            .map(|d| -> Result<(PropertyKey, Value)> { Ok((d.key, d.value_at(progress)?)) })
            .collect::<Result<Vec<_>>>()?;

        let Ok(mut target) = target.try_borrow_mut() else {
            log::warn!("tween {:?}: target is borrowed, skipping frame", self.id);
            return Ok(false);
        };
        for (key, value) in values {
            target.set(key, value);
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("easing", &self.easing)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("duration_ms", &self.duration_ms)
            .field("properties", &self.properties)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use crate::target::ViewState;

    fn view() -> Rc<RefCell<ViewState>> {
        Rc::new(RefCell::new(ViewState::new(0.0, 0.0, 100.0, 100.0)))
    }

    fn build(spec: TweenSpec) -> Tween {
        Tween::new(TweenId(1), spec, &TweenDefaults::default(), None).unwrap()
    }

    #[test]
    fn test_start_captures_current_values() {
        let target = view();
        target.borrow_mut().top = 40.0;
        let mut tween = build(TweenSpec::new(&target).to(PropertyKey::Top, 0.0).duration_ms(100));
        assert_eq!(tween.state(), TweenState::Pending);
        tween.start().unwrap();
        assert_eq!(tween.state(), TweenState::Running);
        assert_eq!(tween.properties()[0].start, Some(Value::Scalar(40.0)));
    }

    #[test]
    fn test_tick_blends_and_completes_exactly() {
        let target = view();
        let mut tween = build(
            TweenSpec::new(&target)
                .to(PropertyKey::Opacity, 0.3)
                .duration_ms(100)
                .easing(Easing::InOutCubic),
        );
        tween.start().unwrap();

        assert_eq!(tween.tick(30.0).unwrap(), TickStatus::Running);
        let mid = target.borrow().opacity;
        assert!(mid < 1.0 && mid > 0.3);

        assert_eq!(tween.tick(500.0).unwrap(), TickStatus::Completed);
        assert_eq!(tween.elapsed_ms(), 100.0);
        assert_eq!(target.borrow().opacity, 0.3);
        assert_eq!(tween.progress(), 1.0);

        // finished tweens ignore further ticks
        target.borrow_mut().opacity = 0.9;
        assert_eq!(tween.tick(10.0).unwrap(), TickStatus::Idle);
        assert_eq!(target.borrow().opacity, 0.9);
    }

    #[test]
    fn test_delay_postpones_mutation() {
        let target = view();
        let mut tween = build(
            TweenSpec::new(&target)
                .to(PropertyKey::Left, 100.0)
                .duration_ms(100)
                .delay_ms(50),
        );
        tween.start().unwrap();
        assert_eq!(tween.tick(40.0).unwrap(), TickStatus::Idle);
        assert_eq!(target.borrow().left, 0.0);
        // 10ms finish the delay, 50ms go into the animation
        tween.tick(60.0).unwrap();
        assert_eq!(target.borrow().left, 50.0);
    }

    #[test]
    fn test_paused_tween_holds() {
        let target = view();
        let mut tween = build(TweenSpec::new(&target).to(PropertyKey::Left, 100.0).duration_ms(100));
        tween.start().unwrap();
        tween.tick(25.0).unwrap();
        tween.set_paused(true);
        assert_eq!(tween.tick(50.0).unwrap(), TickStatus::Idle);
        assert_eq!(tween.elapsed_ms(), 25.0);
        tween.set_paused(false);
        tween.tick(25.0).unwrap();
        assert_eq!(target.borrow().left, 50.0);
    }

    #[test]
    fn test_cancel_leaves_values() {
        let target = view();
        let mut tween = build(TweenSpec::new(&target).to(PropertyKey::Left, 100.0).duration_ms(100));
        tween.start().unwrap();
        tween.tick(50.0).unwrap();
        assert!(tween.cancel());
        assert!(!tween.cancel());
        assert_eq!(tween.state(), TweenState::Cancelled);
        assert_eq!(tween.tick(50.0).unwrap(), TickStatus::Idle);
        assert_eq!(target.borrow().left, 50.0);
    }

    #[test]
    fn test_stale_target() {
        let target = view();
        let mut tween = build(TweenSpec::new(&target).to(PropertyKey::Left, 100.0).duration_ms(100));
        tween.start().unwrap();
        drop(target);
        assert!(matches!(tween.tick(10.0), Err(TweenError::StaleTarget)));
    }

    #[test]
    fn test_stale_target_during_delay() {
        let target = view();
        let mut tween = build(
            TweenSpec::new(&target)
                .to(PropertyKey::Left, 100.0)
                .duration_ms(100)
                .delay_ms(1000),
        );
        tween.start().unwrap();
        drop(target);
        assert!(matches!(tween.tick(10.0), Err(TweenError::StaleTarget)));
    }

    #[test]
    fn test_overshoot_and_credit() {
        let target = view();
        let mut tween = build(TweenSpec::new(&target).to(PropertyKey::Left, 100.0).duration_ms(100));
        tween.start().unwrap();
        tween.tick(90.0).unwrap();
        assert_eq!(tween.tick(30.0).unwrap(), TickStatus::Completed);
        assert_eq!(tween.overshoot_ms(), 20.0);

        let mut next = build(
            TweenSpec::new(&target)
                .to(PropertyKey::Top, 100.0)
                .duration_ms(100)
                .delay_ms(10),
        );
        next.start().unwrap();
        next.credit(20.0);
        // 10ms finish the delay, the rest lands in the animation
        next.tick(30.0).unwrap();
        assert_eq!(next.elapsed_ms(), 40.0);
        assert_eq!(target.borrow().top, 40.0);
    }

    #[test]
    fn test_mismatched_end_value_fails_on_tick() {
        let target = view();
        let mut tween = build(
            TweenSpec::new(&target)
                .to(PropertyKey::Top, Color::WHITE)
                .duration_ms(100),
        );
        tween.start().unwrap();
        assert!(matches!(
            tween.tick(10.0),
            Err(TweenError::UnsupportedValueKind { .. })
        ));
        assert_eq!(target.borrow().top, 0.0);
    }

    #[test]
    fn test_busy_target_retries() {
        let target = view();
        let mut tween = build(TweenSpec::new(&target).to(PropertyKey::Left, 100.0).duration_ms(100));
        tween.start().unwrap();
        {
            let _guard = target.borrow();
            assert_eq!(tween.tick(60.0).unwrap(), TickStatus::Running);
        }
        assert_eq!(tween.state(), TweenState::Running);
        assert_eq!(tween.elapsed_ms(), 0.0);
        // the skipped 60ms are spent on the retry
        assert_eq!(tween.tick(40.0).unwrap(), TickStatus::Completed);
        assert_eq!(target.borrow().left, 100.0);
    }

    #[test]
    fn test_named_selectors_resolve() {
        let target = view();
        let tween = build(
            TweenSpec::new(&target)
                .to("backgroundColor", Color::WHITE)
                .easing("ease-out-bounce")
                .duration_ms(10),
        );
        assert_eq!(tween.easing(), Easing::OutBounce);
        assert_eq!(tween.properties()[0].kind, ValueKind::Color);
    }

    #[test]
    fn test_unknown_names_fail_validation() {
        let target = view();
        let spec = TweenSpec::new(&target).to("glow", 1.0).duration_ms(10);
        assert!(matches!(spec.validate(), Err(TweenError::UnknownProperty(_))));
        let spec = TweenSpec::new(&target).easing("wobble").duration_ms(10);
        assert!(matches!(spec.validate(), Err(TweenError::UnknownEasingKind(_))));
    }
}
