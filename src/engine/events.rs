//! Completion futures and the engine event stream

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use futures::channel::oneshot;

use crate::engine::Handle;

/// How an animation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// Lifecycle event broadcast to every subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    Started(Handle),
    Completed(Handle),
    Cancelled(Handle),
    /// The animation hit a runtime error and was cancelled.
    Failed { handle: Handle, reason: String },
}

impl AnimationEvent {
    pub fn handle(&self) -> Handle {
        match self {
            AnimationEvent::Started(handle)
            | AnimationEvent::Completed(handle)
            | AnimationEvent::Cancelled(handle)
            | AnimationEvent::Failed { handle, .. } => *handle,
        }
    }
}

/// Resolves once with the outcome of one animation.
///
/// If the engine is dropped while the animation is still running the future
/// resolves to [`Outcome::Cancelled`].
#[must_use = "futures do nothing unless polled"]
#[derive(Debug)]
pub struct Completion {
    receiver: oneshot::Receiver<Outcome>,
}

impl Completion {
    /// Non-blocking check; `None` while the animation is still running.
    pub fn try_outcome(&mut self) -> Option<Outcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(Outcome::Cancelled),
        }
    }
}

impl Future for Completion {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(Outcome::Cancelled))
    }
}

/// Pending completion futures of one animation
#[derive(Default)]
pub(crate) struct Notifier {
    waiters: Vec<oneshot::Sender<Outcome>>,
}

impl Notifier {
    pub(crate) fn subscribe(&mut self) -> Completion {
        let (sender, receiver) = oneshot::channel();
        self.waiters.push(sender);
        Completion { receiver }
    }

    pub(crate) fn resolve(&mut self, outcome: Outcome) {
        for waiter in self.waiters.drain(..) {
            // receiver dropped: nobody is waiting
            let _ = waiter.send(outcome);
        }
    }
}

/// Fan-out of [`AnimationEvent`]s over bounded channels
pub(crate) struct EventBus {
    subscribers: Vec<Sender<AnimationEvent>>,
    capacity: usize,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn subscribe(&mut self) -> Receiver<AnimationEvent> {
        let (sender, receiver) = crossbeam_channel::bounded(self.capacity);
        self.subscribers.push(sender);
        receiver
    }

    pub(crate) fn emit(&mut self, event: AnimationEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers
            .retain(|subscriber| match subscriber.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(event)) => {
                    log::debug!("Event subscriber is full, dropping {:?}", event);
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TweenId;

    #[test]
    fn test_notifier_resolves_every_waiter_once() {
        let mut notifier = Notifier::default();
        let mut first = notifier.subscribe();
        let second = notifier.subscribe();
        assert_eq!(first.try_outcome(), None);

        notifier.resolve(Outcome::Completed);
        assert_eq!(first.try_outcome(), Some(Outcome::Completed));
        assert_eq!(futures::executor::block_on(second), Outcome::Completed);

        // a second resolve has nobody left to notify
        notifier.resolve(Outcome::Cancelled);
    }

    #[test]
    fn test_dropped_notifier_reads_as_cancelled() {
        let mut notifier = Notifier::default();
        let completion = notifier.subscribe();
        drop(notifier);
        assert_eq!(futures::executor::block_on(completion), Outcome::Cancelled);
    }

    #[test]
    fn test_bus_drops_disconnected_subscribers() {
        let mut bus = EventBus::new(4);
        let kept = bus.subscribe();
        let gone = bus.subscribe();
        drop(gone);

        let handle = Handle::Tween(TweenId(7));
        bus.emit(AnimationEvent::Started(handle));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap().handle(), handle);
    }

    #[test]
    fn test_bus_full_subscriber_keeps_oldest() {
        let mut bus = EventBus::new(1);
        let receiver = bus.subscribe();
        let handle = Handle::Tween(TweenId(1));
        bus.emit(AnimationEvent::Started(handle));
        bus.emit(AnimationEvent::Completed(handle));
        assert_eq!(receiver.try_recv().unwrap(), AnimationEvent::Started(handle));
        assert!(receiver.try_recv().is_err());
        assert_eq!(bus.subscriber_count(), 1);
    }
}
