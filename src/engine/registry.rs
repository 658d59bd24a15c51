//! Per-target bookkeeping of active animations

use std::{
    cell::RefCell,
    collections::hash_map::Entry,
    rc::{Rc, Weak},
};

use fxhash::{FxHashMap, FxHashSet};

use crate::engine::Handle;

/// Identity of an animation target, derived from its allocation address.
///
/// Only meaningful while the target is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    pub fn of<T: ?Sized>(target: &Weak<RefCell<T>>) -> Self {
        TargetId(target.as_ptr() as *const () as usize)
    }

    pub fn of_rc<T: ?Sized>(target: &Rc<RefCell<T>>) -> Self {
        TargetId(Rc::as_ptr(target) as *const () as usize)
    }
}

/// Target to handles, and handle back to the targets it touches
#[derive(Default)]
pub(crate) struct Registry {
    by_target: FxHashMap<TargetId, FxHashSet<Handle>>,
    targets_of: FxHashMap<Handle, FxHashSet<TargetId>>,
}

impl Registry {
    pub(crate) fn register(&mut self, target: TargetId, handle: Handle) {
        self.by_target.entry(target).or_default().insert(handle);
        self.targets_of.entry(handle).or_default().insert(target);
    }

    /// Drop every entry of `handle`; empty target entries go with it.
    pub(crate) fn forget(&mut self, handle: Handle) {
        let Some(targets) = self.targets_of.remove(&handle) else {
            return;
        };
        for target in targets {
            if let Entry::Occupied(mut entry) = self.by_target.entry(target) {
                entry.get_mut().remove(&handle);
                if entry.get().is_empty() {
                    entry.remove();
                }
            }
        }
    }

    /// Handles registered for `target`, tweens first, in id order.
    pub(crate) fn handles(&self, target: TargetId) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self
            .by_target
            .get(&target)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        handles.sort();
        handles
    }

    pub(crate) fn contains(&self, target: TargetId) -> bool {
        self.by_target.contains_key(&target)
    }

    pub(crate) fn target_count(&self) -> usize {
        self.by_target.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.by_target.clear();
        self.targets_of.clear();
    }
}
