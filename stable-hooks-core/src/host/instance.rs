//! Component instance records.
//!
//! An instance owns an arena of hook slots, indexed by call order. Slot `n`
//! holds whatever the `n`th hook call of every render stores, so hooks must
//! be called in the same order on each render.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::deps::Deps;

/// Unique identifier for a mounted component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Generate a new unique instance ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commit phase of a registered callback.
///
/// Phases are ordered: every `Priority` callback of an update runs before
/// any `Normal` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitPhase {
    /// Synchronization work that consumers must never observe as stale.
    Priority,

    /// Ordinary side effects.
    Normal,
}

/// The kind of hook that owns a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Memo,
    Mutable,
    Commit(CommitPhase),
}

/// One entry in an instance's slot arena.
pub(crate) struct Slot {
    pub(crate) kind: HookKind,
    pub(crate) state: Box<dyn Any>,
}

impl Slot {
    pub(crate) fn new<S: Any>(kind: HookKind, state: S) -> Self {
        Self {
            kind,
            state: Box::new(state),
        }
    }
}

/// State of a memo slot.
pub(crate) struct MemoState<T> {
    pub(crate) deps: Deps,
    pub(crate) value: T,
}

/// State of a commit-callback slot.
pub(crate) struct EffectState {
    /// Deps recorded by the last commit that ran this callback.
    pub(crate) committed: Option<Deps>,
}

/// A callback waiting for its commit.
pub(crate) struct PendingEffect {
    pub(crate) slot: usize,
    pub(crate) phase: CommitPhase,
    pub(crate) deps: Deps,
    pub(crate) run: Box<dyn FnOnce()>,
}

/// A replacement state for an existing slot, staged by a render.
pub(crate) struct SlotWrite {
    pub(crate) index: usize,
    pub(crate) state: Box<dyn Any>,
}

/// Output of a successful render that has not been committed yet.
///
/// Nothing in here touches the instance until the commit applies it, so a
/// discarded render leaves the committed slots as they were.
pub(crate) struct PendingCommit {
    pub(crate) effects: Vec<PendingEffect>,
    /// New states for slots that already existed.
    pub(crate) writes: Vec<SlotWrite>,
    /// Slots first claimed by this render, in call order.
    pub(crate) slots: Vec<Slot>,
    pub(crate) hooks: usize,
}

/// Per-instance record owned by the runtime.
///
/// Dropping the record drops every slot, which is the whole teardown.
pub(crate) struct Instance {
    pub(crate) id: InstanceId,
    pub(crate) slots: Vec<Slot>,
    /// Hook count of the first committed render.
    pub(crate) expected_hooks: Option<usize>,
    pub(crate) renders: u64,
    pub(crate) pending: Option<PendingCommit>,
}

impl Instance {
    pub(crate) fn new(id: InstanceId) -> Self {
        Self {
            id,
            slots: Vec::new(),
            expected_hooks: None,
            renders: 0,
            pending: None,
        }
    }

    /// Install the slot writes of a committed render.
    pub(crate) fn apply(&mut self, writes: Vec<SlotWrite>, slots: Vec<Slot>) {
        for write in writes {
            if let Some(slot) = self.slots.get_mut(write.index) {
                slot.state = write.state;
            }
        }
        self.slots.extend(slots);
    }

    pub(crate) fn effect_state_mut(&mut self, index: usize) -> Option<&mut EffectState> {
        self.slots
            .get_mut(index)
            .and_then(|slot| slot.state.downcast_mut::<EffectState>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_are_unique() {
        let id1 = InstanceId::new();
        let id2 = InstanceId::new();
        let id3 = InstanceId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
        assert_eq!(id1.to_string(), format!("#{}", id1.raw()));
    }

    #[test]
    fn priority_phase_sorts_first() {
        let mut phases = vec![CommitPhase::Normal, CommitPhase::Priority, CommitPhase::Normal];
        phases.sort();
        assert_eq!(phases[0], CommitPhase::Priority);
    }

    #[test]
    fn effect_state_lookup_checks_type() {
        let mut instance = Instance::new(InstanceId::new());
        instance
            .slots
            .push(Slot::new(HookKind::Commit(CommitPhase::Normal), EffectState { committed: None }));
        instance.slots.push(Slot::new(HookKind::Memo, MemoState { deps: Deps::once(), value: 1u8 }));

        assert!(instance.effect_state_mut(0).is_some());
        assert!(instance.effect_state_mut(1).is_none());
        assert!(instance.effect_state_mut(2).is_none());
    }

    #[test]
    fn apply_replaces_and_appends_slots() {
        let mut instance = Instance::new(InstanceId::new());
        instance.slots.push(Slot::new(HookKind::Memo, MemoState { deps: Deps::once(), value: 1u8 }));

        instance.apply(
            vec![SlotWrite {
                index: 0,
                state: Box::new(MemoState { deps: Deps::Always, value: 2u8 }),
            }],
            vec![Slot::new(HookKind::Mutable, ())],
        );

        assert_eq!(instance.slots.len(), 2);
        let memo = instance.slots[0].state.downcast_ref::<MemoState<u8>>();
        assert_eq!(memo.map(|state| state.value), Some(2));
        assert_eq!(instance.slots[1].kind, HookKind::Mutable);
    }
}
