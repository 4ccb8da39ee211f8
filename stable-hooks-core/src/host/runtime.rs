//! Reference Runtime
//!
//! The runtime owns every mounted instance and drives the update cycle:
//!
//! 1. [`Runtime::render_uncommitted`] runs the component function with a
//!    [`Scope`] bound to the instance. Hooks claim slots in call order and
//!    register commit callbacks whose deps changed.
//!
//!    Memo recomputations and newly claimed slots are staged in the pending
//!    commit instead of being written to the instance.
//!
//! 2. [`Runtime::commit`] installs the staged slot writes, then runs the
//!    collected callbacks. All priority callbacks run first, in registration
//!    order, then all normal ones. Each callback's deps are recorded just
//!    before it runs.
//!
//! A render that fails, or an uncommitted render replaced by the next one,
//! is dropped with everything it staged. The committed slots, including
//! their number and order, stay exactly as the last commit left them.

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::deps::Deps;
use super::instance::{
    CommitPhase, EffectState, HookKind, Instance, InstanceId, MemoState, PendingCommit,
    PendingEffect, Slot, SlotWrite,
};
use super::pointer::Pointer;
use super::Host;
use crate::config::RuntimeConfig;
use crate::error::HookError;

/// Owner of all mounted component instances.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use stable_hooks::{use_stable_value, Runtime};
///
/// let mut runtime = Runtime::new();
/// let id = runtime.mount();
///
/// let first = runtime
///     .render(id, |cx| use_stable_value(cx, Rc::new(vec!["x"])))
///     .unwrap();
/// let second = runtime
///     .render(id, |cx| use_stable_value(cx, Rc::new(vec!["x"])))
///     .unwrap();
///
/// assert!(Rc::ptr_eq(&first, &second));
/// ```
pub struct Runtime {
    config: RuntimeConfig,
    instances: IndexMap<InstanceId, Instance>,
}

impl Runtime {
    /// Create a runtime with the default config.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime with the given config.
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            instances: IndexMap::new(),
        }
    }

    /// The config this runtime validates renders against.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Mount a new, empty component instance.
    pub fn mount(&mut self) -> InstanceId {
        let id = InstanceId::new();
        self.instances.insert(id, Instance::new(id));
        debug!(instance = %id, "instance mounted");
        id
    }

    /// Tear down an instance, dropping all of its slots and any uncommitted
    /// render. Returns `false` if the instance was not mounted.
    pub fn unmount(&mut self, id: InstanceId) -> bool {
        match self.instances.shift_remove(&id) {
            Some(instance) => {
                debug!(
                    instance = %id,
                    slots = instance.slots.len(),
                    renders = instance.renders,
                    "instance unmounted"
                );
                true
            }
            None => false,
        }
    }

    /// Whether `id` refers to a mounted instance.
    pub fn is_mounted(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    /// Number of mounted instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Number of successful renders of an instance.
    pub fn render_count(&self, id: InstanceId) -> Option<u64> {
        self.instances.get(&id).map(|instance| instance.renders)
    }

    /// Whether the instance has a rendered but uncommitted update.
    pub fn has_pending_commit(&self, id: InstanceId) -> bool {
        self.instances
            .get(&id)
            .is_some_and(|instance| instance.pending.is_some())
    }

    /// Render and immediately commit.
    pub fn render<R, F>(&mut self, id: InstanceId, render: F) -> Result<R, HookError>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<R, HookError>,
    {
        let output = self.render_uncommitted(id, render)?;
        self.commit(id)?;
        Ok(output)
    }

    /// Run one re-invocation of the component without committing it.
    ///
    /// Any earlier uncommitted render of the same instance is discarded.
    pub fn render_uncommitted<R, F>(&mut self, id: InstanceId, render: F) -> Result<R, HookError>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<R, HookError>,
    {
        let config = &self.config;
        let instance = self
            .instances
            .get_mut(&id)
            .ok_or(HookError::UnknownInstance(id))?;

        let span = tracing::debug_span!("render", instance = %id);
        let _enter = span.enter();
        trace!(render = instance.renders, "render started");

        instance.pending = None;

        let mut scope = Scope::new(instance, config);
        let rendered = render(&mut scope);
        let finished = scope.finish();
        let outcome = rendered.and_then(|output| finished.map(|commit| (output, commit)));

        match outcome {
            Ok((output, commit)) => {
                instance.pending = Some(commit);
                instance.renders += 1;
                Ok(output)
            }
            Err(err) => {
                warn!(error = %err, "render failed, pending commit discarded");
                Err(err)
            }
        }
    }

    /// Commit the pending update of one instance. Returns the number of
    /// callbacks that ran.
    pub fn commit(&mut self, id: InstanceId) -> Result<usize, HookError> {
        if !self.instances.contains_key(&id) {
            return Err(HookError::UnknownInstance(id));
        }
        Ok(self.commit_batch(&[id]))
    }

    /// Commit every instance with a pending update as one update: priority
    /// callbacks of all instances run before any normal callback.
    pub fn commit_all(&mut self) -> usize {
        let ids: Vec<InstanceId> = self
            .instances
            .values()
            .filter(|instance| instance.pending.is_some())
            .map(|instance| instance.id)
            .collect();
        self.commit_batch(&ids)
    }

    fn commit_batch(&mut self, ids: &[InstanceId]) -> usize {
        let mut queue: Vec<(InstanceId, PendingEffect)> = Vec::new();

        for &id in ids {
            let Some(instance) = self.instances.get_mut(&id) else {
                continue;
            };
            let Some(commit) = instance.pending.take() else {
                continue;
            };
            if instance.expected_hooks.is_none() {
                instance.expected_hooks = Some(commit.hooks);
            }
            trace!(
                instance = %id,
                writes = commit.writes.len(),
                new_slots = commit.slots.len(),
                "slot writes applied"
            );
            instance.apply(commit.writes, commit.slots);
            queue.extend(commit.effects.into_iter().map(|effect| (id, effect)));
        }

        // Stable sort: registration order is kept within a phase.
        queue.sort_by_key(|(_, effect)| effect.phase);

        let priority = queue
            .iter()
            .filter(|(_, effect)| effect.phase == CommitPhase::Priority)
            .count();
        debug!(
            instances = ids.len(),
            priority,
            normal = queue.len() - priority,
            "commit"
        );

        let total = queue.len();
        for (id, effect) in queue {
            if let Some(state) = self
                .instances
                .get_mut(&id)
                .and_then(|instance| instance.effect_state_mut(effect.slot))
            {
                state.committed = Some(effect.deps);
            }
            (effect.run)();
        }
        total
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

enum Claim {
    Existing(usize),
    Vacant,
}

/// Hook context for one render of one instance.
///
/// Passed to the component function by [`Runtime::render`]; hooks take it as
/// their [`Host`].
///
/// The scope only reads the committed slots. Everything a render changes is
/// staged here and handed to the commit.
pub struct Scope<'a> {
    instance: &'a Instance,
    config: &'a RuntimeConfig,
    cursor: usize,
    pending: Vec<PendingEffect>,
    writes: Vec<SlotWrite>,
    fresh: Vec<Slot>,
}

impl<'a> Scope<'a> {
    fn new(instance: &'a Instance, config: &'a RuntimeConfig) -> Self {
        Self {
            instance,
            config,
            cursor: 0,
            pending: Vec::new(),
            writes: Vec::new(),
            fresh: Vec::new(),
        }
    }

    /// The instance being rendered.
    pub fn instance_id(&self) -> InstanceId {
        self.instance.id
    }

    /// Whether no earlier render of this instance has succeeded.
    pub fn is_first_render(&self) -> bool {
        self.instance.renders == 0
    }

    /// Number of hook slots claimed so far in this render.
    pub fn hooks_used(&self) -> usize {
        self.cursor
    }

    fn claim(&mut self, kind: HookKind) -> Result<Claim, HookError> {
        let index = self.cursor;

        if let Some(slot) = self.instance.slots.get(index) {
            if slot.kind != kind {
                return Err(HookError::HookOrderChanged {
                    index,
                    expected: slot.kind,
                    found: kind,
                });
            }
            self.cursor += 1;
            return Ok(Claim::Existing(index));
        }

        if self.config.check_hook_count {
            if let Some(expected) = self.instance.expected_hooks {
                return Err(HookError::HookCountChanged {
                    expected,
                    found: index + 1,
                });
            }
        }
        if index >= self.config.max_slots {
            return Err(HookError::SlotLimitExceeded {
                instance: self.instance.id,
                limit: self.config.max_slots,
            });
        }
        Ok(Claim::Vacant)
    }

    /// Stage a slot for the vacant position at the cursor.
    fn push_slot(&mut self, slot: Slot) -> usize {
        let index = self.instance.slots.len() + self.fresh.len();
        self.fresh.push(slot);
        self.cursor = index + 1;
        index
    }

    fn register(
        &mut self,
        phase: CommitPhase,
        deps: Deps,
        run: Box<dyn FnOnce()>,
    ) -> Result<(), HookError> {
        let kind = HookKind::Commit(phase);
        let slot = match self.claim(kind)? {
            Claim::Existing(index) => {
                let state = self.instance.slots[index]
                    .state
                    .downcast_ref::<EffectState>()
                    .ok_or(HookError::SlotTypeMismatch { index })?;
                let due = match &state.committed {
                    Some(previous) => deps.changed_since(previous),
                    None => true,
                };
                if !due {
                    return Ok(());
                }
                index
            }
            Claim::Vacant => self.push_slot(Slot::new(kind, EffectState { committed: None })),
        };

        self.pending.push(PendingEffect {
            slot,
            phase,
            deps,
            run,
        });
        Ok(())
    }

    fn finish(self) -> Result<PendingCommit, HookError> {
        if self.config.check_hook_count {
            if let Some(expected) = self.instance.expected_hooks {
                if self.cursor != expected {
                    return Err(HookError::HookCountChanged {
                        expected,
                        found: self.cursor,
                    });
                }
            }
        }
        Ok(PendingCommit {
            effects: self.pending,
            writes: self.writes,
            slots: self.fresh,
            hooks: self.cursor,
        })
    }
}

impl Host for Scope<'_> {
    fn memo_slot<T, F>(&mut self, deps: Deps, compute: F) -> Result<T, HookError>
    where
        T: Clone + 'static,
        F: FnOnce() -> Result<T, HookError>,
    {
        match self.claim(HookKind::Memo)? {
            Claim::Existing(index) => {
                let state = self.instance.slots[index]
                    .state
                    .downcast_ref::<MemoState<T>>()
                    .ok_or(HookError::SlotTypeMismatch { index })?;
                if !deps.changed_since(&state.deps) {
                    return Ok(state.value.clone());
                }

                trace!(slot = index, "memo recomputed");
                let value = compute()?;
                self.writes.push(SlotWrite {
                    index,
                    state: Box::new(MemoState {
                        deps,
                        value: value.clone(),
                    }),
                });
                Ok(value)
            }
            Claim::Vacant => {
                let value = compute()?;
                self.push_slot(Slot::new(
                    HookKind::Memo,
                    MemoState {
                        deps,
                        value: value.clone(),
                    },
                ));
                Ok(value)
            }
        }
    }

    fn mutable_slot<T, F>(&mut self, init: F) -> Result<Pointer<T>, HookError>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        match self.claim(HookKind::Mutable)? {
            Claim::Existing(index) => self.instance.slots[index]
                .state
                .downcast_ref::<Pointer<T>>()
                .cloned()
                .ok_or(HookError::SlotTypeMismatch { index }),
            Claim::Vacant => {
                let pointer = Pointer::new(init());
                self.push_slot(Slot::new(HookKind::Mutable, pointer.clone()));
                Ok(pointer)
            }
        }
    }

    fn on_commit<F>(&mut self, deps: Deps, effect: F) -> Result<(), HookError>
    where
        F: FnOnce() + 'static,
    {
        self.register(CommitPhase::Normal, deps, Box::new(effect))
    }

    fn on_priority_commit<F>(&mut self, deps: Deps, effect: F) -> Result<(), HookError>
    where
        F: FnOnce() + 'static,
    {
        self.register(CommitPhase::Priority, deps, Box::new(effect))
    }
}
