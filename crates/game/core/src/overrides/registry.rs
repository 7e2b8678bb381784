//! Per-character lookup from value-set kind to its attribute.

use crate::error::{ErrorSeverity, SimError};
use crate::values::{
    ActionInputValues, AnyValues, MovementValues, PermeationValues, PhysicsValues, ValueSet,
    ValueSetKind,
};

use super::{OverridableAttribute, OverrideBundle, OverrideKind, OverrideToken};

/// Errors raised while wiring attributes into a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("an attribute is already registered for {0}")]
    AlreadyRegistered(ValueSetKind),
}

impl SimError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered(_) => "REGISTRY_ALREADY_REGISTERED",
        }
    }
}

/// Storage for one kind inside the registry.
#[doc(hidden)]
#[derive(Clone, Debug)]
pub struct Slot<V: ValueSet> {
    attribute: Option<OverridableAttribute<V>>,
    /// Bumped on every registration so stale receipts cannot pop layers from
    /// a replacement attribute.
    generation: u32,
}

impl<V: ValueSet> Default for Slot<V> {
    fn default() -> Self {
        Self {
            attribute: None,
            generation: 0,
        }
    }
}

/// Value sets that have a slot in [`OverrideRegistry`].
pub trait Registered: ValueSet + sealed::Sealed {
    #[doc(hidden)]
    fn slot(registry: &OverrideRegistry) -> &Slot<Self>;
    #[doc(hidden)]
    fn slot_mut(registry: &mut OverrideRegistry) -> &mut Slot<Self>;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! registered {
    ($($ty:ty => $field:ident),+ $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Registered for $ty {
                fn slot(registry: &OverrideRegistry) -> &Slot<Self> {
                    &registry.$field
                }

                fn slot_mut(registry: &mut OverrideRegistry) -> &mut Slot<Self> {
                    &mut registry.$field
                }
            }
        )+
    };
}

registered! {
    PhysicsValues => physics,
    MovementValues => movement,
    ActionInputValues => action_input,
    PermeationValues => permeation,
}

/// One entry of a bundle that reached an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedOverride {
    pub target: ValueSetKind,
    pub token: OverrideToken,
    generation: u32,
}

/// Proof of an applied bundle; hand it back to remove exactly those layers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use = "dropping a receipt leaks its override layers"]
pub struct BundleReceipt {
    applied: Vec<AppliedOverride>,
    skipped: usize,
}

impl BundleReceipt {
    pub fn applied(&self) -> &[AppliedOverride] {
        &self.applied
    }

    /// Entries that targeted a kind with no registered attribute.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Fixed table of one optional attribute per value-set kind.
///
/// Abilities, attacks and scripted triggers push overrides onto each other's
/// constants through this table without holding references to one another.
/// A bundle entry aimed at a kind nobody registered is skipped silently: an
/// attack that tweaks a permeation constant works on characters without the
/// ability.
#[derive(Clone, Debug, Default)]
pub struct OverrideRegistry {
    physics: Slot<PhysicsValues>,
    movement: Slot<MovementValues>,
    action_input: Slot<ActionInputValues>,
    permeation: Slot<PermeationValues>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates an attribute with its kind.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if the kind is taken.
    pub fn register<V: Registered>(
        &mut self,
        attribute: OverridableAttribute<V>,
    ) -> Result<(), RegistryError> {
        let slot = V::slot_mut(self);
        if slot.attribute.is_some() {
            return Err(RegistryError::AlreadyRegistered(V::KIND));
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.attribute = Some(attribute);
        tracing::debug!(kind = %V::KIND, "attribute registered");
        Ok(())
    }

    /// Removes and returns the attribute for `V`, if any.
    pub fn deregister<V: Registered>(&mut self) -> Option<OverridableAttribute<V>> {
        let attribute = V::slot_mut(self).attribute.take();
        if attribute.is_some() {
            tracing::debug!(kind = %V::KIND, "attribute deregistered");
        }
        attribute
    }

    /// Kind-tagged variant of [`deregister`](Self::deregister). Unknown kinds
    /// are a no-op returning `false`.
    pub fn deregister_kind(&mut self, kind: ValueSetKind) -> bool {
        match kind {
            ValueSetKind::Physics => self.deregister::<PhysicsValues>().is_some(),
            ValueSetKind::Movement => self.deregister::<MovementValues>().is_some(),
            ValueSetKind::ActionInput => self.deregister::<ActionInputValues>().is_some(),
            ValueSetKind::Permeation => self.deregister::<PermeationValues>().is_some(),
        }
    }

    pub fn is_registered(&self, kind: ValueSetKind) -> bool {
        match kind {
            ValueSetKind::Physics => self.physics.attribute.is_some(),
            ValueSetKind::Movement => self.movement.attribute.is_some(),
            ValueSetKind::ActionInput => self.action_input.attribute.is_some(),
            ValueSetKind::Permeation => self.permeation.attribute.is_some(),
        }
    }

    pub fn attribute<V: Registered>(&self) -> Option<&OverridableAttribute<V>> {
        V::slot(self).attribute.as_ref()
    }

    pub fn attribute_mut<V: Registered>(&mut self) -> Option<&mut OverridableAttribute<V>> {
        V::slot_mut(self).attribute.as_mut()
    }

    pub fn physics(&self) -> Option<&OverridableAttribute<PhysicsValues>> {
        self.physics.attribute.as_ref()
    }

    pub fn physics_mut(&mut self) -> Option<&mut OverridableAttribute<PhysicsValues>> {
        self.physics.attribute.as_mut()
    }

    pub fn movement(&self) -> Option<&OverridableAttribute<MovementValues>> {
        self.movement.attribute.as_ref()
    }

    pub fn movement_mut(&mut self) -> Option<&mut OverridableAttribute<MovementValues>> {
        self.movement.attribute.as_mut()
    }

    pub fn action_input(&self) -> Option<&OverridableAttribute<ActionInputValues>> {
        self.action_input.attribute.as_ref()
    }

    pub fn action_input_mut(&mut self) -> Option<&mut OverridableAttribute<ActionInputValues>> {
        self.action_input.attribute.as_mut()
    }

    pub fn permeation(&self) -> Option<&OverridableAttribute<PermeationValues>> {
        self.permeation.attribute.as_ref()
    }

    pub fn permeation_mut(&mut self) -> Option<&mut OverridableAttribute<PermeationValues>> {
        self.permeation.attribute.as_mut()
    }

    /// Resolved values for `V`, or its authored defaults when unregistered.
    pub fn current_or_default<V: Registered + Default>(&self) -> V {
        self.attribute::<V>()
            .map(OverridableAttribute::current)
            .unwrap_or_default()
    }

    /// Pushes a single override onto the attribute registered for its kind.
    ///
    /// Returns `None` when no attribute is registered for that kind.
    pub fn push(&mut self, values: AnyValues, kind: OverrideKind) -> Option<AppliedOverride> {
        fn push_into<V: Registered>(
            registry: &mut OverrideRegistry,
            values: V,
            kind: OverrideKind,
        ) -> Option<AppliedOverride> {
            let slot = V::slot_mut(registry);
            let generation = slot.generation;
            let token = slot.attribute.as_mut()?.push_override(values, kind);
            Some(AppliedOverride {
                target: V::KIND,
                token,
                generation,
            })
        }

        match values {
            AnyValues::Physics(v) => push_into(self, v, kind),
            AnyValues::Movement(v) => push_into(self, v, kind),
            AnyValues::ActionInput(v) => push_into(self, v, kind),
            AnyValues::Permeation(v) => push_into(self, v, kind),
        }
    }

    /// Pops a single override. Stale or unknown handles are ignored.
    pub fn pop(&mut self, applied: AppliedOverride) -> bool {
        fn pop_from<V: Registered>(registry: &mut OverrideRegistry, applied: AppliedOverride) -> bool {
            let slot = V::slot_mut(registry);
            if slot.generation != applied.generation {
                tracing::trace!(kind = %V::KIND, "stale override handle ignored");
                return false;
            }
            slot.attribute
                .as_mut()
                .is_some_and(|attribute| attribute.pop_override(applied.token))
        }

        match applied.target {
            ValueSetKind::Physics => pop_from::<PhysicsValues>(self, applied),
            ValueSetKind::Movement => pop_from::<MovementValues>(self, applied),
            ValueSetKind::ActionInput => pop_from::<ActionInputValues>(self, applied),
            ValueSetKind::Permeation => pop_from::<PermeationValues>(self, applied),
        }
    }

    /// Pushes every entry of `bundle` in order.
    pub fn apply_bundle(&mut self, bundle: &OverrideBundle) -> BundleReceipt {
        let mut receipt = BundleReceipt::default();
        for entry in bundle.entries() {
            match self.push(entry.values, entry.kind) {
                Some(applied) => receipt.applied.push(applied),
                None => receipt.skipped += 1,
            }
        }
        receipt
    }

    /// Pops every layer recorded in `receipt`, newest first.
    pub fn remove_bundle(&mut self, receipt: BundleReceipt) {
        for applied in receipt.applied.into_iter().rev() {
            self.pop(applied);
        }
    }

    /// True when no registered attribute has a live layer.
    pub fn is_pristine(&self) -> bool {
        self.physics.attribute.as_ref().is_none_or(OverridableAttribute::is_pristine)
            && self.movement.attribute.as_ref().is_none_or(OverridableAttribute::is_pristine)
            && self
                .action_input
                .attribute
                .as_ref()
                .is_none_or(OverridableAttribute::is_pristine)
            && self
                .permeation
                .attribute
                .as_ref()
                .is_none_or(OverridableAttribute::is_pristine)
    }
}
