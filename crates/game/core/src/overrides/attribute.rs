//! A value set plus its live override layers.

use core::fmt;

use crate::values::{Fill, ValueSet};

/// How an override layer combines with the authored base.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OverrideKind {
    /// Added to the running additive accumulator.
    Additive,
    /// Scales the running multiplicative accumulator.
    Multiplicative,
    /// Replaces every non-sentinel field; later layers win.
    Set,
}

impl OverrideKind {
    /// Neutral starting point for a sparse layer of this kind, so fields the
    /// author left out have no effect.
    pub const fn sparse_fill(self) -> Fill {
        match self {
            OverrideKind::Additive => Fill::Zeroed,
            OverrideKind::Multiplicative => Fill::Ones,
            OverrideKind::Set => Fill::Unset,
        }
    }
}

/// Handle identifying one pushed layer.
///
/// Pops are keyed on this handle, so two value-equal Set layers can be removed
/// independently and in any order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverrideToken(u32);

impl OverrideToken {
    /// Token of the identity Set layer at index 0. Never handed out.
    const PLACEHOLDER: Self = Self(0);

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OverrideToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Layer<V> {
    token: OverrideToken,
    kind: OverrideKind,
    values: V,
}

/// Authored base values layered with additive, multiplicative and Set
/// overrides.
///
/// ```text
/// current = ((0 + base) set_by fold(set_layers)) * multiplied + added
/// ```
///
/// `current` is recomputed on every push and pop, so readers never observe a
/// stale composition.
///
/// # Example
///
/// ```
/// # use kinetic_core::overrides::{OverridableAttribute, OverrideKind};
/// # use kinetic_core::values::{PhysicsValues, ValueSet};
/// let mut physics = OverridableAttribute::new(PhysicsValues::default());
///
/// let mut no_friction = PhysicsValues::unset();
/// no_friction.kinetic_friction = 0.0;
/// let token = physics.push_override(no_friction, OverrideKind::Set);
/// assert_eq!(physics.current().kinetic_friction, 0.0);
///
/// physics.pop_override(token);
/// assert_eq!(physics.current(), physics.base());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OverridableAttribute<V: ValueSet> {
    base: V,
    added: V,
    multiplied: V,
    /// Ordered Set layers; index 0 is the all-sentinel placeholder.
    set_layers: Vec<Layer<V>>,
    /// Live additive and multiplicative layers in push order.
    stacked: Vec<Layer<V>>,
    current: V,
    next_token: u32,
}

impl<V: ValueSet> OverridableAttribute<V> {
    pub fn new(base: V) -> Self {
        let mut attribute = Self {
            base,
            added: V::zeroed(),
            multiplied: V::ones(),
            set_layers: vec![Layer {
                token: OverrideToken::PLACEHOLDER,
                kind: OverrideKind::Set,
                values: V::unset(),
            }],
            stacked: Vec::new(),
            current: base,
            next_token: 1,
        };
        attribute.current = attribute.resolve();
        attribute
    }

    /// Authored values, untouched by overrides.
    #[inline]
    pub fn base(&self) -> V {
        self.base
    }

    /// Replaces the authored values. Live layers stay in place.
    ///
    /// Authoring-time only; the tick never rewrites tuning data.
    pub fn set_base(&mut self, base: V) {
        self.base = base;
        self.current = self.resolve();
    }

    /// Resolved values as of the last push or pop.
    #[inline]
    pub fn current(&self) -> V {
        self.current
    }

    #[inline]
    pub fn added(&self) -> V {
        self.added
    }

    #[inline]
    pub fn multiplied(&self) -> V {
        self.multiplied
    }

    /// Number of live layers, not counting the placeholder.
    pub fn layer_count(&self) -> usize {
        self.set_layers.len() - 1 + self.stacked.len()
    }

    /// True when no override is live.
    pub fn is_pristine(&self) -> bool {
        self.layer_count() == 0
    }

    /// Set layers in fold order, placeholder excluded.
    pub fn set_layers(&self) -> impl Iterator<Item = (OverrideToken, &V)> + '_ {
        self.set_layers
            .iter()
            .skip(1)
            .map(|layer| (layer.token, &layer.values))
    }

    /// Composes base and layers from scratch. Pure and idempotent.
    pub fn resolve(&self) -> V {
        let mut values = V::zeroed();
        values.add_assign(&self.base);
        for layer in &self.set_layers {
            values.set_by(&layer.values);
        }
        values.mul_assign(&self.multiplied);
        values.add_assign(&self.added);
        values
    }

    /// Activates a layer and returns the token that removes it.
    ///
    /// Pushing equal values twice yields two tokens; each must be popped.
    pub fn push_override(&mut self, values: V, kind: OverrideKind) -> OverrideToken {
        let token = OverrideToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1).max(1);

        let layer = Layer {
            token,
            kind,
            values,
        };
        match kind {
            OverrideKind::Additive => {
                self.added.add_assign(&values);
                self.stacked.push(layer);
            }
            OverrideKind::Multiplicative => {
                self.multiplied.mul_assign(&values);
                self.stacked.push(layer);
            }
            OverrideKind::Set => self.set_layers.push(layer),
        }

        self.current = self.resolve();
        tracing::trace!(kind = %V::KIND, %token, layer = %kind, "override pushed");
        token
    }

    /// Deactivates the layer created by `token`.
    ///
    /// Returns `false` and changes nothing when the token is not live, which
    /// covers double pops and tokens from another attribute.
    pub fn pop_override(&mut self, token: OverrideToken) -> bool {
        if token == OverrideToken::PLACEHOLDER {
            return false;
        }

        if let Some(index) = self.set_layers.iter().position(|l| l.token == token) {
            self.set_layers.remove(index);
        } else if let Some(index) = self.stacked.iter().position(|l| l.token == token) {
            self.stacked.remove(index);
            self.rebuild_accumulators();
        } else {
            tracing::trace!(kind = %V::KIND, %token, "pop of unknown override ignored");
            return false;
        }

        self.current = self.resolve();
        tracing::trace!(kind = %V::KIND, %token, "override popped");
        true
    }

    /// Refolds `added` and `multiplied` from the live layers. Inverting a
    /// popped layer instead would leave float residue behind.
    fn rebuild_accumulators(&mut self) {
        let mut added = V::zeroed();
        let mut multiplied = V::ones();
        for layer in &self.stacked {
            match layer.kind {
                OverrideKind::Additive => added.add_assign(&layer.values),
                OverrideKind::Multiplicative => multiplied.mul_assign(&layer.values),
                OverrideKind::Set => {}
            }
        }
        self.added = added;
        self.multiplied = multiplied;
    }
}

impl<V: ValueSet + Default> Default for OverridableAttribute<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::values::{ActionInputValues, MovementValues, PhysicsValues};

    #[test]
    fn fresh_attribute_resolves_to_base() {
        let base = PhysicsValues {
            kinetic_friction: 7.5,
            gravity: Vec3::new(0.0, -12.0, 0.0),
            ..Default::default()
        };
        let attribute = OverridableAttribute::new(base);

        assert_eq!(attribute.current(), base);
        assert_eq!(attribute.resolve(), base);
        assert!(attribute.is_pristine());
    }

    #[test]
    fn additive_round_trip_restores_current() {
        let mut attribute = OverridableAttribute::new(MovementValues::default());
        let before = attribute.current();

        let mut bonus = MovementValues::zeroed();
        bonus.max_ground_speed = 4.0;
        bonus.air_jumps = 1;
        let token = attribute.push_override(bonus, OverrideKind::Additive);

        assert_eq!(attribute.current().max_ground_speed, before.max_ground_speed + 4.0);
        assert_eq!(attribute.current().air_jumps, before.air_jumps + 1);

        assert!(attribute.pop_override(token));
        assert_eq!(attribute.current(), before);
    }

    #[test]
    fn multiplicative_round_trip_restores_current() {
        let mut attribute = OverridableAttribute::new(PhysicsValues::default());
        let before = attribute.current();

        let mut half_friction = PhysicsValues::ones();
        half_friction.kinetic_friction = 0.5;
        let token = attribute.push_override(half_friction, OverrideKind::Multiplicative);
        assert_eq!(attribute.current().kinetic_friction, before.kinetic_friction * 0.5);

        attribute.pop_override(token);
        assert_eq!(attribute.current(), before);
    }

    #[test]
    fn sentinel_fields_never_clobber_earlier_set_layers() {
        let mut attribute = OverridableAttribute::new(PhysicsValues::default());

        let mut first = PhysicsValues::unset();
        first.kinetic_friction = 5.0;
        let mut second = PhysicsValues::unset();
        second.air_drag = 9.0;

        attribute.push_override(first, OverrideKind::Set);
        attribute.push_override(second, OverrideKind::Set);

        assert_eq!(attribute.current().kinetic_friction, 5.0);
        assert_eq!(attribute.current().air_drag, 9.0);
    }

    #[test]
    fn later_set_layer_wins_and_earlier_resurfaces_on_pop() {
        let mut attribute = OverridableAttribute::new(PhysicsValues::default());

        let mut low = PhysicsValues::unset();
        low.terminal_velocity = 10.0;
        let mut high = PhysicsValues::unset();
        high.terminal_velocity = 80.0;

        attribute.push_override(low, OverrideKind::Set);
        let high_token = attribute.push_override(high, OverrideKind::Set);
        assert_eq!(attribute.current().terminal_velocity, 80.0);

        attribute.pop_override(high_token);
        assert_eq!(attribute.current().terminal_velocity, 10.0);
    }

    #[test]
    fn equal_set_layers_are_popped_by_identity() {
        let mut attribute = OverridableAttribute::new(ActionInputValues::default());

        let first = attribute.push_override(ActionInputValues::LOCKED, OverrideKind::Set);
        let second = attribute.push_override(ActionInputValues::LOCKED, OverrideKind::Set);
        assert_ne!(first, second);

        attribute.pop_override(second);
        assert!(!attribute.current().move_allowed());
        let remaining: Vec<_> = attribute.set_layers().map(|(token, _)| token).collect();
        assert_eq!(remaining, vec![first]);

        attribute.pop_override(first);
        assert!(attribute.current().move_allowed());
        assert!(attribute.is_pristine());
    }

    #[test]
    fn composition_order_is_set_then_multiply_then_add() {
        let mut attribute = OverridableAttribute::new(MovementValues {
            jump_speed: 10.0,
            ..Default::default()
        });

        let mut add = MovementValues::zeroed();
        add.jump_speed = 1.0;
        let mut mul = MovementValues::ones();
        mul.jump_speed = 2.0;
        let mut set = MovementValues::unset();
        set.jump_speed = 3.0;

        attribute.push_override(add, OverrideKind::Additive);
        attribute.push_override(mul, OverrideKind::Multiplicative);
        attribute.push_override(set, OverrideKind::Set);

        // (3 * 2) + 1
        assert_eq!(attribute.current().jump_speed, 7.0);
    }

    #[test]
    fn popping_additive_layers_in_push_order_leaves_no_residue() {
        let mut attribute = OverridableAttribute::new(PhysicsValues::default());
        let base = attribute.base();

        let mut light = PhysicsValues::zeroed();
        light.constant_acceleration = Vec3::new(0.1, 0.0, 0.0);
        let mut strong = PhysicsValues::zeroed();
        strong.constant_acceleration = Vec3::new(0.2, 0.0, 0.0);
        let first = attribute.push_override(light, OverrideKind::Additive);
        let second = attribute.push_override(strong, OverrideKind::Additive);

        assert!(attribute.pop_override(first));
        assert_eq!(attribute.current().constant_acceleration, Vec3::new(0.2, 0.0, 0.0));
        assert!(attribute.pop_override(second));

        assert!(attribute.is_pristine());
        assert_eq!(attribute.added(), PhysicsValues::zeroed());
        assert_eq!(attribute.current(), base);
    }

    #[test]
    fn jump_speed_layers_unwind_exactly() {
        let mut attribute = OverridableAttribute::new(MovementValues::default());
        let base = attribute.current();

        let mut small = MovementValues::zeroed();
        small.jump_speed = 0.1;
        let mut large = MovementValues::zeroed();
        large.jump_speed = 0.2;
        let first = attribute.push_override(small, OverrideKind::Additive);
        let second = attribute.push_override(large, OverrideKind::Additive);

        attribute.pop_override(first);
        attribute.pop_override(second);
        assert_eq!(attribute.added().jump_speed, 0.0);
        assert_eq!(attribute.current(), base);
    }

    #[test]
    fn zero_multiplier_layer_can_be_popped() {
        let mut attribute = OverridableAttribute::new(PhysicsValues::default());
        let base = attribute.current();

        let mut frozen = PhysicsValues::ones();
        frozen.kinetic_friction = 0.0;
        let token = attribute.push_override(frozen, OverrideKind::Multiplicative);
        assert_eq!(attribute.current().kinetic_friction, 0.0);

        assert!(attribute.pop_override(token));
        assert_eq!(attribute.current(), base);
    }

    #[test]
    fn double_pop_is_a_no_op() {
        let mut attribute = OverridableAttribute::new(MovementValues::default());
        let mut bonus = MovementValues::zeroed();
        bonus.jump_speed = 2.0;
        let token = attribute.push_override(bonus, OverrideKind::Additive);

        assert!(attribute.pop_override(token));
        let after_first = attribute.current();
        assert!(!attribute.pop_override(token));
        assert_eq!(attribute.current(), after_first);
    }

    #[test]
    fn set_base_keeps_live_layers() {
        let mut attribute = OverridableAttribute::new(PhysicsValues::default());
        let mut pin = PhysicsValues::unset();
        pin.gravity = Vec3::ZERO;
        attribute.push_override(pin, OverrideKind::Set);

        attribute.set_base(PhysicsValues {
            gravity: Vec3::new(0.0, -50.0, 0.0),
            air_drag: 1.0,
            ..Default::default()
        });

        assert_eq!(attribute.current().gravity, Vec3::ZERO);
        assert_eq!(attribute.current().air_drag, 1.0);
    }
}
