//! Overridable value sets.
//!
//! A value set is a fixed-layout record of named numeric constants owned by one
//! subsystem (physics, movement, action input, an ability). Value sets carry no
//! behavior beyond per-field arithmetic; layering lives in [`crate::overrides`].
//!
//! # Composition algebra
//!
//! ```text
//! add / sub / mul / div : per field, identities 0 and 1
//! set_by                : per field, source sentinel keeps the destination
//! ```
//!
//! Sentinels are `f32::INFINITY` for floats and vector components, `i32::MAX`
//! for ints.
mod action_input;
mod component;
mod movement;
mod permeation;
mod physics;

pub use action_input::ActionInputValues;
pub use component::{Component, FieldValue};
pub use movement::MovementValues;
pub use permeation::PermeationValues;
pub use physics::PhysicsValues;

/// Identity of a value-set kind.
///
/// The set of kinds is closed, so registries index a fixed table by this tag
/// instead of looking up runtime types.
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
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ValueSetKind {
    Physics,
    Movement,
    ActionInput,
    Permeation,
}

impl ValueSetKind {
    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Errors raised while building a value set from authored fields.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{kind} has no field named `{field}`")]
    UnknownField { kind: ValueSetKind, field: String },

    #[error("{kind}.{field} expects a {expected} value, got {found}")]
    KindMismatch {
        kind: ValueSetKind,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// A record of constants that can be layered by an overridable attribute.
pub trait ValueSet: Copy + PartialEq + core::fmt::Debug {
    const KIND: ValueSetKind;

    /// Field names in declaration order.
    const FIELDS: &'static [&'static str];

    /// Every field at its additive identity.
    fn zeroed() -> Self;

    /// Every field at its multiplicative identity.
    fn ones() -> Self;

    /// Every field at its sentinel.
    fn unset() -> Self;

    fn add_assign(&mut self, other: &Self);
    fn sub_assign(&mut self, other: &Self);
    fn mul_assign(&mut self, other: &Self);
    fn div_assign(&mut self, other: &Self);

    /// Copies every non-sentinel field of `other` over `self`.
    fn set_by(&mut self, other: &Self);

    /// Writes one named field from an authored value.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError>;

    /// Reads one named field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Declares a value-set record and its composition operators.
///
/// Each field names its primitive type and authored default. The generated
/// operators work directly over the named fields, so no intermediate arrays
/// are built during composition.
macro_rules! value_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident : $kind:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty = $default:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(default))]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default,)+
                }
            }
        }

        impl $crate::values::ValueSet for $name {
            const KIND: $crate::values::ValueSetKind = $crate::values::ValueSetKind::$kind;

            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn zeroed() -> Self {
                Self {
                    $($field: <$ty as $crate::values::Component>::ZERO,)+
                }
            }

            fn ones() -> Self {
                Self {
                    $($field: <$ty as $crate::values::Component>::ONE,)+
                }
            }

            fn unset() -> Self {
                Self {
                    $($field: <$ty as $crate::values::Component>::SENTINEL,)+
                }
            }

            fn add_assign(&mut self, other: &Self) {
                $(self.$field = $crate::values::Component::add(self.$field, other.$field);)+
            }

            fn sub_assign(&mut self, other: &Self) {
                $(self.$field = $crate::values::Component::sub(self.$field, other.$field);)+
            }

            fn mul_assign(&mut self, other: &Self) {
                $(self.$field = $crate::values::Component::mul(self.$field, other.$field);)+
            }

            fn div_assign(&mut self, other: &Self) {
                $(self.$field = $crate::values::Component::div(self.$field, other.$field);)+
            }

            fn set_by(&mut self, other: &Self) {
                $(self.$field = $crate::values::Component::set_by(self.$field, other.$field);)+
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::values::FieldValue,
            ) -> Result<(), $crate::values::FieldError> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::values::Component>::from_field(value)
                                .ok_or_else(|| $crate::values::FieldError::KindMismatch {
                                    kind: $crate::values::ValueSetKind::$kind,
                                    field: stringify!($field),
                                    expected: <$ty as $crate::values::Component>::KIND_NAME,
                                    found: value.kind_name(),
                                })?;
                            Ok(())
                        }
                    )+
                    _ => Err($crate::values::FieldError::UnknownField {
                        kind: $crate::values::ValueSetKind::$kind,
                        field: name.to_owned(),
                    }),
                }
            }

            fn field(&self, name: &str) -> Option<$crate::values::FieldValue> {
                match name {
                    $(stringify!($field) => Some($crate::values::Component::into_field(self.$field)),)+
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use value_set;

/// A value set of any kind, used where bundles mix kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyValues {
    Physics(PhysicsValues),
    Movement(MovementValues),
    ActionInput(ActionInputValues),
    Permeation(PermeationValues),
}

impl AnyValues {
    pub const fn kind(&self) -> ValueSetKind {
        match self {
            AnyValues::Physics(_) => ValueSetKind::Physics,
            AnyValues::Movement(_) => ValueSetKind::Movement,
            AnyValues::ActionInput(_) => ValueSetKind::ActionInput,
            AnyValues::Permeation(_) => ValueSetKind::Permeation,
        }
    }

    /// Builds a sparse value set: every field starts at `fill` for its kind and
    /// only the listed fields are written.
    ///
    /// Set layers use [`Fill::Unset`] so unlisted fields do not override.
    pub fn from_fields<'a>(
        kind: ValueSetKind,
        fill: Fill,
        fields: impl IntoIterator<Item = (&'a str, FieldValue)>,
    ) -> Result<Self, FieldError> {
        fn sparse<'a, V: ValueSet>(
            fill: Fill,
            fields: impl IntoIterator<Item = (&'a str, FieldValue)>,
        ) -> Result<V, FieldError> {
            let mut values = match fill {
                Fill::Zeroed => V::zeroed(),
                Fill::Ones => V::ones(),
                Fill::Unset => V::unset(),
            };
            for (name, value) in fields {
                values.set_field(name, value)?;
            }
            Ok(values)
        }

        Ok(match kind {
            ValueSetKind::Physics => AnyValues::Physics(sparse(fill, fields)?),
            ValueSetKind::Movement => AnyValues::Movement(sparse(fill, fields)?),
            ValueSetKind::ActionInput => AnyValues::ActionInput(sparse(fill, fields)?),
            ValueSetKind::Permeation => AnyValues::Permeation(sparse(fill, fields)?),
        })
    }
}

/// Starting point for a sparse value set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    /// Additive identity.
    Zeroed,
    /// Multiplicative identity.
    Ones,
    /// Sentinel everywhere.
    Unset,
}

impl From<PhysicsValues> for AnyValues {
    fn from(values: PhysicsValues) -> Self {
        AnyValues::Physics(values)
    }
}

impl From<MovementValues> for AnyValues {
    fn from(values: MovementValues) -> Self {
        AnyValues::Movement(values)
    }
}

impl From<ActionInputValues> for AnyValues {
    fn from(values: ActionInputValues) -> Self {
        AnyValues::ActionInput(values)
    }
}

impl From<PermeationValues> for AnyValues {
    fn from(values: PermeationValues) -> Self {
        AnyValues::Permeation(values)
    }
}
