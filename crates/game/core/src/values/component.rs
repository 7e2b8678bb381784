//! Per-field composition algebra.
//!
//! Every field of a value set is one of three primitive kinds. Each kind knows
//! its additive identity, its multiplicative identity and the sentinel that
//! marks "no override" inside a Set layer.

use glam::Vec3;

/// A raw field value as it appears in authored content.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    Float(f32),
    Int(i32),
    Vector(Vec3),
}

impl FieldValue {
    /// Short name of the primitive kind, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Float(_) => "float",
            FieldValue::Int(_) => "int",
            FieldValue::Vector(_) => "vector",
        }
    }
}

/// A primitive field kind that participates in override composition.
pub trait Component: Copy + PartialEq + core::fmt::Debug {
    /// Identity of additive layers.
    const ZERO: Self;
    /// Identity of multiplicative layers.
    const ONE: Self;
    /// "Does not override" marker for Set layers.
    const SENTINEL: Self;
    /// Matches [`FieldValue::kind_name`].
    const KIND_NAME: &'static str;

    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn mul(self, other: Self) -> Self;
    /// Per-field division. For integers, dividing by zero returns `self`
    /// unchanged instead of panicking; floats follow IEEE rules.
    fn div(self, other: Self) -> Self;

    /// Returns `other` unless it is the sentinel, in which case `self` is kept.
    /// Vectors apply this per component.
    fn set_by(self, other: Self) -> Self;

    /// Converts an authored field value, or `None` on a kind mismatch.
    fn from_field(value: FieldValue) -> Option<Self>;

    fn into_field(self) -> FieldValue;
}

impl Component for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const SENTINEL: Self = f32::INFINITY;
    const KIND_NAME: &'static str = "float";

    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn sub(self, other: Self) -> Self {
        self - other
    }

    #[inline]
    fn mul(self, other: Self) -> Self {
        self * other
    }

    #[inline]
    fn div(self, other: Self) -> Self {
        self / other
    }

    #[inline]
    fn set_by(self, other: Self) -> Self {
        if other == Self::SENTINEL { self } else { other }
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(v),
            // Authors frequently write `0` where `0.0` is meant.
            FieldValue::Int(v) => Some(v as f32),
            FieldValue::Vector(_) => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Float(self)
    }
}

impl Component for i32 {
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const SENTINEL: Self = i32::MAX;
    const KIND_NAME: &'static str = "int";

    // Wrapping keeps additive push/pop exactly reversible.
    #[inline]
    fn add(self, other: Self) -> Self {
        self.wrapping_add(other)
    }

    #[inline]
    fn sub(self, other: Self) -> Self {
        self.wrapping_sub(other)
    }

    #[inline]
    fn mul(self, other: Self) -> Self {
        self.wrapping_mul(other)
    }

    /// Division by zero keeps `self`.
    #[inline]
    fn div(self, other: Self) -> Self {
        self.checked_div(other).unwrap_or(self)
    }

    #[inline]
    fn set_by(self, other: Self) -> Self {
        if other == Self::SENTINEL { self } else { other }
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(v) => Some(v),
            FieldValue::Float(_) | FieldValue::Vector(_) => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Int(self)
    }
}

impl Component for Vec3 {
    const ZERO: Self = Vec3::ZERO;
    const ONE: Self = Vec3::ONE;
    const SENTINEL: Self = Vec3::INFINITY;
    const KIND_NAME: &'static str = "vector";

    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn sub(self, other: Self) -> Self {
        self - other
    }

    #[inline]
    fn mul(self, other: Self) -> Self {
        self * other
    }

    #[inline]
    fn div(self, other: Self) -> Self {
        self / other
    }

    #[inline]
    fn set_by(self, other: Self) -> Self {
        Vec3::new(
            self.x.set_by(other.x),
            self.y.set_by(other.y),
            self.z.set_by(other.z),
        )
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Vector(v) => Some(v),
            FieldValue::Float(_) | FieldValue::Int(_) => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Vector(self)
    }
}
