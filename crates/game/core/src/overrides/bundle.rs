//! Heterogeneous override bundles.

use crate::values::{AnyValues, ValueSetKind};

use super::OverrideKind;

/// One (value set, combination) pair inside a bundle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverrideEntry {
    pub values: AnyValues,
    pub kind: OverrideKind,
}

impl OverrideEntry {
    pub fn new(values: impl Into<AnyValues>, kind: OverrideKind) -> Self {
        Self {
            values: values.into(),
            kind,
        }
    }

    /// Kind of value set this entry targets.
    pub fn target(&self) -> ValueSetKind {
        self.values.kind()
    }
}

/// An ordered list of overrides spanning several value-set kinds.
///
/// Typical bundles describe a whole situation at once, for example "while
/// attacking: lock movement input, zero kinetic friction, zero gravity".
/// Applying a bundle yields a [`BundleReceipt`](super::BundleReceipt) that
/// removes exactly what was pushed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverrideBundle {
    entries: Vec<OverrideEntry>,
}

impl OverrideBundle {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, values: impl Into<AnyValues>, kind: OverrideKind) {
        self.entries.push(OverrideEntry::new(values, kind));
    }

    pub fn entries(&self) -> &[OverrideEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Builder methods
impl OverrideBundle {
    pub fn additive(mut self, values: impl Into<AnyValues>) -> Self {
        self.push(values, OverrideKind::Additive);
        self
    }

    pub fn multiplicative(mut self, values: impl Into<AnyValues>) -> Self {
        self.push(values, OverrideKind::Multiplicative);
        self
    }

    pub fn set(mut self, values: impl Into<AnyValues>) -> Self {
        self.push(values, OverrideKind::Set);
        self
    }
}

impl FromIterator<OverrideEntry> for OverrideBundle {
    fn from_iter<I: IntoIterator<Item = OverrideEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
