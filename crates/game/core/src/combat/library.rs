use std::collections::BTreeMap;

use crate::overrides::OverrideBundle;

/// Authored description of one attack.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackDefinition {
    pub name: String,
    /// Animation clip played when the attack starts.
    pub animation: String,
    /// Overrides held from startup until the attack finishes.
    pub overrides: OverrideBundle,
    /// Hit volumes armed once the attack commits.
    pub hit_volumes: Vec<String>,
}

impl AttackDefinition {
    pub fn new(name: impl Into<String>, animation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animation: animation.into(),
            ..Self::default()
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideBundle) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_hit_volumes<I, S>(mut self, volumes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hit_volumes = volumes.into_iter().map(Into::into).collect();
        self
    }
}

/// Attacks a character can perform, keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackLibrary {
    attacks: BTreeMap<String, AttackDefinition>,
}

impl AttackLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a definition, returning the one it replaced.
    pub fn insert(&mut self, definition: AttackDefinition) -> Option<AttackDefinition> {
        self.attacks.insert(definition.name.clone(), definition)
    }

    pub fn get(&self, name: &str) -> Option<&AttackDefinition> {
        self.attacks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attacks.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attacks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }
}

impl FromIterator<AttackDefinition> for AttackLibrary {
    fn from_iter<T: IntoIterator<Item = AttackDefinition>>(iter: T) -> Self {
        let mut library = Self::new();
        for definition in iter {
            library.insert(definition);
        }
        library
    }
}
