use crate::error::ConfigError;
use crate::values::{ActionInputValues, MovementValues, PermeationValues, PhysicsValues};

/// Authored base constants for one character.
///
/// The only persisted state: loaded once, validated, then copied into the
/// base of each attribute when a character spawns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharacterProfile {
    pub name: String,
    pub physics: PhysicsValues,
    pub movement: MovementValues,
    pub action_input: ActionInputValues,
    /// Present when the character has the surface permeation ability.
    pub permeation: Option<PermeationValues>,
}

impl CharacterProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_permeation(mut self, permeation: PermeationValues) -> Self {
        self.permeation = Some(permeation);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.movement.validate()?;
        if let Some(permeation) = &self.permeation {
            permeation.validate()?;
        }
        Ok(())
    }
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self {
            name: "default".to_owned(),
            physics: PhysicsValues::default(),
            movement: MovementValues::default(),
            action_input: ActionInputValues::default(),
            permeation: None,
        }
    }
}
