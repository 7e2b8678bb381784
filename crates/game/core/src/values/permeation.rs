//! Surface-permeation ability constants.

use super::value_set;
use crate::error::ConfigError;

value_set! {
    /// Tuning for passing through permeable surfaces.
    pub struct PermeationValues: Permeation {
        /// Speed needed to enter a permeable surface.
        entry_speed: f32 = 8.0,
        /// Speed added along the travel direction on exit.
        exit_boost: f32 = 6.0,
        max_duration: f32 = 0.6,
        cooldown: f32 = 0.5,
        /// Invulnerability granted on entry, seconds.
        invulnerability: f32 = 0.3,
        /// Speed held while inside the surface.
        min_speed: f32 = 10.0,
    }
}

impl PermeationValues {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("entry_speed", self.entry_speed),
            ("exit_boost", self.exit_boost),
            ("max_duration", self.max_duration),
            ("cooldown", self.cooldown),
            ("invulnerability", self.invulnerability),
            ("min_speed", self.min_speed),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_duration_is_rejected() {
        let values = PermeationValues {
            max_duration: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            values.validate(),
            Err(ConfigError::Negative {
                field: "max_duration",
                ..
            })
        ));
        PermeationValues::default().validate().unwrap();
    }
}
