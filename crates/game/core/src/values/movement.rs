//! Locomotion constants.

use super::value_set;
use crate::error::ConfigError;

value_set! {
    /// How quickly input accelerates the character and how fast it may go.
    pub struct MovementValues: Movement {
        ground_acceleration: f32 = 60.0,
        air_acceleration: f32 = 30.0,
        max_ground_speed: f32 = 12.0,
        max_air_speed: f32 = 10.0,
        jump_speed: f32 = 14.0,
        /// Turn rate around the plane axis, radians per second.
        max_angular_speed: f32 = 12.0,
        /// Additional jumps allowed before landing.
        air_jumps: i32 = 0,
    }
}

impl MovementValues {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("ground_acceleration", self.ground_acceleration),
            ("air_acceleration", self.air_acceleration),
            ("max_ground_speed", self.max_ground_speed),
            ("max_air_speed", self.max_air_speed),
            ("jump_speed", self.jump_speed),
            ("max_angular_speed", self.max_angular_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.air_jumps < 0 {
            return Err(ConfigError::Negative {
                field: "air_jumps",
                value: self.air_jumps as f32,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_air_jumps_are_rejected() {
        let values = MovementValues {
            air_jumps: -1,
            ..Default::default()
        };
        assert_eq!(
            values.validate(),
            Err(ConfigError::Negative {
                field: "air_jumps",
                value: -1.0,
            })
        );
        MovementValues::default().validate().unwrap();
    }
}
