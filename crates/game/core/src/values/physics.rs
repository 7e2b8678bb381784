//! Physics constants consumed by the planar integrator.

use glam::Vec3;

use super::value_set;
use crate::error::ConfigError;

value_set! {
    /// Friction, drag, gravity and instability tuning for one character.
    ///
    /// Angles are in degrees, durations in seconds, everything else in world
    /// units per second (squared where it is an acceleration).
    pub struct PhysicsValues: Physics {
        /// Steepest slope on which a slow character sticks in place.
        static_friction_max_slope: f32 = 30.0,
        /// Speed below which static friction engages.
        static_friction_speed: f32 = 0.5,
        kinetic_friction: f32 = 15.0,
        /// Extra friction on steep slopes once past `extra_kinetic_friction_speed`.
        extra_kinetic_friction: f32 = 10.0,
        extra_kinetic_friction_speed: f32 = 20.0,
        air_drag: f32 = 2.0,
        extra_air_drag: f32 = 4.0,
        extra_air_drag_speed: f32 = 25.0,
        gravity: Vec3 = Vec3::new(0.0, -30.0, 0.0),
        downhill_gravity_scale: f32 = 1.0,
        uphill_gravity_scale: f32 = 1.0,
        terminal_velocity: f32 = 40.0,
        terminal_deceleration: f32 = 60.0,
        constant_acceleration: Vec3 = Vec3::ZERO,
        /// Time on an overhanging surface before it starts shedding speed.
        upside_down_duration: f32 = 0.25,
        upside_down_deceleration: f32 = 1.0,
        /// Minimum speed needed to stay attached to unstable surfaces.
        attach_speed: f32 = 6.0,
        sideways_duration: f32 = 0.25,
        sideways_deceleration: f32 = 1.0,
        angular_drag: f32 = 20.0,
    }
}

impl PhysicsValues {
    /// Checks authored constants before they reach the tick.
    ///
    /// The integrator never validates; a bad constant only shows up as a NaN
    /// velocity, so loaders call this once per profile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("static_friction_speed", self.static_friction_speed),
            ("kinetic_friction", self.kinetic_friction),
            ("extra_kinetic_friction", self.extra_kinetic_friction),
            ("air_drag", self.air_drag),
            ("extra_air_drag", self.extra_air_drag),
            ("terminal_deceleration", self.terminal_deceleration),
            ("upside_down_duration", self.upside_down_duration),
            ("sideways_duration", self.sideways_duration),
            ("attach_speed", self.attach_speed),
            ("angular_drag", self.angular_drag),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !(0.0..=90.0).contains(&self.static_friction_max_slope) {
            return Err(ConfigError::OutOfRange {
                field: "static_friction_max_slope",
                value: self.static_friction_max_slope,
                min: 0.0,
                max: 90.0,
            });
        }

        if !self.terminal_velocity.is_finite() || self.terminal_velocity <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "terminal_velocity",
                value: self.terminal_velocity,
            });
        }

        for (field, value) in [
            ("gravity", self.gravity),
            ("constant_acceleration", self.constant_acceleration),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteVector { field });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        PhysicsValues::default().validate().unwrap();
    }

    #[test]
    fn negative_friction_is_rejected() {
        let values = PhysicsValues {
            kinetic_friction: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            values.validate(),
            Err(ConfigError::Negative {
                field: "kinetic_friction",
                ..
            })
        ));
    }

    #[test]
    fn zero_terminal_velocity_is_rejected() {
        let values = PhysicsValues {
            terminal_velocity: 0.0,
            ..Default::default()
        };
        assert!(values.validate().is_err());
    }
}
