use crate::error::ConfigError;

/// Simulation configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Fixed simulation steps per second.
    pub tick_rate: u32,
}

impl SimConfig {
    // ===== compile-time constants used as type parameters =====
    /// Events one attack call can emit (cancel + finish + restart + animation).
    pub const MAX_ATTACK_EVENTS: usize = 8;
    /// Hit-detection volumes owned by one attacker.
    pub const MAX_HIT_VOLUMES: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_RATE: u32 = 60;

    pub fn new() -> Self {
        Self {
            tick_rate: Self::DEFAULT_TICK_RATE,
        }
    }

    pub fn with_tick_rate(tick_rate: u32) -> Self {
        Self { tick_rate }
    }

    /// Seconds per tick.
    #[inline]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Number of whole ticks covering `seconds`, at least one for any positive
    /// duration.
    pub fn ticks_for(&self, seconds: f32) -> u64 {
        if seconds <= 0.0 || !seconds.is_finite() {
            return 0;
        }
        ((seconds * self.tick_rate as f32).ceil() as u64).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::TickRate(self.tick_rate));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_round_up() {
        let config = SimConfig::with_tick_rate(60);
        assert_eq!(config.ticks_for(0.0), 0);
        assert_eq!(config.ticks_for(0.001), 1);
        assert_eq!(config.ticks_for(0.5), 30);
        assert_eq!(config.ticks_for(0.51), 31);
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        assert_eq!(
            SimConfig::with_tick_rate(0).validate(),
            Err(ConfigError::TickRate(0))
        );
    }
}
