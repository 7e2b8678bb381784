//! Common error infrastructure for kinetic-core.
//!
//! The per-tick path is total: integrator, attribute and state machine calls
//! never fail on valid inputs and never check for invalid ones. Errors exist
//! only at the edges, where content is validated, registries are wired up and
//! glue asks for attacks by name.
//!
//! Domain errors (`RegistryError`, `AttackError`) live beside the code that
//! raises them; this module holds the shared classification and the
//! authoring-time [`ConfigError`].

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Invalid input from glue code; the call had no effect.
    ///
    /// Examples: unknown attack name
    Validation,

    /// Invalid authored data; the content must be fixed before use.
    ///
    /// Examples: negative friction, zero terminal velocity
    Configuration,

    /// Wiring mistake made while assembling a character.
    ///
    /// Examples: two attributes registered for the same kind
    Internal,
}

impl ErrorSeverity {
    /// Returns true if the caller can carry on with the tick.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation)
    }
}

/// Common trait for all kinetic-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on who has to fix it, not on impact
pub trait SimError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Authored constant rejected by a `validate()` call.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a finite non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field} has a non-finite component")]
    NonFiniteVector { field: &'static str },

    #[error("tick rate must be at least 1 Hz, got {0}")]
    TickRate(u32),
}

impl SimError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Configuration
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Negative { .. } => "CONFIG_NEGATIVE",
            Self::NotPositive { .. } => "CONFIG_NOT_POSITIVE",
            Self::OutOfRange { .. } => "CONFIG_OUT_OF_RANGE",
            Self::NonFiniteVector { .. } => "CONFIG_NON_FINITE_VECTOR",
            Self::TickRate(_) => "CONFIG_TICK_RATE",
        }
    }
}
