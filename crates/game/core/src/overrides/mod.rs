//! Layered overrides over authored value sets.
//!
//! # Architecture
//!
//! ```text
//! [ OverridableAttribute<V> ]  base + additive + multiplicative + Set layers
//!      ↑ push / pop (token keyed)
//! [ OverrideRegistry ]         one attribute per ValueSetKind, per character
//!      ↑ apply / remove
//! [ OverrideBundle ]           heterogeneous list authored per attack/ability
//! ```
//!
//! Every push hands back a token (or a receipt for bundles). Owners must pop
//! what they pushed on every exit path, flinch and shutdown included; a leaked
//! layer silently skews every later resolve.

mod attribute;
mod bundle;
mod registry;

pub use attribute::{OverridableAttribute, OverrideKind, OverrideToken};
pub use bundle::{OverrideBundle, OverrideEntry};
pub use registry::{AppliedOverride, BundleReceipt, OverrideRegistry, Registered, RegistryError};
