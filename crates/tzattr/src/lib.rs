//! # Tzattr Architecture
//!
//! Tzattr makes model attributes **time-zone aware** without touching the
//! converters that cast them. A base converter (say, the one for `datetime`
//! columns) is wrapped by a decorator that moves every point in time into one
//! canonical zone on read, and reads user input in that zone on write.
//!
//! ## The Decoration Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ModelHierarchy::derive (model.rs)                          │
//! │  - Copies the parent's policy and decoration table          │
//! │  - Runs every SubclassHook on the new class                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  DecorationPolicy (policy.rs)                               │
//! │  - Registers matcher + factory under _time_zone_conversion  │
//! │  - Matcher reads the derived class's own policy             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TypeDecorations::apply (decorations.rs)                    │
//! │  - Runs on schema load, once per attribute                  │
//! │  - Wraps matching base converters                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TemporalConverter (temporal.rs)                            │
//! │  - Normalizes reads, parses writes in the canonical zone    │
//! │  - Forwards everything else to the wrapped converter        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Model
//!
//! Malformed temporal user input never surfaces as an error: it becomes
//! [`Value::Null`]. Storage errors from the wrapped converter propagate as-is.
//!
//! ## Module Overview
//!
//! - [`temporal`]: The time-zone-aware converter decorator
//! - [`policy`]: Decoration decisions and the subclass hook
//! - [`decorations`]: Tag-keyed decoration tables
//! - [`model`]: Class arena, derivation and attribute resolution
//! - [`converter`]: The converter contract and base type tags
//! - [`value`]: Values and classified user input
//! - [`zone`]: Canonical zone conversion and parsing
//! - [`deprecation`]: One-time notices
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod config;
pub mod converter;
pub mod decorations;
pub mod deprecation;
pub mod error;
pub mod model;
pub mod policy;
pub mod temporal;
pub mod value;
pub mod zone;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use config::Settings;
pub use converter::{Converter, TypeTag};
pub use decorations::{DecoratorTag, ResolveContext, TypeDecoratorRegistry, TypeDecorations};
pub use deprecation::{DeprecationSink, MemoryDeprecations, TracingDeprecations};
pub use error::{CastError, ConfigError, ConvertError, ModelError};
pub use model::{Attribute, ClassId, ModelHierarchy};
pub use policy::{
    DecorationPolicy, GlobalConfig, PolicyConfig, SubclassHook, TIME_ZONE_CONVERSION,
};
pub use temporal::{TemporalConverter, UntypedInputPolicy};
pub use value::{UserInput, Value};
pub use zone::CanonicalZone;
