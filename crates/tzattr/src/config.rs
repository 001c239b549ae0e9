//! # Configuration
//!
//! Settings are managed by [`confique`], which layers environment variables
//! over TOML files over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `TZATTR_TIME_ZONE_AWARE_ATTRIBUTES`, `TZATTR_DEFAULT_TIMEZONE`.
//! 2. **Files**, in the order given to [`Settings::load`]; earlier files win.
//! 3. **Compiled defaults** via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `time_zone_aware_attributes` | `false` | Global switch |
//! | `default_timezone` | `"UTC"` | Canonical zone: `UTC`, `Z` or `±HH:MM` |
//! | `untyped_user_input` | `"delegate"` | `delegate` or `drop` input with no zone reading |
//! | `skip_time_zone_conversion_for_attributes` | `[]` | Attribute names of the root class to leave alone |
//! | `time_zone_aware_types` | `["datetime", "not_explicitly_configured"]` | Allow-list of base types |
//!
//! The last two seed the root class's policy; derived classes copy it.

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::converter::TypeTag;
use crate::error::ConfigError;
use crate::model::ModelHierarchy;
use crate::policy::{GlobalConfig, PolicyConfig};
use crate::temporal::UntypedInputPolicy;
use crate::zone::CanonicalZone;

/// Settings for time-zone-aware attributes, usually stored in `tzattr.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Turn time-zone conversion on for every model class.
    #[config(default = false, env = "TZATTR_TIME_ZONE_AWARE_ATTRIBUTES")]
    pub time_zone_aware_attributes: bool,

    /// Zone points in time are normalized to.
    #[config(default = "UTC", env = "TZATTR_DEFAULT_TIMEZONE")]
    pub default_timezone: String,

    /// What to do with user input that has no time-zone reading.
    #[config(default = "delegate")]
    pub untyped_user_input: UntypedInputPolicy,

    /// Attributes excluded from conversion on the root class.
    #[config(default = [])]
    pub skip_time_zone_conversion_for_attributes: Vec<String>,

    /// Base types whose attributes are converted.
    #[config(default = ["datetime", "not_explicitly_configured"])]
    pub time_zone_aware_types: Vec<TypeTag>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_zone_aware_attributes: false,
            default_timezone: "UTC".to_string(),
            untyped_user_input: UntypedInputPolicy::Delegate,
            skip_time_zone_conversion_for_attributes: Vec::new(),
            time_zone_aware_types: vec![TypeTag::DateTime, TypeTag::NotExplicitlyConfigured],
        }
    }
}

impl Settings {
    /// Load settings from the environment and `files`. Missing files are skipped.
    pub fn load<P: AsRef<Path>>(files: &[P]) -> Result<Self, ConfigError> {
        let mut builder = Settings::builder().env();
        for file in files {
            builder = builder.file(file.as_ref().to_path_buf());
        }
        Ok(builder.load()?)
    }

    pub fn global_config(&self) -> Result<GlobalConfig, ConfigError> {
        Ok(GlobalConfig {
            time_zone_aware_attributes: self.time_zone_aware_attributes,
            default_timezone: CanonicalZone::parse(&self.default_timezone)?,
            untyped_input: self.untyped_user_input,
        })
    }

    pub fn root_policy(&self) -> PolicyConfig {
        PolicyConfig::new(
            self.skip_time_zone_conversion_for_attributes.iter().cloned(),
            self.time_zone_aware_types.iter().cloned(),
        )
    }

    /// Build a hierarchy whose root class carries these settings.
    pub fn hierarchy(&self) -> Result<ModelHierarchy, ConfigError> {
        Ok(ModelHierarchy::new(self.global_config()?, self.root_policy()))
    }
}
