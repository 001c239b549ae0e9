//! # Decoration Policy
//!
//! Decides, per attribute, whether reads and writes go through a
//! [`TemporalConverter`], and installs that decision on every derived class.
//!
//! ## Configuration Layers
//!
//! | Layer | Type | Scope |
//! |-------|------|-------|
//! | `time_zone_aware_attributes` | [`GlobalConfig`] | whole process, not inherited |
//! | excluded attribute names | [`PolicyConfig`] | per class, copied on derivation |
//! | allowed base types | [`PolicyConfig`] | per class, copied on derivation |
//!
//! An attribute is decorated when the global switch is on, its name is not
//! excluded, and its base type tag is in the allow-list.
//!
//! ## Per-Class Registration
//!
//! A derived class inherits its parent's decoration table, whose matcher
//! evaluates the *parent's* policy. [`DecorationPolicy::on_subclass_derived`]
//! therefore runs for every new class and re-registers the matcher under the
//! fixed [`TIME_ZONE_CONVERSION`] tag, this time bound to the new class id.
//! The inherited entry is replaced, never stacked.
//!
//! ## Legacy `time` Columns
//!
//! The default allow-list holds the `not_explicitly_configured` sentinel.
//! While it is present, a `time` attribute that would otherwise be decorated
//! triggers a one-time deprecation notice announcing that bare time columns
//! will become zone aware. The notice never changes the decision.

use std::collections::BTreeSet;

use crate::converter::TypeTag;
use crate::decorations::{factory, matcher, DecoratorTag, TypeDecoratorRegistry};
use crate::deprecation::DeprecationSink;
use crate::model::ClassId;
use crate::temporal::{TemporalConverter, UntypedInputPolicy};
use crate::zone::CanonicalZone;

/// Tag the time-zone decoration is registered under.
pub const TIME_ZONE_CONVERSION: DecoratorTag = DecoratorTag::new("_time_zone_conversion");

/// Key of the legacy `time` column notice.
pub const TIME_COLUMN_DEPRECATION: &str = "time_zone_aware_time_columns";

const TIME_COLUMN_NOTICE: &str = "\
Time columns will become time zone aware in a future release: text assigned \
to a `time` attribute will be parsed in the canonical zone and times read from \
storage will be converted to it. To keep the current behavior, set \
`time_zone_aware_types = [\"datetime\"]`. To opt in now and silence this \
notice, add \"time\" to `time_zone_aware_types`.";

/// Process-wide switches. Shared by the whole hierarchy, never inherited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalConfig {
    /// Master switch for time-zone-aware attributes.
    pub time_zone_aware_attributes: bool,

    /// Zone every point in time is normalized to.
    pub default_timezone: CanonicalZone,

    /// Handling of user input with no time-zone reading.
    pub untyped_input: UntypedInputPolicy,
}

/// Per-class decoration settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    excluded: BTreeSet<String>,
    allowed_types: Vec<TypeTag>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            excluded: BTreeSet::new(),
            allowed_types: vec![TypeTag::DateTime, TypeTag::NotExplicitlyConfigured],
        }
    }
}

impl PolicyConfig {
    pub fn new<N, T>(excluded: N, allowed_types: T) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        T: IntoIterator<Item = TypeTag>,
    {
        let mut config = Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
            allowed_types: Vec::new(),
        };
        config.set_allowed_types(allowed_types);
        config
    }

    /// Opt the attribute `name` out of time-zone conversion.
    pub fn skip_attribute(&mut self, name: impl Into<String>) -> &mut Self {
        self.excluded.insert(name.into());
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }

    /// Append `tag` to the allow-list unless it is already there.
    pub fn allow_type(&mut self, tag: TypeTag) -> &mut Self {
        if !self.allowed_types.contains(&tag) {
            self.allowed_types.push(tag);
        }
        self
    }

    /// Replace the allow-list, keeping first occurrences in order.
    pub fn set_allowed_types(&mut self, tags: impl IntoIterator<Item = TypeTag>) -> &mut Self {
        self.allowed_types.clear();
        for tag in tags {
            self.allow_type(tag);
        }
        self
    }

    pub fn allows(&self, tag: &TypeTag) -> bool {
        self.allowed_types.contains(tag)
    }

    pub fn allowed_types(&self) -> &[TypeTag] {
        &self.allowed_types
    }
}

/// Policy snapshots of every class, indexed by [`ClassId`].
#[derive(Debug, Clone, Default)]
pub struct PolicyArena {
    policies: Vec<PolicyConfig>,
}

impl PolicyArena {
    pub fn get(&self, class: ClassId) -> Option<&PolicyConfig> {
        self.policies.get(class.0)
    }

    pub(crate) fn get_mut(&mut self, class: ClassId) -> Option<&mut PolicyConfig> {
        self.policies.get_mut(class.0)
    }

    pub(crate) fn push(&mut self, policy: PolicyConfig) -> ClassId {
        self.policies.push(policy);
        ClassId(self.policies.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// Hook run by the host for every class it derives.
pub trait SubclassHook: Send + Sync {
    /// Called once per new class, before any of its attributes is resolved.
    fn on_subclass_derived(&self, subclass: ClassId, registry: &mut dyn TypeDecoratorRegistry);
}

/// Installs [`TemporalConverter`] on the attributes a class's policy selects.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecorationPolicy;

impl DecorationPolicy {
    /// Whether the attribute `name` of base type `tag` gets time-zone conversion.
    pub fn should_decorate(
        global: &GlobalConfig,
        policy: &PolicyConfig,
        name: &str,
        tag: &TypeTag,
        deprecations: &dyn DeprecationSink,
    ) -> bool {
        let enabled = global.time_zone_aware_attributes && !policy.is_excluded(name);
        let result = enabled && policy.allows(tag);

        if enabled
            && !result
            && *tag == TypeTag::Time
            && policy.allows(&TypeTag::NotExplicitlyConfigured)
        {
            deprecations.warn_once(TIME_COLUMN_DEPRECATION, TIME_COLUMN_NOTICE);
        }

        result
    }
}

impl SubclassHook for DecorationPolicy {
    fn on_subclass_derived(&self, subclass: ClassId, registry: &mut dyn TypeDecoratorRegistry) {
        let matches = matcher(move |name, tag, ctx| match ctx.policies.get(subclass) {
            Some(policy) => Self::should_decorate(ctx.global, policy, name, tag, ctx.deprecations),
            None => Self::should_decorate(
                ctx.global,
                &PolicyConfig::default(),
                name,
                tag,
                ctx.deprecations,
            ),
        });
        let wrap = factory(|inner, ctx| {
            Box::new(TemporalConverter::new(
                inner,
                ctx.global.default_timezone,
                ctx.global.untyped_input,
            ))
        });

        registry.register_type_decorator(matches, TIME_ZONE_CONVERSION, wrap);
        tracing::debug!(class = %subclass, "registered time zone conversion");
    }
}
