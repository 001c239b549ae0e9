//! # Model Hierarchy
//!
//! A small host layer: model classes, their inheritance tree and the typed
//! attributes they load from a schema. It exists so the decoration pipeline
//! has something real to decorate.
//!
//! ## Classes
//!
//! Classes live in an arena and are addressed by [`ClassId`]. The hierarchy
//! starts with one root class. [`ModelHierarchy::derive`] creates a subclass:
//!
//! 1. The parent's [`PolicyConfig`] is copied into the new class's slot.
//! 2. The parent's decoration table is copied.
//! 3. Every [`SubclassHook`] runs against the new class's table.
//!
//! After step 1 parent and child are independent: editing either policy
//! affects only that class. [`ModelHierarchy::rederive`] repeats all three
//! steps for an existing class, discarding its own edits.
//!
//! The root class never passes through the hooks, so it is never decorated.
//!
//! ## Attributes
//!
//! [`ModelHierarchy::load_schema`] takes each column's base converter, runs it
//! through the class's decoration table once and keeps the result. Resolved
//! converters are immutable and shared through `Arc`.
//!
//! ## Concurrency
//!
//! Deriving and loading take `&mut self`. A host sharing the hierarchy between
//! threads keeps it behind one lock held across the whole derive call, so no
//! registration can interleave with another derivation of the same class.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::converter::Converter;
use crate::decorations::{DecoratorTag, ResolveContext, TypeDecorations};
use crate::deprecation::{DeprecationSink, TracingDeprecations};
use crate::error::{CastError, ModelError};
use crate::policy::{DecorationPolicy, GlobalConfig, PolicyArena, PolicyConfig, SubclassHook};
use crate::value::{UserInput, Value};

/// Index of a class in a [`ModelHierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) usize);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A resolved attribute of a class.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub converter: Arc<dyn Converter>,

    /// Decorations that wrapped the base converter, innermost first.
    pub decorations: Vec<DecoratorTag>,
}

impl Attribute {
    pub fn is_decorated_with(&self, tag: DecoratorTag) -> bool {
        self.decorations.contains(&tag)
    }
}

struct ClassEntry {
    name: String,
    parent: Option<ClassId>,
    decorations: TypeDecorations,
    attributes: BTreeMap<String, Attribute>,
}

/// Arena of model classes with their policies and resolved attributes.
pub struct ModelHierarchy {
    global: GlobalConfig,
    policies: PolicyArena,
    classes: Vec<ClassEntry>,
    hooks: Vec<Arc<dyn SubclassHook>>,
    deprecations: Arc<dyn DeprecationSink>,
}

impl ModelHierarchy {
    /// Create a hierarchy holding only the root class `Base`.
    ///
    /// [`DecorationPolicy`] is installed as the first subclass hook and
    /// deprecation notices go to `tracing`.
    pub fn new(global: GlobalConfig, root_policy: PolicyConfig) -> Self {
        let mut policies = PolicyArena::default();
        policies.push(root_policy);
        Self {
            global,
            policies,
            classes: vec![ClassEntry {
                name: "Base".to_string(),
                parent: None,
                decorations: TypeDecorations::new(),
                attributes: BTreeMap::new(),
            }],
            hooks: vec![Arc::new(DecorationPolicy)],
            deprecations: Arc::new(TracingDeprecations::new()),
        }
    }

    /// Route deprecation notices to `sink`.
    pub fn with_deprecations(mut self, sink: Arc<dyn DeprecationSink>) -> Self {
        self.deprecations = sink;
        self
    }

    /// Run `hook` for every class derived from now on.
    pub fn add_hook(&mut self, hook: Arc<dyn SubclassHook>) {
        self.hooks.push(hook);
    }

    pub fn root(&self) -> ClassId {
        ClassId(0)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    /// Process-wide switches. Changes apply to every class, including
    /// attributes resolved later on already-derived classes.
    pub fn global_mut(&mut self) -> &mut GlobalConfig {
        &mut self.global
    }

    pub fn policy(&self, class: ClassId) -> Result<&PolicyConfig, ModelError> {
        self.policies
            .get(class)
            .ok_or(ModelError::UnknownClass(class))
    }

    /// The class's own policy. Descendants derived earlier are not affected.
    pub fn policy_mut(&mut self, class: ClassId) -> Result<&mut PolicyConfig, ModelError> {
        self.policies
            .get_mut(class)
            .ok_or(ModelError::UnknownClass(class))
    }

    pub fn class_name(&self, class: ClassId) -> Result<&str, ModelError> {
        Ok(&self.entry(class)?.name)
    }

    pub fn parent(&self, class: ClassId) -> Result<Option<ClassId>, ModelError> {
        Ok(self.entry(class)?.parent)
    }

    pub fn decorations(&self, class: ClassId) -> Result<&TypeDecorations, ModelError> {
        Ok(&self.entry(class)?.decorations)
    }

    /// Context handed to matchers and factories.
    pub fn context(&self) -> ResolveContext<'_> {
        ResolveContext {
            global: &self.global,
            policies: &self.policies,
            deprecations: self.deprecations.as_ref(),
        }
    }

    /// Derive a new class from `parent`.
    pub fn derive(&mut self, parent: ClassId, name: impl Into<String>) -> Result<ClassId, ModelError> {
        let (policy, decorations) = self.inherited_from(parent)?;
        let id = self.policies.push(policy);
        self.classes.push(ClassEntry {
            name: name.into(),
            parent: Some(parent),
            decorations,
            attributes: BTreeMap::new(),
        });
        self.run_hooks(id);
        tracing::debug!(class = %id, parent = %parent, "derived class");
        Ok(id)
    }

    /// Refresh `class` from its parent as if it had just been derived.
    ///
    /// The class's own policy edits and loaded attributes are discarded; load
    /// the schema again afterwards.
    pub fn rederive(&mut self, class: ClassId) -> Result<(), ModelError> {
        let parent = self
            .entry(class)?
            .parent
            .ok_or(ModelError::UnknownClass(class))?;
        let (policy, decorations) = self.inherited_from(parent)?;
        if let Some(slot) = self.policies.get_mut(class) {
            *slot = policy;
        }
        let entry = self.entry_mut(class)?;
        entry.decorations = decorations;
        entry.attributes.clear();
        self.run_hooks(class);
        Ok(())
    }

    /// Resolve and store the attributes of `class` from `(name, base converter)` columns.
    pub fn load_schema<I, N>(&mut self, class: ClassId, columns: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (N, Box<dyn Converter>)>,
        N: Into<String>,
    {
        let resolved: Vec<(String, Attribute)> = {
            let entry = self.entry(class)?;
            let ctx = self.context();
            columns
                .into_iter()
                .map(|(name, base)| {
                    let name = name.into();
                    let (converter, decorations) =
                        entry.decorations.apply_traced(&name, base, &ctx);
                    let attribute = Attribute {
                        converter: Arc::from(converter),
                        decorations,
                    };
                    (name, attribute)
                })
                .collect()
        };

        let entry = self.entry_mut(class)?;
        for (name, attribute) in resolved {
            entry.attributes.insert(name, attribute);
        }
        Ok(())
    }

    pub fn attribute(&self, class: ClassId, name: &str) -> Result<&Attribute, ModelError> {
        self.entry(class)?
            .attributes
            .get(name)
            .ok_or_else(|| ModelError::UnknownAttribute {
                class,
                attribute: name.to_string(),
            })
    }

    pub fn attribute_names(&self, class: ClassId) -> Result<Vec<&str>, ModelError> {
        Ok(self
            .entry(class)?
            .attributes
            .keys()
            .map(String::as_str)
            .collect())
    }

    /// Cast a raw storage value of attribute `name`.
    pub fn read_attribute(&self, class: ClassId, name: &str, raw: Value) -> Result<Value, CastError> {
        Ok(self.attribute(class, name)?.converter.from_storage(raw)?)
    }

    /// Cast a user assignment to attribute `name`.
    pub fn write_attribute(
        &self,
        class: ClassId,
        name: &str,
        input: UserInput,
    ) -> Result<Value, CastError> {
        Ok(self.attribute(class, name)?.converter.from_user_input(input)?)
    }

    /// Cast a domain value of attribute `name` for storage.
    pub fn serialize_attribute(
        &self,
        class: ClassId,
        name: &str,
        value: &Value,
    ) -> Result<Value, CastError> {
        Ok(self.attribute(class, name)?.converter.to_storage(value)?)
    }

    fn inherited_from(&self, parent: ClassId) -> Result<(PolicyConfig, TypeDecorations), ModelError> {
        let policy = self.policy(parent)?.clone();
        let decorations = self.entry(parent)?.decorations.clone();
        Ok((policy, decorations))
    }

    fn run_hooks(&mut self, class: ClassId) {
        if let Some(entry) = self.classes.get_mut(class.0) {
            for hook in &self.hooks {
                hook.on_subclass_derived(class, &mut entry.decorations);
            }
        }
    }

    fn entry(&self, class: ClassId) -> Result<&ClassEntry, ModelError> {
        self.classes
            .get(class.0)
            .ok_or(ModelError::UnknownClass(class))
    }

    fn entry_mut(&mut self, class: ClassId) -> Result<&mut ClassEntry, ModelError> {
        self.classes
            .get_mut(class.0)
            .ok_or(ModelError::UnknownClass(class))
    }
}

impl fmt::Debug for ModelHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHierarchy")
            .field("global", &self.global)
            .field("classes", &self.classes.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
