//! # Type Decorations
//!
//! A class keeps a table of decorations. Each entry pairs a matcher, which
//! looks at an attribute name and its base type, with a factory that wraps the
//! attribute's converter. When a class loads its schema, every attribute
//! converter is passed through [`TypeDecorations::apply`].
//!
//! Entries are keyed by [`DecoratorTag`]. Registering under a tag that is
//! already present replaces that entry in place, so re-running a registration
//! never stacks a second wrapper.
//!
//! Matchers and factories receive a [`ResolveContext`] instead of reading
//! ambient state: the global switches, the per-class policy arena and the
//! deprecation sink are all passed in by the caller.

use std::fmt;
use std::sync::Arc;

use crate::converter::{Converter, TypeTag};
use crate::deprecation::DeprecationSink;
use crate::policy::{GlobalConfig, PolicyArena};

/// Everything a matcher or factory may consult while an attribute is resolved.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub global: &'a GlobalConfig,
    pub policies: &'a PolicyArena,
    pub deprecations: &'a dyn DeprecationSink,
}

/// Decides whether a decoration applies to `(attribute name, base type)`.
pub type Matcher = Arc<dyn Fn(&str, &TypeTag, &ResolveContext<'_>) -> bool + Send + Sync>;

/// Wraps the converter of a matching attribute.
pub type Factory =
    Arc<dyn Fn(Box<dyn Converter>, &ResolveContext<'_>) -> Box<dyn Converter> + Send + Sync>;

/// Build a [`Matcher`] from a closure.
pub fn matcher<F>(f: F) -> Matcher
where
    F: Fn(&str, &TypeTag, &ResolveContext<'_>) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Build a [`Factory`] from a closure.
pub fn factory<F>(f: F) -> Factory
where
    F: Fn(Box<dyn Converter>, &ResolveContext<'_>) -> Box<dyn Converter> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Identifier a decoration is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoratorTag(&'static str);

impl DecoratorTag {
    pub const fn new(name: &'static str) -> Self {
        DecoratorTag(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Registry interface decorations are installed through.
pub trait TypeDecoratorRegistry {
    /// Install `factory` for every attribute `matcher` accepts.
    ///
    /// The last registration under a given `tag` wins.
    fn register_type_decorator(&mut self, matcher: Matcher, tag: DecoratorTag, factory: Factory);
}

#[derive(Clone)]
struct Decoration {
    tag: DecoratorTag,
    matcher: Matcher,
    factory: Factory,
}

/// Ordered, tag-keyed decoration table of one class.
///
/// Cloning is cheap: matchers and factories are shared.
#[derive(Clone, Default)]
pub struct TypeDecorations {
    entries: Vec<Decoration>,
}

impl TypeDecorations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, tag: DecoratorTag) -> bool {
        self.entries.iter().any(|entry| entry.tag == tag)
    }

    /// Registered tags in application order.
    pub fn tags(&self) -> impl Iterator<Item = DecoratorTag> + '_ {
        self.entries.iter().map(|entry| entry.tag)
    }

    /// Whether any decoration would wrap the attribute `name` of type `tag`.
    pub fn matches(&self, name: &str, tag: &TypeTag, ctx: &ResolveContext<'_>) -> bool {
        self.entries.iter().any(|entry| (entry.matcher)(name, tag, ctx))
    }

    /// Wrap `base` with every decoration whose matcher accepts the attribute.
    ///
    /// Matchers see the base type tag; decorations apply in registration
    /// order, so the last one registered ends up outermost.
    pub fn apply(
        &self,
        name: &str,
        base: Box<dyn Converter>,
        ctx: &ResolveContext<'_>,
    ) -> Box<dyn Converter> {
        self.apply_traced(name, base, ctx).0
    }

    /// Like [`TypeDecorations::apply`], also returning the tags that applied.
    pub fn apply_traced(
        &self,
        name: &str,
        base: Box<dyn Converter>,
        ctx: &ResolveContext<'_>,
    ) -> (Box<dyn Converter>, Vec<DecoratorTag>) {
        let tag = base.type_tag();
        let mut applied = Vec::new();
        let mut converter = base;
        for entry in self
            .entries
            .iter()
            .filter(|entry| (entry.matcher)(name, &tag, ctx))
        {
            tracing::debug!(
                attribute = name,
                decorator = entry.tag.name(),
                base_type = %tag,
                "decorating attribute type"
            );
            converter = (entry.factory)(converter, ctx);
            applied.push(entry.tag);
        }
        (converter, applied)
    }
}

impl TypeDecoratorRegistry for TypeDecorations {
    fn register_type_decorator(&mut self, matcher: Matcher, tag: DecoratorTag, factory: Factory) {
        let decoration = Decoration {
            tag,
            matcher,
            factory,
        };
        match self.entries.iter_mut().find(|entry| entry.tag == tag) {
            Some(existing) => *existing = decoration,
            None => self.entries.push(decoration),
        }
    }
}

impl fmt::Debug for TypeDecorations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tags().map(|tag| tag.0)).finish()
    }
}
