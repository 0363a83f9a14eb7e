use std::any::Any;

use tracing::debug;

use crate::{
    metadata::{
        decorators::{Decorator, DecoratorOptions, DecoratorSpec},
        key::{AppliesTo, AsMetadataKey, ClassElement, ElementCategory},
        store::MetadataStore,
        target::DeclarationSite,
    },
    Result,
};

/// Creates decorators that attach a payload to a class declaration
pub struct ClassDecoratorFactory;

impl ClassDecoratorFactory {
    /// Creates a class decorator with default options (single application)
    ///
    /// ## Arguments
    /// * 'key'  - The metadata key, a string or a class-level [`crate::MetadataKey`]
    /// * 'spec' - The payload stored on every class the decorator is applied to
    pub fn create<T, Q>(key: Q, spec: T) -> ClassDecorator<T>
    where
        T: Clone + Any + Send + Sync,
        Q: AsMetadataKey<T> + AppliesTo<ClassElement>,
    {
        Self::create_with_options(key, spec, DecoratorOptions::default())
    }

    /// Creates a class decorator with explicit options
    pub fn create_with_options<T, Q>(key: Q, spec: T, options: DecoratorOptions) -> ClassDecorator<T>
    where
        T: Clone + Any + Send + Sync,
        Q: AsMetadataKey<T> + AppliesTo<ClassElement>,
    {
        ClassDecorator {
            inner: DecoratorSpec::new(key.key_name(), spec, options, "ClassDecorator"),
        }
    }
}

/// Stores one payload per class; a second application to the same class is an error unless
/// the options allow it, in which case the payload is replaced.
///
/// Values inherited from a base class never count as a previous application.
#[derive(Clone, Debug)]
pub struct ClassDecorator<T> {
    inner: DecoratorSpec<T>,
}

impl<T> ClassDecorator<T> {
    /// The metadata key this decorator writes
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }
}

impl<T: Clone + Any + Send + Sync> Decorator for ClassDecorator<T> {
    fn apply(&self, store: &MetadataStore, site: &DeclarationSite) -> Result<()> {
        if site.category() != ElementCategory::Class {
            return Err(self.inner.misapplied(store, site, ElementCategory::Class));
        }

        let key = self.inner.key.as_str();
        if !self.inner.allows_multiple(false) && store.has_own(key, site.target, None) {
            return Err(self.inner.duplicate(store, site));
        }

        debug!(decorator = self.inner.name(), key, target = %site.target, "apply class decorator");
        store.define_shared(key, self.inner.payload(), site.target, None)
    }
}
