use std::any::Any;

use tracing::debug;

use crate::{
    metadata::{
        decorators::{Decorator, DecoratorOptions, DecoratorSpec},
        key::{AppliesTo, AsMetadataKey, ElementCategory, ParameterElement},
        store::{MetadataStore, ParameterList},
        target::DeclarationSite,
    },
    Result,
};

/// Creates decorators that attach a payload to one parameter of a method
pub struct ParameterDecoratorFactory;

impl ParameterDecoratorFactory {
    /// Creates a parameter decorator with default options (repeated application replaces)
    pub fn create<T, Q>(key: Q, spec: T) -> ParameterDecorator<T>
    where
        T: Clone + Any + Send + Sync,
        Q: AsMetadataKey<T> + AppliesTo<ParameterElement>,
    {
        Self::create_with_options(key, spec, DecoratorOptions::default())
    }

    /// Creates a parameter decorator with explicit options
    pub fn create_with_options<T, Q>(
        key: Q,
        spec: T,
        options: DecoratorOptions,
    ) -> ParameterDecorator<T>
    where
        T: Clone + Any + Send + Sync,
        Q: AsMetadataKey<T> + AppliesTo<ParameterElement>,
    {
        ParameterDecorator {
            inner: DecoratorSpec::new(key.key_name(), spec, options, "ParameterDecorator"),
        }
    }
}

/// Writes its payload at one position of a method's [`ParameterList`].
///
/// The list lives in the method's own slot. Other positions are left untouched and the list
/// grows with empty positions up to the written index, so parameters can be decorated in
/// any order.
#[derive(Clone, Debug)]
pub struct ParameterDecorator<T> {
    inner: DecoratorSpec<T>,
}

impl<T> ParameterDecorator<T> {
    /// The metadata key this decorator writes
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }
}

impl<T: Clone + Any + Send + Sync> Decorator for ParameterDecorator<T> {
    fn apply(&self, store: &MetadataStore, site: &DeclarationSite) -> Result<()> {
        let (method, index) = match (site.member.as_deref(), site.parameter) {
            (Some(method), Some(index)) => (method, index),
            _ => {
                return Err(self
                    .inner
                    .misapplied(store, site, ElementCategory::Parameter))
            }
        };

        let key = self.inner.key.as_str();
        let mut list: ParameterList<T> = store
            .get_own::<ParameterList<T>>(key, site.target, Some(method))
            .map(|existing| existing.as_ref().clone())
            .unwrap_or_default();

        if list.len() <= index {
            list.resize(index + 1, None);
        } else if list[index].is_some() && !self.inner.allows_multiple(true) {
            return Err(self.inner.duplicate(store, site));
        }
        list[index] = Some(self.inner.payload());

        debug!(
            decorator = self.inner.name(),
            key,
            target = %site.target,
            method,
            index,
            len = list.len(),
            "apply parameter decorator"
        );
        store.define(key, list, site.target, Some(method))
    }
}
