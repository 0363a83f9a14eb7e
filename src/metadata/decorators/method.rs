use std::any::Any;

use crate::{
    metadata::{
        decorators::{member::apply_member, Decorator, DecoratorOptions, DecoratorSpec},
        key::{AppliesTo, AsMetadataKey, MethodElement},
        merge::MergeMetadata,
        store::MetadataStore,
        target::DeclarationSite,
        typesystem::MemberKind,
    },
    Result,
};

/// Creates decorators that attach a payload to a method declaration
pub struct MethodDecoratorFactory;

impl MethodDecoratorFactory {
    /// Creates a method decorator with default options (repeated application merges)
    ///
    /// ## Arguments
    /// * 'key'  - The metadata key, a string or a method-level [`crate::MetadataKey`]
    /// * 'spec' - The payload merged into the method's slot on every application
    pub fn create<T, Q>(key: Q, spec: T) -> MethodDecorator<T>
    where
        T: Clone + MergeMetadata + Any + Send + Sync,
        Q: AsMetadataKey<T> + AppliesTo<MethodElement>,
    {
        Self::create_with_options(key, spec, DecoratorOptions::default())
    }

    /// Creates a method decorator with explicit options
    pub fn create_with_options<T, Q>(key: Q, spec: T, options: DecoratorOptions) -> MethodDecorator<T>
    where
        T: Clone + MergeMetadata + Any + Send + Sync,
        Q: AsMetadataKey<T> + AppliesTo<MethodElement>,
    {
        MethodDecorator {
            inner: DecoratorSpec::new(key.key_name(), spec, options, "MethodDecorator"),
        }
    }
}

/// Merges its payload into the slot of one method, static or instance.
///
/// If the slot (or the same method on a base type) already resolves to a payload, the new
/// payload is merged into a copy of it with [`MergeMetadata::merge_from`] and the result
/// becomes the method's own value.
#[derive(Clone, Debug)]
pub struct MethodDecorator<T> {
    inner: DecoratorSpec<T>,
}

impl<T> MethodDecorator<T> {
    /// The metadata key this decorator writes
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }
}

impl<T: Clone + MergeMetadata + Any + Send + Sync> Decorator for MethodDecorator<T> {
    fn apply(&self, store: &MetadataStore, site: &DeclarationSite) -> Result<()> {
        apply_member(&self.inner, store, site, MemberKind::Method)
    }
}
