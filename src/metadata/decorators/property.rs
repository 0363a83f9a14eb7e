use std::any::Any;

use crate::{
    metadata::{
        decorators::{member::apply_member, Decorator, DecoratorOptions, DecoratorSpec},
        key::{AppliesTo, AsMetadataKey, PropertyElement},
        merge::MergeMetadata,
        store::MetadataStore,
        target::DeclarationSite,
        typesystem::MemberKind,
    },
    Result,
};

/// Creates decorators that attach a payload to a property declaration
pub struct PropertyDecoratorFactory;

impl PropertyDecoratorFactory {
    /// Creates a property decorator with default options (repeated application merges)
    pub fn create<T, Q>(key: Q, spec: T) -> PropertyDecorator<T>
    where
        T: Clone + MergeMetadata + Any + Send + Sync,
        Q: AsMetadataKey<T> + AppliesTo<PropertyElement>,
    {
        Self::create_with_options(key, spec, DecoratorOptions::default())
    }

    /// Creates a property decorator with explicit options
    pub fn create_with_options<T, Q>(
        key: Q,
        spec: T,
        options: DecoratorOptions,
    ) -> PropertyDecorator<T>
    where
        T: Clone + MergeMetadata + Any + Send + Sync,
        Q: AsMetadataKey<T> + AppliesTo<PropertyElement>,
    {
        PropertyDecorator {
            inner: DecoratorSpec::new(key.key_name(), spec, options, "PropertyDecorator"),
        }
    }
}

/// Merges its payload into the slot of one property, with the same policy as
/// [`crate::MethodDecorator`].
#[derive(Clone, Debug)]
pub struct PropertyDecorator<T> {
    inner: DecoratorSpec<T>,
}

impl<T> PropertyDecorator<T> {
    /// The metadata key this decorator writes
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }
}

impl<T: Clone + MergeMetadata + Any + Send + Sync> Decorator for PropertyDecorator<T> {
    fn apply(&self, store: &MetadataStore, site: &DeclarationSite) -> Result<()> {
        apply_member(&self.inner, store, site, MemberKind::Property)
    }
}
