use std::any::Any;

use tracing::debug;

use crate::{
    metadata::{
        decorators::{Decorator, DecoratorFactory},
        store::MetadataStore,
        target::DeclarationSite,
    },
    Error, Result,
};

/// Stores a value on the class or member it is applied to, replacing any own value.
///
/// Created through [`MetadataStore::metadata`]. It has no duplicate check and no merge: it
/// is the raw form of `define` usable wherever decorators are accepted.
#[derive(Clone, Debug)]
pub struct MetadataDecorator<T> {
    key: String,
    value: T,
}

impl<T> MetadataDecorator<T> {
    pub(crate) fn new(key: &str, value: T) -> Self {
        MetadataDecorator {
            key: key.to_string(),
            value,
        }
    }

    /// The metadata key this decorator writes
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T: Clone + Any + Send + Sync> Decorator for MetadataDecorator<T> {
    fn apply(&self, store: &MetadataStore, site: &DeclarationSite) -> Result<()> {
        if site.parameter.is_some() {
            return Err(Error::Misapplied {
                decorator: "Metadata".to_string(),
                expected: "class, method or property".to_string(),
                site: DecoratorFactory::site_name(store, site),
            });
        }

        debug!(key = %self.key, target = %site.target, member = ?site.member, "apply metadata");
        store.define(
            self.key.as_str(),
            self.value.clone(),
            site.target,
            site.member.as_deref(),
        )
    }
}
