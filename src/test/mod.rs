use std::sync::Arc;

use crate::metadata::{
    store::{MetadataStore, MetadataTable},
    typesystem::TypeRegistry,
};

// Helper function to create a registry and a store over a private table
pub fn isolated_store() -> (Arc<TypeRegistry>, MetadataStore) {
    let registry = Arc::new(TypeRegistry::new());
    let store =
        MetadataStore::with_table(Arc::new(MetadataTable::new()), None, Some(registry.clone()));
    (registry, store)
}
