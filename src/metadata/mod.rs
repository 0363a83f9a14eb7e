//! Metadata attachment and retrieval.
//!
//! This module contains the whole registry: the declared type hierarchy metadata is attached
//! to, the namespaced slot store with inheritance-aware lookup, the decorator factories that
//! write slots at declaration time, and the inspector that reads them back in aggregated form.
//!
//! # Key Components
//!
//! - [`token`] - Process-unique identifiers of declared types
//! - [`target`] - Targets (type or prototype side) and declaration sites
//! - [`key`] - Typed metadata keys and element kinds
//! - [`merge`] - Merge policy of repeated member-level metadata
//! - [`typesystem`] - Declared types, their members and the reflection provider
//! - [`store`] - The metadata table and namespaced store
//! - [`decorators`] - Class, method, property and parameter decorator factories
//! - [`inspector`] - Aggregated reads and declared-type lookups
//!
//! # Examples
//!
//! ```rust
//! use metarize::{
//!     ClassDecoratorFactory, Decorator, MetadataInspector, MetadataStore, TypeRegistry,
//! };
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let store = MetadataStore::new(Some("metadata-doc"), Some(registry.clone()));
//! let base = registry.declare("BaseClass").build()?;
//! let sub = registry.declare("SubClass").extends(base.token).build()?;
//!
//! ClassDecoratorFactory::create("test:class:inheritance", "base-class".to_string())
//!     .apply(&store, &base.type_site())?;
//!
//! let inspector = MetadataInspector::for_store(&store);
//! let inherited = inspector.get_class_metadata::<String>("test:class:inheritance", sub.target());
//! assert_eq!(inherited.as_deref().map(String::as_str), Some("base-class"));
//! # Ok::<(), metarize::Error>(())
//! ```

/// Implementation of the decorator factories
pub mod decorators;
/// Implementation of the read-side aggregation
pub mod inspector;
/// Typed metadata keys
pub mod key;
/// Merge policy for member-level payloads
pub mod merge;
/// Implementation of the namespaced metadata store
pub mod store;
/// Targets and declaration sites
pub mod target;
/// Commonly used type token
pub mod token;
/// Implementation of the declared type hierarchy
pub mod typesystem;
