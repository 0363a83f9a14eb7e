// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # metarize
//!
//! Typed metadata attachment and retrieval for declared types, their members and parameters.
//!
//! `metarize` lets frameworks attach strongly typed side-data ("metadata") to the declarations
//! they build declarative behavior on (routing tables, validation rules, serialization hints),
//! and read it back later with respect to the inheritance hierarchy of the types involved.
//!
//! ## Features
//!
//! - **Namespaced storage** - Independent partitions never collide on the same key
//! - **Inheritance-aware lookup** - Effective reads fall back to the nearest ancestor
//! - **Own vs. effective reads** - Always queryable separately
//! - **Decorator factories** - Class, method, property and parameter write paths with
//!   single-application enforcement and shallow merging
//! - **Typed keys** - [`MetadataKey`] carries the payload type and intended element kind
//! - **Lock-free** - Reads and writes from any thread, no global locks
//!
//! ## Quick Start
//!
//! Declarations are registered once at initialization, then decorated:
//!
//! ```rust
//! use metarize::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Endpoint {
//!     base_path: String,
//! }
//!
//! const API_ENDPOINT: MetadataKey<Endpoint, ClassElement> = MetadataKey::new("api:endpoint");
//! const API_PARAM: MetadataKey<String, ParameterElement> = MetadataKey::new("api:param");
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let store = MetadataStore::new(Some("quick-start"), Some(registry.clone()));
//!
//! let controller = registry.declare("UserController")
//!     .method_with_signature("getUserById", MethodDesign::new(
//!         vec![DesignType::String],
//!         DesignType::Object,
//!     ))
//!     .build()?;
//!
//! ClassDecoratorFactory::create(&API_ENDPOINT, Endpoint { base_path: "/users".into() })
//!     .apply(&store, &controller.type_site())?;
//! ParameterDecoratorFactory::create(&API_PARAM, "id".to_string())
//!     .apply(&store, &controller.parameter_site("getUserById", 0))?;
//!
//! let inspector = MetadataInspector::for_store(&store);
//! let endpoint = inspector.get_class_metadata(&API_ENDPOINT, controller.target()).unwrap();
//! assert_eq!(endpoint.base_path, "/users");
//!
//! let params = inspector.get_all_parameter_metadata(&API_PARAM, controller.prototype(), "getUserById");
//! assert_eq!(params.len(), 1);
//! # Ok::<(), metarize::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`TypeRegistry`] / [`TypeBuilder`] - The declared hierarchy, acting as [`ReflectionProvider`]
//! - [`MetadataStore`] - Namespaced slots over a shared [`MetadataTable`]
//! - [`ClassDecoratorFactory`], [`MethodDecoratorFactory`], [`PropertyDecoratorFactory`],
//!   [`ParameterDecoratorFactory`] - The write path
//! - [`MetadataInspector`] - The read path
//!
//! ## Logging
//!
//! Writes, deletes and decorator applications are reported through `tracing` at `debug`
//! level, inheritance walks at `trace` level. Typed reads that find a payload of another type
//! log a warning and return `None`. No subscriber is installed by the library.
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use metarize::prelude::*;
///
/// let store = MetadataStore::global();
/// let inspector = MetadataInspector::for_store(store);
/// assert!(inspector.store().namespace().is_none());
/// ```
pub mod prelude;

/// Metadata keys, targets, type hierarchy, store, decorators and inspector
pub mod metadata;

/// `metarize` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `metarize` Error type
///
/// The main error type for all fallible operations in this crate. Lookups never fail, only
/// writes and type declarations do.
pub use error::Error;

/// Typed keys and element kinds
pub use metadata::key::{
    AnyElement, AppliesTo, AsMetadataKey, ClassElement, ElementCategory, ElementKind, KeyName,
    MetadataKey, MethodElement, ParameterElement, PropertyElement,
};

/// Merge policy of member-level payloads
pub use metadata::merge::MergeMetadata;

/// Targets, declaration sites and type tokens
pub use metadata::{
    target::{DeclarationSite, Target},
    token::Token,
};

/// The declared type hierarchy
pub use metadata::typesystem::{
    DesignType, MemberInfo, MemberKind, MethodDesign, ReflectionProvider, TypeBuilder, TypeInfo,
    TypeInfoRc, TypeRegistry, CONSTRUCTOR,
};

/// Storage of metadata slots
pub use metadata::store::{MetadataStore, MetadataTable, MetadataValue, ParameterList, SlotKey};

/// Decorator factories
pub use metadata::decorators::{
    ClassDecorator, ClassDecoratorFactory, Decorator, DecoratorFactory, DecoratorOptions,
    MetadataDecorator, MethodDecorator, MethodDecoratorFactory, ParameterDecorator,
    ParameterDecoratorFactory, PropertyDecorator, PropertyDecoratorFactory,
};

/// Read-side aggregation
pub use metadata::inspector::MetadataInspector;
