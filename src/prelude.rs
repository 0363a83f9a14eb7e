//! # metarize Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the metarize library. Import this module to get quick access to the essential
//! types for declaring, decorating and inspecting types.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all metarize operations
pub use crate::Error;

/// The result type used throughout metarize
pub use crate::Result;

/// Configuration of decorator factories
pub use crate::DecoratorOptions;

// ================================================================================================
// Keys and Targets
// ================================================================================================

/// Typed metadata key and its element kinds
pub use crate::{
    AnyElement, ClassElement, MetadataKey, MethodElement, ParameterElement, PropertyElement,
};

/// Targets and declaration sites
pub use crate::{DeclarationSite, Target, Token};

// ================================================================================================
// Type Hierarchy
// ================================================================================================

/// Declaring types and reading their declared types
pub use crate::{DesignType, MethodDesign, ReflectionProvider, TypeRegistry};

// ================================================================================================
// Store, Decorators and Inspector
// ================================================================================================

/// Namespaced metadata store
pub use crate::{MetadataStore, ParameterList};

/// Write path
pub use crate::{
    ClassDecoratorFactory, Decorator, MergeMetadata, MethodDecoratorFactory,
    ParameterDecoratorFactory, PropertyDecoratorFactory,
};

/// Read path
pub use crate::MetadataInspector;
