//! Builder for type declarations.
//!
//! This module provides the [`TypeBuilder`] struct, a fluent API standing in for the
//! attach-time hook of languages with declaration annotations: it records a type with its
//! base and members in a [`TypeRegistry`] so metadata can later be attached to it and looked
//! up through its inheritance chain.
//!
//! # Example
//!
//! ```rust
//! use metarize::{DesignType, MethodDesign, TypeRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let controller = registry.declare("UserController")
//!     .constructor(MethodDesign::new(vec![DesignType::Object], DesignType::Void))
//!     .method_with_signature("findById", MethodDesign::new(
//!         vec![DesignType::String],
//!         DesignType::Object,
//!     ))
//!     .property("prefix", DesignType::String)
//!     .build()?;
//!
//! assert_eq!(controller.methods.count(), 2);
//! assert_eq!(controller.properties.count(), 1);
//! # Ok::<(), metarize::Error>(())
//! ```

use std::{collections::HashSet, sync::Arc};

use crate::{
    metadata::{
        token::Token,
        typesystem::{
            DesignType, MemberInfo, MemberKind, MethodDesign, TypeInfo, TypeInfoRc,
            TypeRegistry, CONSTRUCTOR,
        },
    },
    Result,
};

/// Provides a fluent API for declaring types
pub struct TypeBuilder {
    /// Type registry the type is registered in
    registry: Arc<TypeRegistry>,
    /// Name of the declared type
    name: String,
    /// Base type, if the type extends another one
    base: Option<Token>,
    /// Members in declaration order
    members: Vec<MemberInfo>,
}

impl TypeBuilder {
    /// Create a new builder with the given registry
    ///
    /// ## Arguments
    /// * 'registry' - The type registry to use
    /// * 'name'     - The name of the declared type
    pub fn new(registry: Arc<TypeRegistry>, name: &str) -> Self {
        TypeBuilder {
            registry,
            name: name.to_string(),
            base: None,
            members: Vec::new(),
        }
    }

    /// Set the base type
    ///
    /// ## Arguments
    /// * '`base_token`' - The token of the type this one extends
    #[must_use]
    pub fn extends(mut self, base_token: Token) -> Self {
        self.base = Some(base_token);
        self
    }

    /// Declare the constructor with its signature
    #[must_use]
    pub fn constructor(self, signature: MethodDesign) -> Self {
        self.push_method(CONSTRUCTOR, false, Some(signature))
    }

    /// Declare an instance method whose signature was not retained
    #[must_use]
    pub fn method(self, name: &str) -> Self {
        self.push_method(name, false, None)
    }

    /// Declare an instance method with its signature
    #[must_use]
    pub fn method_with_signature(self, name: &str, signature: MethodDesign) -> Self {
        self.push_method(name, false, Some(signature))
    }

    /// Declare a static method
    #[must_use]
    pub fn static_method(self, name: &str) -> Self {
        self.push_method(name, true, None)
    }

    /// Declare an instance property with its declared type
    #[must_use]
    pub fn property(self, name: &str, design_type: DesignType) -> Self {
        self.push_property(name, false, Some(design_type))
    }

    /// Declare an instance property whose type was not retained
    #[must_use]
    pub fn untyped_property(self, name: &str) -> Self {
        self.push_property(name, false, None)
    }

    /// Declare a static property
    #[must_use]
    pub fn static_property(self, name: &str, design_type: DesignType) -> Self {
        self.push_property(name, true, Some(design_type))
    }

    fn push_method(mut self, name: &str, is_static: bool, signature: Option<MethodDesign>) -> Self {
        self.members.push(MemberInfo {
            name: name.to_string(),
            kind: MemberKind::Method,
            is_static,
            design_type: None,
            signature,
        });
        self
    }

    fn push_property(mut self, name: &str, is_static: bool, design_type: Option<DesignType>) -> Self {
        self.members.push(MemberInfo {
            name: name.to_string(),
            kind: MemberKind::Property,
            is_static,
            design_type,
            signature: None,
        });
        self
    }

    /// Register the declared type and return it
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a member name is declared twice on the same
    /// side of the type, and the errors of [`TypeRegistry::insert`].
    pub fn build(self) -> Result<TypeInfoRc> {
        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert((member.name.as_str(), member.is_static)) {
                return Err(malformed_error!(
                    "Member '{}' declared twice on type '{}'",
                    member.name,
                    self.name
                ));
            }
        }

        let info = TypeInfo::new(TypeRegistry::next_token(), self.name, self.base);
        for member in self.members {
            match member.kind {
                MemberKind::Method => info.methods.push(Arc::new(member)),
                MemberKind::Property => info.properties.push(Arc::new(member)),
            };
        }

        let info = Arc::new(info);
        self.registry.insert(&info)?;
        Ok(info)
    }
}
