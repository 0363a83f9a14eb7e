//! Declared type hierarchy backing inheritance-aware lookups.
//!
//! The metadata store never inspects program elements itself. Everything it needs to know
//! about the declarations metadata is attached to comes through a [`ReflectionProvider`]:
//! whether a target exists, which target is its parent, what the declared members are and
//! which "design" types the declaration carried. This module defines that capability and a
//! concrete implementation, the [`TypeRegistry`], that plays the role of the attach-time
//! hook: declarations are registered once at initialization through a [`TypeBuilder`].
//!
//! # Key Components
//!
//! - [`ReflectionProvider`]: Parent lookup, member classification and declared types
//! - [`TypeRegistry`]: Lock-free registry of declared types
//! - [`TypeBuilder`]: Fluent declaration of a type with its base and members
//! - [`TypeInfo`] / [`MemberInfo`]: The registered declarations
//! - [`DesignType`] / [`MethodDesign`]: Declared types of properties and method signatures
//!
//! # Examples
//!
//! ```rust
//! use metarize::{DesignType, ReflectionProvider, Target, TypeRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let base = registry.declare("BaseModel")
//!     .property("id", DesignType::Number)
//!     .build()?;
//! let user = registry.declare("User")
//!     .extends(base.token)
//!     .property("name", DesignType::String)
//!     .build()?;
//!
//! assert_eq!(registry.parent(user.prototype()), Some(base.prototype()));
//! assert_eq!(registry.design_type(user.prototype(), "name"), Some(DesignType::String));
//! assert_eq!(registry.design_type(user.prototype(), "id"), None);
//! # Ok::<(), metarize::Error>(())
//! ```

mod builder;
mod registry;

use std::{fmt, sync::Arc};

use strum::Display;

pub use builder::TypeBuilder;
pub use registry::TypeRegistry;

use crate::metadata::{
    target::{DeclarationSite, Target},
    token::Token,
};

/// Name of the constructor pseudo-member
pub const CONSTRUCTOR: &str = "constructor";

/// A reference-counted pointer to a `TypeInfo`
pub type TypeInfoRc = Arc<TypeInfo>;
/// A reference-counted pointer to a `MemberInfo`
pub type MemberInfoRc = Arc<MemberInfo>;
/// A vector that holds a list of `MemberInfo`
pub type MemberList = Arc<boxcar::Vec<MemberInfoRc>>;

/// Declared type of a property, parameter or return value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DesignType {
    /// No value
    Void,
    /// Boolean value
    Boolean,
    /// Any numeric value
    Number,
    /// Text
    String,
    /// Untyped object
    Object,
    /// Callable value
    Function,
    /// Sequence of the inner type
    Array(Box<DesignType>),
    /// A type registered in a `TypeRegistry`
    Declared(Token),
}

impl fmt::Display for DesignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignType::Void => f.write_str("void"),
            DesignType::Boolean => f.write_str("boolean"),
            DesignType::Number => f.write_str("number"),
            DesignType::String => f.write_str("string"),
            DesignType::Object => f.write_str("object"),
            DesignType::Function => f.write_str("function"),
            DesignType::Array(inner) => write!(f, "{inner}[]"),
            DesignType::Declared(token) => write!(f, "type {token}"),
        }
    }
}

/// Declared signature of a method
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MethodDesign {
    /// Declared types of the parameters, in declaration order
    pub parameter_types: Vec<DesignType>,
    /// Declared return type, `None` if it was not retained
    pub return_type: Option<DesignType>,
}

impl MethodDesign {
    /// Creates a signature from parameter types and a return type
    #[must_use]
    pub fn new(parameter_types: Vec<DesignType>, return_type: DesignType) -> Self {
        MethodDesign {
            parameter_types,
            return_type: Some(return_type),
        }
    }
}

/// Classification of a declared member
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    /// A callable member (including the constructor)
    Method,
    /// A data member
    Property,
}

/// A declared method or property
#[derive(Debug)]
pub struct MemberInfo {
    /// Member name
    pub name: String,
    /// Method or property
    pub kind: MemberKind,
    /// Declared on the type itself rather than its instances
    pub is_static: bool,
    /// Declared type, for properties
    pub design_type: Option<DesignType>,
    /// Declared signature, for methods
    pub signature: Option<MethodDesign>,
}

/// A declared type: its name, its base and its members.
pub struct TypeInfo {
    /// Token identifying the type
    pub token: Token,
    /// Type name
    pub name: String,
    /// The type this one extends
    base: Option<Token>,
    /// All methods, static and instance, in declaration order
    pub methods: MemberList,
    /// All properties, static and instance, in declaration order
    pub properties: MemberList,
}

impl TypeInfo {
    /// Create a new `TypeInfo` without members
    pub fn new(token: Token, name: String, base: Option<Token>) -> Self {
        TypeInfo {
            token,
            name,
            base,
            methods: Arc::new(boxcar::Vec::new()),
            properties: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the token of the base type, if it exists
    #[must_use]
    pub fn base(&self) -> Option<Token> {
        self.base
    }

    /// The type-side target (class-level and static metadata)
    #[must_use]
    pub fn target(&self) -> Target {
        Target::Type(self.token)
    }

    /// The instance-side target (instance members and their parameters)
    #[must_use]
    pub fn prototype(&self) -> Target {
        Target::Prototype(self.token)
    }

    /// Declaration site of the type itself
    #[must_use]
    pub fn type_site(&self) -> DeclarationSite {
        DeclarationSite::class(self.token)
    }

    /// Declaration site of an instance member
    #[must_use]
    pub fn member_site(&self, member: &str) -> DeclarationSite {
        DeclarationSite::member(self.prototype(), member)
    }

    /// Declaration site of a static member
    #[must_use]
    pub fn static_member_site(&self, member: &str) -> DeclarationSite {
        DeclarationSite::member(self.target(), member)
    }

    /// Declaration site of a parameter of an instance method
    #[must_use]
    pub fn parameter_site(&self, method: &str, index: usize) -> DeclarationSite {
        DeclarationSite::parameter(self.prototype(), method, index)
    }

    /// Find a member declared directly on this type.
    ///
    /// ## Arguments
    /// * 'name'      - The member name
    /// * 'is_static' - Look on the type side (`true`) or the instance side (`false`)
    #[must_use]
    pub fn member(&self, name: &str, is_static: bool) -> Option<MemberInfoRc> {
        self.methods
            .iter()
            .chain(self.properties.iter())
            .map(|(_, member)| member)
            .find(|member| member.name == name && member.is_static == is_static)
            .cloned()
    }

    /// Find a member declared directly on the side of this type `target` points at
    #[must_use]
    pub fn member_for(&self, target: Target, name: &str) -> Option<MemberInfoRc> {
        self.member(name, !target.is_prototype())
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("base", &self.base)
            .field("methods", &self.methods.count())
            .field("properties", &self.properties.count())
            .finish()
    }
}

/// Knowledge about declared targets the metadata store relies on.
///
/// The store calls [`ReflectionProvider::parent`] repeatedly to walk the inheritance chain,
/// most-derived first, until it returns `None`. A hierarchy that lists a type as its own
/// ancestor makes that walk non-terminating; providers must not produce cycles.
///
/// All lookups are about the exact target given; walking ancestors is the caller's job.
pub trait ReflectionProvider: Send + Sync {
    /// Returns `true` if the token refers to a declared type
    fn contains(&self, token: Token) -> bool;

    /// Returns the same-side target of the parent type, `None` at the root
    fn parent(&self, target: Target) -> Option<Target>;

    /// Returns the name of the type, used in error messages
    fn type_name(&self, token: Token) -> Option<String>;

    /// Classifies a member declared directly on `target`
    fn member_kind(&self, target: Target, member: &str) -> Option<MemberKind>;

    /// Returns the declared type of a property on `target`
    fn design_type(&self, target: Target, property: &str) -> Option<DesignType>;

    /// Returns the declared signature of a method on `target`
    fn method_design(&self, target: Target, method: &str) -> Option<MethodDesign>;
}
