//! Targets and declaration sites.
//!
//! A [`Target`] is the element metadata is stored against: either a type itself (class-level
//! and static-member metadata) or the instance side of a type (its prototype, used for
//! instance methods, properties and their parameters). A [`DeclarationSite`] is what the
//! attach-time hook hands to a decorator: the target plus the optional member name and
//! parameter position of the declaration being processed.

use std::fmt;

use crate::metadata::{key::ElementCategory, token::Token};

/// The element a metadata slot belongs to.
///
/// Both variants identify the same declared type by its [`Token`]; they are distinct targets
/// and never share slots. Inheritance walks stay on the same side: the parent of
/// `Type(derived)` is `Type(base)`, the parent of `Prototype(derived)` is `Prototype(base)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// The type itself
    Type(Token),
    /// The instance side of the type
    Prototype(Token),
}

impl Target {
    /// Returns the token of the type this target belongs to
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            Target::Type(token) | Target::Prototype(token) => *token,
        }
    }

    /// Returns `true` for instance-side targets
    #[must_use]
    pub fn is_prototype(&self) -> bool {
        matches!(self, Target::Prototype(_))
    }

    /// Returns the same-side target of another type.
    ///
    /// Used by the inheritance walk to turn a base type token into the next target.
    #[must_use]
    pub fn with_token(&self, token: Token) -> Target {
        match self {
            Target::Type(_) => Target::Type(token),
            Target::Prototype(_) => Target::Prototype(token),
        }
    }

    /// Returns the type-side target of the same type
    #[must_use]
    pub fn type_side(&self) -> Target {
        Target::Type(self.token())
    }

    /// Returns the instance-side target of the same type
    #[must_use]
    pub fn prototype(&self) -> Target {
        Target::Prototype(self.token())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Type(token) => write!(f, "type {token}"),
            Target::Prototype(token) => write!(f, "prototype {token}"),
        }
    }
}

/// The declaration a decorator is applied to.
///
/// This is the information the attach-time hook supplies when a declaration is processed:
/// the target, the member name for methods and properties, and the position for parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclarationSite {
    /// The type or prototype that owns the declaration
    pub target: Target,
    /// Method or property name, absent for class declarations
    pub member: Option<String>,
    /// Parameter position, only set for parameter declarations
    pub parameter: Option<usize>,
}

impl DeclarationSite {
    /// Site of a class declaration
    #[must_use]
    pub fn class(token: Token) -> Self {
        DeclarationSite {
            target: Target::Type(token),
            member: None,
            parameter: None,
        }
    }

    /// Site of a member (method or property) declaration
    #[must_use]
    pub fn member(target: Target, member: &str) -> Self {
        DeclarationSite {
            target,
            member: Some(member.to_string()),
            parameter: None,
        }
    }

    /// Site of a parameter declaration
    #[must_use]
    pub fn parameter(target: Target, method: &str, index: usize) -> Self {
        DeclarationSite {
            target,
            member: Some(method.to_string()),
            parameter: Some(index),
        }
    }

    /// Classifies the site by the shape of the information it carries.
    ///
    /// Members are reported as [`ElementCategory::Method`]; the store cannot tell methods and
    /// properties apart without a reflection provider.
    #[must_use]
    pub fn category(&self) -> ElementCategory {
        match (&self.member, self.parameter) {
            (None, _) => ElementCategory::Class,
            (Some(_), Some(_)) => ElementCategory::Parameter,
            (Some(_), None) => ElementCategory::Method,
        }
    }
}
