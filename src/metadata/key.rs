//! Typed metadata keys.
//!
//! A [`MetadataKey`] is the canonical handle of a metadata slot. Its identity is the key
//! string alone; the payload type `T` and the element marker `K` only exist at the type
//! level. Two keys built from the same string address the same slots, whatever their type
//! parameters say.
//!
//! # Examples
//!
//! ```rust
//! use metarize::{ClassElement, MetadataKey};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Endpoint {
//!     base_path: String,
//! }
//!
//! const API_ENDPOINT: MetadataKey<Endpoint, ClassElement> = MetadataKey::new("api:endpoint");
//!
//! assert_eq!(API_ENDPOINT.key(), "api:endpoint");
//! assert_eq!(API_ENDPOINT.to_string(), "api:endpoint");
//! ```

use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use strum::{Display, EnumCount, EnumIter};

/// The kinds of declarations metadata can be attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum ElementCategory {
    /// A type declaration
    Class,
    /// A method declaration (static or instance)
    Method,
    /// A property declaration (static or instance)
    Property,
    /// A single parameter of a method
    Parameter,
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level marker for the kind of element a key is intended for
pub trait ElementKind: sealed::Sealed + Send + Sync + 'static {
    /// The category this marker stands for, `None` for keys usable everywhere
    const CATEGORY: Option<ElementCategory>;
}

/// Marker for keys of class-level metadata
#[derive(Clone, Copy, Debug)]
pub struct ClassElement;
/// Marker for keys of method-level metadata
#[derive(Clone, Copy, Debug)]
pub struct MethodElement;
/// Marker for keys of property-level metadata
#[derive(Clone, Copy, Debug)]
pub struct PropertyElement;
/// Marker for keys of parameter-level metadata
#[derive(Clone, Copy, Debug)]
pub struct ParameterElement;
/// Marker for keys that are not restricted to one element kind
#[derive(Clone, Copy, Debug)]
pub struct AnyElement;

macro_rules! element_kind {
    ($($marker:ident => $category:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $marker {}
            impl ElementKind for $marker {
                const CATEGORY: Option<ElementCategory> = $category;
            }
        )*
    };
}

element_kind! {
    ClassElement => Some(ElementCategory::Class),
    MethodElement => Some(ElementCategory::Method),
    PropertyElement => Some(ElementCategory::Property),
    ParameterElement => Some(ElementCategory::Parameter),
    AnyElement => None,
}

/// A typed handle for a metadata slot.
///
/// `T` is the payload type stored under the key, `K` the element kind it is meant for.
/// Equality and hashing only look at the key string.
pub struct MetadataKey<T, K = AnyElement> {
    key: Cow<'static, str>,
    _marker: PhantomData<fn() -> (T, K)>,
}

impl<T, K: ElementKind> MetadataKey<T, K> {
    /// Creates a key from a static string, usable in `const` items
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        MetadataKey {
            key: Cow::Borrowed(key),
            _marker: PhantomData,
        }
    }

    /// Creates a key from an owned or computed string
    pub fn create(key: impl Into<String>) -> Self {
        MetadataKey {
            key: Cow::Owned(key.into()),
            _marker: PhantomData,
        }
    }

    /// Returns the key string, which is the slot identity in the store
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the element category the key is intended for, if restricted
    #[must_use]
    pub fn category(&self) -> Option<ElementCategory> {
        K::CATEGORY
    }
}

impl<T, K> Clone for MetadataKey<T, K> {
    fn clone(&self) -> Self {
        MetadataKey {
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, K> fmt::Debug for MetadataKey<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MetadataKey({:?}, payload: {})",
            self.key,
            std::any::type_name::<T>()
        )
    }
}

impl<T, K> fmt::Display for MetadataKey<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl<T, K> PartialEq for MetadataKey<T, K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T, K> Eq for MetadataKey<T, K> {}

impl<T, K> Hash for MetadataKey<T, K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Anything that names a metadata slot, regardless of its payload type
pub trait KeyName {
    /// Returns the key string
    fn key_name(&self) -> &str;
}

impl KeyName for str {
    fn key_name(&self) -> &str {
        self
    }
}

impl KeyName for String {
    fn key_name(&self) -> &str {
        self
    }
}

impl<T, K> KeyName for MetadataKey<T, K> {
    fn key_name(&self) -> &str {
        &self.key
    }
}

impl<Q: KeyName + ?Sized> KeyName for &Q {
    fn key_name(&self) -> &str {
        (**self).key_name()
    }
}

/// Anything that can address a metadata slot holding a `T`.
///
/// Implemented for raw strings (any payload type, chosen by the caller) and for
/// [`MetadataKey`] (only its own payload type, so the type is inferred at call sites).
pub trait AsMetadataKey<T>: KeyName {}

impl<T> AsMetadataKey<T> for str {}
impl<T> AsMetadataKey<T> for String {}
impl<T, K> AsMetadataKey<T> for MetadataKey<T, K> {}
impl<T, Q: AsMetadataKey<T> + ?Sized> AsMetadataKey<T> for &Q {}

/// Compile-time restriction of keys to an element kind.
///
/// Decorator factories require their key to implement `AppliesTo` for their element kind.
/// Raw strings and [`AnyElement`] keys apply everywhere; keys with a specific marker only to
/// that kind of element.
pub trait AppliesTo<E: ElementKind> {}

impl<E: ElementKind> AppliesTo<E> for str {}
impl<E: ElementKind> AppliesTo<E> for String {}
impl<E: ElementKind, Q: AppliesTo<E> + ?Sized> AppliesTo<E> for &Q {}

macro_rules! applies_to {
    ($($marker:ident),*) => {
        $(
            impl<T> AppliesTo<$marker> for MetadataKey<T, $marker> {}
            impl<T> AppliesTo<$marker> for MetadataKey<T, AnyElement> {}
        )*
    };
}

applies_to!(ClassElement, MethodElement, PropertyElement, ParameterElement);
