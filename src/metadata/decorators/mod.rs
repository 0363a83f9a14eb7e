//! Decorator factories: the declaration-time write path.
//!
//! A decorator is an attach-time effect. It is created once from a key, a payload and
//! [`DecoratorOptions`], then applied to any number of [`DeclarationSite`]s, either by the
//! code that declares types (the attach-time hook) or imperatively through
//! [`crate::MetadataStore::decorate`]. Each application performs exactly one store write.
//!
//! # Variants
//!
//! | Factory | Site | Slot value | Repeated application |
//! |---------|------|------------|----------------------|
//! | [`ClassDecoratorFactory`] | class | single payload | error by default |
//! | [`MethodDecoratorFactory`] | method | single payload, merged | merges by default |
//! | [`PropertyDecoratorFactory`] | property | single payload, merged | merges by default |
//! | [`ParameterDecoratorFactory`] | parameter | positional [`crate::ParameterList`] | replaces the index by default |
//!
//! # Examples
//!
//! ```rust
//! use metarize::{
//!     ClassDecoratorFactory, Decorator, MetadataStore, MethodDecoratorFactory, TypeRegistry,
//! };
//! use std::{collections::BTreeMap, sync::Arc};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let store = MetadataStore::new(Some("routes"), Some(registry.clone()));
//! let controller = registry.declare("UserController").method("getUser").build()?;
//!
//! ClassDecoratorFactory::create("api:endpoint", "/users".to_string())
//!     .apply(&store, &controller.type_site())?;
//!
//! let responses = |code: &str, text: &str| BTreeMap::from([(code.to_string(), text.to_string())]);
//! let site = controller.member_site("getUser");
//! MethodDecoratorFactory::create("api:responses", responses("200", "found")).apply(&store, &site)?;
//! MethodDecoratorFactory::create("api:responses", responses("404", "missing")).apply(&store, &site)?;
//!
//! let merged = store
//!     .get::<BTreeMap<String, String>>("api:responses", controller.prototype(), Some("getUser"))
//!     .unwrap();
//! assert_eq!(merged.len(), 2);
//! # Ok::<(), metarize::Error>(())
//! ```

mod class;
mod config;
mod member;
mod metadata;
mod method;
mod parameter;
mod property;

use std::sync::Arc;

pub use class::{ClassDecorator, ClassDecoratorFactory};
pub use config::DecoratorOptions;
pub use metadata::MetadataDecorator;
pub use method::{MethodDecorator, MethodDecoratorFactory};
pub use parameter::{ParameterDecorator, ParameterDecoratorFactory};
pub use property::{PropertyDecorator, PropertyDecoratorFactory};

use crate::{
    metadata::{
        key::ElementCategory,
        store::MetadataStore,
        target::{DeclarationSite, Target},
        typesystem::ReflectionProvider,
    },
    Error, Result,
};

/// An attach-time effect that writes metadata for one declaration
pub trait Decorator {
    /// Applies the effect to a declaration, writing into `store`
    ///
    /// # Errors
    /// Returns [`Error::Misapplied`] for sites of the wrong kind,
    /// [`Error::DuplicateApplication`] when repeated application is forbidden, and
    /// [`Error::InvalidTarget`] for targets the store rejects.
    fn apply(&self, store: &MetadataStore, site: &DeclarationSite) -> Result<()>;
}

/// Helpers shared by all decorator factories
pub struct DecoratorFactory;

impl DecoratorFactory {
    /// Renders a human readable label of a declaration, used in error messages.
    ///
    /// `class Name` for a class, `Name.member` for a static member, `Name.prototype` and
    /// `Name.prototype.member` for the instance side, with `[index]` appended for parameters.
    /// Types unknown to the provider are named by their token.
    #[must_use]
    pub fn target_name(
        provider: Option<&dyn ReflectionProvider>,
        target: Target,
        member: Option<&str>,
        index: Option<usize>,
    ) -> String {
        let token = target.token();
        let name = provider
            .and_then(|provider| provider.type_name(token))
            .unwrap_or_else(|| token.to_string());

        let mut label = match (target, member) {
            (Target::Type(_), None) => format!("class {name}"),
            (Target::Type(_), Some(member)) => format!("{name}.{member}"),
            (Target::Prototype(_), None) => format!("{name}.prototype"),
            (Target::Prototype(_), Some(member)) => format!("{name}.prototype.{member}"),
        };
        if let Some(index) = index {
            label.push_str(&format!("[{index}]"));
        }

        label
    }

    /// Label of a declaration site, as produced by [`DecoratorFactory::target_name`]
    #[must_use]
    pub fn site_name(store: &MetadataStore, site: &DeclarationSite) -> String {
        Self::target_name(
            store.provider(),
            site.target,
            site.member.as_deref(),
            site.parameter,
        )
    }
}

/// Key, payload and options every decorator variant carries
#[derive(Debug)]
pub(crate) struct DecoratorSpec<T> {
    pub key: String,
    pub spec: Arc<T>,
    pub options: DecoratorOptions,
    pub variant: &'static str,
}

impl<T: Clone> DecoratorSpec<T> {
    pub fn new(key: &str, spec: T, options: DecoratorOptions, variant: &'static str) -> Self {
        DecoratorSpec {
            key: key.to_string(),
            spec: Arc::new(spec),
            options,
            variant,
        }
    }

    /// The payload to store for one application
    pub fn payload(&self) -> Arc<T> {
        if self.options.clone_input {
            Arc::new(self.spec.as_ref().clone())
        } else {
            self.spec.clone()
        }
    }

    pub fn name(&self) -> &'static str {
        self.options.name_or(self.variant)
    }

    pub fn allows_multiple(&self, variant_default: bool) -> bool {
        self.options.allows_multiple(variant_default)
    }

    pub fn misapplied(
        &self,
        store: &MetadataStore,
        site: &DeclarationSite,
        expected: ElementCategory,
    ) -> Error {
        Error::Misapplied {
            decorator: self.name().to_string(),
            expected: expected.to_string(),
            site: DecoratorFactory::site_name(store, site),
        }
    }

    pub fn duplicate(&self, store: &MetadataStore, site: &DeclarationSite) -> Error {
        Error::DuplicateApplication {
            decorator: self.name().to_string(),
            target: DecoratorFactory::site_name(store, site),
            key: self.key.clone(),
        }
    }
}

impl<T> Clone for DecoratorSpec<T> {
    fn clone(&self) -> Self {
        DecoratorSpec {
            key: self.key.clone(),
            spec: self.spec.clone(),
            options: self.options,
            variant: self.variant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::token::Token, TypeRegistry};

    #[test]
    fn test_target_name() {
        let registry = Arc::new(TypeRegistry::new());
        let info = registry.declare("TestClass").build().unwrap();
        let provider: Option<&dyn ReflectionProvider> = Some(&*registry);

        assert_eq!(
            DecoratorFactory::target_name(provider, info.target(), None, None),
            "class TestClass"
        );
        assert_eq!(
            DecoratorFactory::target_name(provider, info.target(), Some("create"), None),
            "TestClass.create"
        );
        assert_eq!(
            DecoratorFactory::target_name(provider, info.prototype(), None, None),
            "TestClass.prototype"
        );
        assert_eq!(
            DecoratorFactory::target_name(provider, info.prototype(), Some("find"), Some(1)),
            "TestClass.prototype.find[1]"
        );
    }

    #[test]
    fn test_target_name_unknown_type() {
        let target = Target::Type(Token::new(0x0200_00ff));
        assert_eq!(
            DecoratorFactory::target_name(None, target, None, None),
            "class 0x020000ff"
        );
    }

    #[test]
    fn test_spec_payload_cloning() {
        let cloned = DecoratorSpec::new("k", vec![1u8], DecoratorOptions::default(), "Test");
        assert!(!Arc::ptr_eq(&cloned.payload(), &cloned.payload()));

        let shared = DecoratorSpec::new("k", vec![1u8], DecoratorOptions::shared(), "Test");
        assert!(Arc::ptr_eq(&shared.payload(), &shared.payload()));
        assert_eq!(shared.name(), "Test");
    }
}
