//! Read-side aggregation over a metadata store.
//!
//! The [`MetadataInspector`] never writes on its own (except through the
//! [`MetadataInspector::define_metadata`] pass-through). It turns raw slot lookups into the
//! shapes frameworks consume: one value per class or member, a name-keyed map of every
//! decorated method or property (including inherited ones), and the positional list of a
//! method's parameters. It also exposes the declared types recorded by the
//! [`crate::ReflectionProvider`].
//!
//! # Examples
//!
//! ```rust
//! use metarize::{
//!     Decorator, DesignType, MetadataInspector, MetadataStore, MethodDecoratorFactory,
//!     TypeRegistry,
//! };
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let store = MetadataStore::new(Some("inspector-doc"), Some(registry.clone()));
//! let service = registry.declare("Service")
//!     .method("start")
//!     .method("stop")
//!     .property("name", DesignType::String)
//!     .build()?;
//!
//! MethodDecoratorFactory::create("doc", "starts".to_string())
//!     .apply(&store, &service.member_site("start"))?;
//!
//! let inspector = MetadataInspector::for_store(&store);
//! let docs = inspector.get_all_method_metadata::<String>("doc", service.prototype());
//! assert_eq!(docs.keys().collect::<Vec<_>>(), vec!["start"]);
//! assert_eq!(
//!     inspector.get_design_type_for_property(service.prototype(), "name"),
//!     Some(DesignType::String)
//! );
//! # Ok::<(), metarize::Error>(())
//! ```

use std::{
    any::Any,
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use crate::{
    metadata::{
        key::{AsMetadataKey, KeyName},
        store::{MetadataStore, ParameterList},
        target::Target,
        typesystem::{DesignType, MemberKind, MethodDesign, CONSTRUCTOR},
    },
    Result,
};

/// Convenience reads over one [`MetadataStore`]
#[derive(Clone, Copy, Debug)]
pub struct MetadataInspector<'a> {
    store: &'a MetadataStore,
}

impl<'a> MetadataInspector<'a> {
    /// Creates an inspector reading from `store`
    #[must_use]
    pub fn for_store(store: &'a MetadataStore) -> Self {
        MetadataInspector { store }
    }

    /// The store this inspector reads from
    #[must_use]
    pub fn store(&self) -> &'a MetadataStore {
        self.store
    }

    /// Effective class-level value
    pub fn get_class_metadata<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
    ) -> Option<Arc<T>> {
        self.store.get(key, target, None)
    }

    /// Effective value of one method
    pub fn get_method_metadata<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
        method: &str,
    ) -> Option<Arc<T>> {
        self.store.get(key, target, Some(method))
    }

    /// Effective value of one property
    pub fn get_property_metadata<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
        property: &str,
    ) -> Option<Arc<T>> {
        self.store.get(key, target, Some(property))
    }

    /// One position of a method's parameter list
    pub fn get_parameter_metadata<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
        method: &str,
        index: usize,
    ) -> Option<Arc<T>> {
        self.store
            .get::<ParameterList<T>>(key.key_name(), target, Some(method))
            .and_then(|list| list.get(index).cloned().flatten())
    }

    /// The full parameter list of a method, empty if no parameter was decorated
    pub fn get_all_parameter_metadata<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
        method: &str,
    ) -> ParameterList<T> {
        self.store
            .get::<ParameterList<T>>(key.key_name(), target, Some(method))
            .map(|list| list.as_ref().clone())
            .unwrap_or_default()
    }

    /// Every method of the target and its ancestors with a value under `key`.
    ///
    /// The nearest declaration of a member wins. The constructor is never included.
    pub fn get_all_method_metadata<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
    ) -> BTreeMap<String, Arc<T>> {
        self.collect_members(key.key_name(), target, MemberKind::Property)
    }

    /// Every property of the target and its ancestors with a value under `key`.
    ///
    /// The nearest declaration of a member wins.
    pub fn get_all_property_metadata<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
    ) -> BTreeMap<String, Arc<T>> {
        self.collect_members(key.key_name(), target, MemberKind::Method)
    }

    fn collect_members<T: Any + Send + Sync>(
        &self,
        key: &str,
        target: Target,
        excluded: MemberKind,
    ) -> BTreeMap<String, Arc<T>> {
        let provider = self.store.provider();
        let mut seen = HashSet::new();
        let mut result = BTreeMap::new();

        for current in self.store.lineage(target) {
            for (member, value) in self.store.own_member_values(key, current) {
                if member == CONSTRUCTOR || !seen.insert(member.clone()) {
                    continue;
                }
                let kind = provider.and_then(|provider| provider.member_kind(current, &member));
                if kind == Some(excluded) {
                    continue;
                }
                if let Some(payload) = downcast_value!(value, key) {
                    result.insert(member, payload);
                }
            }
        }

        result
    }

    /// Pass-through to [`MetadataStore::define`]
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidTarget`] if the target is null or unknown.
    pub fn define_metadata<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        value: T,
        target: Target,
        member: Option<&str>,
    ) -> Result<()> {
        self.store.define(key, value, target, member)
    }

    /// Returns `true` if the target or an ancestor has a value under `key`
    pub fn has_metadata(&self, key: impl KeyName, target: Target, member: Option<&str>) -> bool {
        self.store.has(key, target, member)
    }

    /// Declared type of a property, looked up on the target and its ancestors
    #[must_use]
    pub fn get_design_type_for_property(&self, target: Target, property: &str) -> Option<DesignType> {
        let provider = self.store.provider()?;
        self.store
            .lineage(target)
            .find_map(|current| provider.design_type(current, property))
    }

    /// Declared signature of a method, looked up on the target and its ancestors
    #[must_use]
    pub fn get_design_type_for_method(&self, target: Target, method: &str) -> Option<MethodDesign> {
        let provider = self.store.provider()?;
        self.store
            .lineage(target)
            .find_map(|current| provider.method_design(current, method))
    }
}

impl MetadataInspector<'static> {
    /// An inspector over the default store
    #[must_use]
    pub fn global() -> Self {
        MetadataInspector::for_store(MetadataStore::global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::typesystem::{TypeInfoRc, TypeRegistry},
        MetadataTable,
    };

    struct Fixture {
        store: MetadataStore,
        base: TypeInfoRc,
        sub: TypeInfoRc,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(TypeRegistry::new());
        let base = registry
            .declare("BaseController")
            .constructor(MethodDesign::new(vec![DesignType::Object], DesignType::Void))
            .method("list")
            .method("find")
            .property("prefix", DesignType::String)
            .build()
            .unwrap();
        let sub = registry
            .declare("UserController")
            .extends(base.token)
            .method("find")
            .method("create")
            .property("limit", DesignType::Number)
            .build()
            .unwrap();
        let store =
            MetadataStore::with_table(Arc::new(MetadataTable::new()), None, Some(registry));

        Fixture { store, base, sub }
    }

    #[test]
    fn test_single_lookups() {
        let f = fixture();
        let inspector = MetadataInspector::for_store(&f.store);
        inspector
            .define_metadata("name", "base".to_string(), f.base.target(), None)
            .unwrap();
        inspector
            .define_metadata("route", "/find".to_string(), f.base.prototype(), Some("find"))
            .unwrap();

        assert_eq!(
            inspector
                .get_class_metadata::<String>("name", f.sub.target())
                .unwrap()
                .as_str(),
            "base"
        );
        assert_eq!(
            inspector
                .get_method_metadata::<String>("route", f.sub.prototype(), "find")
                .unwrap()
                .as_str(),
            "/find"
        );
        assert!(inspector
            .get_property_metadata::<String>("route", f.sub.prototype(), "limit")
            .is_none());
        assert!(inspector.has_metadata("name", f.sub.target(), None));
    }

    #[test]
    fn test_all_method_metadata() {
        let f = fixture();
        let inspector = MetadataInspector::for_store(&f.store);
        let base = f.base.prototype();
        let sub = f.sub.prototype();

        inspector.define_metadata("doc", 1u8, base, Some("list")).unwrap();
        inspector.define_metadata("doc", 2u8, base, Some("find")).unwrap();
        inspector.define_metadata("doc", 3u8, sub, Some("find")).unwrap();
        inspector.define_metadata("doc", 4u8, sub, Some("create")).unwrap();
        inspector.define_metadata("doc", 5u8, base, Some(CONSTRUCTOR)).unwrap();
        inspector.define_metadata("doc", 6u8, sub, Some("limit")).unwrap();
        inspector.define_metadata("other", 7u8, sub, Some("create")).unwrap();

        let all = inspector.get_all_method_metadata::<u8>("doc", sub);
        let flat: Vec<(&str, u8)> = all.iter().map(|(k, v)| (k.as_str(), **v)).collect();
        assert_eq!(flat, vec![("create", 4), ("find", 3), ("list", 1)]);

        let base_only = inspector.get_all_method_metadata::<u8>("doc", base);
        assert_eq!(base_only.len(), 2);
        assert_eq!(*base_only["find"], 2);
    }

    #[test]
    fn test_all_property_metadata() {
        let f = fixture();
        let inspector = MetadataInspector::for_store(&f.store);

        inspector
            .define_metadata("column", "prefix_col".to_string(), f.base.prototype(), Some("prefix"))
            .unwrap();
        inspector
            .define_metadata("column", "limit_col".to_string(), f.sub.prototype(), Some("limit"))
            .unwrap();
        inspector
            .define_metadata("column", "not_a_property".to_string(), f.sub.prototype(), Some("find"))
            .unwrap();

        let all = inspector.get_all_property_metadata::<String>("column", f.sub.prototype());
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["limit", "prefix"]);
    }

    #[test]
    fn test_parameter_metadata() {
        let f = fixture();
        let inspector = MetadataInspector::for_store(&f.store);
        let list: ParameterList<String> = vec![Some(Arc::new("id".to_string())), None];
        inspector
            .define_metadata("param", list, f.base.prototype(), Some("find"))
            .unwrap();

        assert_eq!(
            inspector
                .get_parameter_metadata::<String>("param", f.sub.prototype(), "find", 0)
                .unwrap()
                .as_str(),
            "id"
        );
        assert!(inspector
            .get_parameter_metadata::<String>("param", f.sub.prototype(), "find", 1)
            .is_none());
        assert!(inspector
            .get_parameter_metadata::<String>("param", f.sub.prototype(), "find", 5)
            .is_none());
        assert_eq!(
            inspector
                .get_all_parameter_metadata::<String>("param", f.sub.prototype(), "find")
                .len(),
            2
        );
        assert!(inspector
            .get_all_parameter_metadata::<String>("param", f.sub.prototype(), "create")
            .is_empty());
    }

    #[test]
    fn test_design_types() {
        let f = fixture();
        let inspector = MetadataInspector::for_store(&f.store);

        assert_eq!(
            inspector.get_design_type_for_property(f.sub.prototype(), "prefix"),
            Some(DesignType::String)
        );
        assert_eq!(
            inspector.get_design_type_for_property(f.sub.prototype(), "limit"),
            Some(DesignType::Number)
        );
        assert_eq!(inspector.get_design_type_for_property(f.sub.prototype(), "find"), None);
        assert_eq!(
            inspector
                .get_design_type_for_method(f.sub.prototype(), CONSTRUCTOR)
                .map(|design| design.parameter_types),
            Some(vec![DesignType::Object])
        );
        // declared without a signature
        assert_eq!(inspector.get_design_type_for_method(f.sub.prototype(), "find"), None);
    }

    #[test]
    fn test_design_types_without_provider() {
        let store = MetadataStore::with_table(Arc::new(MetadataTable::new()), None, None);
        let inspector = MetadataInspector::for_store(&store);
        let target = Target::Prototype(crate::Token::new(0x0200_0fff));

        assert_eq!(inspector.get_design_type_for_property(target, "x"), None);
        assert_eq!(inspector.get_design_type_for_method(target, "x"), None);
    }
}
