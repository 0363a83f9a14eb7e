//! Namespaced, inheritance-aware metadata storage.
//!
//! A [`MetadataStore`] is a view on a [`MetadataTable`] restricted to one namespace
//! partition, combined with an optional [`ReflectionProvider`] that supplies the parent of
//! each target. Every read comes in two forms:
//!
//! - **own** reads (`get_own`, `has_own`, `list_own_keys`) only look at the exact slot
//! - **effective** reads (`get`, `has`, `list_keys`) fall back to the nearest ancestor that
//!   holds a value, walking the provider's parent chain most-derived first
//!
//! Absent values are never errors. Only writes validate their target.
//!
//! # Namespaces
//!
//! Stores created with different namespaces over the same table never see each other's
//! slots, even for identical key, target and member. The default store
//! ([`MetadataStore::global`]) uses the unnamespaced partition of the global table.
//!
//! # Examples
//!
//! ```rust
//! use metarize::{MetadataStore, TypeRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let base = registry.declare("BaseClass").build()?;
//! let sub = registry.declare("SubClass").extends(base.token).build()?;
//!
//! let store = MetadataStore::new(Some("docs"), Some(registry.clone()));
//! store.define("name", String::from("base"), base.target(), None)?;
//!
//! assert!(store.get_own::<String>("name", sub.target(), None).is_none());
//! assert_eq!(store.get::<String>("name", sub.target(), None).as_deref().map(String::as_str), Some("base"));
//!
//! store.define("name", String::from("sub"), sub.target(), None)?;
//! assert_eq!(store.get::<String>("name", sub.target(), None).as_deref().map(String::as_str), Some("sub"));
//! assert_eq!(store.get::<String>("name", base.target(), None).as_deref().map(String::as_str), Some("base"));
//! # Ok::<(), metarize::Error>(())
//! ```

mod table;
mod value;

use std::{
    any::Any,
    collections::HashSet,
    fmt,
    sync::{Arc, OnceLock},
};

use tracing::{debug, trace};

pub use table::{MetadataTable, SlotKey};
pub use value::MetadataValue;

use crate::{
    metadata::{
        decorators::{Decorator, MetadataDecorator},
        key::{AsMetadataKey, KeyName},
        target::{DeclarationSite, Target},
        token::Token,
        typesystem::{ReflectionProvider, TypeRegistry},
    },
    Error, Result,
};

/// The positional list stored for the parameters of one method.
///
/// Index `i` holds the payload of parameter `i`; positions that were never written are
/// `None`. The length is the highest written index plus one.
pub type ParameterList<T> = Vec<Option<Arc<T>>>;

/// The default store
static GLOBAL_STORE: OnceLock<MetadataStore> = OnceLock::new();

/// A namespaced view on a metadata table with inheritance-aware lookup.
pub struct MetadataStore {
    table: Arc<MetadataTable>,
    namespace: Option<String>,
    provider: Option<Arc<dyn ReflectionProvider>>,
}

impl MetadataStore {
    /// Creates a store over the process-wide table.
    ///
    /// ## Arguments
    /// * 'namespace' - Partition of the table this store reads and writes, `None` for the default one
    /// * 'provider'  - Source of parent targets and declared types; without one, targets have no ancestors
    pub fn new(namespace: Option<&str>, provider: Option<Arc<dyn ReflectionProvider>>) -> Self {
        Self::with_table(MetadataTable::global(), namespace, provider)
    }

    /// Creates a store over a caller-owned table
    pub fn with_table(
        table: Arc<MetadataTable>,
        namespace: Option<&str>,
        provider: Option<Arc<dyn ReflectionProvider>>,
    ) -> Self {
        MetadataStore {
            table,
            namespace: namespace.map(str::to_string),
            provider,
        }
    }

    /// The default unnamespaced store, backed by the global table and [`TypeRegistry::global`]
    pub fn global() -> &'static MetadataStore {
        GLOBAL_STORE.get_or_init(|| {
            let registry: Arc<dyn ReflectionProvider> = TypeRegistry::global();
            MetadataStore::new(None, Some(registry))
        })
    }

    /// The namespace partition of this store
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The reflection provider, if one is attached
    #[must_use]
    pub fn provider(&self) -> Option<&dyn ReflectionProvider> {
        self.provider.as_deref()
    }

    /// The table backing this store
    #[must_use]
    pub fn table(&self) -> &Arc<MetadataTable> {
        &self.table
    }

    fn slot(&self, key: &str, target: Target, member: Option<&str>) -> SlotKey {
        SlotKey::new(self.namespace(), target, member, key)
    }

    fn validate(&self, target: Target) -> Result<()> {
        let known = match &self.provider {
            Some(provider) => provider.contains(target.token()),
            None => true,
        };
        if target.token().is_null() || !known {
            return Err(Error::InvalidTarget(target));
        }

        Ok(())
    }

    /// The target followed by its ancestors, most-derived first.
    ///
    /// Never terminates for hierarchies containing a cycle.
    pub fn lineage(&self, target: Target) -> impl Iterator<Item = Target> + '_ {
        std::iter::successors(Some(target), move |current| {
            let parent = self
                .provider
                .as_ref()
                .and_then(|provider| provider.parent(*current));
            trace!(from = %current, parent = ?parent, "inheritance walk");
            parent
        })
    }

    /// Name of a type for diagnostics, falling back to its token
    #[must_use]
    pub fn type_name(&self, token: Token) -> String {
        self.provider
            .as_ref()
            .and_then(|provider| provider.type_name(token))
            .unwrap_or_else(|| token.to_string())
    }

    /// Attaches a payload to a slot, replacing any own value it held.
    ///
    /// ## Arguments
    /// * 'key'    - The metadata key, a string or a [`crate::MetadataKey`]
    /// * 'value'  - The payload
    /// * 'target' - The type or prototype
    /// * 'member' - Member name for method and property metadata
    ///
    /// # Errors
    /// Returns [`Error::InvalidTarget`] if the target is null or unknown to the provider.
    pub fn define<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        value: T,
        target: Target,
        member: Option<&str>,
    ) -> Result<()> {
        self.define_value(key.key_name(), MetadataValue::new(value), target, member)
    }

    /// Attaches an already shared payload to a slot
    ///
    /// # Errors
    /// Returns [`Error::InvalidTarget`] if the target is null or unknown to the provider.
    pub fn define_shared<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        value: Arc<T>,
        target: Target,
        member: Option<&str>,
    ) -> Result<()> {
        self.define_value(key.key_name(), MetadataValue::from_arc(value), target, member)
    }

    /// Attaches a type-erased payload to a slot
    ///
    /// # Errors
    /// Returns [`Error::InvalidTarget`] if the target is null or unknown to the provider.
    pub fn define_value(
        &self,
        key: &str,
        value: MetadataValue,
        target: Target,
        member: Option<&str>,
    ) -> Result<()> {
        self.validate(target)?;

        debug!(
            namespace = ?self.namespace,
            key,
            %target,
            member,
            payload = value.type_name(),
            "define metadata"
        );
        self.table.insert(self.slot(key, target, member), value);
        Ok(())
    }

    /// Returns the own type-erased value of a slot
    #[must_use]
    pub fn get_own_value(&self, key: &str, target: Target, member: Option<&str>) -> Option<MetadataValue> {
        self.table.get(&self.slot(key, target, member))
    }

    /// Returns the effective type-erased value of a slot, with the target it was found on
    #[must_use]
    pub fn find_value(
        &self,
        key: &str,
        target: Target,
        member: Option<&str>,
    ) -> Option<(Target, MetadataValue)> {
        self.lineage(target).find_map(|current| {
            self.get_own_value(key, current, member)
                .map(|value| (current, value))
        })
    }

    /// Returns the effective type-erased value of a slot
    #[must_use]
    pub fn get_value(&self, key: &str, target: Target, member: Option<&str>) -> Option<MetadataValue> {
        self.find_value(key, target, member).map(|(_, value)| value)
    }

    /// Returns the own payload of a slot, without looking at ancestors.
    ///
    /// A payload of a different type than `T` is reported as absent.
    pub fn get_own<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
        member: Option<&str>,
    ) -> Option<Arc<T>> {
        let key = key.key_name();
        let value = self.get_own_value(key, target, member)?;
        downcast_value!(value, key)
    }

    /// Returns the payload of a slot, falling back to the nearest ancestor that has one.
    ///
    /// Ancestor values are never merged: the nearest one wins. A payload of a different type
    /// than `T` is reported as absent.
    pub fn get<T: Any + Send + Sync>(
        &self,
        key: impl AsMetadataKey<T>,
        target: Target,
        member: Option<&str>,
    ) -> Option<Arc<T>> {
        let key = key.key_name();
        let value = self.get_value(key, target, member)?;
        downcast_value!(value, key)
    }

    /// Returns `true` if the slot or one of its ancestor slots holds a value
    pub fn has(&self, key: impl KeyName, target: Target, member: Option<&str>) -> bool {
        let key = key.key_name();
        self.lineage(target)
            .any(|current| self.table.contains(&self.slot(key, current, member)))
    }

    /// Returns `true` if the exact slot holds a value
    pub fn has_own(&self, key: impl KeyName, target: Target, member: Option<&str>) -> bool {
        self.table
            .contains(&self.slot(key.key_name(), target, member))
    }

    /// Removes the exact slot, returning whether it held a value.
    ///
    /// Slots of ancestors, descendants and other members are never touched.
    pub fn delete(&self, key: impl KeyName, target: Target, member: Option<&str>) -> bool {
        let key = key.key_name();
        let removed = self.table.remove(&self.slot(key, target, member));

        debug!(namespace = ?self.namespace, key, %target, member, removed, "delete metadata");
        removed
    }

    /// Keys with an own value on the target (and member), in key order
    #[must_use]
    pub fn list_own_keys(&self, target: Target, member: Option<&str>) -> Vec<String> {
        self.table.keys_of(self.namespace(), target, member)
    }

    /// Keys with an effective value: own keys first, then keys only found on ancestors
    #[must_use]
    pub fn list_keys(&self, target: Target, member: Option<&str>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for current in self.lineage(target) {
            for key in self.list_own_keys(current, member) {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
        }

        keys
    }

    /// Own member-level values stored under `key` on one target, in member order
    pub(crate) fn own_member_values(&self, key: &str, target: Target) -> Vec<(String, MetadataValue)> {
        self.table.members_of(self.namespace(), target, key)
    }

    /// Applies decorators to a class or member declaration, in list order.
    ///
    /// Produces the same slots as applying them at declaration time. Stops at the first
    /// decorator that fails; the effects of the ones before it are kept.
    ///
    /// # Errors
    /// Returns the error of the first failing decorator.
    pub fn decorate(
        &self,
        decorators: &[&dyn Decorator],
        target: Target,
        member: Option<&str>,
    ) -> Result<()> {
        let site = match member {
            Some(member) => DeclarationSite::member(target, member),
            None => DeclarationSite {
                target,
                member: None,
                parameter: None,
            },
        };
        self.apply_all(decorators, &site)
    }

    /// Applies parameter decorators to one parameter of a method, in list order
    ///
    /// # Errors
    /// Returns the error of the first failing decorator.
    pub fn decorate_parameter(
        &self,
        decorators: &[&dyn Decorator],
        target: Target,
        method: &str,
        index: usize,
    ) -> Result<()> {
        self.apply_all(decorators, &DeclarationSite::parameter(target, method, index))
    }

    fn apply_all(&self, decorators: &[&dyn Decorator], site: &DeclarationSite) -> Result<()> {
        for decorator in decorators {
            decorator.apply(self, site)?;
        }

        Ok(())
    }

    /// A decorator that stores `value` under `key` on whatever class or member it is applied to
    pub fn metadata<T, Q>(key: Q, value: T) -> MetadataDecorator<T>
    where
        T: Clone + Any + Send + Sync,
        Q: AsMetadataKey<T>,
    {
        MetadataDecorator::new(key.key_name(), value)
    }

    /// Removes every slot of this store's namespace partition.
    ///
    /// Intended for test isolation; other namespaces sharing the table are left alone.
    pub fn reset(&self) {
        let removed = self.table.clear_namespace(self.namespace());
        debug!(namespace = ?self.namespace, removed, "reset metadata");
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataStore")
            .field("namespace", &self.namespace)
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        key::{ClassElement, MetadataKey},
        typesystem::TypeInfoRc,
    };

    struct Fixture {
        registry: Arc<TypeRegistry>,
        store: MetadataStore,
        base: TypeInfoRc,
        sub: TypeInfoRc,
    }

    fn fixture(namespace: Option<&str>) -> Fixture {
        let registry = Arc::new(TypeRegistry::new());
        let base = registry.declare("BaseClass").method("find").build().unwrap();
        let sub = registry
            .declare("SubClass")
            .extends(base.token)
            .method("find")
            .method("save")
            .build()
            .unwrap();
        let store = MetadataStore::with_table(
            Arc::new(MetadataTable::new()),
            namespace,
            Some(registry.clone()),
        );

        Fixture {
            registry,
            store,
            base,
            sub,
        }
    }

    #[test]
    fn test_define_and_get_own() {
        let f = fixture(None);
        f.store
            .define("name", String::from("base"), f.base.target(), None)
            .unwrap();

        let value = f.store.get_own::<String>("name", f.base.target(), None).unwrap();
        assert_eq!(value.as_str(), "base");
        assert!(f.store.get_own::<String>("name", f.base.prototype(), None).is_none());
        assert!(f.store.get_own::<String>("other", f.base.target(), None).is_none());
    }

    #[test]
    fn test_inherited_lookup_and_override() {
        let f = fixture(None);
        let key: MetadataKey<String, ClassElement> = MetadataKey::new("name");
        f.store
            .define(&key, String::from("base"), f.base.target(), None)
            .unwrap();

        assert!(f.store.get_own(&key, f.sub.target(), None).is_none());
        assert_eq!(f.store.get(&key, f.sub.target(), None).unwrap().as_str(), "base");
        assert!(f.store.has(&key, f.sub.target(), None));
        assert!(!f.store.has_own(&key, f.sub.target(), None));

        f.store
            .define(&key, String::from("sub"), f.sub.target(), None)
            .unwrap();
        assert_eq!(f.store.get(&key, f.sub.target(), None).unwrap().as_str(), "sub");
        assert_eq!(f.store.get(&key, f.base.target(), None).unwrap().as_str(), "base");

        let (found_on, _) = f.store.find_value("name", f.sub.target(), None).unwrap();
        assert_eq!(found_on, f.sub.target());
    }

    #[test]
    fn test_invalid_targets() {
        let f = fixture(None);
        let null = Target::Type(Token::new(0));
        let unknown = Target::Type(Token::new(0x02FF_FFF3));

        assert!(matches!(
            f.store.define("k", 1u8, null, None),
            Err(Error::InvalidTarget(t)) if t == null
        ));
        assert!(matches!(
            f.store.define("k", 1u8, unknown, None),
            Err(Error::InvalidTarget(_))
        ));

        // reads on invalid targets are simply absent
        assert!(f.store.get::<u8>("k", unknown, None).is_none());
        assert!(!f.store.has("k", null, None));
    }

    #[test]
    fn test_without_provider() {
        let store = MetadataStore::with_table(Arc::new(MetadataTable::new()), None, None);
        let target = Target::Type(Token::new(0x02FF_FF00));

        store.define("k", 5u16, target, None).unwrap();
        assert_eq!(store.get::<u16>("k", target, None).as_deref(), Some(&5));
        assert_eq!(store.lineage(target).count(), 1);
        assert_eq!(store.type_name(target.token()), "0x02ffff00");
        assert!(store.define("k", 5u16, Target::Type(Token::new(0)), None).is_err());
    }

    #[test]
    fn test_type_mismatch_is_absent() {
        let f = fixture(None);
        f.store.define("k", 1u32, f.base.target(), None).unwrap();

        assert!(f.store.get::<String>("k", f.base.target(), None).is_none());
        assert!(f.store.get_own::<String>("k", f.base.target(), None).is_none());
        assert!(f.store.has("k", f.base.target(), None));
    }

    #[test]
    fn test_delete_is_exact() {
        let f = fixture(None);
        let proto = f.sub.prototype();
        f.store.define("doc", 1u8, proto, Some("find")).unwrap();
        f.store.define("doc", 2u8, proto, Some("save")).unwrap();
        f.store.define("doc", 3u8, f.base.prototype(), Some("find")).unwrap();

        assert!(f.store.delete("doc", proto, Some("find")));
        assert!(!f.store.delete("doc", proto, Some("find")));
        assert!(!f.store.delete("missing", proto, None));

        assert_eq!(f.store.get_own::<u8>("doc", proto, Some("save")).as_deref(), Some(&2));
        assert_eq!(
            f.store.get_own::<u8>("doc", f.base.prototype(), Some("find")).as_deref(),
            Some(&3)
        );
        // the ancestor's slot now shows through
        assert_eq!(f.store.get::<u8>("doc", proto, Some("find")).as_deref(), Some(&3));
    }

    #[test]
    fn test_list_keys() {
        let f = fixture(None);
        f.store.define("b", (), f.base.target(), None).unwrap();
        f.store.define("shared", (), f.base.target(), None).unwrap();
        f.store.define("shared", (), f.sub.target(), None).unwrap();
        f.store.define("a", (), f.sub.target(), None).unwrap();
        f.store.define("member", (), f.sub.target(), Some("find")).unwrap();

        assert_eq!(f.store.list_own_keys(f.sub.target(), None), vec!["a", "shared"]);
        assert_eq!(
            f.store.list_keys(f.sub.target(), None),
            vec!["a", "shared", "b"]
        );
        assert_eq!(f.store.list_keys(f.base.target(), None), vec!["b", "shared"]);
        assert_eq!(f.store.list_own_keys(f.sub.target(), Some("find")), vec!["member"]);
    }

    #[test]
    fn test_namespace_isolation() {
        let registry = Arc::new(TypeRegistry::new());
        let info = registry.declare("Isolated").build().unwrap();
        let table = Arc::new(MetadataTable::new());
        let first = MetadataStore::with_table(table.clone(), Some("first"), Some(registry.clone()));
        let second = MetadataStore::with_table(table.clone(), Some("second"), Some(registry.clone()));
        let default = MetadataStore::with_table(table.clone(), None, Some(registry));

        first.define("k", 1u8, info.target(), None).unwrap();

        assert!(second.get::<u8>("k", info.target(), None).is_none());
        assert!(second.get_own::<u8>("k", info.target(), None).is_none());
        assert!(default.get::<u8>("k", info.target(), None).is_none());
        assert_eq!(first.namespace(), Some("first"));

        second.define("k", 2u8, info.target(), None).unwrap();
        first.reset();
        assert!(!first.has_own("k", info.target(), None));
        assert_eq!(second.get::<u8>("k", info.target(), None).as_deref(), Some(&2));
    }

    #[test]
    fn test_lineage() {
        let f = fixture(None);
        let lineage: Vec<Target> = f.store.lineage(f.sub.prototype()).collect();
        assert_eq!(lineage, vec![f.sub.prototype(), f.base.prototype()]);
        assert_eq!(f.store.type_name(f.sub.token), "SubClass");
        assert_eq!(f.registry.len(), 2);
    }

    #[test]
    fn test_metadata_decorator_through_decorate() {
        let f = fixture(Some("raw"));
        let doc = MetadataStore::metadata("doc", String::from("finds things"));
        let flag = MetadataStore::metadata("flag", true);

        f.store
            .decorate(&[&doc, &flag], f.sub.prototype(), Some("find"))
            .unwrap();
        f.store.decorate(&[&flag], f.sub.target(), None).unwrap();

        assert_eq!(
            f.store
                .get_own::<String>("doc", f.sub.prototype(), Some("find"))
                .unwrap()
                .as_str(),
            "finds things"
        );
        assert_eq!(
            f.store.get_own::<bool>("flag", f.sub.target(), None).as_deref(),
            Some(&true)
        );
    }

    #[test]
    fn test_global_store() {
        let store = MetadataStore::global();
        assert!(std::ptr::eq(store, MetadataStore::global()));
        assert_eq!(store.namespace(), None);
        assert!(store.provider().is_some());
    }
}
