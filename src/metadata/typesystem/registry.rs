//! Central registry of declared types.
//!
//! This module provides the [`TypeRegistry`], a thread-safe registry holding every type
//! declared through a [`crate::metadata::typesystem::TypeBuilder`]. It is the default
//! [`ReflectionProvider`] of the metadata store: it answers parent lookups for the inheritance
//! walk, classifies members and hands out the declared types of properties and methods.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary index using a lock-free skip list
//! - **Name-based lookup**: Secondary index from type name to tokens
//!
//! # Token Allocation
//!
//! Tokens come from one process-wide counter. Registries never hand out the same token, so
//! several registries can share one metadata table without their targets colliding.
//!
//! # Thread Safety
//!
//! Registration and lookup can run concurrently; the intended usage is still to declare
//! every type during initialization and only read afterwards.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, OnceLock,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    metadata::{
        target::Target,
        token::Token,
        typesystem::{
            DesignType, MemberKind, MethodDesign, ReflectionProvider, TypeBuilder, TypeInfoRc,
        },
    },
    Error::{TypeInsert, TypeMissingParent, TypeNotFound},
    Result,
};

/// First token handed out, row 1 of the type table
const FIRST_TOKEN: u32 = 0x0200_0001;

/// Process-wide counter for type tokens
static NEXT_TOKEN: AtomicU32 = AtomicU32::new(FIRST_TOKEN);

/// Registry used by the default metadata store
static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Central registry for declared types.
///
/// # Examples
///
/// ```rust
/// use metarize::TypeRegistry;
/// use std::sync::Arc;
///
/// let registry = Arc::new(TypeRegistry::new());
/// let base = registry.declare("Base").method("run").build()?;
/// let derived = registry.declare("Derived").extends(base.token).build()?;
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.ancestors(derived.token), vec![base.token]);
/// assert_eq!(registry.get_by_name("Derived")[0].token, derived.token);
/// # Ok::<(), metarize::Error>(())
/// ```
pub struct TypeRegistry {
    /// Primary type storage indexed by token
    types: SkipMap<Token, TypeInfoRc>,
    /// Secondary index: types indexed by name (may have duplicates)
    types_by_name: DashMap<String, Vec<Token>>,
}

impl TypeRegistry {
    /// Create a new, empty type registry
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry {
            types: SkipMap::new(),
            types_by_name: DashMap::new(),
        }
    }

    /// The process-wide registry backing [`crate::MetadataStore::global`]
    pub fn global() -> Arc<TypeRegistry> {
        GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new())).clone()
    }

    /// Get the next available token and increment the counter
    pub(crate) fn next_token() -> Token {
        let next_token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        debug_assert!(
            Token::new(next_token).kind() == Token::DECLARED,
            "We ran out of type tokens"
        );

        Token::new(next_token)
    }

    /// Start declaring a new type registered in this registry
    ///
    /// ## Arguments
    /// * 'name' - The name of the new type
    pub fn declare(self: &Arc<Self>, name: &str) -> TypeBuilder {
        TypeBuilder::new(self.clone(), name)
    }

    /// Insert a `TypeInfo` into the registry
    ///
    /// ## Arguments
    /// * '`new_type`' - The type to register
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if the token is null or already registered, and
    /// [`crate::Error::TypeMissingParent`] if the declared base is not registered.
    pub fn insert(&self, new_type: &TypeInfoRc) -> Result<()> {
        let token = new_type.token;
        if token.is_null() || self.types.contains_key(&token) {
            return Err(TypeInsert(token));
        }

        if let Some(base) = new_type.base() {
            if !self.types.contains_key(&base) {
                return Err(TypeMissingParent(base));
            }
        }

        self.types.insert(token, new_type.clone());
        self.types_by_name
            .entry(new_type.name.clone())
            .or_default()
            .push(token);

        tracing::debug!(%token, name = %new_type.name, base = ?new_type.base(), "declared type");
        Ok(())
    }

    /// Look up a type by its token
    pub fn get(&self, token: &Token) -> Option<TypeInfoRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a type by its token, failing if it does not exist
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] for unknown tokens.
    pub fn resolve(&self, token: &Token) -> Result<TypeInfoRc> {
        self.get(token).ok_or(TypeNotFound(*token))
    }

    /// Get all types with a specific name
    pub fn get_by_name(&self, name: &str) -> Vec<TypeInfoRc> {
        if let Some(tokens) = self.types_by_name.get(name) {
            tokens
                .iter()
                .filter_map(|token| self.get(token))
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Tokens of all ancestors of a type, nearest first
    pub fn ancestors(&self, token: Token) -> Vec<Token> {
        let mut result = Vec::new();
        let mut current = self.get(&token).and_then(|info| info.base());
        while let Some(base) = current {
            result.push(base);
            current = self.get(&base).and_then(|info| info.base());
        }

        result
    }

    /// Returns the number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all registered types, ordered by token
    pub fn iter(&self) -> impl Iterator<Item = TypeInfoRc> + '_ {
        self.types.iter().map(|entry| entry.value().clone())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflectionProvider for TypeRegistry {
    fn contains(&self, token: Token) -> bool {
        self.types.contains_key(&token)
    }

    fn parent(&self, target: Target) -> Option<Target> {
        self.get(&target.token())
            .and_then(|info| info.base())
            .map(|base| target.with_token(base))
    }

    fn type_name(&self, token: Token) -> Option<String> {
        self.get(&token).map(|info| info.name.clone())
    }

    fn member_kind(&self, target: Target, member: &str) -> Option<MemberKind> {
        self.get(&target.token())
            .and_then(|info| info.member_for(target, member))
            .map(|member| member.kind)
    }

    fn design_type(&self, target: Target, property: &str) -> Option<DesignType> {
        self.get(&target.token())
            .and_then(|info| info.member_for(target, property))
            .filter(|member| member.kind == MemberKind::Property)
            .and_then(|member| member.design_type.clone())
    }

    fn method_design(&self, target: Target, method: &str) -> Option<MethodDesign> {
        self.get(&target.token())
            .and_then(|info| info.member_for(target, method))
            .filter(|member| member.kind == MemberKind::Method)
            .and_then(|member| member.signature.clone())
    }
}
