//! The slot table shared by metadata stores.
//!
//! A [`MetadataTable`] holds every slot of every namespace in one ordered, lock-free map.
//! Slots are ordered by namespace, then target, then member, then key, so all slots of one
//! target (or one member of a target) are adjacent and can be enumerated with a range scan.
//! The ordering also makes enumeration stable for the lifetime of the process.

use std::sync::{Arc, OnceLock};

use crossbeam_skiplist::SkipMap;

use crate::metadata::{store::MetadataValue, target::Target};

/// Table used by the default metadata stores
static GLOBAL_TABLE: OnceLock<Arc<MetadataTable>> = OnceLock::new();

/// Identity of one metadata slot.
///
/// Parameter data is not addressed per index here: the parameters of one method share a
/// single slot holding the positional list.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    /// Namespace partition, `None` for the default partition
    pub namespace: Option<String>,
    /// The type or prototype the slot belongs to
    pub target: Target,
    /// Member name, `None` for class-level slots
    pub member: Option<String>,
    /// The metadata key
    pub key: String,
}

impl SlotKey {
    /// Creates the identity of a slot
    pub fn new(namespace: Option<&str>, target: Target, member: Option<&str>, key: &str) -> Self {
        SlotKey {
            namespace: namespace.map(str::to_string),
            target,
            member: member.map(str::to_string),
            key: key.to_string(),
        }
    }

    fn same_scope(&self, namespace: Option<&str>, target: Target) -> bool {
        self.namespace.as_deref() == namespace && self.target == target
    }
}

/// Process-lifetime storage of metadata slots.
///
/// The table itself has no notion of inheritance or validation; those live in
/// [`crate::MetadataStore`]. Writes to the same slot are atomic replacements, the last
/// writer wins.
#[derive(Default)]
pub struct MetadataTable {
    slots: SkipMap<SlotKey, MetadataValue>,
}

impl MetadataTable {
    /// Creates an empty table
    #[must_use]
    pub fn new() -> Self {
        MetadataTable {
            slots: SkipMap::new(),
        }
    }

    /// The process-wide table shared by all stores created with [`crate::MetadataStore::new`]
    pub fn global() -> Arc<MetadataTable> {
        GLOBAL_TABLE
            .get_or_init(|| Arc::new(MetadataTable::new()))
            .clone()
    }

    /// Stores `value`, replacing whatever the slot held
    pub fn insert(&self, slot: SlotKey, value: MetadataValue) {
        self.slots.insert(slot, value);
    }

    /// Returns the value of a slot
    pub fn get(&self, slot: &SlotKey) -> Option<MetadataValue> {
        self.slots.get(slot).map(|entry| entry.value().clone())
    }

    /// Returns `true` if the slot holds a value
    pub fn contains(&self, slot: &SlotKey) -> bool {
        self.slots.contains_key(slot)
    }

    /// Removes a slot, returning whether it existed
    pub fn remove(&self, slot: &SlotKey) -> bool {
        self.slots.remove(slot).is_some()
    }

    /// Keys of all slots of one target and member, in key order
    pub fn keys_of(
        &self,
        namespace: Option<&str>,
        target: Target,
        member: Option<&str>,
    ) -> Vec<String> {
        let start = SlotKey::new(namespace, target, member, "");
        self.slots
            .range(start..)
            .take_while(|entry| {
                entry.key().same_scope(namespace, target)
                    && entry.key().member.as_deref() == member
            })
            .map(|entry| entry.key().key.clone())
            .collect()
    }

    /// Member-level values stored under `key` for one target, in member order
    pub fn members_of(
        &self,
        namespace: Option<&str>,
        target: Target,
        key: &str,
    ) -> Vec<(String, MetadataValue)> {
        let start = SlotKey::new(namespace, target, None, "");
        self.slots
            .range(start..)
            .take_while(|entry| entry.key().same_scope(namespace, target))
            .filter(|entry| entry.key().key == key)
            .filter_map(|entry| {
                entry
                    .key()
                    .member
                    .clone()
                    .map(|member| (member, entry.value().clone()))
            })
            .collect()
    }

    /// Removes every slot of one namespace partition, returning how many were removed
    pub fn clear_namespace(&self, namespace: Option<&str>) -> usize {
        let mut removed = 0;
        for entry in self.slots.iter() {
            if entry.key().namespace.as_deref() == namespace && entry.remove() {
                removed += 1;
            }
        }

        removed
    }

    /// Removes every slot of every namespace
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of slots in the table
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot holds a value
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
