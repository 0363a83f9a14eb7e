//! Merge policy for repeated member-level metadata.
//!
//! Method and property decorators refine an existing payload instead of replacing it: the
//! fields present in the newer payload overwrite the matching fields of the existing one,
//! fields only present in the existing payload are kept. [`MergeMetadata`] expresses this
//! shallow merge for a payload type. Scalars and sequences have no fields, so for them the
//! merge is a replacement, which is also the default of the trait.
//!
//! # Examples
//!
//! ```rust
//! use metarize::MergeMetadata;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Operation {
//!     path: Option<String>,
//!     description: Option<String>,
//! }
//!
//! impl MergeMetadata for Operation {
//!     fn merge_from(&mut self, newer: Self) {
//!         self.path.merge_from(newer.path);
//!         self.description.merge_from(newer.description);
//!     }
//! }
//!
//! let mut op = Operation { path: Some("/users".into()), description: None };
//! op.merge_from(Operation { path: None, description: Some("List users".into()) });
//! assert_eq!(op.path.as_deref(), Some("/users"));
//! assert_eq!(op.description.as_deref(), Some("List users"));
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
};

/// Shallow merge of a newer payload into an existing one.
pub trait MergeMetadata: Sized {
    /// Merges `newer` into `self`; the default replaces `self` wholesale
    fn merge_from(&mut self, newer: Self) {
        *self = newer;
    }
}

impl_merge_replace!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, String,
    &'static str, ()
);

impl<T> MergeMetadata for Vec<T> {}

impl<T> MergeMetadata for Option<T> {
    fn merge_from(&mut self, newer: Self) {
        if newer.is_some() {
            *self = newer;
        }
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> MergeMetadata for HashMap<K, V, S> {
    fn merge_from(&mut self, newer: Self) {
        self.extend(newer);
    }
}

impl<K: Ord, V> MergeMetadata for BTreeMap<K, V> {
    fn merge_from(&mut self, newer: Self) {
        self.extend(newer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_replace() {
        let mut value = 1u32;
        value.merge_from(2);
        assert_eq!(value, 2);

        let mut text = String::from("old");
        text.merge_from(String::from("new"));
        assert_eq!(text, "new");
    }

    #[test]
    fn test_vec_replace() {
        let mut tags = vec!["a", "b"];
        tags.merge_from(vec!["c"]);
        assert_eq!(tags, vec!["c"]);
    }

    #[test]
    fn test_option_keeps_existing_on_none() {
        let mut value = Some(1);
        value.merge_from(None);
        assert_eq!(value, Some(1));

        value.merge_from(Some(3));
        assert_eq!(value, Some(3));
    }

    #[test]
    fn test_map_shallow_merge() {
        let mut existing: BTreeMap<String, i32> = BTreeMap::from([("a".to_string(), 1)]);
        existing.merge_from(BTreeMap::from([("b".to_string(), 2)]));
        assert_eq!(
            existing,
            BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)])
        );

        existing.merge_from(BTreeMap::from([("a".to_string(), 10)]));
        assert_eq!(existing.get("a"), Some(&10));
        assert_eq!(existing.get("b"), Some(&2));
    }

    #[test]
    fn test_hashmap_shallow_merge() {
        let mut existing: HashMap<&str, &str> = HashMap::from([("200", "ok")]);
        existing.merge_from(HashMap::from([("404", "missing"), ("200", "found")]));

        assert_eq!(existing.len(), 2);
        assert_eq!(existing["200"], "found");
        assert_eq!(existing["404"], "missing");
    }
}
