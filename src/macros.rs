#![allow(unused_macros)]

/// Helper macro for payload types whose merge is a plain replacement
///
/// ```rust, ignore
///  impl_merge_replace!(bool, u32, String);
/// ```
macro_rules! impl_merge_replace {
    ($($ty:ty),* $(,)?) => {
        $(
            impl crate::metadata::merge::MergeMetadata for $ty {}
        )*
    };
}

/// Helper macro for looking up a typed payload in a store value, logging a mismatch
///
/// ```rust, ignore
///  let spec: Option<Arc<Endpoint>> = downcast_value!(value, key);
/// ```
macro_rules! downcast_value {
    ($value:expr, $key:expr) => {{
        let value = $value;
        match value.downcast() {
            Some(payload) => Some(payload),
            None => {
                tracing::warn!(
                    key = %$key,
                    stored = value.type_name(),
                    "stored payload has a different type than requested"
                );
                None
            }
        }
    }};
}
