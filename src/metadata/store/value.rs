//! Type-erased payloads held by metadata slots.

use std::{
    any::{type_name, Any},
    fmt,
    sync::Arc,
};

/// An opaque payload stored in one metadata slot.
///
/// Different keys carry unrelated payload shapes in the same table, so the table stores
/// payloads behind `dyn Any` and typed reads downcast on the way out. Cloning a value is
/// cheap and shares the payload.
#[derive(Clone)]
pub struct MetadataValue {
    payload: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl MetadataValue {
    /// Wraps an owned payload
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared payload without copying it
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        MetadataValue {
            payload: value,
            type_name: type_name::<T>(),
        }
    }

    /// Returns the payload if it is a `T`
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.payload.clone().downcast::<T>().ok()
    }

    /// Returns `true` if the payload is a `T`
    #[must_use]
    pub fn is<T: Any + Send + Sync>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// Name of the payload type, for diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if both values share the same payload allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &MetadataValue) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetadataValue({})", self.type_name)
    }
}
