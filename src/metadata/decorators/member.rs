//! Application logic shared by method and property decorators.

use std::any::Any;

use tracing::debug;

use crate::{
    metadata::{
        decorators::DecoratorSpec,
        key::ElementCategory,
        merge::MergeMetadata,
        store::MetadataStore,
        target::DeclarationSite,
        typesystem::MemberKind,
    },
    Result,
};

/// Writes a member-level payload, merging it into the value the slot already resolves to.
///
/// The existing value may be own or inherited; the merged result is always written as the
/// own value of the exact slot. A provider that knows the member as the other kind rejects
/// the site.
pub(crate) fn apply_member<T>(
    inner: &DecoratorSpec<T>,
    store: &MetadataStore,
    site: &DeclarationSite,
    kind: MemberKind,
) -> Result<()>
where
    T: Clone + MergeMetadata + Any + Send + Sync,
{
    let expected = match kind {
        MemberKind::Method => ElementCategory::Method,
        MemberKind::Property => ElementCategory::Property,
    };
    let member = match (site.member.as_deref(), site.parameter) {
        (Some(member), None) => member,
        _ => return Err(inner.misapplied(store, site, expected)),
    };
    if let Some(declared) = store
        .provider()
        .and_then(|provider| provider.member_kind(site.target, member))
    {
        if declared != kind {
            return Err(inner.misapplied(store, site, expected));
        }
    }

    let key = inner.key.as_str();
    if !inner.allows_multiple(true) && store.has_own(key, site.target, Some(member)) {
        return Err(inner.duplicate(store, site));
    }

    let payload = match store.get::<T>(key, site.target, Some(member)) {
        Some(existing) => {
            let mut merged = existing.as_ref().clone();
            merged.merge_from(inner.spec.as_ref().clone());
            std::sync::Arc::new(merged)
        }
        None => inner.payload(),
    };

    debug!(
        decorator = inner.name(),
        key,
        target = %site.target,
        member,
        %kind,
        "apply member decorator"
    );
    store.define_shared(key, payload, site.target, Some(member))
}
