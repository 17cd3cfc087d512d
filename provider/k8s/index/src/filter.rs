use gateway_provider_core::{
    ExtensionKinds, GroupKind, NamespacedName, ResourceMappings, ResourceTree,
};
use gateway_provider_k8s_api::{
    filter::{self, AuthenticationFilter, RateLimitFilter},
    gateway::LocalObjectReference,
    DynamicObject,
};
use std::fmt;

/// The catalog an `ExtensionRef` filter resolves against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Authentication,
    RateLimit,
    Extension(GroupKind),
}

/// An `ExtensionRef` whose kind is neither one of the gateway's own filter
/// kinds nor registered by an extension.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported ExtensionRef filter kind {0}")]
pub struct UnsupportedFilter(pub GroupKind);

/// A filter object found in one of the catalogs.
#[derive(Clone, Debug)]
pub enum ResolvedFilter {
    Authentication(AuthenticationFilter),
    RateLimit(RateLimitFilter),
    Extension(DynamicObject),
}

// === impl FilterKind ===

impl FilterKind {
    pub fn from_ref(
        extension_ref: &LocalObjectReference,
        extensions: &ExtensionKinds,
    ) -> Result<Self, UnsupportedFilter> {
        let gk = GroupKind::new(&extension_ref.group, &extension_ref.kind);
        if gk.group == filter::GROUP {
            match gk.kind.as_str() {
                filter::KIND_AUTHENTICATION_FILTER => return Ok(Self::Authentication),
                filter::KIND_RATE_LIMIT_FILTER => return Ok(Self::RateLimit),
                _ => {}
            }
        }

        if extensions.contains(&gk) {
            return Ok(Self::Extension(gk));
        }
        Err(UnsupportedFilter(gk))
    }

    /// Looks up the filter named `id` in the matching catalog.
    ///
    /// Filters are always resolved in the namespace of the referencing route.
    pub fn resolve(
        &self,
        mappings: &ResourceMappings,
        id: &NamespacedName,
    ) -> Option<ResolvedFilter> {
        match self {
            Self::Authentication => mappings
                .authentication_filters
                .get(id)
                .cloned()
                .map(ResolvedFilter::Authentication),
            Self::RateLimit => mappings
                .rate_limit_filters
                .get(id)
                .cloned()
                .map(ResolvedFilter::RateLimit),
            Self::Extension(_) => mappings
                .extension_filters
                .get(id)
                .cloned()
                .map(ResolvedFilter::Extension),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => f.write_str(filter::KIND_AUTHENTICATION_FILTER),
            Self::RateLimit => f.write_str(filter::KIND_RATE_LIMIT_FILTER),
            Self::Extension(gk) => fmt::Display::fmt(gk, f),
        }
    }
}

// === impl ResolvedFilter ===

impl ResolvedFilter {
    pub fn push_into(self, tree: &mut ResourceTree) {
        match self {
            Self::Authentication(f) => tree.authentication_filters.push(f),
            Self::RateLimit(f) => tree.rate_limit_filters.push(f),
            Self::Extension(f) => tree.extension_filters.push(f),
        }
    }
}
