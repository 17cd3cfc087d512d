//! Route kinds processed by the [`Reconciler`](crate::Reconciler).
//!
//! Every route kind is processed by the same pipeline. A [`GatewayRoute`]
//! exposes its rules in a common shape, with backend references converted to
//! [`BackendRef`] and filters reduced to the kinds the pipeline inspects.

use gateway_provider_core::ResourceTree;
use gateway_provider_k8s_api::{
    gateway::{BackendRef, LocalObjectReference},
    Resource,
};

mod grpc;
mod http;
mod tcp;
mod tls;
mod udp;

/// The filter catalogs that must be loaded before routes of a kind are
/// processed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCatalogs {
    /// AuthenticationFilters and RateLimitFilters.
    pub gateway: bool,

    /// Objects of the kinds registered by extensions.
    pub extension: bool,
}

pub trait GatewayRoute: Resource<DynamicType = ()> + Clone + Send + Sync + 'static {
    const FILTER_CATALOGS: FilterCatalogs;

    fn rules(&self) -> Vec<Rule>;

    /// Discards the route's status, which is recomputed downstream.
    fn clear_status(&mut self);

    /// The list of routes of this kind in a resource tree.
    fn routes_mut(tree: &mut ResourceTree) -> &mut Vec<Self>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rule {
    pub backend_refs: Vec<BackendRef>,
    pub filters: Vec<RuleFilter>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleFilter {
    /// A `RequestMirror` filter and the backend it mirrors to.
    Mirror(BackendRef),

    /// An `ExtensionRef` filter.
    Extension(LocalObjectReference),

    /// Filters that reference no other object.
    Other,
}

// === impl FilterCatalogs ===

impl FilterCatalogs {
    pub const NONE: Self = Self {
        gateway: false,
        extension: false,
    };

    pub const GATEWAY: Self = Self {
        gateway: true,
        extension: false,
    };

    pub const ALL: Self = Self {
        gateway: true,
        extension: true,
    };
}

// === impl Rule ===

impl Rule {
    /// A rule of a layer-4 route, which has backends but no filters.
    fn backends_only<'b, B>(backend_refs: impl IntoIterator<Item = &'b B>) -> Self
    where
        B: 'b,
        BackendRef: for<'a> From<&'a B>,
    {
        Self {
            backend_refs: backend_refs.into_iter().map(BackendRef::from).collect(),
            filters: Vec::new(),
        }
    }
}
