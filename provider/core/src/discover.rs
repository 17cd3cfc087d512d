//! Listing capabilities the route processors consume.
//!
//! Implementations are typically backed by an informer cache, but may be any
//! snapshot of cluster state.

use crate::NamespacedName;
use anyhow::Result;
use gateway_provider_k8s_api::{
    filter::{AuthenticationFilter, RateLimitFilter},
    gateway::ReferenceGrant,
    DynamicObject,
};

/// Lists routes of one kind that attach to a Gateway.
#[async_trait::async_trait]
pub trait DiscoverRoutes<R> {
    async fn list_routes(&self, gateway: &NamespacedName) -> Result<Vec<R>>;
}

/// Lists the ReferenceGrants of a namespace.
#[async_trait::async_trait]
pub trait DiscoverReferenceGrants {
    async fn list_reference_grants(&self, namespace: &str) -> Result<Vec<ReferenceGrant>>;
}

/// Lists the filter objects that route rules may reference, across all
/// namespaces.
#[async_trait::async_trait]
pub trait DiscoverFilters {
    async fn list_authentication_filters(&self) -> Result<Vec<AuthenticationFilter>>;

    async fn list_rate_limit_filters(&self) -> Result<Vec<RateLimitFilter>>;

    /// Lists objects of every kind registered by an extension.
    async fn list_extension_filters(&self) -> Result<Vec<DynamicObject>>;
}
