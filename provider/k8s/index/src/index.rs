//! An in-memory snapshot of the resources the [`Reconciler`](crate::Reconciler)
//! consumes.
//!
//! The index is updated through [`kubert::index::IndexNamespacedResource`] and
//! serves the discovery traits from its current state. Routes are indexed by
//! the Gateways their `parentRefs` name, so listing the routes of a Gateway
//! does not scan unrelated routes' parents.

use anyhow::Result;
use gateway_provider_core::{
    discover::{DiscoverFilters, DiscoverReferenceGrants, DiscoverRoutes},
    NamespacedName,
};
use gateway_provider_k8s_api::{
    filter::{AuthenticationFilter, RateLimitFilter},
    gateway::{self, GRPCRoute, HTTPRoute, ReferenceGrant, TCPRoute, TLSRoute, UDPRoute},
    DynamicObject, Resource,
};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
pub struct Index {
    http_routes: RouteIndex<HTTPRoute>,
    grpc_routes: RouteIndex<GRPCRoute>,
    tls_routes: RouteIndex<TLSRoute>,
    tcp_routes: RouteIndex<TCPRoute>,
    udp_routes: RouteIndex<UDPRoute>,

    /// ReferenceGrants by namespace, then by name.
    reference_grants: BTreeMap<String, BTreeMap<String, ReferenceGrant>>,

    authentication_filters: BTreeMap<NamespacedName, AuthenticationFilter>,
    rate_limit_filters: BTreeMap<NamespacedName, RateLimitFilter>,
    extension_filters: BTreeMap<NamespacedName, DynamicObject>,
}

#[derive(Debug)]
struct RouteIndex<R> {
    by_id: BTreeMap<NamespacedName, AttachedRoute<R>>,
}

#[derive(Debug)]
struct AttachedRoute<R> {
    gateways: BTreeSet<NamespacedName>,
    route: R,
}

/// Each route kind declares its own parent reference type; this trait lets
/// them be indexed uniformly.
trait ParentRefs {
    /// The Gateways named by the route's parent references, with unset
    /// namespaces defaulting to `namespace`.
    fn gateways(&self, namespace: &str) -> BTreeSet<NamespacedName>;
}

// === impl Index ===

impl Index {
    /// Returns the identity of an object that is being applied, or logs and
    /// returns `None` if it lacks a namespace or name.
    fn id_of<T: Resource>(obj: &T) -> Option<NamespacedName> {
        let id = NamespacedName::from_meta(obj.meta());
        if id.is_none() {
            tracing::warn!(
                name = obj.meta().name.as_deref().unwrap_or_default(),
                "Ignoring resource without a namespace or name"
            );
        }
        id
    }
}

// === impl RouteIndex ===

impl<R> Default for RouteIndex<R> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
        }
    }
}

impl<R: Resource + ParentRefs + Clone> RouteIndex<R> {
    fn apply(&mut self, route: R) {
        let Some(id) = Index::id_of(&route) else {
            return;
        };
        let gateways = route.gateways(&id.namespace);
        tracing::debug!(route = %id, gateways = gateways.len(), "Indexing route");
        self.by_id.insert(id, AttachedRoute { gateways, route });
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.by_id.remove(&NamespacedName { namespace, name });
    }

    fn attached_to(&self, gateway: &NamespacedName) -> Vec<R> {
        self.by_id
            .values()
            .filter(|attached| attached.gateways.contains(gateway))
            .map(|attached| attached.route.clone())
            .collect()
    }
}

macro_rules! index_routes {
    ($route:ty, $field:ident) => {
        impl ParentRefs for $route {
            fn gateways(&self, namespace: &str) -> BTreeSet<NamespacedName> {
                self.spec
                    .parent_refs
                    .iter()
                    .flatten()
                    .filter(|p| gateway::targets_gateway(p.group.as_deref(), p.kind.as_deref()))
                    .map(|p| {
                        NamespacedName::new(p.namespace.as_deref().unwrap_or(namespace), &p.name)
                    })
                    .collect()
            }
        }

        impl kubert::index::IndexNamespacedResource<$route> for Index {
            fn apply(&mut self, route: $route) {
                self.$field.apply(route)
            }

            fn delete(&mut self, namespace: String, name: String) {
                self.$field.delete(namespace, name)
            }
        }

        #[async_trait::async_trait]
        impl DiscoverRoutes<$route> for Index {
            async fn list_routes(&self, gateway: &NamespacedName) -> Result<Vec<$route>> {
                Ok(self.$field.attached_to(gateway))
            }
        }
    };
}

index_routes!(HTTPRoute, http_routes);
index_routes!(GRPCRoute, grpc_routes);
index_routes!(TLSRoute, tls_routes);
index_routes!(TCPRoute, tcp_routes);
index_routes!(UDPRoute, udp_routes);

impl kubert::index::IndexNamespacedResource<ReferenceGrant> for Index {
    fn apply(&mut self, grant: ReferenceGrant) {
        let Some(NamespacedName { namespace, name }) = Self::id_of(&grant) else {
            return;
        };
        self.reference_grants
            .entry(namespace)
            .or_default()
            .insert(name, grant);
    }

    fn delete(&mut self, namespace: String, name: String) {
        if let Some(grants) = self.reference_grants.get_mut(&namespace) {
            grants.remove(&name);
            if grants.is_empty() {
                self.reference_grants.remove(&namespace);
            }
        }
    }
}

impl kubert::index::IndexNamespacedResource<AuthenticationFilter> for Index {
    fn apply(&mut self, filter: AuthenticationFilter) {
        if let Some(id) = Self::id_of(&filter) {
            self.authentication_filters.insert(id, filter);
        }
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.authentication_filters
            .remove(&NamespacedName { namespace, name });
    }
}

impl kubert::index::IndexNamespacedResource<RateLimitFilter> for Index {
    fn apply(&mut self, filter: RateLimitFilter) {
        if let Some(id) = Self::id_of(&filter) {
            self.rate_limit_filters.insert(id, filter);
        }
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.rate_limit_filters
            .remove(&NamespacedName { namespace, name });
    }
}

/// Objects of the kinds registered by extensions.
impl kubert::index::IndexNamespacedResource<DynamicObject> for Index {
    fn apply(&mut self, obj: DynamicObject) {
        if let Some(id) = Self::id_of(&obj) {
            self.extension_filters.insert(id, obj);
        }
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.extension_filters
            .remove(&NamespacedName { namespace, name });
    }
}

#[async_trait::async_trait]
impl DiscoverReferenceGrants for Index {
    async fn list_reference_grants(&self, namespace: &str) -> Result<Vec<ReferenceGrant>> {
        Ok(self
            .reference_grants
            .get(namespace)
            .map(|grants| grants.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl DiscoverFilters for Index {
    async fn list_authentication_filters(&self) -> Result<Vec<AuthenticationFilter>> {
        Ok(self.authentication_filters.values().cloned().collect())
    }

    async fn list_rate_limit_filters(&self) -> Result<Vec<RateLimitFilter>> {
        Ok(self.rate_limit_filters.values().cloned().collect())
    }

    async fn list_extension_filters(&self) -> Result<Vec<DynamicObject>> {
        Ok(self.extension_filters.values().cloned().collect())
    }
}
