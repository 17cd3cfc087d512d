use crate::{BackendKey, NamespacedName};
use ahash::AHashMap as HashMap;
use gateway_provider_k8s_api::{
    filter::{AuthenticationFilter, RateLimitFilter},
    gateway::{GRPCRoute, HTTPRoute, ReferenceGrant, TCPRoute, TLSRoute, UDPRoute},
    DynamicObject, Resource,
};
use std::collections::{BTreeMap, BTreeSet};

/// The consolidated snapshot of everything attached to a Gateway, handed to
/// the translation layer.
///
/// Routes are stored with their status cleared. Filters appear once per
/// reference, so a filter referenced by several rules appears several times.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTree {
    pub http_routes: Vec<HTTPRoute>,
    pub grpc_routes: Vec<GRPCRoute>,
    pub tls_routes: Vec<TLSRoute>,
    pub tcp_routes: Vec<TCPRoute>,
    pub udp_routes: Vec<UDPRoute>,
    pub authentication_filters: Vec<AuthenticationFilter>,
    pub rate_limit_filters: Vec<RateLimitFilter>,
    pub extension_filters: Vec<DynamicObject>,
    pub reference_grants: Vec<ReferenceGrant>,
}

/// The working set of a single reconciliation.
///
/// Filter catalogs are loaded before routes are processed; the remaining
/// fields accumulate what the processed routes reference.
#[derive(Clone, Debug, Default)]
pub struct ResourceMappings {
    /// Namespaces that contain at least one processed route.
    pub namespaces: BTreeSet<String>,

    /// Every valid backend referenced by a processed route, whether or not a
    /// cross-namespace reference was authorized.
    pub backend_refs: BTreeSet<BackendKey>,

    /// ReferenceGrants that authorized at least one reference.
    pub reference_grants: BTreeMap<NamespacedName, ReferenceGrant>,

    pub authentication_filters: HashMap<NamespacedName, AuthenticationFilter>,
    pub rate_limit_filters: HashMap<NamespacedName, RateLimitFilter>,
    pub extension_filters: HashMap<NamespacedName, DynamicObject>,
}

// === impl ResourceMappings ===

impl ResourceMappings {
    pub fn load_authentication_filters(
        &mut self,
        filters: impl IntoIterator<Item = AuthenticationFilter>,
    ) {
        load(&mut self.authentication_filters, filters)
    }

    pub fn load_rate_limit_filters(&mut self, filters: impl IntoIterator<Item = RateLimitFilter>) {
        load(&mut self.rate_limit_filters, filters)
    }

    pub fn load_extension_filters(&mut self, filters: impl IntoIterator<Item = DynamicObject>) {
        load(&mut self.extension_filters, filters)
    }

    /// Records a consumed grant under its own namespace and name.
    pub fn insert_reference_grant(&mut self, grant: ReferenceGrant) {
        if let Some(id) = NamespacedName::from_meta(&grant.metadata) {
            self.reference_grants.insert(id, grant);
        }
    }
}

/// Objects without a namespace or name can never be referenced and are
/// skipped.
fn load<T: Resource>(
    catalog: &mut HashMap<NamespacedName, T>,
    objects: impl IntoIterator<Item = T>,
) {
    for obj in objects {
        if let Some(id) = NamespacedName::from_meta(obj.meta()) {
            catalog.insert(id, obj);
        }
    }
}
