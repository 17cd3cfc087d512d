//! Gateway API resources consumed by the provider.
//!
//! The route and ReferenceGrant types are those of the experimental channel,
//! which is the only channel that serves every route kind. Each route kind
//! declares its own backend reference type; they are converted into the
//! common [`BackendRef`] shape before they are inspected.

pub use gateway_api::apis::experimental::{
    grpcroutes::{self, GRPCRoute},
    httproutes::{self, HTTPRoute},
    referencegrants::{self, ReferenceGrant, ReferenceGrantFrom, ReferenceGrantTo},
    tcproutes::{self, TCPRoute},
    tlsroutes::{self, TLSRoute},
    udproutes::{self, UDPRoute},
};

/// The API group of all Gateway API resources.
pub const GROUP: &str = "gateway.networking.k8s.io";

/// The kind a parent reference targets when it does not specify one.
pub const KIND_GATEWAY: &str = "Gateway";

/// The kind a backend reference targets when it does not specify one.
pub const KIND_SERVICE: &str = "Service";

/// A backend reference of any route kind, or the target of a `RequestMirror`
/// filter.
///
/// An unset group is the core group and an unset kind is `Service`. Only the
/// empty group names the core group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendRef {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub name: String,
    pub namespace: Option<String>,
    pub port: Option<u16>,
    pub weight: Option<u32>,
}

/// The referent of an `ExtensionRef` filter, which is always in the route's
/// namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalObjectReference {
    pub group: String,
    pub kind: String,
    pub name: String,
}

/// Returns true if a parent reference with the given group and kind targets
/// a Gateway.
pub fn targets_gateway(group: Option<&str>, kind: Option<&str>) -> bool {
    group.unwrap_or(GROUP) == GROUP && kind.unwrap_or(KIND_GATEWAY) == KIND_GATEWAY
}

// === impl BackendRef ===

impl BackendRef {
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(KIND_SERVICE)
    }

    /// The referenced namespace, defaulting to the referrer's namespace.
    pub fn namespace_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.namespace.as_deref().unwrap_or(default)
    }
}

// Out-of-range ports and weights are treated as unset.
macro_rules! backend_ref_from {
    ($($backend:ty),+ $(,)?) => {$(
        impl From<&$backend> for BackendRef {
            fn from(backend: &$backend) -> Self {
                Self {
                    group: backend.group.clone(),
                    kind: backend.kind.clone(),
                    name: backend.name.clone(),
                    namespace: backend.namespace.clone(),
                    port: backend.port.and_then(|p| u16::try_from(p).ok()),
                    weight: backend.weight.and_then(|w| u32::try_from(w).ok()),
                }
            }
        }
    )+};
}

backend_ref_from!(
    httproutes::HTTPRouteRulesBackendRefs,
    grpcroutes::GRPCRouteRulesBackendRefs,
    tlsroutes::TLSRouteRulesBackendRefs,
    tcproutes::TCPRouteRulesBackendRefs,
    udproutes::UDPRouteRulesBackendRefs,
);

impl From<&httproutes::HTTPRouteRulesFiltersRequestMirrorBackendRef> for BackendRef {
    fn from(backend: &httproutes::HTTPRouteRulesFiltersRequestMirrorBackendRef) -> Self {
        Self {
            group: backend.group.clone(),
            kind: backend.kind.clone(),
            name: backend.name.clone(),
            namespace: backend.namespace.clone(),
            port: backend.port.and_then(|p| u16::try_from(p).ok()),
            weight: None,
        }
    }
}

// === impl LocalObjectReference ===

macro_rules! local_object_reference_from {
    ($($reference:ty),+ $(,)?) => {$(
        impl From<&$reference> for LocalObjectReference {
            fn from(reference: &$reference) -> Self {
                Self {
                    group: reference.group.clone(),
                    kind: reference.kind.clone(),
                    name: reference.name.clone(),
                }
            }
        }
    )+};
}

local_object_reference_from!(
    httproutes::HTTPRouteRulesFiltersExtensionRef,
    grpcroutes::GRPCRouteRulesFiltersExtensionRef,
);
