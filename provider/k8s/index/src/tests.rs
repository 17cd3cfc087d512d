use crate::{Index, Reconciler};
use anyhow::Result;
use gateway_provider_core::{
    discover::{DiscoverFilters, DiscoverReferenceGrants, DiscoverRoutes},
    BackendKey, ExtensionKinds, NamespacedName,
};
use gateway_provider_k8s_api::{
    filter::{self, AuthenticationFilter, RateLimitFilter, RateLimitFilterSpec},
    gateway::{
        httproutes::{
            HTTPRouteParentRefs, HTTPRouteRules, HTTPRouteRulesBackendRefs,
            HTTPRouteRulesFilters, HTTPRouteRulesFiltersExtensionRef,
            HTTPRouteRulesFiltersRequestMirror, HTTPRouteRulesFiltersRequestMirrorBackendRef,
            HTTPRouteRulesFiltersType, HTTPRouteSpec, HTTPRouteStatus, HTTPRouteStatusParents,
        },
        referencegrants::ReferenceGrantSpec,
        HTTPRoute, ReferenceGrant, ReferenceGrantFrom, ReferenceGrantTo,
    },
    ApiResource, DynamicObject, GroupVersionKind, ObjectMeta,
};
use kubert::index::IndexNamespacedResource;
use tracing::Level;


const GATEWAY_NS: &str = "envoy-gateway-system";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .try_init()
        .ok();
}

fn gateway() -> NamespacedName {
    NamespacedName::new(GATEWAY_NS, "eg")
}

fn mk_meta(ns: &str, name: &str) -> ObjectMeta {
    ObjectMeta {
        namespace: Some(ns.to_string()),
        name: Some(name.to_string()),
        ..Default::default()
    }
}

/// A parent reference to the test Gateway. Every route kind declares its own
/// parent reference type.
macro_rules! gateway_parent {
    ($parent:ident) => {
        $parent {
            namespace: Some($crate::tests::GATEWAY_NS.to_string()),
            name: "eg".to_string(),
            ..Default::default()
        }
    };
}
use gateway_parent;

fn mk_backend(ns: Option<&str>, name: &str, port: u16) -> HTTPRouteRulesBackendRefs {
    HTTPRouteRulesBackendRefs {
        name: name.to_string(),
        namespace: ns.map(Into::into),
        port: Some(port.into()),
        ..Default::default()
    }
}

fn mk_http_rule(
    backends: Vec<HTTPRouteRulesBackendRefs>,
    filters: Vec<HTTPRouteRulesFilters>,
) -> HTTPRouteRules {
    HTTPRouteRules {
        backend_refs: Some(backends),
        filters: Some(filters),
        ..Default::default()
    }
}

fn mk_http_route(ns: &str, name: &str, rules: Vec<HTTPRouteRules>) -> HTTPRoute {
    HTTPRoute {
        metadata: mk_meta(ns, name),
        spec: HTTPRouteSpec {
            parent_refs: Some(vec![gateway_parent!(HTTPRouteParentRefs)]),
            rules: Some(rules),
            ..Default::default()
        },
        status: Some(HTTPRouteStatus {
            parents: vec![HTTPRouteStatusParents {
                controller_name: "gateway.envoyproxy.io/gatewayclass-controller".to_string(),
                ..Default::default()
            }],
        }),
    }
}

fn mirror(ns: Option<&str>, name: &str, port: u16) -> HTTPRouteRulesFilters {
    HTTPRouteRulesFilters {
        r#type: HTTPRouteRulesFiltersType::RequestMirror,
        request_mirror: Some(HTTPRouteRulesFiltersRequestMirror {
            backend_ref: HTTPRouteRulesFiltersRequestMirrorBackendRef {
                name: name.to_string(),
                namespace: ns.map(Into::into),
                port: Some(port.into()),
                ..Default::default()
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn extension_ref(group: &str, kind: &str, name: &str) -> HTTPRouteRulesFilters {
    HTTPRouteRulesFilters {
        r#type: HTTPRouteRulesFiltersType::ExtensionRef,
        extension_ref: Some(HTTPRouteRulesFiltersExtensionRef {
            group: group.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
        }),
        ..Default::default()
    }
}

fn rate_limit_ref(name: &str) -> HTTPRouteRulesFilters {
    extension_ref(filter::GROUP, filter::KIND_RATE_LIMIT_FILTER, name)
}

fn authentication_ref(name: &str) -> HTTPRouteRulesFilters {
    extension_ref(filter::GROUP, filter::KIND_AUTHENTICATION_FILTER, name)
}

/// A grant in `ns` that permits `from_kind` routes in `from_ns` to reference
/// Services.
fn mk_grant(ns: &str, name: &str, from_kind: &str, from_ns: &str) -> ReferenceGrant {
    ReferenceGrant {
        metadata: mk_meta(ns, name),
        spec: ReferenceGrantSpec {
            from: vec![ReferenceGrantFrom {
                group: "gateway.networking.k8s.io".to_string(),
                kind: from_kind.to_string(),
                namespace: from_ns.to_string(),
            }],
            to: vec![ReferenceGrantTo {
                group: "".to_string(),
                kind: "Service".to_string(),
                name: None,
            }],
        },
    }
}

fn mk_rate_limit_filter(ns: &str, name: &str) -> RateLimitFilter {
    RateLimitFilter {
        metadata: mk_meta(ns, name),
        spec: RateLimitFilterSpec {
            type_: "Global".to_string(),
            global: None,
        },
    }
}

fn mk_authentication_filter(ns: &str, name: &str) -> AuthenticationFilter {
    AuthenticationFilter {
        metadata: mk_meta(ns, name),
        spec: filter::AuthenticationFilterSpec {
            type_: "JWT".to_string(),
            jwt: None,
        },
    }
}

fn bucket_policy_kind() -> GroupVersionKind {
    GroupVersionKind::gvk("storage.example.io", "v1alpha1", "BucketPolicy")
}

fn mk_bucket_policy(ns: &str, name: &str) -> DynamicObject {
    let mut obj = DynamicObject::new(name, &ApiResource::from_gvk(&bucket_policy_kind()));
    obj.metadata.namespace = Some(ns.to_string());
    obj
}

fn service_key(ns: &str, name: &str) -> BackendKey {
    BackendKey {
        group: "".to_string(),
        kind: "Service".to_string(),
        namespace: ns.to_string(),
        name: name.to_string(),
    }
}

fn reconciler(index: Index) -> Reconciler<Index> {
    Reconciler::new(index, ExtensionKinds::new(Some(bucket_policy_kind())))
}

/// Wraps an index, failing the listings that are flagged.
#[derive(Default)]
struct Faulty {
    index: Index,
    fail_routes: bool,
    fail_grants: bool,
    fail_filters: bool,
}

#[async_trait::async_trait]
impl DiscoverRoutes<HTTPRoute> for Faulty {
    async fn list_routes(&self, gateway: &NamespacedName) -> Result<Vec<HTTPRoute>> {
        if self.fail_routes {
            anyhow::bail!("routes unavailable");
        }
        DiscoverRoutes::<HTTPRoute>::list_routes(&self.index, gateway).await
    }
}

#[async_trait::async_trait]
impl DiscoverReferenceGrants for Faulty {
    async fn list_reference_grants(&self, namespace: &str) -> Result<Vec<ReferenceGrant>> {
        if self.fail_grants {
            anyhow::bail!("grants unavailable");
        }
        self.index.list_reference_grants(namespace).await
    }
}

#[async_trait::async_trait]
impl DiscoverFilters for Faulty {
    async fn list_authentication_filters(&self) -> Result<Vec<AuthenticationFilter>> {
        if self.fail_filters {
            anyhow::bail!("filters unavailable");
        }
        self.index.list_authentication_filters().await
    }

    async fn list_rate_limit_filters(&self) -> Result<Vec<RateLimitFilter>> {
        if self.fail_filters {
            anyhow::bail!("filters unavailable");
        }
        self.index.list_rate_limit_filters().await
    }

    async fn list_extension_filters(&self) -> Result<Vec<DynamicObject>> {
        if self.fail_filters {
            anyhow::bail!("filters unavailable");
        }
        self.index.list_extension_filters().await
    }
}

#[tokio::test]
async fn index_derives_attached_gateways() {
    init_tracing();

    let mut index = Index::default();

    // Attached through an explicit parent namespace.
    index.apply(mk_http_route("apps", "explicit", vec![]));

    // Attached through the route's own namespace.
    let mut local = mk_http_route(GATEWAY_NS, "local", vec![]);
    local.spec.parent_refs = Some(vec![HTTPRouteParentRefs {
        name: "eg".to_string(),
        ..Default::default()
    }]);
    index.apply(local);

    // Not attached: the parent is a Service, or a different Gateway.
    let mut mesh = mk_http_route("apps", "mesh", vec![]);
    mesh.spec.parent_refs = Some(vec![HTTPRouteParentRefs {
        group: Some("".to_string()),
        kind: Some("Service".to_string()),
        namespace: Some(GATEWAY_NS.to_string()),
        name: "eg".to_string(),
        ..Default::default()
    }]);
    index.apply(mesh);
    let mut other = mk_http_route("apps", "other", vec![]);
    other.spec.parent_refs = Some(vec![HTTPRouteParentRefs {
        name: "eg".to_string(),
        ..Default::default()
    }]);
    index.apply(other);

    let routes = DiscoverRoutes::<HTTPRoute>::list_routes(&index, &gateway())
        .await
        .expect("listing must succeed");
    let names = routes
        .iter()
        .map(|r| r.metadata.name.as_deref().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["explicit", "local"]);

    <Index as IndexNamespacedResource<HTTPRoute>>::delete(
        &mut index,
        "apps".to_string(),
        "explicit".to_string(),
    );
    let routes = DiscoverRoutes::<HTTPRoute>::list_routes(&index, &gateway())
        .await
        .expect("listing must succeed");
    assert_eq!(routes.len(), 1);
}
