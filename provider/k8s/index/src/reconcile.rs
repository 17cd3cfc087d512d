use crate::{
    backend_ref::validate_backend_ref,
    filter::FilterKind,
    reference_grant::{find_reference_grant, Authorization, ObjectRef},
    routes::{FilterCatalogs, GatewayRoute, Rule, RuleFilter},
};
use anyhow::{Context, Result};
use gateway_provider_core::{
    discover::{DiscoverFilters, DiscoverReferenceGrants, DiscoverRoutes},
    BackendKey, ExtensionKinds, NamespacedName, ResourceMappings, ResourceTree,
};
use gateway_provider_k8s_api::gateway::{
    BackendRef, GRPCRoute, HTTPRoute, LocalObjectReference, TCPRoute, TLSRoute, UDPRoute,
};
use tracing::{debug_span, info_span, Instrument};

/// Collects the routes attached to a Gateway, along with everything they
/// reference.
#[derive(Debug)]
pub struct Reconciler<D> {
    discover: D,
    extensions: ExtensionKinds,
}

/// The result of reconciling a Gateway.
#[derive(Debug, Default)]
pub struct Reconciled {
    pub tree: ResourceTree,
    pub mappings: ResourceMappings,
}

// === impl Reconciler ===

impl<D> Reconciler<D>
where
    D: DiscoverReferenceGrants + DiscoverFilters + Send + Sync,
{
    pub fn new(discover: D, extensions: ExtensionKinds) -> Self {
        Self {
            discover,
            extensions,
        }
    }

    /// Processes every route kind for `gateway` into a fresh resource tree.
    ///
    /// HTTPRoutes are processed first so that the extension filter catalog is
    /// populated before GRPCRoutes are processed. Any listing failure fails
    /// the reconciliation.
    pub async fn reconcile(&self, gateway: &NamespacedName) -> Result<Reconciled>
    where
        D: DiscoverRoutes<HTTPRoute>
            + DiscoverRoutes<GRPCRoute>
            + DiscoverRoutes<TLSRoute>
            + DiscoverRoutes<TCPRoute>
            + DiscoverRoutes<UDPRoute>,
    {
        let mut mappings = ResourceMappings::default();
        let mut tree = ResourceTree::default();

        self.process::<HTTPRoute>(gateway, &mut mappings, &mut tree)
            .await?;
        self.process::<GRPCRoute>(gateway, &mut mappings, &mut tree)
            .await?;
        self.process::<TLSRoute>(gateway, &mut mappings, &mut tree)
            .await?;
        self.process::<TCPRoute>(gateway, &mut mappings, &mut tree)
            .await?;
        self.process::<UDPRoute>(gateway, &mut mappings, &mut tree)
            .await?;

        tree.reference_grants = mappings.reference_grants.values().cloned().collect();
        tracing::info!(
            %gateway,
            namespaces = mappings.namespaces.len(),
            backends = mappings.backend_refs.len(),
            grants = tree.reference_grants.len(),
            "Reconciled Gateway"
        );
        Ok(Reconciled { tree, mappings })
    }

    /// Processes the routes of kind `R` attached to `gateway`.
    ///
    /// Each listed route is appended to `tree` with its status cleared. Invalid
    /// or unauthorized references and unresolvable filters are skipped.
    pub async fn process<R>(
        &self,
        gateway: &NamespacedName,
        mappings: &mut ResourceMappings,
        tree: &mut ResourceTree,
    ) -> Result<()>
    where
        R: GatewayRoute,
        D: DiscoverRoutes<R>,
    {
        let kind = R::kind(&());
        self.load_filter_catalogs(R::FILTER_CATALOGS, mappings)
            .await?;

        let routes = DiscoverRoutes::<R>::list_routes(&self.discover, gateway)
            .await
            .with_context(|| format!("failed to list {kind} resources for Gateway {gateway}"))?;
        tracing::debug!(%gateway, %kind, routes = routes.len(), "Processing routes");

        for route in routes {
            let meta = route.meta();
            let span = info_span!(
                "route",
                %kind,
                namespace = meta.namespace.as_deref().unwrap_or_default(),
                name = meta.name.as_deref().unwrap_or_default(),
            );
            self.process_route(route, mappings, tree)
                .instrument(span)
                .await;
        }

        Ok(())
    }

    async fn load_filter_catalogs(
        &self,
        catalogs: FilterCatalogs,
        mappings: &mut ResourceMappings,
    ) -> Result<()> {
        if catalogs.gateway {
            let filters = self
                .discover
                .list_authentication_filters()
                .await
                .context("failed to list AuthenticationFilters")?;
            mappings.load_authentication_filters(filters);

            let filters = self
                .discover
                .list_rate_limit_filters()
                .await
                .context("failed to list RateLimitFilters")?;
            mappings.load_rate_limit_filters(filters);
        }

        if catalogs.extension {
            let filters = self
                .discover
                .list_extension_filters()
                .await
                .context("failed to list extension filters")?;
            mappings.load_extension_filters(filters);
        }

        Ok(())
    }

    async fn process_route<R: GatewayRoute>(
        &self,
        mut route: R,
        mappings: &mut ResourceMappings,
        tree: &mut ResourceTree,
    ) {
        let meta = route.meta();
        let namespace = meta.namespace.clone().unwrap_or_default();
        let referrer = ObjectRef::new(
            &R::group(&()),
            &R::kind(&()),
            &namespace,
            meta.name.as_deref().unwrap_or_default(),
        );
        tracing::debug!("Processing route");

        for (idx, rule) in route.rules().into_iter().enumerate() {
            let res = self
                .process_rule(&referrer, rule, mappings, tree)
                .instrument(debug_span!("rule", idx))
                .await;
            if let Err(error) = res {
                tracing::error!(rule = idx, %error, "Skipping the remainder of the rule");
            }
        }

        mappings.namespaces.insert(namespace);
        route.clear_status();
        R::routes_mut(tree).push(route);
    }

    /// Fails only when a reference's authorization cannot be determined.
    async fn process_rule(
        &self,
        route: &ObjectRef,
        rule: Rule,
        mappings: &mut ResourceMappings,
        tree: &mut ResourceTree,
    ) -> Result<()> {
        for backend in &rule.backend_refs {
            self.process_backend_ref(route, backend, mappings).await?;
        }

        // Mirrored backends are processed before any other filter of the rule.
        for (idx, filter) in rule.filters.iter().enumerate() {
            if let RuleFilter::Mirror(target) = filter {
                let backend = BackendRef {
                    weight: Some(1),
                    ..target.clone()
                };
                self.process_backend_ref(route, &backend, mappings)
                    .instrument(debug_span!("mirror", filter = idx))
                    .await?;
            }
        }

        for (idx, filter) in rule.filters.iter().enumerate() {
            if let RuleFilter::Extension(extension_ref) = filter {
                self.process_extension_ref(route, idx, extension_ref, mappings, tree);
            }
        }

        Ok(())
    }

    async fn process_backend_ref(
        &self,
        route: &ObjectRef,
        backend: &BackendRef,
        mappings: &mut ResourceMappings,
    ) -> Result<()> {
        if let Err(error) = validate_backend_ref(backend, &self.extensions) {
            tracing::warn!(
                %error,
                field = error.field(),
                backend = %backend.name,
                "Ignoring invalid backend reference"
            );
            return Ok(());
        }

        let key = BackendKey::new(backend, &route.namespace);
        let target = ObjectRef::new(&key.group, &key.kind, &key.namespace, &key.name);
        mappings.backend_refs.insert(key);

        match find_reference_grant(&self.discover, route, &target).await? {
            Authorization::SameNamespace => {}
            Authorization::Granted(grant) => {
                tracing::debug!(
                    %target,
                    grant = grant.metadata.name.as_deref().unwrap_or_default(),
                    "ReferenceGrant permits backend reference"
                );
                mappings.insert_reference_grant(grant);
            }
            Authorization::Denied => {
                tracing::info!(%target, "No ReferenceGrant permits backend reference");
            }
        }

        Ok(())
    }

    fn process_extension_ref(
        &self,
        route: &ObjectRef,
        idx: usize,
        extension_ref: &LocalObjectReference,
        mappings: &ResourceMappings,
        tree: &mut ResourceTree,
    ) {
        let kind = match FilterKind::from_ref(extension_ref, &self.extensions) {
            Ok(kind) => kind,
            Err(error) => {
                tracing::warn!(filter = idx, %error, "Bypassing filter");
                return;
            }
        };

        // Filters must be in the route's namespace.
        let id = NamespacedName::new(&route.namespace, &extension_ref.name);
        match kind.resolve(mappings, &id) {
            Some(filter) => filter.push_into(tree),
            None => tracing::warn!(filter = idx, %kind, name = %id, "Filter not found; bypassing"),
        }
    }
}
