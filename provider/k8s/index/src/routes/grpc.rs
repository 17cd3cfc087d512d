use super::{FilterCatalogs, GatewayRoute, Rule, RuleFilter};
use gateway_provider_core::ResourceTree;
use gateway_provider_k8s_api::gateway::{BackendRef, GRPCRoute, LocalObjectReference};

// gRPC rules may reference the gateway's filters but not extension filters,
// and their mirror filters are not inspected.
impl GatewayRoute for GRPCRoute {
    const FILTER_CATALOGS: FilterCatalogs = FilterCatalogs::GATEWAY;

    fn rules(&self) -> Vec<Rule> {
        self.spec
            .rules
            .iter()
            .flatten()
            .map(|rule| Rule {
                backend_refs: rule
                    .backend_refs
                    .iter()
                    .flatten()
                    .map(BackendRef::from)
                    .collect(),
                filters: rule
                    .filters
                    .iter()
                    .flatten()
                    .map(|filter| match &filter.extension_ref {
                        Some(extension_ref) => {
                            RuleFilter::Extension(LocalObjectReference::from(extension_ref))
                        }
                        None => RuleFilter::Other,
                    })
                    .collect(),
            })
            .collect()
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn routes_mut(tree: &mut ResourceTree) -> &mut Vec<Self> {
        &mut tree.grpc_routes
    }
}
