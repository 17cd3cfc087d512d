use super::{FilterCatalogs, GatewayRoute, Rule};
use gateway_provider_core::ResourceTree;
use gateway_provider_k8s_api::gateway::UDPRoute;

impl GatewayRoute for UDPRoute {
    const FILTER_CATALOGS: FilterCatalogs = FilterCatalogs::NONE;

    fn rules(&self) -> Vec<Rule> {
        self.spec
            .rules
            .iter()
            .map(|rule| Rule::backends_only(rule.backend_refs.iter().flatten()))
            .collect()
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn routes_mut(tree: &mut ResourceTree) -> &mut Vec<Self> {
        &mut tree.udp_routes
    }
}
