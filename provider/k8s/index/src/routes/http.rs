use super::{FilterCatalogs, GatewayRoute, Rule, RuleFilter};
use gateway_provider_core::ResourceTree;
use gateway_provider_k8s_api::gateway::{
    httproutes::HTTPRouteRulesFilters, BackendRef, HTTPRoute, LocalObjectReference,
};

impl GatewayRoute for HTTPRoute {
    const FILTER_CATALOGS: FilterCatalogs = FilterCatalogs::ALL;

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
                filters: rule.filters.iter().flatten().map(rule_filter).collect(),
            })
            .collect()
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn routes_mut(tree: &mut ResourceTree) -> &mut Vec<Self> {
        &mut tree.http_routes
    }
}

fn rule_filter(filter: &HTTPRouteRulesFilters) -> RuleFilter {
    if let Some(mirror) = &filter.request_mirror {
        return RuleFilter::Mirror(BackendRef::from(&mirror.backend_ref));
    }
    if let Some(extension_ref) = &filter.extension_ref {
        return RuleFilter::Extension(LocalObjectReference::from(extension_ref));
    }
    RuleFilter::Other
}
