/// RateLimitFilter allows the user to limit the number of incoming requests to
/// a predefined value based on attributes within the traffic flow.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    kube::CustomResource,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
#[kube(
    group = "gateway.envoyproxy.io",
    version = "v1alpha1",
    kind = "RateLimitFilter",
    derive = "PartialEq",
    namespaced
)]
pub struct RateLimitFilterSpec {
    /// Type decides the scope for the RateLimits. Only `Global` is supported.
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalRateLimit>,
}

#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
pub struct GlobalRateLimit {
    pub rules: Vec<RateLimitRule>,
}

#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitRule {
    /// ClientSelectors holds the selectors a request must match for this rule
    /// to apply. An empty list applies the rule to all traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_selectors: Option<Vec<RateLimitSelectCondition>>,

    pub limit: RateLimitValue,
}

#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
pub struct RateLimitSelectCondition {
    #[serde(default)]
    pub headers: Vec<HeaderMatch>,
}

#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
pub struct HeaderMatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
pub struct RateLimitValue {
    pub requests: u32,
    pub unit: String,
}
