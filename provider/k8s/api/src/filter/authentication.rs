/// AuthenticationFilter allows the user to configure request authentication
/// for the rules of an HTTPRoute or GRPCRoute that reference it.
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
    kind = "AuthenticationFilter",
    derive = "PartialEq",
    namespaced
)]
pub struct AuthenticationFilterSpec {
    /// Type defines the type of authentication provider to use. Only `JWT` is
    /// supported.
    #[serde(rename = "type")]
    pub type_: String,

    /// JWT defines the JSON Web Token (JWT) authentication provider type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<JwtAuthenticationFilterProvider>,
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
pub struct JwtAuthenticationFilterProvider {
    pub providers: Vec<JwtProvider>,
}

/// JwtProvider defines how a JSON Web Token (JWT) can be verified.
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
pub struct JwtProvider {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiences: Option<Vec<String>>,

    #[serde(rename = "remoteJWKS")]
    pub remote_jwks: RemoteJwks,
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
pub struct RemoteJwks {
    pub uri: String,
}
