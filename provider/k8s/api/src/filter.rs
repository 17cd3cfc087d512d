//! Filter resources that HTTP and gRPC routes reference through
//! `ExtensionRef` filters.

pub mod authentication;
pub mod ratelimit;

pub use self::{
    authentication::{AuthenticationFilter, AuthenticationFilterSpec},
    ratelimit::{RateLimitFilter, RateLimitFilterSpec},
};

/// The API group of the gateway's own filter resources.
pub const GROUP: &str = "gateway.envoyproxy.io";

pub const KIND_AUTHENTICATION_FILTER: &str = "AuthenticationFilter";

pub const KIND_RATE_LIMIT_FILTER: &str = "RateLimitFilter";
