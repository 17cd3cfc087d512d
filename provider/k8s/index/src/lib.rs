//! Gateway resource aggregation
//!
//! The [`Reconciler`] collects every route attached to a Gateway, across the
//! HTTPRoute, GRPCRoute, TLSRoute, TCPRoute and UDPRoute kinds, into a single
//! [`ResourceTree`](gateway_provider_core::ResourceTree) for translation.
//! While doing so it:
//!
//! - validates each backend reference, skipping ones that target unsupported
//!   kinds or lack required fields;
//! - authorizes references that cross a namespace boundary against the
//!   ReferenceGrants of the target namespace, recording the grants that were
//!   used;
//! - resolves `ExtensionRef` filters into the AuthenticationFilter,
//!   RateLimitFilter, or extension-managed objects they name.
//!
//! Failures that affect a single reference or filter are logged and the
//! remainder of the route is still processed. Failures to list resources fail
//! the reconciliation.
//!
//! The [`Index`] holds an in-memory snapshot of cluster resources and serves
//! the discovery traits the reconciler is generic over.

#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod backend_ref;
pub mod filter;
mod index;
mod reconcile;
pub mod reference_grant;
pub mod routes;

#[cfg(test)]
mod tests;

pub use self::{
    index::Index,
    reconcile::{Reconciled, Reconciler},
    routes::GatewayRoute,
};
