#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod discover;
mod identity;
pub mod resources;

pub use self::{
    identity::{
        BackendKey, ExtensionKinds, GroupKind, InvalidExtensionKind, InvalidGatewayRef,
        NamespacedName,
    },
    resources::{ResourceMappings, ResourceTree},
};
