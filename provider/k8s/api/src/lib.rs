#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod filter;
pub mod gateway;

pub use kube::{
    api::{ApiResource, DynamicObject, ObjectMeta},
    core::GroupVersionKind,
    Resource,
};
