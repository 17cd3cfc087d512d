#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod args;
mod snapshot;

pub use self::args::{Args, OutputFormat};
pub use gateway_provider_core as core;
pub use gateway_provider_k8s_api as k8s;
pub use gateway_provider_k8s_index as index;
