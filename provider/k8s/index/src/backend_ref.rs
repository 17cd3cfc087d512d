use gateway_provider_core::{ExtensionKinds, GroupKind};
use gateway_provider_k8s_api::gateway::BackendRef;

/// Describes why a backend reference cannot be used.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReference {
    #[error("unsupported backend group {0:?}")]
    UnsupportedGroup(String),

    #[error("unsupported backend kind {0}")]
    UnsupportedKind(GroupKind),

    #[error("backend name must not be empty")]
    MissingName,

    #[error("a port is required to reference Service {0:?}")]
    MissingPort(String),
}

/// Checks that a backend reference targets a supported kind and carries the
/// fields that kind requires.
///
/// Core Services are always supported; other kinds must be registered by an
/// extension. The core group is only ever spelled `""`.
pub fn validate_backend_ref(
    backend: &BackendRef,
    extensions: &ExtensionKinds,
) -> Result<(), InvalidReference> {
    let gk = GroupKind::new(backend.group(), backend.kind());

    if !gk.is_core_service() && !extensions.contains(&gk) {
        let known_group = gk.group.is_empty()
            || extensions
                .iter()
                .any(|gvk| GroupKind::from(gvk).group == gk.group);
        if known_group {
            return Err(InvalidReference::UnsupportedKind(gk));
        }
        return Err(InvalidReference::UnsupportedGroup(gk.group));
    }

    if backend.name.is_empty() {
        return Err(InvalidReference::MissingName);
    }

    if gk.is_core_service() && backend.port.is_none() {
        return Err(InvalidReference::MissingPort(backend.name.clone()));
    }

    Ok(())
}

// === impl InvalidReference ===

impl InvalidReference {
    /// The backend reference field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnsupportedGroup(_) => "group",
            Self::UnsupportedKind(_) => "kind",
            Self::MissingName => "name",
            Self::MissingPort(_) => "port",
        }
    }
}
