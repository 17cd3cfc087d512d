use gateway_provider_k8s_api::{
    gateway::{self, BackendRef},
    GroupVersionKind, ObjectMeta,
};
use std::{fmt, str::FromStr};

/// Identifies a namespaced object, e.g. a Gateway or a filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid gateway reference {0:?}: expected <namespace>/<name>")]
pub struct InvalidGatewayRef(String);

/// A (group, kind) pair. The core group is spelled `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct GroupKind {
    pub group: String,
    pub kind: String,
}

/// The object kinds managed by extensions, which routes may reference as
/// backends or through `ExtensionRef` filters.
#[derive(Clone, Debug, Default)]
pub struct ExtensionKinds(Vec<GroupVersionKind>);

#[derive(Debug, thiserror::Error)]
#[error("invalid extension kind {0:?}: expected <group>/<version>/<Kind>")]
pub struct InvalidExtensionKind(String);

/// The identity of a backend referenced by a route. Ports and weights are not
/// part of the identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct BackendKey {
    pub group: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

// === impl NamespacedName ===

impl NamespacedName {
    pub fn new(namespace: impl ToString, name: impl ToString) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Returns the identity of an object, if its metadata has both a
    /// namespace and a name.
    pub fn from_meta(meta: &ObjectMeta) -> Option<Self> {
        Some(Self {
            namespace: meta.namespace.clone()?,
            name: meta.name.clone()?,
        })
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for NamespacedName {
    type Err = InvalidGatewayRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((ns, name)) if !ns.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(ns, name))
            }
            _ => Err(InvalidGatewayRef(s.to_string())),
        }
    }
}

// === impl GroupKind ===

impl GroupKind {
    pub fn new(group: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn is_core_service(&self) -> bool {
        self.group.is_empty() && self.kind == gateway::KIND_SERVICE
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            return write!(f, "{}", self.kind);
        }
        write!(f, "{}.{}", self.kind, self.group)
    }
}

impl From<&GroupVersionKind> for GroupKind {
    fn from(gvk: &GroupVersionKind) -> Self {
        Self::new(&gvk.group, &gvk.kind)
    }
}

// === impl ExtensionKinds ===

impl ExtensionKinds {
    pub fn new(kinds: impl IntoIterator<Item = GroupVersionKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    /// Parses a `<group>/<version>/<Kind>` triple.
    pub fn parse_kind(s: &str) -> Result<GroupVersionKind, InvalidExtensionKind> {
        let mut parts = s.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(version), Some(kind))
                if !group.is_empty()
                    && !version.is_empty()
                    && !kind.is_empty()
                    && !kind.contains('/') =>
            {
                Ok(GroupVersionKind::gvk(group, version, kind))
            }
            _ => Err(InvalidExtensionKind(s.to_string())),
        }
    }

    pub fn contains(&self, gk: &GroupKind) -> bool {
        self.0.iter().any(|gvk| GroupKind::from(gvk) == *gk)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupVersionKind> + '_ {
        self.0.iter()
    }
}

// === impl BackendKey ===

impl BackendKey {
    /// Builds the identity of a backend referenced from a route in
    /// `route_ns`.
    pub fn new(backend: &BackendRef, route_ns: &str) -> Self {
        Self {
            group: backend.group().to_string(),
            kind: backend.kind().to_string(),
            namespace: backend.namespace_or(route_ns).to_string(),
            name: backend.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gateway_ref() {
        let gw = "envoy-gateway-system/eg"
            .parse::<NamespacedName>()
            .expect("must parse");
        assert_eq!(gw, NamespacedName::new("envoy-gateway-system", "eg"));
        assert_eq!(gw.to_string(), "envoy-gateway-system/eg");

        for invalid in ["eg", "/eg", "ns/", "a/b/c", ""] {
            assert!(
                invalid.parse::<NamespacedName>().is_err(),
                "{invalid:?} must not parse"
            );
        }
    }

    #[test]
    fn parses_extension_kind() {
        let gvk = ExtensionKinds::parse_kind("foo.example.io/v1/Foo").expect("must parse");
        assert_eq!(gvk.group, "foo.example.io");
        assert_eq!(gvk.version, "v1");
        assert_eq!(gvk.kind, "Foo");

        assert!(ExtensionKinds::parse_kind("foo.example.io/Foo").is_err());
        assert!(ExtensionKinds::parse_kind("foo.example.io/v1/").is_err());

        let kinds = ExtensionKinds::new(Some(gvk));
        assert!(kinds.contains(&GroupKind::new("foo.example.io", "Foo")));
        assert!(!kinds.contains(&GroupKind::new("foo.example.io", "Bar")));
    }

    #[test]
    fn only_empty_group_is_core() {
        assert!(GroupKind::new("", "Service").is_core_service());
        assert!(!GroupKind::new("core", "Service").is_core_service());
        assert!(!GroupKind::new("apps", "Service").is_core_service());
        assert_ne!(GroupKind::new("core", "Service"), GroupKind::new("", "Service"));
    }

    #[test]
    fn backend_key_ignores_port() {
        let a = BackendRef {
            name: "web".to_string(),
            port: Some(80),
            ..Default::default()
        };
        let b = BackendRef {
            group: Some("".to_string()),
            kind: Some("Service".to_string()),
            namespace: Some("apps".to_string()),
            name: "web".to_string(),
            port: Some(8080),
            weight: Some(2),
        };
        assert_eq!(BackendKey::new(&a, "apps"), BackendKey::new(&b, "other"));
    }
}
