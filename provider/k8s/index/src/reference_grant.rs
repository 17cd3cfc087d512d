use anyhow::{Context, Result};
use gateway_provider_core::{discover::DiscoverReferenceGrants, GroupKind};
use gateway_provider_k8s_api::gateway::{ReferenceGrant, ReferenceGrantFrom, ReferenceGrantTo};
use std::fmt;

/// Identifies one side of a reference: the referring route or the referenced
/// backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRef {
    pub group_kind: GroupKind,
    pub namespace: String,
    pub name: String,
}

/// The outcome of authorizing a reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Authorization {
    /// The referent is in the referrer's namespace.
    SameNamespace,

    /// A ReferenceGrant in the referent's namespace permits the reference.
    Granted(ReferenceGrant),

    /// No ReferenceGrant permits the reference.
    Denied,
}

/// Decides whether `from` may reference `to`.
///
/// References within a namespace are always permitted. Otherwise the
/// ReferenceGrants of the target namespace are searched in name order and the
/// first one that permits the reference is returned.
pub async fn find_reference_grant<D>(
    discover: &D,
    from: &ObjectRef,
    to: &ObjectRef,
) -> Result<Authorization>
where
    D: DiscoverReferenceGrants + ?Sized,
{
    if from.namespace == to.namespace {
        return Ok(Authorization::SameNamespace);
    }

    let mut grants = discover
        .list_reference_grants(&to.namespace)
        .await
        .with_context(|| format!("failed to list ReferenceGrants in {}", to.namespace))?;
    grants.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));

    Ok(grants
        .into_iter()
        .find(|grant| permits(grant, from, to))
        .map(Authorization::Granted)
        .unwrap_or(Authorization::Denied))
}

fn permits(grant: &ReferenceGrant, from: &ObjectRef, to: &ObjectRef) -> bool {
    grant.spec.from.iter().any(|f| from_matches(f, from))
        && grant.spec.to.iter().any(|t| to_matches(t, to))
}

fn from_matches(entry: &ReferenceGrantFrom, from: &ObjectRef) -> bool {
    GroupKind::new(&entry.group, &entry.kind) == from.group_kind
        && entry.namespace == from.namespace
}

fn to_matches(entry: &ReferenceGrantTo, to: &ObjectRef) -> bool {
    if GroupKind::new(&entry.group, &entry.kind) != to.group_kind {
        return false;
    }
    match entry.name.as_deref() {
        None | Some("") => true,
        Some(name) => name == to.name,
    }
}

// === impl ObjectRef ===

impl ObjectRef {
    pub fn new(group: &str, kind: &str, namespace: impl ToString, name: impl ToString) -> Self {
        Self {
            group_kind: GroupKind::new(group, kind),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.group_kind, self.namespace, self.name)
    }
}
