use crate::{
    core::ExtensionKinds,
    index::Index,
    k8s::{
        filter::{AuthenticationFilter, RateLimitFilter},
        gateway::{GRPCRoute, HTTPRoute, ReferenceGrant, TCPRoute, TLSRoute, UDPRoute},
        ApiResource, DynamicObject, GroupVersionKind, Resource,
    },
};
use anyhow::{Context, Result};
use kube::{
    api::{Api, ListParams},
    core::TypeMeta,
    Client,
};
use kubert::index::IndexNamespacedResource;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Lists every resource the reconciler consumes into a fresh index.
///
/// Gateway API and filter kinds whose CRDs are not installed are skipped; any
/// other discovery failure fails the load. Extension kinds must be installed.
pub(crate) async fn load(client: &Client, extensions: &ExtensionKinds) -> Result<Index> {
    let mut index = Index::default();

    list_into::<HTTPRoute>(client, &mut index).await?;
    list_into::<GRPCRoute>(client, &mut index).await?;
    list_into::<TLSRoute>(client, &mut index).await?;
    list_into::<TCPRoute>(client, &mut index).await?;
    list_into::<UDPRoute>(client, &mut index).await?;
    list_into::<ReferenceGrant>(client, &mut index).await?;
    list_into::<AuthenticationFilter>(client, &mut index).await?;
    list_into::<RateLimitFilter>(client, &mut index).await?;

    for gvk in extensions.iter() {
        list_extension_kind(client, gvk, &mut index).await?;
    }

    Ok(index)
}

async fn list_into<T>(client: &Client, index: &mut Index) -> Result<()>
where
    T: Resource<DynamicType = ()> + Clone + Debug + DeserializeOwned,
    Index: IndexNamespacedResource<T>,
{
    let kind = T::kind(&());
    if !api_resource_exists::<T>(client).await? {
        tracing::info!(%kind, "Resource is not installed; skipping");
        return Ok(());
    }

    let list = Api::<T>::all(client.clone())
        .list(&ListParams::default())
        .await
        .with_context(|| format!("failed to list {kind} resources"))?;
    tracing::debug!(%kind, count = list.items.len(), "Listed resources");
    for obj in list.items {
        index.apply(obj);
    }
    Ok(())
}

async fn list_extension_kind(
    client: &Client,
    gvk: &GroupVersionKind,
    index: &mut Index,
) -> Result<()> {
    let resource = ApiResource::from_gvk(gvk);
    let list = Api::<DynamicObject>::all_with(client.clone(), &resource)
        .list(&ListParams::default())
        .await
        .with_context(|| format!("failed to list {} resources", resource.kind))?;
    tracing::debug!(kind = %resource.kind, count = list.items.len(), "Listed extension resources");

    for mut obj in list.items {
        // List items may omit their type; the resource tree must carry it.
        if obj.types.is_none() {
            obj.types = Some(TypeMeta {
                api_version: resource.api_version.clone(),
                kind: resource.kind.clone(),
            });
        }
        index.apply(obj);
    }
    Ok(())
}

async fn api_resource_exists<T>(client: &Client) -> Result<bool>
where
    T: Resource,
    T::DynamicType: Default,
{
    let dt = Default::default();
    let api_version = T::api_version(&dt);
    match client.list_api_group_resources(&api_version).await {
        Ok(list) => Ok(list.resources.iter().any(|r| r.kind == T::kind(&dt))),
        // The API group itself is not served.
        Err(error) if is_not_found(&error) => Ok(false),
        Err(error) => {
            Err(error).with_context(|| format!("failed to discover {api_version} resources"))
        }
    }
}

fn is_not_found(error: &kube::Error) -> bool {
    matches!(error, kube::Error::Api(response) if response.code == 404)
}
