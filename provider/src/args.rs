use crate::{
    core::{ExtensionKinds, NamespacedName},
    index::Reconciler,
    k8s::GroupVersionKind,
    snapshot,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tracing::{info_span, Instrument};

/// Collects the Gateway API resources attached to a Gateway.
///
/// Routes, the ReferenceGrants that authorize their cross-namespace backend
/// references, and the filters their rules reference are read from the
/// cluster once and printed as a single resource tree.
#[derive(Debug, Parser)]
#[clap(name = "gateway-provider", version)]
pub struct Args {
    #[clap(
        long,
        default_value = "gateway_provider=info,warn",
        env = "GATEWAY_PROVIDER_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    /// The Gateway to collect resources for, as <namespace>/<name>.
    #[clap(long)]
    gateway: NamespacedName,

    /// A kind managed by an extension, as <group>/<version>/<Kind>.
    ///
    /// Routes may reference objects of these kinds as backends or through
    /// ExtensionRef filters.
    #[clap(long = "extension-kind", value_parser = ExtensionKinds::parse_kind)]
    extension_kinds: Vec<GroupVersionKind>,

    #[clap(long, value_enum, default_value = "yaml")]
    output: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            gateway,
            extension_kinds,
            output,
        } = self;

        log_format
            .try_init(log_level)
            .context("failed to configure logging")?;

        let client = client
            .try_client()
            .await
            .context("failed to build Kubernetes client")?;
        let extensions = ExtensionKinds::new(extension_kinds);

        let index = snapshot::load(&client, &extensions)
            .instrument(info_span!("snapshot"))
            .await?;
        let reconciled = Reconciler::new(index, extensions)
            .reconcile(&gateway)
            .instrument(info_span!("reconcile", %gateway))
            .await?;

        let mut stdout = std::io::stdout().lock();
        match output {
            OutputFormat::Json => serde_json::to_writer_pretty(&mut stdout, &reconciled.tree)?,
            OutputFormat::Yaml => serde_yaml::to_writer(&mut stdout, &reconciled.tree)?,
        }
        writeln!(stdout)?;
        Ok(())
    }
}
