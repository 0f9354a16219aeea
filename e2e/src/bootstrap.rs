//  Copyright (c) 2026 Metaform Systems, Inc
//
//  This program and the accompanying materials are made available under the
//  terms of the Apache License, Version 2.0 which is available at
//  https://www.apache.org/licenses/LICENSE-2.0
//
//  SPDX-License-Identifier: Apache-2.0
//
//  Contributors:
//       Metaform Systems, Inc. - initial API and implementation
//

//! Suite bootstrap: installs the controller before any spec runs and removes it afterwards.

use crate::deployment::RemoteSecretDeployment;
use crate::settings::RemoteSecretSettings;
use crate::utils::kubectl_configured;
use anyhow::{Context, Result, bail};
use log::{info, warn};
use remote_secret_e2e_framework::{ClusterConfig, GlobalAddons, SuiteHooks};
use std::io::{self, Stdout, Write};
use std::sync::Arc;

/// Suite hooks for the remote secret end-to-end run.
pub struct RemoteSecretSuite<G, W = Stdout>
where
    G: GlobalAddons,
    W: Write,
{
    addons: G,
    settings: RemoteSecretSettings,
    cluster_config: Option<ClusterConfig>,
    log_writer: W,
}

impl<G> RemoteSecretSuite<G, Stdout>
where
    G: GlobalAddons,
{
    pub fn new(addons: G, settings: RemoteSecretSettings) -> Self {
        Self::with_log_writer(addons, settings, io::stdout())
    }
}

impl<G, W> RemoteSecretSuite<G, W>
where
    G: GlobalAddons,
    W: Write,
{
    /// Creates the hooks with captured logs of a failed run going to `log_writer`.
    pub fn with_log_writer(addons: G, settings: RemoteSecretSettings, log_writer: W) -> Self {
        Self {
            addons,
            settings,
            cluster_config: None,
            log_writer,
        }
    }

    /// Uses `config` instead of reading the cluster configuration from the environment.
    pub fn with_cluster_config(mut self, config: ClusterConfig) -> Self {
        self.cluster_config = Some(config);
        self
    }

    pub fn addons(&self) -> &G {
        &self.addons
    }

    pub fn log_writer(&self) -> &W {
        &self.log_writer
    }

    fn resolve_cluster_config(&self) -> Result<ClusterConfig> {
        match &self.cluster_config {
            Some(config) => Ok(config.clone()),
            None => ClusterConfig::from_env().context("Failed to read cluster configuration"),
        }
    }
}

impl<G, W> SuiteHooks for RemoteSecretSuite<G, W>
where
    G: GlobalAddons,
    W: Write,
{
    fn before_suite(&mut self) -> Result<()> {
        let config = self.resolve_cluster_config()?;

        if self.settings.preflight && !kubectl_configured(&config)? {
            bail!("{} not configured or cluster not accessible", config.kubectl_command);
        }

        info!(
            "Installing remote secret controller from {}",
            self.settings.manifest_path.display()
        );
        let deployment = RemoteSecretDeployment::new(&self.settings.manifest_path);
        self.addons
            .install_global(Arc::new(config), Box::new(deployment))
            .context("Failed to install remote secret controller")?;

        Ok(())
    }

    fn after_suite(&mut self, run_failed: bool) -> Result<()> {
        let uninstalled = self.addons.uninstall_global();

        if run_failed {
            warn!("Suite failed, dumping captured addon output");
            self.addons
                .dump_logs(&mut self.log_writer)
                .context("Failed to write addon logs")?;
        }

        uninstalled.context("Failed to uninstall addons")
    }
}
