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

//! Cluster helpers used by the end-to-end specs.
//!
//! These only observe the cluster. Installing and removing the controller is the job of
//! [`RemoteSecretDeployment`](crate::deployment::RemoteSecretDeployment).

use anyhow::{Context, Result, bail};
use remote_secret_e2e_framework::ClusterConfig;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// CRD served by the remote secret controller
pub const REMOTE_SECRET_CRD: &str = "remotesecrets.appstudio.redhat.com";

/// Check if kubectl is available and can reach the configured cluster
pub fn kubectl_configured(config: &ClusterConfig) -> Result<bool> {
    let output = config
        .kubectl(["cluster-info"])
        .command()
        .output()
        .with_context(|| format!("Failed to execute {}. Is it installed?", config.kubectl_command))?;

    Ok(output.status.success())
}

/// Check if namespace exists
pub fn namespace_exists(config: &ClusterConfig, namespace: &str) -> Result<bool> {
    let output = config
        .kubectl(["get", "namespace", namespace])
        .command()
        .output()
        .context("Failed to check namespace")?;

    Ok(output.status.success())
}

/// Wait for a CRD to report the `Established` condition
pub fn wait_for_crd_established(config: &ClusterConfig, crd: &str, timeout_secs: u64) -> Result<()> {
    let resource = format!("crd/{}", crd);
    let timeout = format!("--timeout={}s", timeout_secs);
    let output = config
        .kubectl([
            "wait",
            "--for=condition=established",
            resource.as_str(),
            timeout.as_str(),
        ])
        .command()
        .output()
        .context("Failed to wait for CRD")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("CRD {} not established: {}", crd, stderr.trim());
    }

    Ok(())
}

/// Wait for deployment to be ready
pub async fn wait_for_deployment_ready(
    config: &ClusterConfig,
    namespace: &str,
    deployment_name: &str,
    timeout_secs: u64,
) -> Result<()> {
    let start = Instant::now();

    loop {
        if start.elapsed() > Duration::from_secs(timeout_secs) {
            bail!("Timeout waiting for deployment {} to be ready", deployment_name);
        }

        let output = config
            .kubectl([
                "rollout",
                "status",
                "deployment",
                deployment_name,
                "-n",
                namespace,
                "--timeout=5s",
            ])
            .command()
            .output()
            .context("Failed to check deployment status")?;

        if output.status.success() {
            return Ok(());
        }

        sleep(Duration::from_secs(2)).await;
    }
}
