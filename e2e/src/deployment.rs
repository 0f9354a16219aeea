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

//! The remote secret controller as a suite addon.

use log::{debug, info};
use remote_secret_e2e_framework::{
    Addon, AddonError, ClusterConfig, CommandRunner, Invocation, SystemCommandRunner,
};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ADDON_NAME: &str = "remote-secret-deployment";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ManifestAction {
    Apply,
    Delete,
}

impl ManifestAction {
    fn verb(self) -> &'static str {
        match self {
            ManifestAction::Apply => "apply",
            ManifestAction::Delete => "delete",
        }
    }
}

impl fmt::Display for ManifestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Applies and deletes the controller manifest through the cluster CLI.
///
/// Each `install` or `uninstall` runs exactly one command and replaces the captured output with that command's
/// combined stdout and stderr. There is no retry and no readiness wait. Re-applying an applied manifest is left to
/// the CLI's own semantics.
///
/// Not meant for concurrent use; callers hold it behind `&mut`.
pub struct RemoteSecretDeployment<R = SystemCommandRunner>
where
    R: CommandRunner,
{
    manifest_path: PathBuf,
    runner: R,
    config: Option<Arc<ClusterConfig>>,
    output: Vec<u8>,
}

impl RemoteSecretDeployment<SystemCommandRunner> {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self::with_runner(manifest_path, SystemCommandRunner)
    }
}

impl<R> RemoteSecretDeployment<R>
where
    R: CommandRunner,
{
    pub fn with_runner(manifest_path: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            runner,
            config: None,
            output: Vec::new(),
        }
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// The configuration bound by `setup`, if any.
    pub fn config(&self) -> Option<&ClusterConfig> {
        self.config.as_deref()
    }

    /// Builds the CLI invocation for `action`. Without a bound configuration the ambient CLI defaults apply.
    pub fn invocation(&self, action: ManifestAction) -> Invocation {
        let args = [OsStr::new(action.verb()), OsStr::new("-f"), self.manifest_path.as_os_str()];
        match &self.config {
            Some(config) => config.kubectl(args),
            None => ClusterConfig::default().kubectl(args),
        }
    }

    fn exec(&mut self, action: ManifestAction) -> Result<(), AddonError> {
        let invocation = self.invocation(action);
        info!("Running '{}'", invocation);

        let output = match self.runner.run(&invocation) {
            Ok(output) => output,
            Err(e) => {
                self.output.clear();
                println!("Failed to {} {}: {}", action, self.manifest_path.display(), e);
                return Err(e.into());
            }
        };
        let success = output.success();
        let exit_code = output.exit_code;
        self.output = output.combined;
        debug!("'{}' output:\n{}", invocation, String::from_utf8_lossy(&self.output));

        if !success {
            println!(
                "Failed to {} {}: {}",
                action,
                self.manifest_path.display(),
                String::from_utf8_lossy(&self.output).trim_end()
            );
            return Err(AddonError::command_failed(
                invocation.to_string(),
                exit_code,
                &self.output,
            ));
        }

        Ok(())
    }
}

impl<R> Addon for RemoteSecretDeployment<R>
where
    R: CommandRunner,
{
    fn name(&self) -> &str {
        ADDON_NAME
    }

    fn setup(&mut self, config: Arc<ClusterConfig>) {
        self.config = Some(config);
    }

    fn install(&mut self) -> Result<(), AddonError> {
        self.exec(ManifestAction::Apply)
    }

    fn uninstall(&mut self) -> Result<(), AddonError> {
        self.exec(ManifestAction::Delete)
    }

    fn logs(&self) -> &[u8] {
        &self.output
    }
}
