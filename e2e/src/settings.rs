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

use bon::Builder;
use remote_secret_e2e_framework::ConfigError;
use remote_secret_e2e_framework::config::{non_blank, parse_flag};
use std::path::PathBuf;

pub const DEFAULT_MANIFEST_PATH: &str = "config/e2e/remote-secret.yaml";
pub const DEFAULT_NAMESPACE: &str = "remotesecret";
pub const DEFAULT_CONTROLLER_DEPLOYMENT: &str = "remote-secret-controller-manager";

pub const MANIFEST_ENV: &str = "REMOTE_SECRET_MANIFEST";
pub const NAMESPACE_ENV: &str = "REMOTE_SECRET_NAMESPACE";
pub const DEPLOYMENT_ENV: &str = "REMOTE_SECRET_DEPLOYMENT";
pub const SKIP_PREFLIGHT_ENV: &str = "E2E_SKIP_PREFLIGHT";

/// Settings for the remote secret end-to-end fixture.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct RemoteSecretSettings {
    /// Manifest applied at suite start and deleted at suite end
    #[builder(into, default = PathBuf::from(DEFAULT_MANIFEST_PATH))]
    pub manifest_path: PathBuf,
    /// Namespace the controller is deployed into
    #[builder(into, default = DEFAULT_NAMESPACE)]
    pub namespace: String,
    /// Name of the controller deployment
    #[builder(into, default = DEFAULT_CONTROLLER_DEPLOYMENT)]
    pub controller_deployment: String,
    /// Verify the cluster is reachable before installing
    #[builder(default = true)]
    pub preflight: bool,
}

impl Default for RemoteSecretSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RemoteSecretSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let skip_preflight = match lookup(SKIP_PREFLIGHT_ENV) {
            Some(value) => parse_flag(SKIP_PREFLIGHT_ENV, &value)?,
            None => false,
        };

        Ok(Self::builder()
            .maybe_manifest_path(non_blank(MANIFEST_ENV, lookup(MANIFEST_ENV))?)
            .maybe_namespace(non_blank(NAMESPACE_ENV, lookup(NAMESPACE_ENV))?)
            .maybe_controller_deployment(non_blank(DEPLOYMENT_ENV, lookup(DEPLOYMENT_ENV))?)
            .preflight(!skip_preflight)
            .build())
    }
}
