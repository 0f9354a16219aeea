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

//! Cluster connection settings shared by every addon in a suite run.


use crate::command::Invocation;
use bon::Builder;
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_KUBECTL_COMMAND: &str = "kubectl";

pub const KUBECTL_ENV: &str = "KUBECTL";
pub const KUBECONFIG_ENV: &str = "E2E_KUBECONFIG";
pub const KUBE_CONTEXT_ENV: &str = "E2E_KUBE_CONTEXT";

/// Connection details for the cluster under test.
///
/// Unset fields leave the decision to `kubectl` itself, so a default config
/// targets whatever the ambient kubeconfig and current context point at.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct ClusterConfig {
    /// The cluster-management binary to invoke
    #[builder(into, default = DEFAULT_KUBECTL_COMMAND)]
    pub kubectl_command: String,
    /// Explicit kubeconfig file, passed as `--kubeconfig`
    #[builder(into)]
    pub kubeconfig: Option<PathBuf>,
    /// Explicit kubeconfig context, passed as `--context`
    #[builder(into)]
    pub context: Option<String>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClusterConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `InvalidValue` for blank values and `KubeconfigNotFound` when an explicit kubeconfig path does not
    /// exist.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kubectl_command = non_blank(KUBECTL_ENV, lookup(KUBECTL_ENV))?;
        let kubeconfig = non_blank(KUBECONFIG_ENV, lookup(KUBECONFIG_ENV))?.map(PathBuf::from);
        let context = non_blank(KUBE_CONTEXT_ENV, lookup(KUBE_CONTEXT_ENV))?;

        if let Some(path) = &kubeconfig {
            if !path.is_file() {
                return Err(ConfigError::KubeconfigNotFound(path.clone()));
            }
        }

        Ok(Self::builder()
            .kubectl_command(kubectl_command.unwrap_or_else(|| DEFAULT_KUBECTL_COMMAND.to_string()))
            .maybe_kubeconfig(kubeconfig)
            .maybe_context(context)
            .build())
    }

    /// Returns an invocation of the configured binary with the connection flags placed ahead of `args`.
    pub fn kubectl<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut all_args: Vec<OsString> = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            all_args.push("--kubeconfig".into());
            all_args.push(kubeconfig.into());
        }
        if let Some(context) = &self.context {
            all_args.push("--context".into());
            all_args.push(context.into());
        }
        all_args.extend(args.into_iter().map(Into::into));
        Invocation::new(&self.kubectl_command, all_args)
    }
}

/// Parses a boolean flag value such as `E2E_FAIL_FAST=1`.
pub fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_value(key, value, "expected a boolean")),
    }
}

/// Returns `None` for an unset key and rejects keys that are set but blank.
pub fn non_blank(key: &str, value: Option<String>) -> Result<Option<String>, ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::invalid_value(key, v, "value must not be blank")),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

/// Errors raised while assembling configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Kubeconfig not found: {}", .0.display())]
    KubeconfigNotFound(PathBuf),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue { key: String, value: String, reason: String },
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
