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


use crate::addon::{Addon, AddonError};
use crate::config::ClusterConfig;
use log::{error, info, warn};
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;

/// Suite-wide set of installed addons.
///
/// Suite hooks depend on this trait rather than on a process-global registry so the registry can be swapped out in
/// tests.
pub trait GlobalAddons {
    /// Binds `config` to the addon, installs it and keeps it for teardown.
    ///
    /// # Errors
    /// Returns the addon's install error. The addon is registered even when installation fails.
    fn install_global(&mut self, config: Arc<ClusterConfig>, addon: Box<dyn Addon>) -> Result<(), AddonError>;

    /// Uninstalls every installed addon in reverse installation order.
    fn uninstall_global(&mut self) -> Result<(), RegistryError>;

    /// Writes the last captured output of every registered addon.
    fn dump_logs(&self, out: &mut dyn Write) -> io::Result<()>;
}

struct Registration {
    addon: Box<dyn Addon>,
    installed: bool,
}

/// In-process [`GlobalAddons`] implementation.
///
/// Addons stay registered after uninstall so the output of their teardown command remains available to
/// [`GlobalAddons::dump_logs`].
#[derive(Default)]
pub struct AddonRegistry {
    registrations: Vec<Registration>,
}

impl AddonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Names of addons still considered installed, in installation order.
    pub fn installed(&self) -> Vec<&str> {
        self.registrations
            .iter()
            .filter(|r| r.installed)
            .map(|r| r.addon.name())
            .collect()
    }
}

impl GlobalAddons for AddonRegistry {
    fn install_global(&mut self, config: Arc<ClusterConfig>, mut addon: Box<dyn Addon>) -> Result<(), AddonError> {
        info!("Installing addon '{}'", addon.name());
        addon.setup(config);
        let result = addon.install();
        if let Err(e) = &result {
            error!("Failed to install addon '{}': {}", addon.name(), e);
        }
        // A failed install may have created part of the resources, so it still gets uninstalled at teardown.
        self.registrations.push(Registration { addon, installed: true });
        result
    }

    fn uninstall_global(&mut self) -> Result<(), RegistryError> {
        let mut failures = Vec::new();
        for registration in self.registrations.iter_mut().rev().filter(|r| r.installed) {
            let name = registration.addon.name().to_string();
            info!("Uninstalling addon '{}'", name);
            registration.installed = false;
            if let Err(e) = registration.addon.uninstall() {
                warn!("Failed to uninstall addon '{}': {}", name, e);
                failures.push((name, e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::UninstallFailed(failures))
        }
    }

    fn dump_logs(&self, out: &mut dyn Write) -> io::Result<()> {
        for registration in &self.registrations {
            writeln!(out, "==== Logs for addon '{}' ====", registration.addon.name())?;
            out.write_all(registration.addon.logs())?;
            writeln!(out)?;
        }
        out.flush()
    }
}

/// Errors raised by registry-wide operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to uninstall {}", describe_failures(.0))]
    UninstallFailed(Vec<(String, AddonError)>),
}

fn describe_failures(failures: &[(String, AddonError)]) -> String {
    failures
        .iter()
        .map(|(name, e)| format!("'{}': {}", name, e))
        .collect::<Vec<_>>()
        .join("; ")
}
