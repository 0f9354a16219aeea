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

use crate::command::CommandError;
use crate::config::ClusterConfig;
use std::sync::Arc;
use thiserror::Error;

/// A pluggable setup/teardown unit representing one external dependency of a test suite.
///
/// The lifecycle is `setup` once, `install` at suite start and `uninstall` at suite end. Implementations keep the
/// output of their most recent command so it can be surfaced when the run fails.
pub trait Addon: Send {
    /// Human-readable name used in diagnostics and log dumps.
    fn name(&self) -> &str;

    /// Binds the cluster configuration used by subsequent `install` and `uninstall` calls.
    fn setup(&mut self, config: Arc<ClusterConfig>);

    /// Installs the dependency into the cluster.
    ///
    /// # Errors
    /// Returns `CommandFailed` if the cluster CLI exits unsuccessfully and `Command` if it could not be run.
    fn install(&mut self) -> Result<(), AddonError>;

    /// Removes the dependency from the cluster.
    fn uninstall(&mut self) -> Result<(), AddonError>;

    /// Output of the most recently executed command, verbatim. Empty if nothing ran or nothing was printed.
    fn logs(&self) -> &[u8];
}

/// Errors raised by addon lifecycle operations.
#[derive(Debug, Error)]
pub enum AddonError {
    #[error("'{command}' failed ({}): {output}", describe_exit(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl AddonError {
    pub fn command_failed(command: impl Into<String>, exit_code: Option<i32>, output: &[u8]) -> Self {
        AddonError::CommandFailed {
            command: command.into(),
            exit_code,
            output: String::from_utf8_lossy(output).into_owned(),
        }
    }
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
