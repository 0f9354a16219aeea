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

//! Building blocks for Kubernetes end-to-end suites: cluster configuration, CLI command execution, pluggable
//! addons with a suite-wide registry, and a suite runner with global setup and teardown.

pub mod addon;
pub mod command;
pub mod config;
pub mod registry;
pub mod suite;

pub use addon::{Addon, AddonError};
pub use command::{CommandError, CommandOutput, CommandRunner, Invocation, SystemCommandRunner};
pub use config::{ClusterConfig, ConfigError};
pub use registry::{AddonRegistry, GlobalAddons, RegistryError};
pub use suite::{Spec, Suite, SuiteConfig, SuiteHooks, SuiteReport};
