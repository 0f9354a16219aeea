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

//! End-to-end test fixture for the remote secret controller.
//!
//! The suite applies the controller manifest before any spec runs and deletes it afterwards.
//! Unit tests run with plain `cargo test`. The cluster-backed suite requires a reachable cluster:
//!
//! `cargo test --package remote-secret-e2e-tests --features e2e --test remote_secret_e2e`

pub mod bootstrap;
pub mod deployment;
pub mod settings;
pub mod utils;

pub use bootstrap::RemoteSecretSuite;
pub use deployment::RemoteSecretDeployment;
pub use settings::RemoteSecretSettings;

#[cfg(test)]
mod tests;
