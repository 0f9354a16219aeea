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

#[cfg(unix)]
mod utils;

use remote_secret_e2e_framework::ClusterConfig;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Mimics `kubectl apply -f` and `kubectl delete -f` against an in-directory "cluster" marker file.
pub(crate) const KUBECTL_EMULATOR: &str = r##"#!/bin/sh
dir="$(dirname "$0")"
echo "$*" >> "$dir/calls.log"
while [ $# -gt 0 ]; do
    case "$1" in
        --kubeconfig|--context) shift 2 ;;
        *) break ;;
    esac
done
verb="$1"
if [ "$2" != "-f" ] || [ -z "$3" ]; then
    echo "error: expected '$verb -f <manifest>'" >&2
    exit 2
fi
manifest="$3"
if [ ! -f "$manifest" ]; then
    echo "error: the path \"$manifest\" does not exist" >&2
    exit 1
fi
case "$verb" in
    apply)
        if [ -f "$dir/applied" ]; then
            echo "deployment.apps/remote-secret-controller-manager unchanged"
        else
            echo "namespace/remotesecret created"
            echo "Warning: namespaces/remotesecret is missing the last-applied-configuration annotation" >&2
            echo "deployment.apps/remote-secret-controller-manager created"
        fi
        touch "$dir/applied"
        ;;
    delete)
        if [ -f "$dir/applied" ]; then
            rm -f "$dir/applied"
            echo "namespace \"remotesecret\" deleted"
            echo "deployment.apps \"remote-secret-controller-manager\" deleted"
        else
            echo "Error from server (NotFound): deployments.apps \"remote-secret-controller-manager\" not found" >&2
            exit 1
        fi
        ;;
    *)
        echo "error: unknown command \"$verb\" for \"kubectl\"" >&2
        exit 1
        ;;
esac
"##;

pub(crate) const FRESH_APPLY_OUTPUT: &str = "namespace/remotesecret created\n\
Warning: namespaces/remotesecret is missing the last-applied-configuration annotation\n\
deployment.apps/remote-secret-controller-manager created\n";

pub(crate) const DELETE_OUTPUT: &str = "namespace \"remotesecret\" deleted\n\
deployment.apps \"remote-secret-controller-manager\" deleted\n";

/// A shell script standing in for the cluster CLI, living in its own temporary directory.
pub(crate) struct FakeKubectl {
    dir: TempDir,
    path: PathBuf,
}

impl FakeKubectl {
    pub(crate) fn new(script: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source = dir.path().join("kubectl.sh");
        fs::write(&source, script).expect("Failed to write script");

        // Copied by a child process: a descriptor opened for writing here could leak into a process forked by a
        // concurrently running test and make exec fail with ETXTBSY.
        let path = dir.path().join("kubectl");
        let status = Command::new("sh")
            .arg("-c")
            .arg("cp \"$0\" \"$1\" && chmod 755 \"$1\"")
            .arg(&source)
            .arg(&path)
            .status()
            .expect("Failed to install fake kubectl");
        assert!(status.success(), "Failed to install fake kubectl");

        Self { dir, path }
    }

    pub(crate) fn emulator() -> Self {
        Self::new(KUBECTL_EMULATOR)
    }

    pub(crate) fn config(&self) -> ClusterConfig {
        ClusterConfig::builder()
            .kubectl_command(self.path.to_string_lossy())
            .build()
    }

    /// Writes a controller manifest next to the script and returns its path.
    pub(crate) fn manifest(&self) -> PathBuf {
        let path = self.dir.path().join("remote-secret.yaml");
        fs::write(
            &path,
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: remote-secret-controller-manager\n",
        )
        .expect("Failed to write manifest");
        path
    }

    pub(crate) fn missing_manifest(&self) -> PathBuf {
        self.dir.path().join("missing.yaml")
    }

    /// Argument lines of every invocation so far.
    pub(crate) fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
