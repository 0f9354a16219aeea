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

use super::FakeKubectl;
use crate::utils::{kubectl_configured, namespace_exists, wait_for_crd_established, wait_for_deployment_ready};
use remote_secret_e2e_framework::ClusterConfig;

const CLUSTER_SCRIPT: &str = r##"#!/bin/sh
case "$1" in
    cluster-info)
        echo "Kubernetes control plane is running at https://127.0.0.1:6443"
        ;;
    get)
        if [ "$3" = "remotesecret" ]; then
            echo "remotesecret   Active   5m"
        else
            echo "Error from server (NotFound): namespaces \"$3\" not found" >&2
            exit 1
        fi
        ;;
    wait)
        echo "error: timed out waiting for the condition on $3" >&2
        exit 1
        ;;
    rollout)
        echo "deployment \"$4\" successfully rolled out"
        ;;
    *)
        exit 1
        ;;
esac
"##;

const UNREACHABLE_SCRIPT: &str = "#!/bin/sh\necho 'Unable to connect to the server' >&2\nexit 1\n";

#[test]
fn test_kubectl_configured() {
    let reachable = FakeKubectl::new(CLUSTER_SCRIPT);
    let unreachable = FakeKubectl::new(UNREACHABLE_SCRIPT);

    assert!(kubectl_configured(&reachable.config()).unwrap());
    assert!(!kubectl_configured(&unreachable.config()).unwrap());
}

#[test]
fn test_kubectl_configured_reports_missing_binary() {
    let config = ClusterConfig::builder()
        .kubectl_command("/nonexistent/kubectl")
        .build();

    let error = kubectl_configured(&config).expect_err("Missing binary should be an error");

    assert!(error.to_string().contains("/nonexistent/kubectl"));
}

#[test]
fn test_namespace_exists() {
    let kubectl = FakeKubectl::new(CLUSTER_SCRIPT);

    assert!(namespace_exists(&kubectl.config(), "remotesecret").unwrap());
    assert!(!namespace_exists(&kubectl.config(), "other").unwrap());
}

#[test]
fn test_crd_not_established_carries_cli_error() {
    let kubectl = FakeKubectl::new(CLUSTER_SCRIPT);

    let error = wait_for_crd_established(&kubectl.config(), "remotesecrets.appstudio.redhat.com", 1)
        .expect_err("CRD wait should fail");

    assert_eq!(
        error.to_string(),
        "CRD remotesecrets.appstudio.redhat.com not established: \
         error: timed out waiting for the condition on crd/remotesecrets.appstudio.redhat.com"
    );
}

#[tokio::test]
async fn test_wait_for_deployment_ready() {
    let kubectl = FakeKubectl::new(CLUSTER_SCRIPT);

    wait_for_deployment_ready(&kubectl.config(), "remotesecret", "remote-secret-controller-manager", 10)
        .await
        .expect("Deployment should be ready");
}

#[tokio::test]
async fn test_wait_for_deployment_ready_times_out() {
    let kubectl = FakeKubectl::new(UNREACHABLE_SCRIPT);

    let error = wait_for_deployment_ready(&kubectl.config(), "remotesecret", "remote-secret-controller-manager", 0)
        .await
        .expect_err("Wait should time out");

    assert_eq!(
        error.to_string(),
        "Timeout waiting for deployment remote-secret-controller-manager to be ready"
    );
}
