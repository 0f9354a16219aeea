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


use crate::command::{CommandOutput, Invocation};

#[test]
fn test_invocation_display_joins_program_and_args() {
    let invocation = Invocation::new("kubectl", ["apply", "-f", "deploy/manifest.yaml"]);

    assert_eq!(invocation.to_string(), "kubectl apply -f deploy/manifest.yaml");
}

#[test]
fn test_invocation_command_carries_args() {
    let invocation = Invocation::new("kubectl", ["delete", "-f", "m.yaml"]);
    let command = invocation.command();

    assert_eq!(command.get_program(), "kubectl");
    let args: Vec<_> = command.get_args().collect();
    assert_eq!(args, ["delete", "-f", "m.yaml"]);
}

#[test]
fn test_output_success_requires_zero_exit() {
    assert!(CommandOutput::new(Some(0), "ok").success());
    assert!(!CommandOutput::new(Some(1), "boom").success());
    assert!(!CommandOutput::new(None, Vec::new()).success());
}
