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

//! Synchronous execution of cluster CLI commands with combined output capture.

#[cfg(test)]
mod tests;

use log::debug;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Read};
use std::process::{Command, Stdio};
use thiserror::Error;

/// A single command line: the program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Builds the process command with stdin detached.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::null());
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// The result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Process exit code; `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Interleaved stdout and stderr
    pub combined: Vec<u8>,
}

impl CommandOutput {
    pub fn new(exit_code: Option<i32>, combined: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            combined: combined.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an invocation to completion and captures its combined output.
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation, blocking until the process exits.
    ///
    /// A non-zero exit is not an error at this level; callers inspect [`CommandOutput::success`].
    ///
    /// # Errors
    /// Returns `Spawn` if the process could not be started and `Io` if its output could not be collected.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError>;
}

/// Runs commands as child processes of the test binary.
///
/// stdout and stderr share one pipe, so the captured bytes preserve the order in which the child wrote them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        debug!("Running '{}'", invocation);

        let (mut reader, writer) = io::pipe().map_err(|e| CommandError::io(invocation, e))?;

        // The command owns the parent's copies of the write end; it has to be dropped before reading or the read
        // never sees EOF.
        let mut child = {
            let stderr = writer.try_clone().map_err(|e| CommandError::io(invocation, e))?;
            let mut command = invocation.command();
            command.stdout(writer).stderr(stderr);
            command.spawn().map_err(|e| CommandError::spawn(invocation, e))?
        };

        let mut combined = Vec::new();
        let read = reader.read_to_end(&mut combined);
        let status = child.wait().map_err(|e| CommandError::io(invocation, e))?;
        read.map_err(|e| CommandError::io(invocation, e))?;

        debug!("'{}' exited with {}", invocation, status);

        Ok(CommandOutput {
            exit_code: status.code(),
            combined,
        })
    }
}

/// Errors that prevent a command from running to completion.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl CommandError {
    pub fn spawn(invocation: &Invocation, source: io::Error) -> Self {
        CommandError::Spawn {
            command: invocation.to_string(),
            source,
        }
    }

    pub fn io(invocation: &Invocation, source: io::Error) -> Self {
        CommandError::Io {
            command: invocation.to_string(),
            source,
        }
    }
}
