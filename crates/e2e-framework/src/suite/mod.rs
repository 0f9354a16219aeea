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

//! A minimal suite runner with global setup and teardown hooks.
//!
//! `cargo test` has no notion of suite-wide setup, so end-to-end binaries are built with `harness = false` and drive
//! a [`Suite`] from `main`:
//!
//! ```no_run
//! # use remote_secret_e2e_framework::suite::{Spec, Suite, SuiteConfig, SuiteHooks};
//! # struct Hooks;
//! # impl SuiteHooks for Hooks {
//! #     fn before_suite(&mut self) -> anyhow::Result<()> { Ok(()) }
//! #     fn after_suite(&mut self, _run_failed: bool) -> anyhow::Result<()> { Ok(()) }
//! # }
//! fn main() -> std::process::ExitCode {
//!     let report = Suite::new(SuiteConfig::builder().name("example").build())
//!         .spec(Spec::new("cluster answers", || Ok(())).label("smoke"))
//!         .run(&mut Hooks);
//!     report.exit_code()
//! }
//! ```


use crate::config::{ConfigError, non_blank, parse_flag};
use bon::Builder;
use log::{error, info, warn};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;
use std::time::{Duration, Instant};

pub const LABEL_FILTER_ENV: &str = "E2E_LABEL_FILTER";
pub const FAIL_FAST_ENV: &str = "E2E_FAIL_FAST";

type SpecBody = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// A named, labelled test case.
pub struct Spec {
    name: String,
    labels: Vec<String>,
    body: SpecBody,
}

impl Spec {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        Self {
            name: name.into(),
            labels: Vec::new(),
            body: Box::new(body),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("name", &self.name)
            .field("labels", &self.labels)
            .field("body", &"<fn>")
            .finish()
    }
}

/// Run-wide settings.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct SuiteConfig {
    #[builder(into)]
    pub name: String,
    /// Only specs carrying at least one of these labels run. Empty runs everything.
    #[builder(default)]
    pub label_filter: Vec<String>,
    /// Skip the remaining specs after the first failure
    #[builder(default)]
    pub fail_fast: bool,
}

impl SuiteConfig {
    pub fn from_env(name: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(name, |key| std::env::var(key).ok())
    }

    /// Reads `E2E_LABEL_FILTER` (comma-separated) and `E2E_FAIL_FAST` through `lookup`.
    pub fn from_lookup<F>(name: impl Into<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let label_filter: Vec<String> = non_blank(LABEL_FILTER_ENV, lookup(LABEL_FILTER_ENV))?
            .map(|filter| {
                filter
                    .split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let fail_fast = match lookup(FAIL_FAST_ENV) {
            Some(value) => parse_flag(FAIL_FAST_ENV, &value)?,
            None => false,
        };

        Ok(Self::builder()
            .name(name)
            .label_filter(label_filter)
            .fail_fast(fail_fast)
            .build())
    }

    fn selects(&self, spec: &Spec) -> bool {
        self.label_filter.is_empty() || spec.labels.iter().any(|label| self.label_filter.contains(label))
    }
}

/// Global setup and teardown of a suite run.
pub trait SuiteHooks {
    /// Runs once before any spec. A failure skips every spec and fails the run.
    fn before_suite(&mut self) -> anyhow::Result<()>;

    /// Runs once after all specs, including when `before_suite` failed.
    ///
    /// # Arguments
    /// * `run_failed` - Whether the run has failed up to this point
    fn after_suite(&mut self, run_failed: bool) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    FilteredOut,
    BeforeSuiteFailed,
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecOutcome {
    Passed,
    Failed(String),
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct SpecResult {
    pub name: String,
    pub outcome: SpecOutcome,
    pub duration: Duration,
}

/// Outcome of a suite run.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub name: String,
    pub before_suite_error: Option<String>,
    pub after_suite_error: Option<String>,
    pub results: Vec<SpecResult>,
}

impl SuiteReport {
    pub fn failed(&self) -> bool {
        self.before_suite_error.is_some() || self.after_suite_error.is_some() || self.failed_count() > 0
    }

    pub fn passed_count(&self) -> usize {
        self.count(|o| matches!(o, SpecOutcome::Passed))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, SpecOutcome::Failed(_)))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, SpecOutcome::Skipped(_)))
    }

    pub fn outcome(&self, spec_name: &str) -> Option<&SpecOutcome> {
        self.results.iter().find(|r| r.name == spec_name).map(|r| &r.outcome)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failed() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
    }

    fn count(&self, predicate: impl Fn(&SpecOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Suite '{}': {} passed, {} failed, {} skipped",
            self.name,
            self.passed_count(),
            self.failed_count(),
            self.skipped_count()
        )?;
        if let Some(e) = &self.before_suite_error {
            writeln!(f, "  [BeforeSuite] FAILED: {}", e)?;
        }
        for result in &self.results {
            if let SpecOutcome::Failed(reason) = &result.outcome {
                writeln!(f, "  [{}] FAILED: {}", result.name, reason)?;
            }
        }
        if let Some(e) = &self.after_suite_error {
            writeln!(f, "  [AfterSuite] FAILED: {}", e)?;
        }
        Ok(())
    }
}

/// An ordered collection of specs run between a pair of suite hooks.
#[derive(Debug)]
pub struct Suite {
    config: SuiteConfig,
    specs: Vec<Spec>,
}

impl Suite {
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            specs: Vec::new(),
        }
    }

    pub fn spec(mut self, spec: Spec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn run<H: SuiteHooks + ?Sized>(self, hooks: &mut H) -> SuiteReport {
        let Suite { config, specs } = self;
        info!("Running suite '{}' with {} specs", config.name, specs.len());

        let before_suite_error = guarded(|| hooks.before_suite()).err();
        if let Some(e) = &before_suite_error {
            error!("BeforeSuite failed: {}", e);
        }

        let mut results = Vec::with_capacity(specs.len());
        let mut run_failed = before_suite_error.is_some();
        for spec in specs {
            let skip = if before_suite_error.is_some() {
                Some(SkipReason::BeforeSuiteFailed)
            } else if !config.selects(&spec) {
                Some(SkipReason::FilteredOut)
            } else if config.fail_fast && run_failed {
                Some(SkipReason::FailFast)
            } else {
                None
            };

            if let Some(reason) = skip {
                results.push(SpecResult {
                    name: spec.name,
                    outcome: SpecOutcome::Skipped(reason),
                    duration: Duration::ZERO,
                });
                continue;
            }

            info!("Running spec '{}'", spec.name);
            let start = Instant::now();
            let outcome = match guarded(spec.body) {
                Ok(()) => SpecOutcome::Passed,
                Err(reason) => {
                    warn!("Spec '{}' failed: {}", spec.name, reason);
                    run_failed = true;
                    SpecOutcome::Failed(reason)
                }
            };
            results.push(SpecResult {
                name: spec.name,
                outcome,
                duration: start.elapsed(),
            });
        }

        let after_suite_error = guarded(|| hooks.after_suite(run_failed)).err();
        if let Some(e) = &after_suite_error {
            error!("AfterSuite failed: {}", e);
        }

        let report = SuiteReport {
            name: config.name,
            before_suite_error,
            after_suite_error,
            results,
        };
        info!("{}", report);
        report
    }
}

/// Runs `body`, turning both errors and panics into a failure message.
fn guarded<F>(body: F) -> Result<(), String>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("{:#}", e)),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
