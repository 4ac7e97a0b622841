//! Process invocation detection and the boot-step fault barrier.
//!
//! The tooling mode speaks a machine-readable protocol on stdout, so nothing
//! that happens while booting may write there or abort the process.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// Sub-command that switches the process into tooling mode.
pub const TOOLING_COMMAND: &str = "mcp";
pub const SERVE_COMMAND: &str = "serve";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationContext {
    /// Launched to serve HTTP (no sub-command, or `serve`).
    Server,
    /// Launched as a console command.
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    Normal,
    Tooling,
}

/// Resolved once at process start and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootProfile {
    pub context: InvocationContext,
    pub mode: BootMode,
}

impl BootProfile {
    /// Detect from the full argument vector, program name first.
    pub fn detect<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|a| a.as_ref().to_string())
            .collect();

        let subcommand = args.iter().find(|a| !a.starts_with('-'));
        let context = match subcommand.map(String::as_str) {
            None | Some(SERVE_COMMAND) => InvocationContext::Server,
            Some(_) => InvocationContext::Console,
        };

        Self::from_parts(context, &args)
    }

    pub fn from_parts(context: InvocationContext, args: &[String]) -> Self {
        let mode = if context == InvocationContext::Console
            && args.iter().any(|a| a == TOOLING_COMMAND)
        {
            BootMode::Tooling
        } else {
            BootMode::Normal
        };
        Self { context, mode }
    }

    pub fn is_tooling(&self) -> bool {
        self.mode == BootMode::Tooling
    }
}

#[derive(Debug, Error)]
pub enum BootError {
    #[error("boot step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// A boot step that failed while the barrier was active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootFault {
    pub step: &'static str,
    pub message: String,
    pub panicked: bool,
}

/// Runs boot steps according to the profile.
///
/// Normal mode: the first failing step aborts boot. Tooling mode: errors and
/// panics are caught, kept as [`BootFault`]s, and logged only if a tracing
/// subscriber is already installed.
#[derive(Debug)]
pub struct Bootstrap {
    profile: BootProfile,
    faults: Vec<BootFault>,
}

impl Bootstrap {
    pub fn new(profile: BootProfile) -> Self {
        Self {
            profile,
            faults: Vec::new(),
        }
    }

    pub fn profile(&self) -> &BootProfile {
        &self.profile
    }

    pub fn faults(&self) -> &[BootFault] {
        &self.faults
    }

    /// `Ok(None)` means the step failed behind the barrier and was skipped.
    pub fn step<T, F>(&mut self, step: &'static str, f: F) -> Result<Option<T>, BootError>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        if !self.profile.is_tooling() {
            return f().map(Some).map_err(|e| BootError::Step {
                step,
                source: e.into(),
            });
        }

        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => Ok(Some(value)),
            Ok(Err(err)) => {
                self.record(step, format!("{err:#}"), false);
                Ok(None)
            }
            Err(payload) => {
                self.record(step, panic_message(payload.as_ref()), true);
                Ok(None)
            }
        }
    }

    fn record(&mut self, step: &'static str, message: String, panicked: bool) {
        if tracing::dispatcher::has_been_set() {
            tracing::warn!(step, panicked, error = %message, "boot step failed; continuing in tooling mode");
        }
        self.faults.push(BootFault {
            step,
            message,
            panicked,
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_and_serve_are_server_context() {
        let p = BootProfile::detect(["facilityhub-api"]);
        assert_eq!(p.context, InvocationContext::Server);
        assert_eq!(p.mode, BootMode::Normal);

        let p = BootProfile::detect(["facilityhub-api", "serve"]);
        assert_eq!(p.context, InvocationContext::Server);
        assert!(!p.is_tooling());
    }

    #[test]
    fn tooling_token_in_console_selects_tooling() {
        let p = BootProfile::detect(["facilityhub-api", "mcp"]);
        assert_eq!(p.context, InvocationContext::Console);
        assert!(p.is_tooling());

        let p = BootProfile::detect(["facilityhub-api", "--quiet", "tools", "mcp"]);
        assert!(p.is_tooling());
    }

    #[test]
    fn tooling_token_outside_console_is_ignored() {
        let p = BootProfile::from_parts(InvocationContext::Server, &["mcp".to_string()]);
        assert_eq!(p.mode, BootMode::Normal);

        let p = BootProfile::detect(["facilityhub-api", "migrate"]);
        assert_eq!(p.context, InvocationContext::Console);
        assert_eq!(p.mode, BootMode::Normal);
    }

    #[test]
    fn normal_mode_propagates_step_errors() {
        let mut boot = Bootstrap::new(BootProfile::detect(["facilityhub-api"]));
        let err = boot
            .step("cache", || -> anyhow::Result<()> { anyhow::bail!("redis down") })
            .unwrap_err();
        assert!(err.to_string().contains("cache"));
        assert!(boot.faults().is_empty());
    }

    #[test]
    fn tooling_mode_swallows_errors_and_panics() {
        let mut boot = Bootstrap::new(BootProfile::detect(["facilityhub-api", "mcp"]));

        let failed = boot
            .step("cache", || -> anyhow::Result<u8> { anyhow::bail!("redis down") })
            .unwrap();
        assert_eq!(failed, None);

        let panicked = boot
            .step("seed", || -> anyhow::Result<u8> { panic!("seed exploded") })
            .unwrap();
        assert_eq!(panicked, None);

        let ok = boot.step("bus", || Ok(7u8)).unwrap();
        assert_eq!(ok, Some(7));

        let faults = boot.faults();
        assert_eq!(faults.len(), 2);
        assert_eq!(faults[0].step, "cache");
        assert!(!faults[0].panicked);
        assert_eq!(faults[1].message, "seed exploded");
        assert!(faults[1].panicked);
    }
}
