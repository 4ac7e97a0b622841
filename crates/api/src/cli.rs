use clap::{Parser, Subcommand};

use facilityhub_infra::bootstrap::BootProfile;

#[derive(Debug, Parser)]
#[command(name = "facilityhub-api", version, about = "Facility occupancy and administration API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Speak the JSON-lines tooling protocol on stdin/stdout.
    Mcp,
}

/// Parse the sub-command. In tooling mode a parse failure must not print
/// usage to stdout, so it resolves to the tooling command instead.
pub fn resolve_command(args: &[String], profile: &BootProfile) -> Command {
    match Cli::try_parse_from(args) {
        Ok(cli) => cli.command.unwrap_or(Command::Serve),
        Err(_) if profile.is_tooling() => Command::Mcp,
        Err(e) => e.exit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_serve() {
        let a = args(&["facilityhub-api"]);
        assert_eq!(resolve_command(&a, &BootProfile::detect(&a)), Command::Serve);
    }

    #[test]
    fn mcp_selects_tooling() {
        let a = args(&["facilityhub-api", "mcp"]);
        let profile = BootProfile::detect(&a);
        assert!(profile.is_tooling());
        assert_eq!(resolve_command(&a, &profile), Command::Mcp);
    }

    #[test]
    fn unparseable_tooling_invocation_still_runs_tooling() {
        let a = args(&["facilityhub-api", "inspect", "mcp"]);
        let profile = BootProfile::detect(&a);
        assert_eq!(resolve_command(&a, &profile), Command::Mcp);
    }
}
