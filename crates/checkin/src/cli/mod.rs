//! Command-line interface for checkin.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, MenuCommand, OpenCommand, PermissionArg, ScanCommand, SendCommand,
};

use crate::logging::Verbosity;

/// checkin - Record attendance by scanning QR codes
///
/// Each scanned code is posted once to the attendance service. Failures are
/// reported, never retried automatically.
#[derive(Debug, Parser)]
#[command(name = "checkin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the attendance scanner and check in codes
    Scan(ScanCommand),

    /// Check in a single code and exit
    Send(SendCommand),

    /// List the home menu tiles
    Menu(MenuCommand),

    /// Log in, then tap a home menu tile
    Open(OpenCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Whether the command needs the layered configuration loaded first.
    ///
    /// `config path` and `config validate` only look at files, so they keep
    /// working when the active configuration is broken.
    #[must_use]
    pub fn loads_config(&self) -> bool {
        !matches!(
            self,
            Self::Config(ConfigCommand::Path | ConfigCommand::Validate { .. })
        )
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "checkin");
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["checkin", "-q", "menu"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["checkin", "menu"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Normal);

        let cli = Cli::try_parse_from(["checkin", "-v", "menu"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Verbose);

        let cli = Cli::try_parse_from(["checkin", "-vv", "menu"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_scan_with_codes() {
        let cli = Cli::try_parse_from(["checkin", "scan", "ABC123", "DEF456", "-p", "denied"])
            .unwrap();
        let Command::Scan(scan) = cli.command else {
            panic!("expected scan command");
        };
        assert_eq!(scan.codes, ["ABC123", "DEF456"]);
        assert_eq!(scan.permission, Some(PermissionArg::Denied));
    }

    #[test]
    fn test_parse_scan_without_codes() {
        let cli = Cli::try_parse_from(["checkin", "scan"]).unwrap();
        assert!(matches!(cli.command, Command::Scan(ScanCommand { ref codes, .. }) if codes.is_empty()));
    }

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from(["checkin", "send", "ABC123", "--json"]).unwrap();
        let Command::Send(send) = cli.command else {
            panic!("expected send command");
        };
        assert_eq!(send.code, "ABC123");
        assert!(send.json);
    }

    #[test]
    fn test_parse_send_requires_code() {
        assert!(Cli::try_parse_from(["checkin", "send"]).is_err());
    }

    #[test]
    fn test_parse_open() {
        let cli = Cli::try_parse_from(["checkin", "open", "Attendance"]).unwrap();
        assert!(matches!(cli.command, Command::Open(_)));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["checkin", "-c", "/custom/config.toml", "config", "path"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_config_inspection_skips_config_loading() {
        for args in [
            &["checkin", "config", "path"][..],
            &["checkin", "config", "validate"],
            &["checkin", "-c", "broken.toml", "config", "validate", "-f", "other.toml"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert!(!cli.command.loads_config(), "{args:?} loads config");
        }
    }

    #[test]
    fn test_other_commands_load_config() {
        for args in [
            &["checkin", "config", "show"][..],
            &["checkin", "scan"],
            &["checkin", "send", "ABC123"],
            &["checkin", "menu"],
            &["checkin", "open", "Home"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert!(cli.command.loads_config(), "{args:?} skips config");
        }
    }
}
