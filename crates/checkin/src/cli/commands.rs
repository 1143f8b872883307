//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::PermissionMode;

/// Scan command arguments.
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Codes to check in; read one per line from stdin when omitted
    pub codes: Vec<String>,

    /// Override the configured camera permission policy
    #[arg(short, long, value_enum)]
    pub permission: Option<PermissionArg>,

    /// Print one JSON object per result
    #[arg(short, long)]
    pub json: bool,
}

/// Send command arguments.
#[derive(Debug, Args)]
pub struct SendCommand {
    /// The code to check in
    pub code: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Menu command arguments.
#[derive(Debug, Args)]
pub struct MenuCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Open command arguments.
#[derive(Debug, Args)]
pub struct OpenCommand {
    /// Menu tile label or destination name
    pub destination: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate (defaults to --config, then
        /// the default location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Camera permission policy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PermissionArg {
    /// Always grant camera access
    Granted,
    /// Always deny camera access
    Denied,
    /// Grant when the configured camera device can be opened
    Device,
}

impl From<PermissionArg> for PermissionMode {
    fn from(arg: PermissionArg) -> Self {
        match arg {
            PermissionArg::Granted => Self::Granted,
            PermissionArg::Denied => Self::Denied,
            PermissionArg::Device => Self::Device,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_arg_conversion() {
        assert_eq!(
            PermissionMode::from(PermissionArg::Granted),
            PermissionMode::Granted
        );
        assert_eq!(
            PermissionMode::from(PermissionArg::Denied),
            PermissionMode::Denied
        );
        assert_eq!(
            PermissionMode::from(PermissionArg::Device),
            PermissionMode::Device
        );
    }

    #[test]
    fn test_scan_command_debug() {
        let cmd = ScanCommand {
            codes: vec!["ABC123".to_string()],
            permission: None,
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("ABC123"));
    }
}
