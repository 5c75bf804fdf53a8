//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use modelguard_schemas::FailureMode;
use std::path::PathBuf;

/// Modelguard CLI - validate documents against declarative models
///
/// Checks JSON and YAML values against models describing their types,
/// bounds, patterns and nested structure.
#[derive(Parser, Debug)]
#[command(
    name = "modelguard",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "MODELGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a value file against a model file
    Check(CheckArgs),

    /// List the registered rule types
    Types,

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the value to validate (JSON or YAML)
    #[arg(value_name = "VALUE_FILE")]
    pub value_file: PathBuf,

    /// Path to the model describing the value (JSON or YAML)
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// How failures are reported (defaults to the configured mode)
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Validate each element of a top-level array separately
    #[arg(long)]
    pub each: bool,

    /// Stop at the first failing element (with --each)
    #[arg(long, requires = "each")]
    pub fail_fast: bool,

    /// Maximum number of failures to collect (with --each, 0 = unlimited)
    #[arg(long, requires = "each", value_name = "N")]
    pub max_errors: Option<usize>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize a default configuration file
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),

    /// Print the configuration file locations that are searched
    Path,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Write to this path instead of the user config directory
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Failure reporting mode
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Report the first violation as an error
    Raise,
    /// Report a pass/fail flag
    Bool,
    /// Skip validation
    Off,
    /// Log violations as warnings and succeed
    Warn,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<Mode> for FailureMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Raise => FailureMode::Raise,
            Mode::Bool => FailureMode::Bool,
            Mode::Off => FailureMode::Off,
            Mode::Warn => FailureMode::Warn,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::Types,
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_check_args() {
        let cli = Cli::parse_from([
            "modelguard", "check", "users.json", "--model", "user.yaml", "--mode", "bool", "--each", "--max-errors", "3",
        ]);
        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.value_file, PathBuf::from("users.json"));
        assert_eq!(args.model, PathBuf::from("user.yaml"));
        assert_eq!(args.mode, Some(Mode::Bool));
        assert!(args.each);
        assert_eq!(args.max_errors, Some(3));
    }

    #[test]
    fn test_fail_fast_requires_each() {
        let result = Cli::try_parse_from(["modelguard", "check", "v.json", "-m", "m.json", "--fail-fast"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mode_conversion() {
        assert_eq!(FailureMode::from(Mode::Warn), FailureMode::Warn);
        assert_eq!(FailureMode::from(Mode::Off), FailureMode::Off);
    }
}
