//! CLI argument parsing with clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roslist")]
#[command(author, version, about = "RouterOS country address-list generator")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "roslist.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch delegation data and write the address-list scripts
    Generate {
        /// Address family to generate
        #[arg(long, value_enum, default_value = "all")]
        family: FamilyArg,

        /// Print the scripts to stdout instead of writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    Ipv4,
    Ipv6,
    All,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_version_command() {
        let cli = Cli::try_parse_from(["roslist", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_generate_defaults() {
        let cli = Cli::try_parse_from(["roslist", "generate"]).unwrap();
        match cli.command {
            Commands::Generate { family, dry_run } => {
                assert_eq!(family, FamilyArg::All);
                assert!(!dry_run);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_generate_family() {
        let cli = Cli::try_parse_from(["roslist", "generate", "--family", "ipv6"]).unwrap();
        match cli.command {
            Commands::Generate { family, .. } => assert_eq!(family, FamilyArg::Ipv6),
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_generate_dry_run() {
        let cli = Cli::try_parse_from(["roslist", "generate", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Generate { dry_run, .. } => assert!(dry_run),
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_init_config_force() {
        let cli = Cli::try_parse_from(["roslist", "init-config", "--force"]).unwrap();
        match cli.command {
            Commands::InitConfig { force } => assert!(force),
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "roslist",
            "-q",
            "-v",
            "--config",
            "/custom/path.yaml",
            "generate",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert!(cli.verbose);
        assert_eq!(cli.config.to_str().unwrap(), "/custom/path.yaml");
    }
}
