//! CLI command definitions using Clap.
//!
//! - `simulate` - Animate a reordered in-memory grid and print the frames
//! - `schema` - Print the JSON Schema of the option file
//! - `completions` - Generate shell completions

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config;
use crate::error::GridResult;

pub mod simulate;

pub use simulate::SimulateArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// gridflip CLI - inspect FLIP layout animations from the terminal.
#[derive(Parser, Debug)]
#[command(name = "gridflip")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a grid options file.
    ///
    /// Supports JSONC format (JSON with comments). Defaults are used when
    /// omitted.
    #[arg(long, short, global = true, value_name = "PATH", env = "GRIDFLIP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Animate a reordered grid and print every frame.
    ///
    /// Builds an in-memory grid, reverses its item order and runs the frame
    /// loop until every animation settled.
    #[command(after_long_help = r#"Examples:
  gridflip simulate                         # 6 items, 3 columns, 60 fps
  gridflip simulate --items 9 --fps 30      # Coarser frames
  gridflip simulate -c grid.jsonc --json    # Custom options, JSON output"#)]
    Simulate(SimulateArgs),

    /// Output the grid options JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(gridflip completions --shell zsh)"
    ///   gridflip completions --shell fish > ~/.config/fish/completions/gridflip.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the option file cannot be loaded or the
    /// simulation fails.
    pub fn execute(&self) -> GridResult<()> {
        match &self.command {
            Commands::Simulate(args) => {
                let options = match &self.config {
                    Some(path) => config::load_options_from_path(path)?,
                    None => config::GridOptions::default(),
                };
                simulate::execute(args, options)
            }

            Commands::Schema => {
                println!("{}", config::generate_schema_json());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "gridflip", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["gridflip", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["gridflip", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_parses_simulate_defaults() {
        let cli = Cli::try_parse_from(["gridflip", "simulate"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.items, 6);
                assert_eq!(args.columns, 3);
                assert_eq!(args.fps, 60);
                assert!(!args.json);
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_parses_simulate_flags() {
        let cli = Cli::try_parse_from([
            "gridflip", "simulate", "--items", "12", "--columns", "4", "--fps", "30", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.items, 12);
                assert_eq!(args.columns, 4);
                assert_eq!(args.fps, 30);
                assert!(args.json);
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_fps() {
        assert!(Cli::try_parse_from(["gridflip", "simulate", "--fps", "0"]).is_err());
    }

    #[test]
    fn test_cli_parses_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["gridflip", "simulate", "--config", "grid.jsonc"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("grid.jsonc")));
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let cli =
            Cli::try_parse_from(["gridflip", "-c", "/nonexistent/grid.jsonc", "simulate"]).unwrap();
        assert!(matches!(cli.execute(), Err(GridError::Config(_))));
    }

    #[test]
    fn test_app_version_is_not_empty() {
        assert!(!APP_VERSION.is_empty());
    }
}
