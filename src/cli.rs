use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Launch a local Dgraph instance to store CloudGraph data
#[derive(Parser, Debug)]
#[command(name = "cglaunch")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data root override (the engine's data lives in `<data-dir>/dgraph`)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Launch an instance of Dgraph to store data
    Launch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_launch_with_global_flags() {
        let cli = Cli::try_parse_from(["cglaunch", "launch", "-vv", "--data-dir", "/srv/cg"]).unwrap();
        assert_eq!(cli.command, Commands::Launch);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/cg")));
        assert!(cli.config.is_none());
    }

    #[test]
    fn launch_takes_no_arguments() {
        assert!(Cli::try_parse_from(["cglaunch", "launch", "extra"]).is_err());
    }
}
