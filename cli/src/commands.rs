pub mod discover;
pub mod interfaces;
pub mod resolve;
pub mod watch;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ifcib")]
#[command(about = "Describes local network interfaces as CIB nodes.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory the .cib files are written to
    #[arg(short, long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Only print the summary line
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet period in milliseconds before rediscovering after a link change
    #[arg(long, global = true, default_value_t = 250)]
    pub debounce_ms: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one CIB node per local interface and exit
    #[command(alias = "d")]
    Discover,
    /// Keep the CIB nodes current by following kernel link changes
    #[command(alias = "w")]
    Watch,
    /// Show which local address reaches a destination
    #[command(alias = "r")]
    Resolve { destination: String },
    /// List interfaces and their addresses
    #[command(alias = "i")]
    Interfaces,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = CommandLine::try_parse_from(["ifcib", "watch", "-o", "/tmp/cib", "-vv", "--debounce-ms", "10"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch));
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/cib"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.debounce_ms, 10);
    }

    #[test]
    fn resolve_takes_destination() {
        let cli = CommandLine::try_parse_from(["ifcib", "r", "8.8.8.8"]).unwrap();
        assert!(matches!(cli.command, Commands::Resolve { ref destination } if destination == "8.8.8.8"));
        assert!(!cli.quiet);
    }
}
