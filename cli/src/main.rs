mod commands;
mod terminal;

use std::time::Duration;

use commands::{CommandLine, Commands, discover, interfaces, resolve, watch};
use ifcib_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = Config {
        output_dir: commands.output_dir,
        watch_debounce: Duration::from_millis(commands.debounce_ms),
        quiet: commands.quiet,
    };

    match commands.command {
        Commands::Discover => {
            print::header("discovering interfaces", cfg.quiet);
            discover::discover(&cfg)
        }
        Commands::Watch => {
            print::header("watching link changes", cfg.quiet);
            watch::watch(&cfg).await
        }
        Commands::Resolve { destination } => resolve::resolve(&destination, &cfg),
        Commands::Interfaces => {
            print::header("local interfaces", cfg.quiet);
            interfaces::interfaces()
        }
    }
}
