mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::{run_check, run_compare_names, run_resolve_alias, run_segment};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Segment(args) => {
            run_segment(args)?;
        }
        Commands::CompareNames(args) => {
            run_compare_names(args)?;
        }
        Commands::Check(args) => {
            let stats = run_check(args)?;
            if stats.failed > 0 {
                std::process::exit(1);
            }
        }
        Commands::ResolveAlias(args) => {
            run_resolve_alias(args)?;
        }
    }

    Ok(())
}
