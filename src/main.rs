use anyhow::Result;
use clap::Parser;
use folio::cli::{Cli, Commands};
use folio::commands;
use folio::commands::extract::ExtractOptions;
use folio::outline::Blocklist;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so command output stays clean; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract {
            input_file,
            output_dir,
            level,
            blocklist,
        } => {
            let options = ExtractOptions {
                output_dir,
                level,
                blocklist: Blocklist::configured(blocklist.block, !blocklist.no_default_blocklist)?,
            };
            commands::extract::run(&input_file, &options)?;
        }
        Commands::Levels { input_file } => {
            commands::levels::run(&input_file)?;
        }
        Commands::Split {
            input_file,
            start,
            end,
            output,
        } => {
            commands::split::run(&input_file, start, end, output.as_deref())?;
        }
        Commands::Merge {
            input_files,
            output,
        } => {
            commands::merge::run(&input_files, output.as_deref())?;
        }
        Commands::Mcp => {
            // The MCP transport is the only async part; everything else is synchronous.
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(folio::mcp::run_server())?;
        }
    }

    Ok(())
}
