use clap::{Parser, Subcommand};

mod cmd;
mod core;

use cmd::process::ProcessCommand;
use cmd::schema::SchemaCommand;

#[derive(Parser, Debug)]
#[command(
    name = "capgains",
    version,
    about = "Calculate capital gains tax on buy/sell trade operations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute taxes for operation batches, one JSON array per input line
    Process(ProcessCommand),
    /// Print the JSON Schema for a line of input
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Process(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
