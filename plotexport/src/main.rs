mod commands;
mod handlers;
mod manifest;
mod output;

use clap::Parser;
use commands::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if let Err(err) = handlers::handle_command(cli.command) {
        output::print_error(&err.to_string());
        std::process::exit(1);
    }
    Ok(())
}
