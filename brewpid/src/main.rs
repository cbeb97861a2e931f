mod commands;
mod handlers;
mod output;

use clap::Parser;
use commands::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    handlers::handle_command(cli)
}
