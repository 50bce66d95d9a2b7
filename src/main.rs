mod cli;
mod config;
mod exec;
mod parse;
mod repl;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use exec::{CommandLine, Outcome, ShellContext};

#[cfg(not(unix))]
compile_error!("minish relies on Unix process and socket semantics");

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref())?;
    let mut ctx = ShellContext::new(config);

    if let Some(input) = cli.command {
        let mut line = CommandLine::new(ctx.config.max_stages);
        let outcome = match parse::fill(&mut line, &input) {
            Ok(()) => exec::evaluate(&mut line, &mut ctx),
            Err(err) => {
                eprintln!("{} {err:#}", "minish:".red());
                std::process::exit(2);
            }
        };
        line.clear();

        let code = match outcome {
            Outcome::ValidationFailed => 2,
            _ => ctx.last_status,
        };
        std::process::exit(code);
    }

    repl::run(&mut ctx)
}
