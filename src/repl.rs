use crate::exec::{CommandLine, Outcome, ShellContext, evaluate};
use crate::parse;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The read-eval loop; returns when the user types `exit` or closes
/// standard input.
pub fn run(ctx: &mut ShellContext) -> Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        // Ctrl-C goes to the whole foreground process group: a running
        // child dies to it, the shell itself just prompts again.
        let flag = interrupted.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("Failed to install SIGINT handler")?;
    }

    let stdin = io::stdin();
    let mut line = CommandLine::new(ctx.config.max_stages);
    let mut input = String::new();

    loop {
        announce_finished(ctx);
        if interrupted.swap(false, Ordering::SeqCst) {
            println!();
        }

        print!("{}", ctx.config.prompt.green().bold());
        io::stdout().flush().context("Failed to flush prompt")?;

        input.clear();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            // EOF (ctrl-D): leave like `exit` does.
            println!();
            break;
        }

        let outcome = match parse::fill(&mut line, &input) {
            Ok(()) => evaluate(&mut line, ctx),
            Err(err) => {
                eprintln!("{} {err:#}", "minish:".red());
                ctx.last_status = 1;
                Outcome::Continue
            }
        };
        // The line is reclaimed after every evaluation, even a failed
        // parse that filled it partially.
        line.clear();

        if outcome == Outcome::ExitShell {
            break;
        }
    }

    // One more sweep so jobs that finished during the last command read
    // as done, not as still running.
    announce_finished(ctx);
    if !ctx.jobs.is_empty() {
        eprintln!(
            "{} exiting with {} background job(s) still running",
            "minish:".yellow(),
            ctx.jobs.len()
        );
    }
    Ok(())
}

pub(crate) fn announce_finished(ctx: &mut ShellContext) {
    for job in ctx.jobs.reap_finished() {
        println!("{job}");
    }
}
