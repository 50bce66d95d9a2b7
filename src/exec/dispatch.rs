use crate::exec::command::CommandLine;
use crate::exec::context::ShellContext;
use crate::exec::{launch, pipeline};
use anyhow::Result;
use colored::Colorize;
use log::{debug, warn};

// Checked before the registry, so a built-in of the same name can never
// shadow it.
const EXIT_KEYWORD: &str = "exit";

/// What the caller should do after one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The line ran (or its failure was reported); keep reading.
    Continue,
    /// The user asked the shell to exit.
    ExitShell,
    /// A built-in rejected its arguments before anything ran.
    ValidationFailed,
}

/// Evaluate one command line; failures are reported, never returned.
pub fn evaluate(line: &mut CommandLine, ctx: &mut ShellContext) -> Outcome {
    match try_evaluate(line, ctx) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("{} {err:#}", "minish:".red());
            ctx.last_status = 1;
            Outcome::Continue
        }
    }
}

pub(crate) fn extra_stages_notice(ignored: usize) -> String {
    format!("pipelines use the first two stages only; {ignored} stage(s) ignored")
}

fn try_evaluate(line: &mut CommandLine, ctx: &mut ShellContext) -> Result<Outcome> {
    if line.is_empty() {
        return Ok(Outcome::Continue);
    }
    match line.stage_count() {
        1 => run_single(line, ctx),
        n => {
            if n > 2 {
                let notice = extra_stages_notice(n - 2);
                eprintln!("{} {notice}", "minish:".yellow());
                warn!("{notice}");
            }
            let stages = line.stages();
            pipeline::run(&stages[0], &stages[1], ctx)?;
            Ok(Outcome::Continue)
        }
    }
}

// Built-ins are looked up first, everything else goes to the launcher.
// An empty program name is a no-op.
fn run_single(line: &mut CommandLine, ctx: &mut ShellContext) -> Result<Outcome> {
    let command = &mut line.stages_mut()[0];
    let name = command.program().to_string();

    if name.is_empty() {
        return Ok(Outcome::Continue);
    }
    if name == EXIT_KEYWORD {
        debug!("exit requested");
        return Ok(Outcome::ExitShell);
    }

    let registry = ctx.registry.clone();
    if let Some(builtin) = registry.lookup(&name) {
        if !builtin.validate(command.argv()) {
            eprintln!("{} {name}: invalid arguments", "minish:".red());
            return Ok(Outcome::ValidationFailed);
        }
        debug!("running built-in '{name}'");
        let status = builtin.run(command.argv(), ctx)?;
        if status != 0 {
            eprintln!("{} {name}: exited with status {status}", "minish:".red());
        }
        ctx.last_status = status;
        return Ok(Outcome::Continue);
    }

    launch::run_external(command, ctx)?;
    Ok(Outcome::Continue)
}
