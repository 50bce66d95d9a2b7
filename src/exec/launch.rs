use crate::exec::command::Command;
use crate::exec::context::ShellContext;
use anyhow::{Context, Result, anyhow};
use log::debug;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, ExitStatus, Stdio};

// Spawn one stage; `None` for a stream means the child inherits the
// shell's. A fd-backed `Stdio` handed in is released in the parent when
// this returns, spawn or no spawn; a lingering copy of a producer's
// write end would delay the consumer's EOF.
pub(crate) fn spawn_stage(
    command: &Command,
    stdin: Option<Stdio>,
    stdout: Option<Stdio>,
) -> Result<Child> {
    let program = command.program();
    let mut proc = std::process::Command::new(program);
    proc.args(&command.argv()[1..]);
    if let Some(stream) = stdin {
        proc.stdin(stream);
    }
    if let Some(stream) = stdout {
        proc.stdout(stream);
    }
    proc.spawn().map_err(|err| classify_spawn_error(program, &err))
}

fn classify_spawn_error(program: &str, err: &io::Error) -> anyhow::Error {
    match err.kind() {
        io::ErrorKind::NotFound => anyhow!("{program}: command not found"),
        io::ErrorKind::PermissionDenied => anyhow!("{program}: permission denied"),
        _ => anyhow!("{program}: failed to start: {err}"),
    }
}

// The code itself, or 128+signo when the child died to a signal.
pub(crate) fn status_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

/// Run one external command, foreground or background.
pub fn run_external(command: &mut Command, ctx: &mut ShellContext) -> Result<()> {
    let background = command.take_background_marker();

    let mut child = spawn_stage(command, None, None)?;
    debug!("spawned pid {} for '{}'", child.id(), command);

    if background {
        match child
            .try_wait()
            .with_context(|| format!("Failed to poll background child '{command}'"))?
        {
            Some(status) => {
                // Gone before we even looked; nothing to track.
                debug!("background child '{command}' exited immediately: {status}");
                ctx.last_status = status_code(status);
            }
            None => {
                let pid = child.id();
                let id = ctx.jobs.register(child, command.to_string());
                println!("[{id}] {pid}");
            }
        }
    } else {
        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for '{command}'"))?;
        if !status.success() {
            debug!("'{command}' finished with {status}");
        }
        ctx.last_status = status_code(status);
    }
    Ok(())
}
