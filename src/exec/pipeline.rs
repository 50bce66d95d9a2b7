use crate::exec::command::Command;
use crate::exec::context::ShellContext;
use crate::exec::launch::{spawn_stage, status_code};
use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::os::fd::OwnedFd;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{fs, process, thread};

static PIPE_SEQ: AtomicU64 = AtomicU64::new(0);

// A bound, listening socket at a path unique to one pipeline invocation.
// Binding marks the endpoint listening, so no connect can be attempted
// against an endpoint that is not ready. The file goes away on drop.
struct Rendezvous {
    path: PathBuf,
    listener: UnixListener,
}

impl Rendezvous {
    fn bind(dir: &Path) -> Result<Rendezvous> {
        let seq = PIPE_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!("minish-{}.{seq}.sock", process::id()));
        let listener = UnixListener::bind(&path)
            .with_context(|| format!("Failed to bind rendezvous socket {}", path.display()))?;
        Ok(Rendezvous { path, listener })
    }

    // Hands back the connecting side's stream first, then the accepted
    // one.
    fn connect_pair(&self) -> Result<(UnixStream, UnixStream)> {
        let path = self.path.clone();
        let connector = thread::spawn(move || UnixStream::connect(path));
        let (accepted, _) = self
            .listener
            .accept()
            .with_context(|| format!("Failed to accept on {}", self.path.display()))?;
        let connected = connector
            .join()
            .map_err(|_| anyhow!("rendezvous connector thread panicked"))?
            .with_context(|| format!("Failed to connect to {}", self.path.display()))?;
        Ok((connected, accepted))
    }
}

impl Drop for Rendezvous {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(
                "could not remove rendezvous socket {}: {err}",
                self.path.display()
            );
        }
    }
}

/// Run `producer | consumer`.
pub fn run(producer: &Command, consumer: &Command, ctx: &mut ShellContext) -> Result<()> {
    let rendezvous = Rendezvous::bind(&ctx.config.rendezvous_dir())?;
    let (producer_end, consumer_end) = rendezvous.connect_pair()?;
    debug!(
        "pipeline '{producer} | {consumer}' via {}",
        rendezvous.path.display()
    );

    let mut first = spawn_stage(producer, None, Some(Stdio::from(OwnedFd::from(producer_end))))?;

    let mut second = match spawn_stage(
        consumer,
        Some(Stdio::from(OwnedFd::from(consumer_end))),
        None,
    ) {
        Ok(child) => child,
        Err(err) => {
            // The consumer's end of the channel closed with the failed
            // spawn, so the producer hits a broken pipe and can finish.
            // Collect it before reporting.
            first
                .wait()
                .with_context(|| format!("Failed to wait for '{producer}'"))?;
            return Err(err);
        }
    };

    let first_status = first
        .wait()
        .with_context(|| format!("Failed to wait for '{producer}'"))?;
    let second_status = second
        .wait()
        .with_context(|| format!("Failed to wait for '{consumer}'"))?;
    debug!("pipeline finished: '{producer}' {first_status}, '{consumer}' {second_status}");

    // The line's status is the last stage's.
    ctx.last_status = status_code(second_status);
    Ok(())
}
