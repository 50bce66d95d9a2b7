use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Local};
use log::{debug, warn};
use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, ExitStatus};

pub struct Job {
    pub id: u32,
    pub pid: u32,
    pub command: String,
    pub started: DateTime<Local>,
    child: Child,
}

impl Job {
    // Blocking; the fg path.
    pub fn wait(mut self) -> Result<ExitStatus> {
        self.child
            .wait()
            .with_context(|| format!("Failed to wait for job [{}] (pid {})", self.id, self.pid))
    }
}

pub struct FinishedJob {
    pub id: u32,
    pub command: String,
    pub status: ExitStatus,
}

impl fmt::Display for FinishedJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status.code() {
            Some(0) => write!(f, "[{}]  Done\t{}", self.id, self.command),
            Some(code) => write!(f, "[{}]  Exit {}\t{}", self.id, code, self.command),
            None => {
                let signal = self.status.signal().unwrap_or(0);
                write!(
                    f,
                    "[{}]  Terminated (signal {})\t{}",
                    self.id, signal, self.command
                )
            }
        }
    }
}

// Background children land here after the launcher's immediate check;
// the read loop sweeps the table before every prompt so finished jobs
// never linger as zombies.
#[derive(Default)]
pub struct JobTable {
    next_id: u32,
    jobs: Vec<Job>,
}

impl JobTable {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            jobs: Vec::new(),
        }
    }

    pub fn register(&mut self, child: Child, command: String) -> u32 {
        // Job numbering restarts once the table drains, like an
        // interactive shell's.
        if self.jobs.is_empty() {
            self.next_id = 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        let pid = child.id();
        debug!("registered background job [{id}] pid {pid}: {command}");
        self.jobs.push(Job {
            id,
            pid,
            command,
            started: Local::now(),
            child,
        });
        id
    }

    // Non-blocking sweep: finished children leave the table and come
    // back for announcement.
    pub fn reap_finished(&mut self) -> Vec<FinishedJob> {
        let mut finished = Vec::new();
        self.jobs.retain_mut(|job| match job.child.try_wait() {
            Ok(Some(status)) => {
                debug!("job [{}] pid {} finished: {}", job.id, job.pid, status);
                finished.push(FinishedJob {
                    id: job.id,
                    command: job.command.clone(),
                    status,
                });
                false
            }
            Ok(None) => true,
            Err(err) => {
                // Keep the entry; a failed poll is not proof of death.
                warn!("polling job [{}] pid {} failed: {err}", job.id, job.pid);
                true
            }
        });
        finished
    }

    // The caller takes the job to wait on it in the foreground. `None`
    // picks the most recently started one.
    pub fn remove(&mut self, id: Option<u32>) -> Result<Job> {
        let pos = match id {
            Some(id) => self
                .jobs
                .iter()
                .position(|j| j.id == id)
                .ok_or_else(|| anyhow!("no such job: {id}"))?,
            None => {
                if self.jobs.is_empty() {
                    bail!("no current job");
                }
                self.jobs.len() - 1
            }
        };
        Ok(self.jobs.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
