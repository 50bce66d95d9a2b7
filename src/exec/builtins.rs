// Built-in commands
use crate::exec::context::ShellContext;
use crate::exec::launch::status_code;
use crate::exec::registry::{BuiltIn, Registry};
use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::Path;

pub fn standard_registry() -> Registry {
    Registry::new(vec![
        Box::new(Cd),
        Box::new(Pwd),
        Box::new(Fg),
        Box::new(Jobs),
    ])
}

// A job reference is a plain number or `%N`.
fn parse_job_id(token: &str) -> Option<u32> {
    token.strip_prefix('%').unwrap_or(token).parse().ok()
}

pub struct Cd;

impl BuiltIn for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn validate(&self, argv: &[String]) -> bool {
        // At most one target directory
        argv.len() <= 2
    }

    fn run(&self, argv: &[String], _ctx: &mut ShellContext) -> Result<i32> {
        let target = match argv.get(1) {
            Some(dir) => dir.clone(),
            None => env::var("HOME").context("cd: HOME is not set")?,
        };
        env::set_current_dir(Path::new(&target)).with_context(|| format!("cd: {target}"))?;
        Ok(0)
    }
}

pub struct Pwd;

impl BuiltIn for Pwd {
    fn name(&self) -> &str {
        "pwd"
    }

    fn validate(&self, argv: &[String]) -> bool {
        argv.len() == 1
    }

    fn run(&self, _argv: &[String], _ctx: &mut ShellContext) -> Result<i32> {
        let cwd = env::current_dir().context("pwd: cannot resolve current directory")?;
        println!("{}", cwd.display());
        Ok(0)
    }
}

pub struct Fg;

impl BuiltIn for Fg {
    fn name(&self) -> &str {
        "fg"
    }

    fn validate(&self, argv: &[String]) -> bool {
        match argv.len() {
            1 => true,
            2 => parse_job_id(&argv[1]).is_some(),
            _ => false,
        }
    }

    fn run(&self, argv: &[String], ctx: &mut ShellContext) -> Result<i32> {
        let id = argv.get(1).and_then(|token| parse_job_id(token));
        let job = ctx.jobs.remove(id).map_err(|err| anyhow!("fg: {err}"))?;
        // Echo the command being brought forward, like an interactive
        // shell does, then block on that specific child.
        println!("{}", job.command);
        let status = job.wait()?;
        Ok(status_code(status))
    }
}

pub struct Jobs;

impl BuiltIn for Jobs {
    fn name(&self) -> &str {
        "jobs"
    }

    fn validate(&self, argv: &[String]) -> bool {
        argv.len() == 1
    }

    fn run(&self, _argv: &[String], ctx: &mut ShellContext) -> Result<i32> {
        // Sweep first so anything that finished since the last prompt is
        // shown as done instead of running.
        for finished in ctx.jobs.reap_finished() {
            println!("{finished}");
        }
        for job in ctx.jobs.iter() {
            println!(
                "[{}]  {}  Running since {}\t{}",
                job.id,
                job.pid,
                job.started.format("%H:%M:%S"),
                job.command
            );
        }
        Ok(0)
    }
}
