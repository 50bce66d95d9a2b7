use crate::exec::{Command, CommandLine};
use anyhow::{Context, Result, bail};

// `|` separates stages wherever it appears, even inside quotes; within
// a stage, words follow shell splitting rules (quotes and backslash
// escapes). Blank input fills nothing and is not an error.
pub fn fill(line: &mut CommandLine, input: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Ok(());
    }
    for segment in input.split('|') {
        let argv = shell_words::split(segment).context("Failed to parse command line")?;
        if argv.is_empty() {
            bail!("syntax error: empty pipeline stage");
        }
        line.push(Command::new(argv))?;
    }
    Ok(())
}
