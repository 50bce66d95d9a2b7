use anyhow::{Result, bail};
use std::fmt;

// Trailing token that requests background execution.
pub const BACKGROUND_MARKER: &str = "&";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    argv: Vec<String>,
}

impl Command {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    // `argv[0]`, or "" for an empty vector.
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("")
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    // The marker only counts when something precedes it; a lone `&`
    // stays put and fails lookup like any other unknown program name.
    pub fn take_background_marker(&mut self) -> bool {
        if self.argv.len() >= 2 && self.argv.last().map(String::as_str) == Some(BACKGROUND_MARKER) {
            self.argv.pop();
            true
        } else {
            false
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

// The read loop keeps one of these alive across iterations: the parser
// fills it, the dispatcher consumes it, `clear` reclaims it before the
// next line.
#[derive(Debug)]
pub struct CommandLine {
    stages: Vec<Command>,
    max_stages: usize,
}

impl CommandLine {
    pub fn new(max_stages: usize) -> Self {
        Self {
            stages: Vec::new(),
            max_stages,
        }
    }

    pub fn push(&mut self, command: Command) -> Result<()> {
        if self.stages.len() >= self.max_stages {
            bail!("pipeline too deep (limit is {} stages)", self.max_stages);
        }
        self.stages.push(command);
        Ok(())
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[Command] {
        &self.stages
    }

    pub fn stages_mut(&mut self) -> &mut [Command] {
        &mut self.stages
    }

    // Idempotent; the emptied line is immediately reusable.
    pub fn clear(&mut self) {
        self.stages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(args: &[&str]) -> Command {
        Command::new(args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_background_marker_stripped_once() {
        let mut c = cmd(&["sleep", "1", "&"]);
        assert!(c.take_background_marker());
        assert_eq!(c.argv(), ["sleep", "1"]);
        // Second call sees no marker
        assert!(!c.take_background_marker());
        assert_eq!(c.argv().len(), 2);
    }

    #[test]
    fn test_lone_ampersand_is_not_a_marker() {
        let mut c = cmd(&["&"]);
        assert!(!c.take_background_marker());
        assert_eq!(c.argv(), ["&"]);
    }

    #[test]
    fn test_marker_only_at_final_position() {
        let mut c = cmd(&["echo", "&", "x"]);
        assert!(!c.take_background_marker());
        assert_eq!(c.argv().len(), 3);
    }

    #[test]
    fn test_push_enforces_stage_bound() {
        let mut line = CommandLine::new(2);
        line.push(cmd(&["a"])).unwrap();
        line.push(cmd(&["b"])).unwrap();
        assert!(line.push(cmd(&["c"])).is_err());
        assert_eq!(line.stage_count(), 2);
    }

    #[test]
    fn test_clear_leaves_reusable_empty_line() {
        let mut line = CommandLine::new(4);
        line.push(cmd(&["echo", "hi"])).unwrap();
        line.push(cmd(&["wc"])).unwrap();
        line.clear();
        assert!(line.is_empty());
        // Clearing an empty line is a no-op
        line.clear();
        assert!(line.is_empty());
        // Still usable afterwards
        line.push(cmd(&["pwd"])).unwrap();
        assert_eq!(line.stage_count(), 1);
    }

    #[test]
    fn test_program_of_empty_command() {
        let c = Command::new(Vec::new());
        assert_eq!(c.program(), "");
    }
}
