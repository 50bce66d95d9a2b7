use crate::exec::context::ShellContext;
use anyhow::Result;

// `validate` is always consulted first; `run` is never called for an
// argument vector that failed validation.
pub trait BuiltIn: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, argv: &[String]) -> bool;

    fn run(&self, argv: &[String], ctx: &mut ShellContext) -> Result<i32>;
}

// Lookup is a case-sensitive linear scan in registration order. The set
// is closed after construction; there is no way to add an entry later.
pub struct Registry {
    entries: Vec<Box<dyn BuiltIn>>,
}

impl Registry {
    pub fn new(entries: Vec<Box<dyn BuiltIn>>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn BuiltIn> {
        self.entries
            .iter()
            .find(|b| b.name() == name)
            .map(Box::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        name: &'static str,
        accepts: bool,
    }

    fn stub(name: &'static str, accepts: bool) -> Box<dyn BuiltIn> {
        Box::new(Stub { name, accepts })
    }

    impl BuiltIn for Stub {
        fn name(&self) -> &str {
            self.name
        }
        fn validate(&self, _argv: &[String]) -> bool {
            self.accepts
        }
        fn run(&self, _argv: &[String], _ctx: &mut ShellContext) -> Result<i32> {
            Ok(0)
        }
    }

    #[test]
    fn test_lookup_exact_match() {
        let reg = Registry::new(vec![stub("cd", true), stub("pwd", true)]);
        assert!(reg.lookup("cd").is_some());
        assert!(reg.lookup("pwd").is_some());
        assert!(reg.lookup("cdd").is_none());
        assert!(reg.lookup("").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let reg = Registry::new(vec![stub("cd", true)]);
        assert!(reg.lookup("CD").is_none());
        assert!(reg.lookup("Cd").is_none());
    }

    #[test]
    fn test_lookup_prefers_earlier_entry() {
        // Two entries share a name; the scan must stop at the first,
        // which is the one that accepts.
        let reg = Registry::new(vec![stub("dup", true), stub("dup", false)]);
        assert!(reg.lookup("dup").unwrap().validate(&[]));
    }
}
