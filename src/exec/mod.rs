pub mod command;
pub mod registry;
pub mod jobs;
pub mod context;
pub mod builtins;
pub mod launch;
pub mod pipeline;
pub mod dispatch;

pub use command::{Command, CommandLine};
pub use context::ShellContext;
pub use dispatch::{Outcome, evaluate};
