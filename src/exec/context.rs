use crate::config::ShellConfig;
use crate::exec::builtins;
use crate::exec::jobs::JobTable;
use crate::exec::registry::Registry;
use std::sync::Arc;

pub struct ShellContext {
    pub registry: Arc<Registry>,
    pub jobs: JobTable,
    pub config: ShellConfig,
    pub last_status: i32,
}

impl ShellContext {
    pub fn new(config: ShellConfig) -> Self {
        Self::with_registry(config, builtins::standard_registry())
    }

    // The registry is fixed for the life of the context.
    pub fn with_registry(config: ShellConfig, registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            jobs: JobTable::new(),
            config,
            last_status: 0,
        }
    }
}
