//! Command table the host shell's registration hooks pass through to.
//!
//! Mirrors the shell-side lifecycle: a command registers itself under a name
//! at module load and unregisters at teardown. `invoke_line` covers the host
//! side of tokenization so the whole prompt-to-status path can be driven in
//! tests.
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, warn};
use smallvec::SmallVec;

use super::error::{STATUS_ARGCOUNT, STATUS_NOTFOUND};

pub trait ShellCommand: Send + Sync {
    fn name(&self) -> &str;
    fn usage(&self) -> &str;
    fn help(&self) -> &str;
    /// Invoke with the tokenized argument vector; `argv[0]` is the command
    /// name the operator typed.
    fn call(&self, argv: &[&str]) -> i32;
}

#[derive(Default)]
pub struct CommandTable {
    commands: AHashMap<String, Arc<dyn ShellCommand>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a command under its name, replacing any previous registration.
    pub fn register(&mut self, command: Arc<dyn ShellCommand>) {
        debug!("registering shell command '{}'", command.name());
        self.commands.insert(command.name().to_string(), command);
    }

    /// Detach a command at teardown. Unknown names are ignored with a
    /// warning, matching the host shell's tolerant unregister.
    pub fn unregister(&mut self, name: &str) {
        if self.commands.remove(name).is_none() {
            warn!("unregister of unknown command '{name}'");
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn ShellCommand>> {
        self.commands.get(name)
    }

    /// Tokenize an operator line on spaces and dispatch to the named
    /// command.
    pub fn invoke_line(&self, line: &str) -> i32 {
        let argv: SmallVec<[&str; 8]> = line.split(' ').filter(|t| !t.is_empty()).collect();
        let Some(name) = argv.first() else {
            return STATUS_ARGCOUNT;
        };
        match self.commands.get(*name) {
            Some(command) => command.call(&argv),
            None => STATUS_NOTFOUND,
        }
    }
}
