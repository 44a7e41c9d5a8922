//! Verb dispatch for the physical-memory command.
//!
//! The host shell hands over the tokenized argument vector with the typed
//! command name in `argv[0]`. The verb is the first character of the first
//! user-supplied argument, so `r`, `rd` and `r4` all select the read path.
use std::sync::Arc;

use log::{debug, error};

use crate::mem::{PhysMapper, PhysMemAccess, PreemptCount};

use super::{
    console::Console,
    error::{CmdError, CmdResult, STATUS_OK},
    registry::ShellCommand,
};

pub struct MemCommand {
    access: PhysMemAccess,
}

impl MemCommand {
    pub fn new(
        mapper: Arc<dyn PhysMapper>,
        preempt: Arc<PreemptCount>,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            access: PhysMemAccess::new(mapper, preempt, console),
        }
    }

    /// Route the argument vector to the matching operation. `Ok(Some(v))`
    /// carries the value a read echoed; writes yield `Ok(None)`.
    pub fn dispatch(&self, argv: &[&str]) -> CmdResult<Option<u32>> {
        // One argument beyond the command name is the minimum for any verb.
        if argv.len() < 2 {
            return Err(CmdError::TooFewArgs {
                got: argv.len().saturating_sub(1),
                need: 1,
            });
        }

        let verb = argv[1].chars().next().unwrap_or(' ');
        debug!("dispatching verb '{verb}' with {} argument(s)", argv.len() - 1);
        match verb {
            'r' => {
                let addr_text = require_arg(argv, 2, 2)?;
                self.access.read_word(addr_text).map(Some)
            }
            'w' => {
                let addr_text = require_arg(argv, 2, 3)?;
                let value_text = require_arg(argv, 3, 3)?;
                self.access.write_word(addr_text, value_text).map(|()| None)
            }
            other => Err(CmdError::UnknownVerb { verb: other }),
        }
    }

    /// Dispatch and fold to the host shell's integer status, logging the
    /// failure on the error arm.
    pub fn run(&self, argv: &[&str]) -> i32 {
        match self.dispatch(argv) {
            Ok(_) => STATUS_OK,
            Err(err) => {
                error!("command failed: {err}");
                err.code()
            }
        }
    }
}

impl ShellCommand for MemCommand {
    fn name(&self) -> &str {
        "pmem"
    }

    fn usage(&self) -> &str {
        "r <addr> | w <addr> <value>"
    }

    fn help(&self) -> &str {
        "Read or write a 32-bit word at a physical address"
    }

    fn call(&self, argv: &[&str]) -> i32 {
        self.run(argv)
    }
}

fn require_arg<'a>(argv: &[&'a str], index: usize, need: usize) -> CmdResult<&'a str> {
    argv.get(index).copied().ok_or(CmdError::TooFewArgs {
        got: argv.len() - 1,
        need,
    })
}
