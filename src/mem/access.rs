//! Single-word physical memory access over a temporary mapping.
//!
//! The map / access / unmap sequence for one 32-bit word. The preemption
//! bypass wraps ONLY the mapping call; access and unmap run at the restored
//! nesting depth. Reads go through a fault-checked load; writes are stored
//! unchecked on purpose (see [`MappedWindow::write`]): this is a privileged
//! operator tool and a write to a bad physical range is allowed to take the
//! target down.
use std::sync::Arc;

use log::{error, info};

use crate::shell::{
    console::Console,
    error::{CmdError, CmdResult},
    parser::TokenCursor,
};

use super::{
    mapper::{MappedWindow, PhysMapper},
    preempt::{PreemptBypass, PreemptCount},
};

pub struct PhysMemAccess {
    mapper: Arc<dyn PhysMapper>,
    preempt: Arc<PreemptCount>,
    console: Arc<dyn Console>,
}

impl PhysMemAccess {
    pub fn new(
        mapper: Arc<dyn PhysMapper>,
        preempt: Arc<PreemptCount>,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            mapper,
            preempt,
            console,
        }
    }

    /// Read 4 bytes at the physical address in `addr_text`, echo the value
    /// to the operator console and return it. Address 0 is legal; so is a
    /// read result of 0.
    pub fn read_word(&self, addr_text: &str) -> CmdResult<u32> {
        let addr = self.parse_token(addr_text, "address")?;

        let window = self.map_word(addr)?;
        let value = window.read_nofault().map_err(|fault| {
            error!("fault-checked read failed: {fault}");
            // Window dropped here: the mapping is released on the fault path.
            CmdError::AccessFault { addr }
        })?;

        self.console.line(&format!("0x{value:08x}"));
        info!("value read from 0x{addr:x}: 0x{value:08x}");
        Ok(value)
    }

    /// Write the low 32 bits of the value in `value_text` to the physical
    /// address in `addr_text`. The store is not fault-checked.
    pub fn write_word(&self, addr_text: &str, value_text: &str) -> CmdResult<()> {
        let addr = self.parse_token(addr_text, "address")?;
        let value = self.parse_token(value_text, "value")?;

        let mut window = self.map_word(addr)?;
        window.write(value as u32);

        info!("value 0x{:08x} written to 0x{addr:x}", value as u32);
        Ok(())
    }

    fn parse_token(&self, text: &str, which: &'static str) -> CmdResult<u64> {
        let mut cursor = TokenCursor::new(text);
        cursor.take_number().map_err(|source| {
            error!("failed to extract {which} from '{text}': {source}");
            CmdError::BadToken { which, source }
        })
    }

    fn map_word(&self, addr: u64) -> CmdResult<Box<dyn MappedWindow>> {
        let mapped = {
            let _bypass = PreemptBypass::enter(&self.preempt);
            self.mapper.map_word(addr)
        };
        mapped.map_err(|err| {
            error!("remap failed for address 0x{addr:x}: {err}");
            CmdError::Translation { addr }
        })
    }
}
