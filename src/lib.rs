//! Physical-memory peek/poke command for a kdb-style debugger shell.
//!
//! Lets an operator read or write one 32-bit word at an arbitrary physical
//! address from the interactive debugger prompt. Commands run in an
//! interrupt-like context, so the mapping step runs under a scoped
//! preemption-count bypass; reads use a fault-checked load, while writes are
//! deliberately unchecked — a privileged operator may point this at any
//! address, including ones that will take the target down.
//!
//! The host shell and the host VM subsystem are abstracted behind
//! [`shell::ShellCommand`]/[`shell::CommandTable`] and [`mem::PhysMapper`];
//! [`mem::SimPhysBus`] provides a RAM-backed host model for tests.
pub mod mem;
pub mod shell;

pub use mem::{PhysMapper, PhysMemAccess, PreemptCount, SimPhysBus};
pub use shell::{CommandTable, MemCommand};
