//! Host virtual-memory seam: temporary 4-byte windows over physical memory.
//!
//! The actual physical-to-virtual translation belongs to the host kernel;
//! this module only fixes the interface the command core drives. A window is
//! always exactly one 32-bit word. Unmapping is the window's `Drop`, so every
//! exit path of an operation releases its mapping without bookkeeping.
use std::fmt;

pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug)]
pub enum MapError {
    /// No translation could be established for the 4 bytes at `addr`.
    Translation { addr: u64 },
    /// The host refused to map while the preemption count was nonzero.
    InAtomicContext { count: u32 },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Translation { addr } => {
                write!(f, "no mapping for physical address 0x{addr:x}")
            }
            MapError::InAtomicContext { count } => {
                write!(f, "mapping refused in atomic context (preempt count {count})")
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Fault reported by a fault-checked window read.
#[derive(Debug)]
pub struct FaultError {
    pub addr: u64,
}

impl fmt::Display for FaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "access fault reading 4 bytes at 0x{:x}", self.addr)
    }
}

impl std::error::Error for FaultError {}

/// A live 4-byte mapping of physical address space. Dropping the window
/// unmaps it.
pub trait MappedWindow {
    /// Fault-checked load: traps and reports an inaccessible page instead of
    /// bringing the machine down. Must return promptly.
    fn read_nofault(&self) -> Result<u32, FaultError>;

    /// Unchecked store. Deliberately infallible in signature: a write to an
    /// invalid or side-effecting physical range is allowed to take the
    /// target down. Operator judgment required.
    fn write(&mut self, value: u32);
}

/// The host's mapping primitive (`ioremap` analog). Implementations may
/// assert the preemption count is zero; callers wrap this in a
/// [`PreemptBypass`](crate::mem::PreemptBypass) when invoking from
/// interrupt-like context.
pub trait PhysMapper: Send + Sync {
    fn map_word(&self, addr: u64) -> MapResult<Box<dyn MappedWindow>>;
}
