pub mod access;
pub mod mapper;
pub mod preempt;
pub mod sim;

pub use access::PhysMemAccess;
pub use mapper::{FaultError, MapError, MapResult, MappedWindow, PhysMapper};
pub use preempt::{PreemptBypass, PreemptCount};
pub use sim::{RegionFlags, SimPhysBus};
