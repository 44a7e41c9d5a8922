//! RAM-backed simulated host physical memory.
//!
//! Stands in for the host kernel's VM subsystem so the command core can be
//! exercised end to end: regions of backed physical address space registered
//! in a range map, a preemption-count assertion on the mapping path, and
//! active-window accounting so tests can prove every window is released.
use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use bitflags::bitflags;

use super::{
    mapper::{FaultError, MapError, MapResult, MappedWindow, PhysMapper},
    preempt::PreemptCount,
};

bitflags! {
    /// Attributes of a simulated physical region.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegionFlags: u32 {
        /// Plain read/write memory.
        const RAM = 0b1;
        /// Writes are silently dropped.
        const ROM = 0b10;
        /// Mapping succeeds but fault-checked reads trap, like a device
        /// hole behind a valid translation.
        const FAULT_ON_READ = 0b100;
    }
}

struct Region {
    len: usize,
    flags: RegionFlags,
    bytes: Arc<Mutex<Vec<u8>>>,
}

/// Simulated physical bus implementing [`PhysMapper`].
///
/// The mapping path refuses to run while the associated [`PreemptCount`] is
/// nonzero, the same assertion the real host's remap primitive makes.
pub struct SimPhysBus {
    regions: Mutex<BTreeMap<u64, Region>>,
    preempt: Arc<PreemptCount>,
    active: Arc<AtomicUsize>,
}

impl SimPhysBus {
    pub fn new(preempt: Arc<PreemptCount>) -> Self {
        Self {
            regions: Mutex::new(BTreeMap::new()),
            preempt,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register `len` bytes of backed physical space starting at `start`.
    /// Regions must not overlap; lookups resolve to the nearest region at or
    /// below the requested address.
    pub fn add_region(&self, start: u64, len: usize, flags: RegionFlags) {
        let region = Region {
            len,
            flags,
            bytes: Arc::new(Mutex::new(vec![0_u8; len])),
        };
        self.lock_regions().insert(start, region);
    }

    /// Number of currently mapped windows. Zero once every operation has
    /// released its mapping.
    pub fn active_windows(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Poke backing bytes directly, bypassing the mapping path. Test setup
    /// helper.
    pub fn seed_word(&self, addr: u64, value: u32) {
        let regions = self.lock_regions();
        if let Some((start, region)) = regions.range(..=addr).next_back() {
            let offset = (addr - start) as usize;
            if let Some(end) = offset.checked_add(4).filter(|end| *end <= region.len) {
                let mut bytes = lock_recover(&region.bytes);
                bytes[offset..end].copy_from_slice(&value.to_le_bytes());
            }
        }
    }

    fn lock_regions(&self) -> std::sync::MutexGuard<'_, BTreeMap<u64, Region>> {
        self.regions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PhysMapper for SimPhysBus {
    fn map_word(&self, addr: u64) -> MapResult<Box<dyn MappedWindow>> {
        let count = self.preempt.get();
        if count != 0 {
            return Err(MapError::InAtomicContext { count });
        }

        let regions = self.lock_regions();
        let (start, region) = regions
            .range(..=addr)
            .next_back()
            .ok_or(MapError::Translation { addr })?;
        let offset = (addr - start) as usize;
        // All 4 bytes must be backed by this region; the offset of a huge
        // address over a low region can sit at the top of the address space,
        // so the end computation must not wrap.
        if offset.checked_add(4).is_none_or(|end| end > region.len) {
            return Err(MapError::Translation { addr });
        }

        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SimWindow {
            addr,
            offset,
            flags: region.flags,
            bytes: Arc::clone(&region.bytes),
            active: Arc::clone(&self.active),
        }))
    }
}

struct SimWindow {
    addr: u64,
    offset: usize,
    flags: RegionFlags,
    bytes: Arc<Mutex<Vec<u8>>>,
    active: Arc<AtomicUsize>,
}

impl MappedWindow for SimWindow {
    fn read_nofault(&self) -> Result<u32, FaultError> {
        if self.flags.contains(RegionFlags::FAULT_ON_READ) {
            return Err(FaultError { addr: self.addr });
        }
        let bytes = lock_recover(&self.bytes);
        let mut word = [0_u8; 4];
        word.copy_from_slice(&bytes[self.offset..self.offset + 4]);
        Ok(u32::from_le_bytes(word))
    }

    fn write(&mut self, value: u32) {
        if self.flags.contains(RegionFlags::ROM) {
            return;
        }
        let mut bytes = lock_recover(&self.bytes);
        bytes[self.offset..self.offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl Drop for SimWindow {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock_recover<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::preempt::PreemptBypass;

    fn make_bus() -> SimPhysBus {
        let bus = SimPhysBus::new(Arc::new(PreemptCount::new(0)));
        bus.add_region(0x1000, 0x100, RegionFlags::RAM);
        bus
    }

    #[test]
    fn unbacked_address_fails_translation() {
        let bus = make_bus();
        assert!(matches!(
            bus.map_word(0x2000),
            Err(MapError::Translation { addr: 0x2000 })
        ));
        assert!(
            matches!(bus.map_word(0x0), Err(MapError::Translation { .. })),
            "below the first region resolves to nothing"
        );
    }

    #[test]
    fn word_straddling_region_end_fails_translation() {
        let bus = make_bus();
        assert!(bus.map_word(0x10FC).is_ok(), "last full word maps");
        assert!(
            matches!(bus.map_word(0x10FD), Err(MapError::Translation { .. })),
            "partial word past the region end must not map"
        );
    }

    #[test]
    fn huge_address_over_a_region_at_zero_fails_translation() {
        let bus = SimPhysBus::new(Arc::new(PreemptCount::new(0)));
        bus.add_region(0x0, 0x100, RegionFlags::RAM);
        assert!(
            matches!(bus.map_word(u64::MAX), Err(MapError::Translation { .. })),
            "offset within 4 bytes of the address-space top must not wrap"
        );
        assert!(
            matches!(bus.map_word(u64::MAX - 3), Err(MapError::Translation { .. })),
            "end exactly at the wrap boundary is still unbacked"
        );
        bus.seed_word(u64::MAX, 1);
        assert!(bus.map_word(0x0).is_ok(), "address zero itself is backed");
    }

    #[test]
    fn map_refused_in_atomic_context_until_bypassed() {
        let preempt = Arc::new(PreemptCount::new(0));
        let bus = SimPhysBus::new(Arc::clone(&preempt));
        bus.add_region(0x1000, 0x100, RegionFlags::RAM);

        preempt.raise();
        assert!(matches!(
            bus.map_word(0x1000),
            Err(MapError::InAtomicContext { count: 1 })
        ));

        {
            let _bypass = PreemptBypass::enter(&preempt);
            assert!(bus.map_word(0x1000).is_ok(), "bypass unblocks the mapper");
        }
        assert_eq!(preempt.get(), 1, "depth restored after the bypass scope");
    }

    #[test]
    fn window_round_trips_a_word_and_releases_on_drop() {
        let bus = make_bus();
        {
            let mut window = bus.map_word(0x1010).expect("map backed word");
            assert_eq!(bus.active_windows(), 1);
            window.write(0xDEAD_BEEF);
            assert_eq!(window.read_nofault().expect("backed read"), 0xDEAD_BEEF);
        }
        assert_eq!(bus.active_windows(), 0, "drop unmaps");
    }

    #[test]
    fn fault_region_maps_but_read_traps() {
        let bus = make_bus();
        bus.add_region(0x8000, 0x10, RegionFlags::FAULT_ON_READ);
        let window = bus.map_word(0x8000).expect("translation itself succeeds");
        assert!(window.read_nofault().is_err(), "fault-checked read traps");
    }

    #[test]
    fn rom_region_swallows_writes() {
        let bus = make_bus();
        bus.add_region(0x4000, 0x10, RegionFlags::ROM);
        bus.seed_word(0x4000, 0x1234_5678);
        let mut window = bus.map_word(0x4000).expect("map rom");
        window.write(0xFFFF_FFFF);
        assert_eq!(
            window.read_nofault().expect("rom read"),
            0x1234_5678,
            "store to ROM is dropped"
        );
    }
}
