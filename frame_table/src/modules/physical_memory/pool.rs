use log::trace;

use crate::frame::{PhysAddr, PAGE_SIZE};

use super::PhysicalMemoryModule;

/// Fixed pool of page frames over a contiguous physical region.
///
/// Frame contents are not modeled here, so the `zero` flag has no visible
/// effect; it is part of the interface because hardware-backed pools hand
/// out zeroed frames on request.
pub struct PoolPhysicalMemoryModule {
    base: PhysAddr,
    frame_count: usize,
    free_list: Vec<PhysAddr>,
}

impl PoolPhysicalMemoryModule {
    /// Creates a pool of `frame_count` frames starting at `base`.
    pub fn new(base: PhysAddr, frame_count: usize) -> Self {
        debug_assert!(base.0 % PAGE_SIZE == 0, "pool base must be page aligned");

        // LIFO free list with the lowest address on top
        let free_list = (0..frame_count)
            .rev()
            .map(|i| PhysAddr(base.0 + i * PAGE_SIZE))
            .collect();

        Self {
            base,
            frame_count,
            free_list,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn contains(&self, addr: PhysAddr) -> bool {
        addr.0 >= self.base.0
            && addr.0 < self.base.0 + self.frame_count * PAGE_SIZE
            && (addr.0 - self.base.0) % PAGE_SIZE == 0
    }
}

impl PhysicalMemoryModule for PoolPhysicalMemoryModule {
    fn try_allocate(&mut self, _zero: bool) -> Option<PhysAddr> {
        let addr = self.free_list.pop();
        if let Some(addr) = addr {
            trace!("allocated {:?} ({} frames left)", addr, self.free_list.len());
        }
        addr
    }

    fn free(&mut self, addr: PhysAddr) {
        debug_assert!(self.contains(addr), "free of foreign frame {:?}", addr);
        debug_assert!(
            !self.free_list.contains(&addr),
            "double free of frame {:?}",
            addr
        );
        self.free_list.push(addr);
    }

    fn remaining(&self) -> usize {
        self.free_list.len()
    }
}
