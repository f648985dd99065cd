mod pool;

pub use pool::PoolPhysicalMemoryModule;

use crate::frame::PhysAddr;

/// Physical page allocation primitive.
///
/// Hands out whole page frames and fails when physical memory is
/// exhausted, at which point the caller decides whether to reclaim a
/// frame instead.
pub trait PhysicalMemoryModule {
    /// Tries to allocate one frame, optionally zero-filled.
    fn try_allocate(&mut self, zero: bool) -> Option<PhysAddr>;

    /// Returns a frame to the pool.
    ///
    /// `addr` must come from a previous `try_allocate` on this module and
    /// must not have been freed since.
    fn free(&mut self, addr: PhysAddr);

    /// Number of frames still available.
    fn remaining(&self) -> usize;
}
