mod nru;

pub use nru::NruReplacementPolicy;

use crate::frame::{OwnerId, PhysAddr, VirtPage};
use crate::frame_manager::Result;
use crate::frame_table::FrameTable;

use super::{address_space::AddressSpaceModule, swap::SwapModule};

/// Replacement class of a page, derived from its hardware bits at the
/// moment of the scan. Lower classes are better victims; the class is
/// never stored, it is recomputed for every scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReplacementClass {
    /// Not accessed, not dirty: nothing to write back.
    CleanCold = 1,

    /// Referenced since the accessed bit was last cleared, but clean.
    CleanHot = 2,

    /// Dirty but not recently referenced: evictable after write-back.
    DirtyCold = 3,

    /// Referenced and dirty: worst candidate.
    DirtyHot = 4,
}

impl ReplacementClass {
    /// Classifies `page` from its current accessed/dirty bits.
    pub fn of<A: AddressSpaceModule>(aspace: &A, page: VirtPage) -> Self {
        match (aspace.is_accessed(page), aspace.is_dirty(page)) {
            (false, false) => Self::CleanCold,
            (true, false) => Self::CleanHot,
            (false, true) => Self::DirtyCold,
            (true, true) => Self::DirtyHot,
        }
    }
}

/// Frame proposed for reclamation.
///
/// Only a proposal: the allocator still has to commit it by removing the
/// entry from the table, which can fail when the owner released the frame
/// while the scan ran without the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Victim {
    pub addr: PhysAddr,
    pub page: VirtPage,
}

/// Policy that picks which of an owner's frames to reclaim.
pub trait ReplacementPolicy {
    fn new() -> Self;

    /// Chooses a victim among `owner`'s frames, driving any write-back the
    /// choice requires.
    ///
    /// Only frames of `owner` are ever considered: their hardware bits are
    /// read through that owner's address space, and a process never evicts
    /// another process' working set to satisfy its own fault.
    ///
    /// `Ok(None)` means the scan budget was exhausted without an eligible
    /// victim; the caller reports out-of-memory.
    fn select_victim<A: AddressSpaceModule, S: SwapModule>(
        &mut self,
        table: &FrameTable,
        aspace: &mut A,
        swap: &mut S,
        owner: OwnerId,
    ) -> Result<Option<Victim>>;
}
