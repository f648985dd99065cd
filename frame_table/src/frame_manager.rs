use std::sync::{Mutex, MutexGuard};

use log::{debug, error, trace, warn};

use crate::frame::{Frame, OwnerId, PhysAddr, VirtPage};
use crate::frame_table::FrameTable;
use crate::modules::{
    address_space::AddressSpaceModule, physical_memory::PhysicalMemoryModule,
    replacement::ReplacementPolicy, swap::SwapModule,
};

/// Failures surfaced by [`FrameManager::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Physical allocation failed and eviction found no eligible victim.
    OutOfMemory,

    /// The swap writer could not persist a dirty victim; the eviction was
    /// aborted rather than losing the page.
    WriteBackFailed,
}

pub type Result<T> = core::result::Result<T, FrameError>;

/// Tunables of the frame manager.
#[derive(Debug, Clone, Copy)]
pub struct FrameManagerConfig {
    /// How often a proposed victim that vanished before the commit is
    /// replaced by a fresh scan before the acquire gives up.
    pub evict_commit_retries: usize,
}

impl Default for FrameManagerConfig {
    fn default() -> Self {
        Self {
            evict_commit_retries: 2,
        }
    }
}

/// Allocation front end over the frame table.
///
/// `acquire` and `release` are the only operations that change the
/// physical memory accounting; `lookup` has no side effects.
///
/// Lock order: the table lock may be held while taking the physical pool
/// lock (`release` frees inside the table critical section), never the
/// other way around. The policy and swap locks are only held while an
/// eviction is in flight, outside any table critical section.
pub struct FrameManager<P: PhysicalMemoryModule, S: SwapModule, R: ReplacementPolicy> {
    table: FrameTable,
    physical: Mutex<P>,
    swap: Mutex<S>,
    policy: Mutex<R>,
    config: FrameManagerConfig,
}

impl<P: PhysicalMemoryModule, S: SwapModule, R: ReplacementPolicy> FrameManager<P, S, R> {
    pub fn new(physical: P, swap: S) -> Self {
        Self::with_config(physical, swap, FrameManagerConfig::default())
    }

    pub fn with_config(physical: P, swap: S, config: FrameManagerConfig) -> Self {
        Self {
            table: FrameTable::new(),
            physical: Mutex::new(physical),
            swap: Mutex::new(swap),
            policy: Mutex::new(R::new()),
            config,
        }
    }

    /// Obtains a physical frame backing `page` for `owner`.
    ///
    /// Falls back to evicting one of `owner`'s own frames when physical
    /// memory is exhausted. On success the frame is already registered in
    /// the table.
    pub fn acquire<A: AddressSpaceModule>(
        &self,
        aspace: &mut A,
        owner: OwnerId,
        page: VirtPage,
        zero: bool,
    ) -> Result<PhysAddr> {
        trace!("acquire {:?} for {:?} (zero: {})", page, owner, zero);

        let addr = self.obtain_frame(aspace, owner, page, zero)?;

        self.table.insert(Frame { addr, page, owner });
        Ok(addr)
    }

    /// Frees the frame at `addr` and unregisters it.
    ///
    /// Returns `false` when no frame with that address is live; releasing
    /// twice is a harmless no-op, not an error.
    pub fn release(&self, addr: PhysAddr) -> bool {
        // free and unregister in one critical section, so no other thread
        // can look up a frame whose physical backing is already gone
        let removed = self.table.remove_with(addr, |frame| {
            self.physical_lock().free(frame.addr);
        });

        match removed {
            Some(frame) => {
                trace!("released {:?} (backed {:?} of {:?})", addr, frame.page, frame.owner);
                true
            }
            None => {
                trace!("release of unknown frame {:?} ignored", addr);
                false
            }
        }
    }

    /// Looks up the live frame registered at `addr`.
    ///
    /// The copy can be stale as soon as it is returned if another thread
    /// releases the frame concurrently.
    pub fn lookup(&self, addr: PhysAddr) -> Option<Frame> {
        self.table.find(addr)
    }

    /// Number of live frame records.
    pub fn frame_count(&self) -> usize {
        self.table.len()
    }

    /// Number of unallocated physical frames.
    pub fn remaining_physical(&self) -> usize {
        self.physical_lock().remaining()
    }

    fn obtain_frame<A: AddressSpaceModule>(
        &self,
        aspace: &mut A,
        owner: OwnerId,
        page: VirtPage,
        zero: bool,
    ) -> Result<PhysAddr> {
        for attempt in 0..=self.config.evict_commit_retries {
            if let Some(addr) = self.physical_lock().try_allocate(zero) {
                return Ok(addr);
            }

            if attempt == 0 {
                debug!("physical memory exhausted, reclaiming a frame of {:?}", owner);
            }

            let proposed = {
                let mut policy = self.policy.lock().expect("policy lock poisoned");
                let mut swap = self.swap.lock().expect("swap lock poisoned");
                policy.select_victim(&self.table, aspace, &mut *swap, owner)
            };

            let victim = match proposed {
                Ok(Some(victim)) => victim,
                Ok(None) => break,
                Err(err) => {
                    error!("write-back failed while evicting for {:?}", owner);
                    return Err(err);
                }
            };

            // commit: the victim may have been released while the scan ran
            // without the table lock
            if self.table.remove(victim.addr).is_some() {
                trace!("reusing {:?} (previously backed {:?})", victim.addr, victim.page);
                return Ok(victim.addr);
            }

            debug!("victim {:?} vanished before commit, rescanning", victim.addr);
        }

        warn!("out of memory: no frame for {:?} of {:?}", page, owner);
        Err(FrameError::OutOfMemory)
    }

    fn physical_lock(&self) -> MutexGuard<'_, P> {
        self.physical.lock().expect("physical pool lock poisoned")
    }
}
