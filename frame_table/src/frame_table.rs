use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use static_assertions::assert_impl_all;

use crate::frame::{Frame, OwnerId, PhysAddr};

/// Process-wide registry of live frames, keyed by physical address.
///
/// A single mutex serializes all structural changes. Reads copy the small
/// `Frame` record out under the same lock; the result can already be stale
/// the moment it is returned when another thread releases the frame
/// concurrently.
pub struct FrameTable {
    frames: Mutex<HashMap<PhysAddr, Frame>>,
}

assert_impl_all!(FrameTable: Send, Sync);

impl FrameTable {
    /// Creates the empty registry.
    ///
    /// There is one table per system; it is constructed at startup and
    /// lives until shutdown, no teardown is modeled.
    pub fn new() -> Self {
        Self {
            frames: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a newly allocated frame.
    ///
    /// The physical allocator never reissues an address that is still
    /// registered, so a duplicate key is a bug in the caller.
    pub fn insert(&self, frame: Frame) {
        let prev = self.lock().insert(frame.addr, frame);
        debug_assert!(prev.is_none(), "frame {:?} registered twice", frame.addr);
    }

    /// Unregisters and returns the frame at `addr`, `None` if there is no
    /// live frame with that address.
    pub fn remove(&self, addr: PhysAddr) -> Option<Frame> {
        self.lock().remove(&addr)
    }

    /// Unregisters `addr` and runs `f` on the removed record while still
    /// holding the table lock.
    ///
    /// `release` uses this so no other thread can observe a registered
    /// frame whose physical page has already been freed.
    pub fn remove_with(&self, addr: PhysAddr, f: impl FnOnce(&Frame)) -> Option<Frame> {
        let mut frames = self.lock();
        let removed = frames.remove(&addr);
        if let Some(frame) = removed.as_ref() {
            f(frame);
        }
        removed
    }

    /// Returns a copy of the frame registered at `addr`.
    pub fn find(&self, addr: PhysAddr) -> Option<Frame> {
        self.lock().get(&addr).copied()
    }

    /// Snapshot of all frames belonging to `owner`, in address order.
    ///
    /// The caller scans the snapshot without the lock; a frame may be
    /// released while it does, so any victim derived from the snapshot has
    /// to be revalidated with [`FrameTable::remove`] before it is reused.
    pub fn owned_by(&self, owner: OwnerId) -> Vec<Frame> {
        let mut frames: Vec<Frame> = self
            .lock()
            .values()
            .filter(|frame| frame.owner == owner)
            .copied()
            .collect();
        frames.sort_by_key(|frame| frame.addr);
        frames
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PhysAddr, Frame>> {
        // a poisoned lock means a panic mid-mutation, the registry cannot
        // be trusted afterwards
        self.frames.lock().expect("frame table lock poisoned")
    }
}

impl Default for FrameTable {
    fn default() -> Self {
        Self::new()
    }
}
