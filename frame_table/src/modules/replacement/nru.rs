use log::{debug, trace};

use crate::frame::OwnerId;
use crate::frame_manager::{FrameError, Result};
use crate::frame_table::FrameTable;

use crate::modules::{address_space::AddressSpaceModule, swap::SwapModule};

use super::{ReplacementClass, ReplacementPolicy, Victim};

/// How often the two scan passes are repeated before giving up.
///
/// The second round exists so accessed bits cleared during pass B can age
/// a page down to an eligible class.
const NRU_ROUNDS: usize = 2;

/// Not-recently-used replacement.
///
/// Two passes per round over the owner's frames: pass A takes the first
/// clean cold page (class 1, no write-back needed), pass B writes back and
/// takes the first dirty cold page (class 3), clearing the accessed bit of
/// every page it scans on the way.
pub struct NruReplacementPolicy;

impl ReplacementPolicy for NruReplacementPolicy {
    fn new() -> Self {
        Self
    }

    fn select_victim<A: AddressSpaceModule, S: SwapModule>(
        &mut self,
        table: &FrameTable,
        aspace: &mut A,
        swap: &mut S,
        owner: OwnerId,
    ) -> Result<Option<Victim>> {
        for round in 0..NRU_ROUNDS {
            // fresh snapshot every round: frames can disappear while the
            // scan runs without the table lock
            let candidates = table.owned_by(owner);
            trace!(
                "eviction round {} for {:?}: {} candidates",
                round,
                owner,
                candidates.len()
            );

            // pass A: a clean cold page costs nothing to reclaim
            for frame in &candidates {
                if ReplacementClass::of(aspace, frame.page) == ReplacementClass::CleanCold {
                    trace!("pass A picked {:?} (backs {:?})", frame.addr, frame.page);
                    return Ok(Some(Victim {
                        addr: frame.addr,
                        page: frame.page,
                    }));
                }
            }

            // pass B: fall back to dirty cold pages, write-back required
            for frame in &candidates {
                if ReplacementClass::of(aspace, frame.page) == ReplacementClass::DirtyCold {
                    if swap.persist(owner, frame.page).is_err() {
                        // reusing the frame now would lose the page
                        return Err(FrameError::WriteBackFailed);
                    }
                    aspace.set_dirty(frame.page, false);
                    aspace.set_accessed(frame.page, false);

                    trace!(
                        "pass B picked {:?} (backs {:?}) after write-back",
                        frame.addr,
                        frame.page
                    );
                    return Ok(Some(Victim {
                        addr: frame.addr,
                        page: frame.page,
                    }));
                }

                // age the page for the next round
                aspace.set_accessed(frame.page, false);
            }
        }

        debug!("no eligible victim for {:?} after {} rounds", owner, NRU_ROUNDS);
        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::{Frame, PhysAddr, VirtPage};
    use crate::modules::address_space::BitTableAddressSpace;

    struct RecordingSwap {
        persisted: Vec<(OwnerId, VirtPage)>,
    }

    impl RecordingSwap {
        fn new() -> Self {
            Self {
                persisted: Vec::new(),
            }
        }
    }

    impl SwapModule for RecordingSwap {
        fn persist(&mut self, owner: OwnerId, page: VirtPage) -> core::result::Result<(), ()> {
            self.persisted.push((owner, page));
            Ok(())
        }
    }

    struct FailingSwap;

    impl SwapModule for FailingSwap {
        fn persist(&mut self, _owner: OwnerId, _page: VirtPage) -> core::result::Result<(), ()> {
            Err(())
        }
    }

    /// Address space whose pages the process keeps touching: the accessed
    /// bit reads as set again no matter how often it is cleared.
    struct HotAddressSpace {
        inner: BitTableAddressSpace,
    }

    impl AddressSpaceModule for HotAddressSpace {
        fn is_accessed(&self, _page: VirtPage) -> bool {
            true
        }

        fn is_dirty(&self, page: VirtPage) -> bool {
            self.inner.is_dirty(page)
        }

        fn set_accessed(&mut self, page: VirtPage, accessed: bool) {
            self.inner.set_accessed(page, accessed);
        }

        fn set_dirty(&mut self, page: VirtPage, dirty: bool) {
            self.inner.set_dirty(page, dirty);
        }
    }

    fn table_with(frames: &[(usize, usize, u32)]) -> FrameTable {
        let table = FrameTable::new();
        for &(addr, page, owner) in frames {
            table.insert(Frame {
                addr: PhysAddr(addr),
                page: VirtPage(page),
                owner: OwnerId(owner),
            });
        }
        table
    }

    #[test]
    fn test_class_from_bits() {
        let mut aspace = BitTableAddressSpace::new();
        let page = VirtPage(0x1000);

        assert_eq!(ReplacementClass::of(&aspace, page), ReplacementClass::CleanCold);

        aspace.touch(page);
        assert_eq!(ReplacementClass::of(&aspace, page), ReplacementClass::CleanHot);

        aspace.set_accessed(page, false);
        aspace.set_dirty(page, true);
        assert_eq!(ReplacementClass::of(&aspace, page), ReplacementClass::DirtyCold);

        aspace.touch(page);
        assert_eq!(ReplacementClass::of(&aspace, page), ReplacementClass::DirtyHot);
    }

    #[test]
    fn test_pass_a_beats_pass_b() {
        // one dirty cold page, one clean cold page; the clean one must win
        // even though it sits behind the dirty one in scan order
        let table = table_with(&[(0x4000, 0x1000, 1), (0x5000, 0x2000, 1)]);
        let mut aspace = BitTableAddressSpace::new();
        aspace.set_dirty(VirtPage(0x1000), true);

        let mut swap = RecordingSwap::new();
        let mut policy = NruReplacementPolicy::new();

        let victim = policy
            .select_victim(&table, &mut aspace, &mut swap, OwnerId(1))
            .unwrap()
            .unwrap();

        assert_eq!(victim.addr, PhysAddr(0x5000));
        assert_eq!(victim.page, VirtPage(0x2000));
        assert!(swap.persisted.is_empty(), "class 1 needs no write-back");
    }

    #[test]
    fn test_pass_b_writes_back_and_clears_bits() {
        let table = table_with(&[(0x4000, 0x1000, 1)]);
        let mut aspace = BitTableAddressSpace::new();
        aspace.set_dirty(VirtPage(0x1000), true);

        let mut swap = RecordingSwap::new();
        let mut policy = NruReplacementPolicy::new();

        let victim = policy
            .select_victim(&table, &mut aspace, &mut swap, OwnerId(1))
            .unwrap()
            .unwrap();

        assert_eq!(victim.addr, PhysAddr(0x4000));
        assert_eq!(swap.persisted, vec![(OwnerId(1), VirtPage(0x1000))]);
        assert!(!aspace.is_dirty(VirtPage(0x1000)));
        assert!(!aspace.is_accessed(VirtPage(0x1000)));
    }

    #[test]
    fn test_other_owners_frames_are_never_candidates() {
        // owner 2 has a perfect class 1 victim, owner 1 has nothing
        let table = table_with(&[(0x4000, 0x1000, 2)]);
        let mut aspace = BitTableAddressSpace::new();
        let mut swap = RecordingSwap::new();
        let mut policy = NruReplacementPolicy::new();

        let victim = policy
            .select_victim(&table, &mut aspace, &mut swap, OwnerId(1))
            .unwrap();

        assert_eq!(victim, None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_accessed_pages_age_into_round_two() {
        // only class 2 pages: round one clears their accessed bits in
        // pass B, round two reclaims one as class 1
        let table = table_with(&[(0x4000, 0x1000, 1), (0x5000, 0x2000, 1)]);
        let mut aspace = BitTableAddressSpace::new();
        aspace.touch(VirtPage(0x1000));
        aspace.touch(VirtPage(0x2000));

        let mut swap = RecordingSwap::new();
        let mut policy = NruReplacementPolicy::new();

        let victim = policy
            .select_victim(&table, &mut aspace, &mut swap, OwnerId(1))
            .unwrap();

        assert!(victim.is_some());
        assert!(swap.persisted.is_empty());
    }

    #[test]
    fn test_hot_dirty_pages_exhaust_both_rounds() {
        // pages that stay accessed and dirty are class 4 in every scan;
        // after two rounds the policy gives up
        let table = table_with(&[(0x4000, 0x1000, 1), (0x5000, 0x2000, 1)]);
        let mut aspace = HotAddressSpace {
            inner: BitTableAddressSpace::new(),
        };
        aspace.set_dirty(VirtPage(0x1000), true);
        aspace.set_dirty(VirtPage(0x2000), true);

        let mut swap = RecordingSwap::new();
        let mut policy = NruReplacementPolicy::new();

        let victim = policy
            .select_victim(&table, &mut aspace, &mut swap, OwnerId(1))
            .unwrap();

        assert_eq!(victim, None);
        assert!(swap.persisted.is_empty());
    }

    #[test]
    fn test_write_back_failure_aborts_selection() {
        let table = table_with(&[(0x4000, 0x1000, 1)]);
        let mut aspace = BitTableAddressSpace::new();
        aspace.set_dirty(VirtPage(0x1000), true);

        let mut policy = NruReplacementPolicy::new();
        let result = policy.select_victim(&table, &mut aspace, &mut FailingSwap, OwnerId(1));

        assert_eq!(result, Err(FrameError::WriteBackFailed));
        // the frame stays registered, nothing was reclaimed
        assert_eq!(table.len(), 1);
        assert!(aspace.is_dirty(VirtPage(0x1000)));
    }

    #[test]
    fn test_no_frames_no_victim() {
        let table = FrameTable::new();
        let mut aspace = BitTableAddressSpace::new();
        let mut swap = RecordingSwap::new();
        let mut policy = NruReplacementPolicy::new();

        let victim = policy
            .select_victim(&table, &mut aspace, &mut swap, OwnerId(1))
            .unwrap();
        assert_eq!(victim, None);
    }
}
