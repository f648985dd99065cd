mod bit_table;

pub use bit_table::BitTableAddressSpace;

use crate::frame::VirtPage;

/// Accessed/dirty bit interface of one process' page tables.
///
/// The bits are hardware-maintained in a real system: an access sets the
/// accessed bit, a write sets both. The replacement policy only ever reads
/// and clears them through this interface.
pub trait AddressSpaceModule {
    /// Was `page` referenced since the accessed bit was last cleared?
    fn is_accessed(&self, page: VirtPage) -> bool;

    /// Was `page` written since the dirty bit was last cleared?
    fn is_dirty(&self, page: VirtPage) -> bool;

    fn set_accessed(&mut self, page: VirtPage, accessed: bool);

    fn set_dirty(&mut self, page: VirtPage, dirty: bool);
}
