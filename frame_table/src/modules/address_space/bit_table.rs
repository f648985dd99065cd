use std::collections::HashMap;

use crate::frame::VirtPage;

use super::AddressSpaceModule;

#[derive(Debug, Clone, Copy, Default)]
struct PageBits {
    accessed: bool,
    dirty: bool,
}

/// In-memory stand-in for hardware page-table bits.
///
/// Pages start with both bits clear, like a freshly mapped page. `touch`
/// and `write` play the role of the hardware setting the bits on access.
#[derive(Default)]
pub struct BitTableAddressSpace {
    bits: HashMap<VirtPage, PageBits>,
}

impl BitTableAddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `page` as referenced, like a hardware read access would.
    pub fn touch(&mut self, page: VirtPage) {
        self.entry(page).accessed = true;
    }

    /// Marks `page` as written; a write access sets both bits.
    pub fn write(&mut self, page: VirtPage) {
        let bits = self.entry(page);
        bits.accessed = true;
        bits.dirty = true;
    }

    fn entry(&mut self, page: VirtPage) -> &mut PageBits {
        self.bits.entry(page).or_default()
    }
}

impl AddressSpaceModule for BitTableAddressSpace {
    fn is_accessed(&self, page: VirtPage) -> bool {
        self.bits.get(&page).map_or(false, |bits| bits.accessed)
    }

    fn is_dirty(&self, page: VirtPage) -> bool {
        self.bits.get(&page).map_or(false, |bits| bits.dirty)
    }

    fn set_accessed(&mut self, page: VirtPage, accessed: bool) {
        self.entry(page).accessed = accessed;
    }

    fn set_dirty(&mut self, page: VirtPage, dirty: bool) {
        self.entry(page).dirty = dirty;
    }
}
